//! Ratatui-based interactive dashboard.
//!
//! Two selectors (report type, year) drive a 2×2 chart grid. Every selector
//! change re-evaluates the charts from scratch; the year selector is inert
//! whenever the gating rule says so.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::info;

use crate::app::pipeline::{DASHBOARD_TITLE, Dashboard, REPORT_PLACEHOLDER, YEAR_CHOICES, YEAR_PLACEHOLDER};
use crate::cli::TuiArgs;
use crate::domain::{ChartSpec, ReportMode, SelectionState};
use crate::error::AppError;
use crate::io::export::{ChartDocument, write_charts_json};
use crate::report::{grouped_series, pie_shares, xy_series};
use crate::view::layout_rows;

mod plotters_chart;

use plotters_chart::LinePlottersChart;

const EXPORT_PATH: &str = "autosales_charts.json";

const SERIES_COLORS: [Color; 7] = [
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Green,
    Color::LightRed,
    Color::LightBlue,
    Color::White,
];

/// Start the TUI.
pub fn run(dashboard: Dashboard, args: TuiArgs) -> Result<(), AppError> {
    let mut app = App::new(dashboard, args.selection.selection());

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Report,
    Year,
}

struct App {
    dashboard: Dashboard,
    report_mode: Option<ReportMode>,
    year: Option<i32>,
    field: Field,
    charts: Vec<ChartSpec>,
    status: String,
}

impl App {
    fn new(dashboard: Dashboard, initial: SelectionState) -> Self {
        let status = format!("Loaded {} records from {}", dashboard.dataset().len(), dashboard.source_label());
        let mut app = Self {
            dashboard,
            report_mode: initial.report_mode,
            year: initial.selected_year,
            field: Field::Report,
            charts: Vec::new(),
            status,
        };
        app.reevaluate();
        app
    }

    fn selection(&self) -> SelectionState {
        SelectionState::new(self.report_mode, self.year)
    }

    fn year_enabled(&self) -> bool {
        self.dashboard.year_selector_enabled(self.report_mode)
    }

    fn reevaluate(&mut self) {
        self.charts = self.dashboard.evaluate(&self.selection());
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.field = Field::Report,
            KeyCode::Down => self.field = Field::Year,
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Char('x') | KeyCode::Backspace | KeyCode::Delete => {
                if self.year_enabled() {
                    self.year = None;
                    self.reevaluate();
                    self.status = "year cleared".to_string();
                }
            }
            KeyCode::Char('e') => self.export(Path::new(EXPORT_PATH)),
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.field {
            Field::Report => {
                self.report_mode = cycle_mode(self.report_mode, delta);
                self.status = format!(
                    "report: {}",
                    self.report_mode.map(ReportMode::label).unwrap_or(REPORT_PLACEHOLDER)
                );
            }
            Field::Year => {
                if !self.year_enabled() {
                    self.status = "Year selection is only available for Yearly Statistics.".to_string();
                    return;
                }
                self.year = step_year(self.year, delta);
                self.status = match self.year {
                    Some(y) => format!("year: {y}"),
                    None => "year: none".to_string(),
                };
            }
        }
        self.reevaluate();
    }

    fn export(&mut self, path: &Path) {
        if self.charts.is_empty() {
            self.status = "Nothing to export; select a report first.".to_string();
            return;
        }
        let doc = ChartDocument::new(self.dashboard.source_label(), self.selection(), &self.charts);
        self.status = match write_charts_json(path, &doc) {
            Ok(()) => {
                info!(path = %path.display(), "exported charts from dashboard");
                format!("Wrote {}", path.display())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_selectors(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = Line::from(Span::styled(
            DASHBOARD_TITLE,
            Style::default().fg(Color::Rgb(0x50, 0x3D, 0x36)).add_modifier(Modifier::BOLD),
        ));
        let p = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_selectors(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let report = self.report_mode.map(ReportMode::label).unwrap_or(REPORT_PLACEHOLDER);
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| YEAR_PLACEHOLDER.to_string());

        let year_style = if self.year_enabled() {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let items = vec![
            ListItem::new(format!("Report: {report}")),
            ListItem::new(Line::from(Span::styled(
                format!(
                    "Year:   {year}{}",
                    if self.year_enabled() { "" } else { "  (disabled)" }
                ),
                year_style,
            ))),
        ];

        let list = List::new(items)
            .block(Block::default().title("Selection").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(match self.field {
            Field::Report => 0,
            Field::Year => 1,
        }));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.charts.is_empty() {
            let msg = match self.report_mode {
                None => "Select a report type to show charts.",
                Some(_) => "Select a year to show the yearly report.",
            };
            let p = Paragraph::new(msg)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(p, area);
            return;
        }

        let rows: Vec<&[ChartSpec]> = layout_rows(&self.charts).collect();
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows.len() as u32); rows.len()])
            .split(area);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, row.len() as u32); row.len()])
                .split(*row_area);
            for (chart, cell) in row.iter().zip(cells.iter()) {
                draw_chart(frame, *cell, chart);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  x clear year  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Placeholder → Yearly → Recession → placeholder (and back).
fn cycle_mode(current: Option<ReportMode>, delta: i32) -> Option<ReportMode> {
    let slots = ReportMode::ALL.len() as i32 + 1;
    let idx = match current {
        None => 0,
        Some(mode) => ReportMode::ALL.iter().position(|m| *m == mode).map_or(0, |i| i as i32 + 1),
    };
    let next = (idx + delta).rem_euclid(slots);
    if next == 0 {
        None
    } else {
        Some(ReportMode::ALL[(next - 1) as usize])
    }
}

/// Move through the year choices; stepping left past the first year clears it.
fn step_year(current: Option<i32>, delta: i32) -> Option<i32> {
    let (first, last) = (*YEAR_CHOICES.start(), *YEAR_CHOICES.end());
    match current {
        None if delta > 0 => Some(first),
        None => None,
        Some(y) => {
            let next = y + delta;
            if next < first {
                None
            } else {
                Some(next.min(last))
            }
        }
    }
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let block = Block::default().title(chart.title().to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    if chart.data().is_empty() {
        let msg = Paragraph::new("No matching records.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, inner);
        return;
    }

    match chart {
        ChartSpec::Line { .. } => draw_line_chart(frame, inner, chart),
        ChartSpec::Bar { .. } => draw_bar_chart(frame, inner, chart),
        ChartSpec::GroupedBar { .. } => draw_grouped_bar_chart(frame, inner, chart),
        ChartSpec::Pie { .. } => draw_pie_chart(frame, inner, chart),
    }
}

fn draw_line_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let series = xy_series(chart.data());
    let (x_label, y_label) = chart.axis_labels();

    let x_bounds = series
        .x_bounds()
        .map(|(a, b)| if b > a { [a, b] } else { [a - 0.5, b + 0.5] })
        .unwrap_or([0.0, 1.0]);
    let y_bounds = series
        .y_bounds()
        .map(|(a, b)| {
            let pad = ((b - a).abs() * 0.05).max(1e-9);
            [a - pad, b + pad]
        })
        .unwrap_or([0.0, 1.0]);

    let widget = LinePlottersChart {
        points: &series.points,
        x_bounds,
        y_bounds,
        x_label: &x_label,
        y_label: &y_label,
        x_categories: series.categorical.then_some(series.labels.as_slice()),
    };
    frame.render_widget(widget, area);
}

fn draw_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let data = chart.data();
    let bars: Vec<Bar> = data
        .rows
        .iter()
        .map(|row| {
            Bar::default()
                .value(bar_value(row.mean))
                .label(Line::from(row.key.to_string()))
                .text_value(format!("{:.0}", row.mean))
                .style(Style::default().fg(Color::Cyan))
        })
        .collect();

    let bar_width = fit_bar_width(area.width, bars.len(), 1);
    let widget = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(widget, area);
}

fn draw_grouped_bar_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let (series, groups) = grouped_series(chart.data());
    let (x_label, y_label) = chart.axis_labels();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let color_of = |name: &str| {
        let idx = series.iter().position(|s| s == name).unwrap_or(0);
        SERIES_COLORS[idx % SERIES_COLORS.len()]
    };

    let total_bars: usize = groups.iter().map(|g| g.bars.len()).sum();
    let bar_width = fit_bar_width(chunks[0].width, total_bars + groups.len(), 0);

    let mut widget = BarChart::default().bar_width(bar_width).bar_gap(0).group_gap(1);
    for group in &groups {
        let bars: Vec<Bar> = group
            .bars
            .iter()
            .map(|(name, value)| {
                Bar::default()
                    .value(bar_value(*value))
                    .text_value(String::new())
                    .style(Style::default().fg(color_of(name)))
            })
            .collect();
        widget = widget.data(BarGroup::default().label(Line::from(group.x.clone())).bars(&bars));
    }
    frame.render_widget(widget, chunks[0]);

    let mut legend: Vec<Span> = vec![Span::styled(
        format!("{x_label} → / {y_label} ↑   "),
        Style::default().fg(Color::Gray),
    )];
    for name in &series {
        legend.push(Span::styled("■ ", Style::default().fg(color_of(name))));
        legend.push(Span::raw(format!("{name}  ")));
    }
    frame.render_widget(Paragraph::new(Text::from(Line::from(legend))), chunks[1]);
}

fn draw_pie_chart(frame: &mut ratatui::Frame<'_>, area: Rect, chart: &ChartSpec) {
    let shares = pie_shares(chart.data());
    let label_width = shares.iter().map(|s| s.label.chars().count()).max().unwrap_or(0).min(20);
    let bar_space = (area.width as usize).saturating_sub(label_width + 10).max(1);

    let lines: Vec<Line> = shares
        .iter()
        .enumerate()
        .map(|(idx, share)| {
            let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
            let len = (share.fraction * bar_space as f64).round() as usize;
            Line::from(vec![
                Span::raw(format!("{:<label_width$} ", truncate(&share.label, label_width))),
                Span::styled("█".repeat(len.min(bar_space)), Style::default().fg(color)),
                Span::raw(format!(" {:>5.1}%", share.fraction * 100.0)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn bar_value(mean: f64) -> u64 {
    if mean.is_finite() && mean > 0.0 {
        mean.round() as u64
    } else {
        0
    }
}

/// Widest bar that lets `n` bars (plus gaps) fit in `width` columns.
fn fit_bar_width(width: u16, n: usize, gap: u16) -> u16 {
    if n == 0 {
        return 1;
    }
    let per_bar = width as usize / n;
    (per_bar.saturating_sub(gap as usize)).clamp(1, 9) as u16
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
