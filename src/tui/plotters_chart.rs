//! Plotters-powered line chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only line chart description.
///
/// All series and bounds are computed outside the render call.
pub struct LinePlottersChart<'a> {
    pub points: &'a [(f64, f64)],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Tick labels for categorical x positions (index → label).
    pub x_categories: Option<&'a [String]>,
}

impl<'a> LinePlottersChart<'a> {
    fn fmt_x(&self, v: f64) -> String {
        match self.x_categories {
            Some(labels) => {
                let idx = v.round();
                if idx < 0.0 || (idx - v).abs() > 0.25 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            }
            None => format!("{v:.0}"),
        }
    }
}

impl<'a> Widget for LinePlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let x_ticks = self.x_categories.map(|l| l.len().min(12)).unwrap_or(6);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(x_ticks)
                .y_labels(5)
                .x_label_formatter(&|v| self.fmt_x(*v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let point_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.points.iter().copied(), &line_color))?;

            // Pixels rather than circles: the backend maps circle radii poorly.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), point_color)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
