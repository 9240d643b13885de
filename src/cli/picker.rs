//! Interactive selection prompt for `autosales report`.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker offers the "run `autosales report` and choose" UX, mirroring
//!   the dashboard's two selectors in a plain line-based terminal

use std::io::{self, BufRead, Write};

use crate::app::pipeline::{REPORT_PLACEHOLDER, YEAR_CHOICES, YEAR_PLACEHOLDER};
use crate::domain::{ReportMode, SelectionState};
use crate::error::AppError;
use crate::view::is_year_selector_enabled;

/// Prompt on stdin/stdout.
pub fn prompt_for_selection() -> Result<SelectionState, AppError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    prompt_for_selection_with(&mut input, &mut output)
}

/// Prompt for report type, then (for the yearly report) a year.
///
/// Behavior:
/// - report type by number (1-2)
/// - year by value; empty input leaves it unset
/// - `q` cancels
pub fn prompt_for_selection_with<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<SelectionState, AppError> {
    writeln!(output, "Report types:").map_err(write_err)?;
    for (idx, mode) in ReportMode::ALL.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, mode.label()).map_err(write_err)?;
    }

    let mode = loop {
        let prompt = format!("{REPORT_PLACEHOLDER} (1-{}, q to quit): ", ReportMode::ALL.len());
        let answer = read_answer(input, output, &prompt)?;
        if let Ok(choice) = answer.parse::<usize>() {
            if (1..=ReportMode::ALL.len()).contains(&choice) {
                break ReportMode::ALL[choice - 1];
            }
        }
        if let Some(mode) = ReportMode::from_label(&answer) {
            break mode;
        }
        writeln!(output, "Invalid choice: {answer}.").map_err(write_err)?;
    };

    if !is_year_selector_enabled(Some(mode)) {
        return Ok(SelectionState::new(Some(mode), None));
    }

    let year = loop {
        let prompt = format!(
            "{YEAR_PLACEHOLDER} ({}-{}, Enter to skip, q to quit): ",
            YEAR_CHOICES.start(),
            YEAR_CHOICES.end()
        );
        let answer = read_answer(input, output, &prompt)?;
        if answer.is_empty() {
            break None;
        }
        match answer.parse::<i32>() {
            Ok(year) if YEAR_CHOICES.contains(&year) => break Some(year),
            _ => writeln!(output, "Invalid year: {answer}.").map_err(write_err)?,
        }
    };

    Ok(SelectionState::new(Some(mode), year))
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String, AppError> {
    write!(output, "{prompt}").map_err(write_err)?;
    output.flush().map_err(write_err)?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;

    if bytes == 0 {
        return Err(AppError::input(
            "No input received. Pass the selection with `autosales report --mode <MODE> [--year <YEAR>]`.",
        ));
    }

    let answer = line.trim().to_string();
    if answer.eq_ignore_ascii_case("q") {
        return Err(AppError::input("Canceled."));
    }
    Ok(answer)
}

fn write_err(e: io::Error) -> AppError {
    AppError::input(format!("Failed to write prompt: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> (Result<SelectionState, AppError>, String) {
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        let res = prompt_for_selection_with(&mut input, &mut output);
        (res, String::from_utf8(output).unwrap())
    }

    #[test]
    fn recession_skips_year_prompt() {
        let (res, out) = run("2\n");
        assert_eq!(res.unwrap(), SelectionState::recession());
        assert!(!out.contains(YEAR_PLACEHOLDER));
    }

    #[test]
    fn yearly_asks_for_year_and_retries_invalid_input() {
        let (res, out) = run("7\n1\n1975\n2005\n");
        assert_eq!(res.unwrap(), SelectionState::yearly(Some(2005)));
        assert!(out.contains("Invalid choice: 7."));
        assert!(out.contains("Invalid year: 1975."));
    }

    #[test]
    fn accepts_mode_labels_and_empty_year() {
        let (res, _) = run("Yearly Statistics\n\n");
        assert_eq!(res.unwrap(), SelectionState::yearly(None));
    }

    #[test]
    fn quit_and_eof_are_errors() {
        let (res, _) = run("q\n");
        assert_eq!(res.unwrap_err().message(), "Canceled.");
        let (res, _) = run("");
        assert_eq!(res.unwrap_err().exit_code(), 2);
    }
}
