//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use parkwatch_core::{BoardState, DisplayTarget, StatusSnapshot};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Rows ─────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatusRow<'a> {
    #[tabled(rename = "Occupied")]
    occupied: &'a str,
    #[tabled(rename = "Available")]
    available: &'a str,
    #[tabled(rename = "Last Updated")]
    last_updated: &'a str,
}

impl<'a> From<&'a BoardState> for StatusRow<'a> {
    fn from(state: &'a BoardState) -> Self {
        Self {
            occupied: &state.occupied,
            available: &state.available,
            last_updated: &state.last_updated,
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// `detail_fn` produces the table view, `plain_fn` the scripting view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => plain_fn(data),
    })
}

/// Render one fetched snapshot.
pub fn render_status(format: OutputFormat, snapshot: &StatusSnapshot) -> Result<String, CliError> {
    render_single(
        format,
        snapshot,
        |s| render_table(&board_of(s)),
        |s| render_plain(&board_of(s)),
    )
}

/// Render one board update for `watch`: a single line for table and
/// plain, one document per update for the structured formats.
pub fn render_update(
    format: OutputFormat,
    state: &BoardState,
    color: bool,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => render_line(state, color),
        OutputFormat::Plain => state_values(state).join("\t"),
        OutputFormat::Json | OutputFormat::JsonCompact => serde_json::to_string(state)?,
        OutputFormat::Yaml => format!("---\n{}", serde_yaml::to_string(state)?),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn board_of(snapshot: &StatusSnapshot) -> BoardState {
    let mut board = BoardState::default();
    board.apply(snapshot);
    board
}

fn state_values(state: &BoardState) -> Vec<&str> {
    [
        DisplayTarget::Occupied,
        DisplayTarget::Available,
        DisplayTarget::LastUpdated,
    ]
    .into_iter()
    .map(|t| state.get(t))
    .collect()
}

fn render_table(state: &BoardState) -> String {
    Table::new([StatusRow::from(state)])
        .with(Style::rounded())
        .to_string()
}

fn render_plain(state: &BoardState) -> String {
    state_values(state).join("\n")
}

fn render_line(state: &BoardState, color: bool) -> String {
    if color {
        format!(
            "{}  occupied {}  available {}",
            format!("[{}]", state.last_updated).dimmed(),
            state.occupied.red().bold(),
            state.available.green().bold(),
        )
    } else {
        format!(
            "[{}]  occupied {}  available {}",
            state.last_updated, state.occupied, state.available
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snap() -> StatusSnapshot {
        StatusSnapshot {
            occupied: 3,
            available: 17,
            last_updated: "2024-01-01T12:00:00Z".into(),
        }
    }

    #[test]
    fn plain_is_one_value_per_line() {
        let out = render_status(OutputFormat::Plain, &snap()).unwrap();
        assert_eq!(out, "3\n17\n2024-01-01T12:00:00Z");
    }

    #[test]
    fn table_has_headers_and_values() {
        let out = render_status(OutputFormat::Table, &snap()).unwrap();
        assert!(out.contains("Occupied"));
        assert!(out.contains("Last Updated"));
        assert!(out.contains("17"));
    }

    #[test]
    fn compact_json_keeps_numbers() {
        let out = render_status(OutputFormat::JsonCompact, &snap()).unwrap();
        assert_eq!(
            out,
            r#"{"occupied":3,"available":17,"last_updated":"2024-01-01T12:00:00Z"}"#
        );
    }

    #[test]
    fn update_line_without_color() {
        let state = board_of(&snap());
        let out = render_update(OutputFormat::Table, &state, false).unwrap();
        assert_eq!(out, "[2024-01-01T12:00:00Z]  occupied 3  available 17");
    }
}
