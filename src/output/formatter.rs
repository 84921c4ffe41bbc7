use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::picks::ValidationReport;
use crate::scoring::{PickStatus, ResultCell, StandingsRow, WeeklyResults};
use crate::season::types::{Game, Pick, Pvs, Selection, Team, TeamId};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

pub fn status_mark(status: PickStatus) -> &'static str {
    match status {
        PickStatus::Correct => "+",
        PickStatus::Incorrect => "x",
        PickStatus::Pending => " ",
    }
}

/// "GB 5+" style cell text; empty for an unpicked game
fn format_cell(cell: &ResultCell) -> String {
    if cell.label.is_empty() {
        "-".to_string()
    } else {
        format!("{} {}{}", cell.label, cell.points, status_mark(cell.status))
    }
}

fn colorize_cell(text: &str, status: PickStatus, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match status {
        PickStatus::Correct => text.green().to_string(),
        PickStatus::Incorrect => text.red().to_string(),
        PickStatus::Pending => text.dimmed().to_string(),
    }
}

/// Format a week's results as a grid: one row per game, one column per user,
/// with a totals row at the bottom.
pub fn format_results_table(results: &WeeklyResults, use_colors: bool) -> String {
    if results.rows.is_empty() {
        return format!("No games in week {} of {}.", results.week, results.year);
    }

    let matchup_width = results
        .rows
        .iter()
        .map(|r| r.matchup.chars().count())
        .max()
        .unwrap_or(0)
        .max("Game".len());

    // Each user column fits its widest cell; names are cut to fit the terminal
    let separator = "  ";
    let name_limit = get_terminal_width()
        .filter(|_| !results.users.is_empty())
        .map(|w| {
            let per_user = w.saturating_sub(matchup_width) / results.users.len();
            per_user.saturating_sub(separator.len()).max(6)
        });

    let widths: Vec<usize> = results
        .users
        .iter()
        .enumerate()
        .map(|(j, user)| {
            let name_len = match name_limit {
                Some(limit) => user.name.chars().count().min(limit),
                None => user.name.chars().count(),
            };
            results
                .rows
                .iter()
                .filter_map(|r| r.cells.get(j))
                .map(|cell| format_cell(cell).chars().count())
                .chain(std::iter::once(name_len))
                .chain(results.totals.get(j).map(|t| t.to_string().len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(results.rows.len() + 3);

    let mut header = pad("Game", matchup_width);
    for (user, width) in results.users.iter().zip(&widths) {
        header.push_str(separator);
        header.push_str(&pad(&truncate_name(&user.name, *width), *width));
    }
    let header = header.trim_end().to_string();
    lines.push(if use_colors { header.bold().to_string() } else { header });

    for row in &results.rows {
        let mut line = pad(&row.matchup, matchup_width);
        for (cell, width) in row.cells.iter().zip(&widths) {
            line.push_str(separator);
            line.push_str(&colorize_cell(&pad(&format_cell(cell), *width), cell.status, use_colors));
        }
        lines.push(line.trim_end().to_string());
    }

    let mut totals = pad("Total", matchup_width);
    for (total, width) in results.totals.iter().zip(&widths) {
        totals.push_str(separator);
        totals.push_str(&pad(&total.to_string(), *width));
    }
    let totals = totals.trim_end().to_string();
    lines.push(if use_colors { totals.bold().to_string() } else { totals });

    lines.join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: matchup, user, pick, points, status (no headers, no colors)
pub fn format_results_tsv(results: &WeeklyResults) -> String {
    let mut lines = Vec::new();
    for row in &results.rows {
        for (user, cell) in results.users.iter().zip(&row.cells) {
            let status = match cell.status {
                PickStatus::Correct => "correct",
                PickStatus::Incorrect => "incorrect",
                PickStatus::Pending => "pending",
            };
            lines.push(format!(
                "{}\t{}\t{}\t{}\t{}",
                row.matchup, user.id, cell.label, cell.points, status
            ));
        }
    }
    lines.join("\n")
}

/// Format standings with columns: Rank, Total, Name
/// Rank column: 3 chars (fits "99."), right-aligned
pub fn format_standings_table(rows: &[StandingsRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No players in the pool.".to_string();
    }

    let total_width = rows
        .iter()
        .map(|r| r.total.to_string().len())
        .max()
        .unwrap_or(1)
        .max(3);
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let rank_str = format!("{:>2}.", row.rank);
            let total_str = format!("{:>width$}", row.total, width = total_width);
            if use_colors {
                format!(
                    "{} {}{}{}",
                    rank_str.dimmed(),
                    total_str.bold(),
                    separator,
                    row.user.name
                )
            } else {
                format!("{} {}{}{}", rank_str, total_str, separator, row.user.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, total, user id, name (no headers, no colors)
pub fn format_standings_tsv(rows: &[StandingsRow]) -> String {
    rows.iter()
        .map(|row| format!("{}\t{}\t{}\t{}", row.rank, row.total, row.user.id, row.user.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the time until kickoff: "2h", "3d", "1w"
pub fn format_countdown(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "<1m".to_string()
        }
    }
}

/// Format a week's limits, e.g. "3 pts: max 2, 5 pts: max 2, 7 pts: max 1"
pub fn format_limits(pvs: &Pvs) -> String {
    let limits: Vec<String> = pvs
        .limits()
        .map(|(points, limit)| format!("{} pts: max {}", points, limit))
        .collect();
    if limits.is_empty() {
        "no limits".to_string()
    } else {
        limits.join(", ")
    }
}

/// Format a user's pick form: one line per game with its pick and lock state.
/// `picks` must already be aligned with `games`.
pub fn format_pick_form(
    games: &[Game],
    picks: &[Pick],
    teams: &HashMap<TeamId, Team>,
    pvs: &Pvs,
    now: DateTime<Utc>,
    use_colors: bool,
) -> String {
    let name = |id: TeamId| {
        teams
            .get(&id)
            .map(|t| t.abbreviation.clone())
            .unwrap_or_else(|| format!("#{}", id))
    };

    let mut lines = vec![format!("Limits: {}", format_limits(pvs))];
    for (game, pick) in games.iter().zip(picks) {
        let matchup = format!("{} @ {}", name(game.away), name(game.home));
        let choice = match pick.selection {
            Selection::None => "-".to_string(),
            Selection::Away => format!("{} ({})", name(game.away), pick.points),
            Selection::Home => format!("{} ({})", name(game.home), pick.points),
        };
        let state = if game.is_locked(now) {
            "locked".to_string()
        } else {
            format!("locks in {}", format_countdown(game.kickoff - now))
        };
        let line = format!("{:>5}  {:<12}  {:<10}  {}", pick.id, matchup, choice, state);
        if use_colors && game.is_locked(now) {
            lines.push(line.dimmed().to_string());
        } else {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Format a rejected submission
pub fn format_rejection(report: &ValidationReport, use_colors: bool) -> String {
    let message = report.message();
    let message = message.trim_end();
    if use_colors {
        message.red().to_string()
    } else {
        message.to_string()
    }
}
