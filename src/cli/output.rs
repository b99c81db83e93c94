// Output formatting utilities

use crate::board::{BoardSummary, BoardView, StageColumn};
use crate::models::{ActivityEntry, Lead, Priority, Stage, WipLimits};
use crate::utils::{format_date, format_money, format_money_short, format_relative_time, format_timestamp};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_BLUE: &str = "\x1b[34m";
const ANSI_FG_MAGENTA: &str = "\x1b[35m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Narrowest usable board column, marker and padding included
const MIN_COLUMN_WIDTH: usize = 14;

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width
///
/// Uses the `terminal_size` crate, falling back to `COLUMNS` and then 120.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

fn bold_if(text: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn paint(text: &str, ansi: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", ansi, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn stage_color(stage: Stage) -> &'static str {
    match stage {
        Stage::New => ANSI_FG_BLUE,
        Stage::Contacted => ANSI_FG_CYAN,
        Stage::Qualified => ANSI_FG_MAGENTA,
        Stage::Proposal | Stage::Negotiation => ANSI_FG_YELLOW,
        Stage::Won => ANSI_FG_GREEN,
        Stage::Lost => ANSI_FG_BRIGHT_BLACK,
    }
}

/// Truncate to `width` characters, marking the cut with '~'
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('~');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "!!",
        Priority::High => "!",
        _ => "",
    }
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Lead list as a table
pub fn format_lead_list(leads: &[&Lead], now: i64) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let headers = ["ID", "Name", "Company", "Stage", "Value", "Priority", "Assignee", "Idle"];
    let rows: Vec<[String; 8]> = leads
        .iter()
        .map(|lead| {
            [
                lead.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
                truncate(&lead.name, 30),
                truncate(opt(&lead.company), 20),
                lead.stage.label().to_string(),
                format_money(lead.value_cents),
                lead.priority.as_str().to_string(),
                truncate(opt(&lead.assignee), 15),
                format!("{}d", lead.days_idle(now)),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header_line: Vec<String> = headers.iter().enumerate().map(|(i, h)| pad(h, widths[i])).collect();
    output.push_str(header_line.join(" ").trim_end());
    output.push('\n');
    let total_width = widths.iter().sum::<usize>() + widths.len() - 1;
    output.push_str(&"-".repeat(total_width));
    output.push('\n');

    for row in &rows {
        let line: Vec<String> = row.iter().enumerate().map(|(i, cell)| pad(cell, widths[i])).collect();
        output.push_str(line.join(" ").trim_end());
        output.push('\n');
    }

    output.push_str(&format!("\n{} lead(s)", rows.len()));
    output
}

fn column_header(column: &StageColumn<'_>) -> String {
    let capacity = match column.wip_limit {
        Some(limit) => format!("{}/{}", column.load, limit),
        None => column.load.to_string(),
    };
    let marker = if column.is_over_limit() { "!" } else { "" };
    format!("{} {}{}", column.stage.label(), capacity, marker)
}

fn card_line(lead: &Lead) -> String {
    let id = lead.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string());
    format!("{}{} {}", priority_marker(lead.priority), id, lead.name)
}

/// Board as side-by-side stage columns. Narrow terminals get one stage per block.
///
/// Column headers show `load/limit`; `!` marks a stage over its WIP limit.
pub fn format_board(view: &BoardView<'_>, width: usize, color: bool) -> String {
    let count = view.columns.len().max(1);
    let col_width = width.saturating_sub(count - 1) / count;

    if col_width < MIN_COLUMN_WIDTH {
        return format_board_stacked(view, color);
    }
    let inner = col_width - 1;

    let mut output = String::new();
    let headers: Vec<String> = view
        .columns
        .iter()
        .map(|c| {
            let text = pad(&truncate(&column_header(c), inner), inner);
            let ansi = if c.is_over_limit() { ANSI_FG_RED } else { stage_color(c.stage) };
            bold_if(&paint(&text, ansi, color), color)
        })
        .collect();
    output.push_str(headers.join("  ").trim_end());
    output.push('\n');

    let totals: Vec<String> = view
        .columns
        .iter()
        .map(|c| pad(&format_money_short(c.value_cents), inner))
        .collect();
    output.push_str(totals.join("  ").trim_end());
    output.push('\n');
    output.push_str(&vec!["-".repeat(inner); count].join("  "));
    output.push('\n');

    let depth = view.columns.iter().map(|c| c.leads.len()).max().unwrap_or(0);
    for row in 0..depth {
        let cells: Vec<String> = view
            .columns
            .iter()
            .map(|c| match c.leads.get(row) {
                Some(lead) => pad(&truncate(&card_line(lead), inner), inner),
                None => " ".repeat(inner),
            })
            .collect();
        output.push_str(cells.join("  ").trim_end());
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format_summary_line(&view.summary));
    output
}

fn format_board_stacked(view: &BoardView<'_>, color: bool) -> String {
    let mut output = String::new();
    for column in &view.columns {
        let header = format!("{}  {}", column_header(column), format_money_short(column.value_cents));
        let ansi = if column.is_over_limit() { ANSI_FG_RED } else { stage_color(column.stage) };
        output.push_str(&bold_if(&paint(&header, ansi, color), color));
        output.push('\n');
        for lead in &column.leads {
            output.push_str(&format!("  {}\n", card_line(lead)));
        }
    }
    output.push('\n');
    output.push_str(&format_summary_line(&view.summary));
    output
}

fn format_summary_line(summary: &BoardSummary) -> String {
    let mut line = format!(
        "{} lead(s), pipeline {}, won {} ({})",
        summary.lead_count,
        format_money(summary.value_cents),
        summary.won_count,
        format_money(summary.won_value_cents),
    );
    if !summary.over_capacity.is_empty() {
        let names: Vec<&str> = summary.over_capacity.iter().map(|s| s.label()).collect();
        line.push_str(&format!("; over WIP limit: {}", names.join(", ")));
    }
    line
}

/// Aggregate figures per stage
pub fn format_summary(summary: &BoardSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:>6} {:>14} {:>10}\n",
        "Stage", "Leads", "Value", "WIP"
    ));
    output.push_str(&format!("{}\n", "-".repeat(45)));

    for totals in &summary.stages {
        let wip = match totals.wip_limit {
            Some(limit) if totals.over_limit => format!("{}/{} !", totals.load, limit),
            Some(limit) => format!("{}/{}", totals.load, limit),
            None => "-".to_string(),
        };
        output.push_str(&format!(
            "{:<12} {:>6} {:>14} {:>10}\n",
            totals.stage.label(),
            totals.count,
            format_money(totals.value_cents),
            wip
        ));
    }

    output.push_str(&format!("{}\n", "-".repeat(45)));
    output.push_str(&format!(
        "{:<12} {:>6} {:>14}\n",
        "Total",
        summary.lead_count,
        format_money(summary.value_cents)
    ));
    output.push_str(&format!(
        "{:<12} {:>6} {:>14}\n",
        "Won",
        summary.won_count,
        format_money(summary.won_value_cents)
    ));

    if !summary.over_capacity.is_empty() {
        let names: Vec<&str> = summary.over_capacity.iter().map(|s| s.label()).collect();
        output.push_str(&format!("\nOver WIP limit: {}\n", names.join(", ")));
    }
    output
}

/// Stage reference table
pub fn format_stage_list(limits: &WipLimits, loads: &[(Stage, usize)]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<3} {:<12} {:>6} {:>9}  {}\n", "#", "Stage", "Leads", "WIP limit", "Notes"));
    output.push_str(&format!("{}\n", "-".repeat(50)));

    for (stage, load) in loads {
        let limit = limits.get(*stage).map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
        let notes = match stage {
            Stage::Lost => "terminal; moving here asks for confirmation",
            Stage::Won => "terminal",
            _ if limits.is_over(*stage, *load) => "over limit",
            _ => "",
        };
        let line = format!(
            "{:<3} {:<12} {:>6} {:>9}  {}",
            stage.index() + 1,
            stage.label(),
            load,
            limit,
            notes
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// One audit entry on a single line
pub fn format_activity(entry: &ActivityEntry) -> String {
    let mut line = format!(
        "{}  lead {}  {} -> {}",
        format_timestamp(entry.timestamp),
        entry.lead_id,
        entry.from_stage,
        entry.to_stage
    );
    if let Some(reason) = &entry.reason {
        line.push_str(&format!("  ({})", reason));
    }
    line
}

pub fn format_activity_list(entries: &[ActivityEntry]) -> String {
    if entries.is_empty() {
        return "No activity recorded.".to_string();
    }
    entries.iter().map(format_activity).collect::<Vec<_>>().join("\n")
}

/// Full detail view of one lead with its stage history
pub fn format_lead_detail(lead: &Lead, history: &[ActivityEntry], now: i64) -> String {
    let mut output = String::new();

    let header = format!(
        "Lead {}: {}",
        lead.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
        lead.name
    );
    output.push_str(&header);
    output.push('\n');
    output.push_str(&"=".repeat(header.len().max(60)));
    output.push_str("\n\n");

    output.push_str(&format!("Stage:        {}\n", lead.stage));
    output.push_str(&format!("Value:        {}\n", format_money(lead.value_cents)));
    output.push_str(&format!("Priority:     {}\n", lead.priority.as_str()));
    output.push_str(&format!("Created:      {}\n", format_date(lead.created_ts)));
    output.push_str(&format!(
        "Last active:  {} ({})\n\n",
        format_timestamp(lead.last_activity_ts),
        format_relative_time(lead.last_activity_ts, now)
    ));

    output.push_str("Contact:\n");
    let none = "(none)".to_string();
    output.push_str(&format!("  Company:    {}\n", lead.company.as_ref().unwrap_or(&none)));
    output.push_str(&format!("  Email:      {}\n", lead.email.as_ref().unwrap_or(&none)));
    output.push_str(&format!("  Phone:      {}\n", lead.phone.as_ref().unwrap_or(&none)));
    output.push_str(&format!("  Assignee:   {}\n", lead.assignee.as_ref().unwrap_or(&none)));
    output.push_str(&format!("  Source:     {}\n", lead.source.as_ref().unwrap_or(&none)));

    if lead.tags.is_empty() {
        output.push_str("  Tags:       (none)\n");
    } else {
        let tags: Vec<String> = lead.tags.iter().map(|t| format!("+{}", t)).collect();
        output.push_str(&format!("  Tags:       {}\n", tags.join(" ")));
    }

    output.push_str("\nHistory:\n");
    if history.is_empty() {
        output.push_str("  (no stage changes)\n");
    } else {
        for entry in history {
            output.push_str(&format!("  {}\n", format_activity(entry)));
        }
    }

    output
}

/// Advisory notice for a stage that is over its WIP limit
pub fn format_wip_warning(stage: Stage, load: usize, limit: usize) -> String {
    format!(
        "Warning: {} is over its WIP limit ({}/{}). The move was applied.",
        stage, load, limit
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;
    use crate::filter::LeadFilter;

    fn lead(id: i64, name: &str, stage: Stage, value_cents: i64) -> Lead {
        let mut lead = Lead::new(name.to_string());
        lead.id = Some(id);
        lead.stage = stage;
        lead.value_cents = value_cents;
        lead
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Acme Corporation", 6), "Acme ~");
        assert_eq!(truncate("Acme", 0), "");
    }

    #[test]
    fn test_lead_list() {
        let a = lead(1, "Jane Doe", Stage::Qualified, 1_250_000);
        let output = format_lead_list(&[&a], a.last_activity_ts);
        assert!(output.contains("Jane Doe"));
        assert!(output.contains("Qualified"));
        assert!(output.contains("$12,500"));
        assert!(output.contains("1 lead(s)"));
        assert_eq!(format_lead_list(&[], 0), "No leads found.");
    }

    #[test]
    fn test_board_wide_and_stacked() {
        let leads = vec![
            lead(1, "Jane Doe", Stage::New, 100_000),
            lead(2, "Bob Smith", Stage::Won, 500_000),
        ];
        let view = build_board(&leads, &LeadFilter::default(), &WipLimits::default(), 0);

        let wide = format_board(&view, 200, false);
        assert!(wide.contains("New 1/10"));
        assert!(wide.contains("1 Jane Doe"));
        assert!(wide.contains("Won 1"));
        assert!(wide.contains("2 lead(s)"));

        let stacked = format_board(&view, 40, false);
        assert!(stacked.starts_with("New 1/10"));
        assert!(stacked.contains("  2 Bob Smith"));
        assert!(!stacked.contains('\x1b'));
    }

    #[test]
    fn test_board_marks_over_limit() {
        let leads: Vec<Lead> = (1..=3).map(|id| lead(id, "X", Stage::Proposal, 0)).collect();
        let mut limits = WipLimits::default();
        limits.set(Stage::Proposal, Some(2));
        let view = build_board(&leads, &LeadFilter::default(), &limits, 0);

        let output = format_board(&view, 40, false);
        assert!(output.contains("Proposal 3/2!"));
        assert!(output.contains("over WIP limit: Proposal"));
    }

    #[test]
    fn test_activity_line() {
        let entry = ActivityEntry::new(3, Stage::Proposal, Stage::Lost, Some("Budget constraints".to_string()), 0);
        let line = format_activity(&entry);
        assert!(line.contains("lead 3  Proposal -> Lost"));
        assert!(line.ends_with("(Budget constraints)"));
    }

    #[test]
    fn test_summary() {
        let leads = vec![lead(1, "A", Stage::Won, 200_000), lead(2, "B", Stage::New, 50_000)];
        let view = build_board(&leads, &LeadFilter::default(), &WipLimits::default(), 0);
        let output = format_summary(&view.summary);
        assert!(output.contains("Total"));
        assert!(output.contains("$2,500"));
        assert!(output.contains("$2,000"));
    }
}
