// Timestamp formatting for lead activity

use chrono::{Local, TimeZone};

/// Format timestamp for display
pub fn format_timestamp(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

/// Format date for display (date only, no time)
pub fn format_date(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => ts.to_string(),
    }
}

/// Format time elapsed since `ts` (e.g., "just now", "45m ago", "3d ago")
pub fn format_relative_time(ts: i64, now: i64) -> String {
    let diff = now - ts;

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else if diff < 86400 * 60 {
        format!("{}d ago", diff / 86400)
    } else {
        format_date(ts)
    }
}
