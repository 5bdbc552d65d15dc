//! src/util/humanize.rs

use chrono::{DateTime, Datelike, FixedOffset};

/// English ordinal suffix for a day of the month.
pub const fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

/// "June 3rd, 2024", in the timestamp's own offset.
pub fn format_upload_date(at: &DateTime<FixedOffset>) -> String {
    format!(
        "{} {}{}, {}",
        at.format("%B"),
        at.day(),
        ordinal_suffix(at.day()),
        at.year()
    )
}

/// Same as [`format_upload_date`] for a raw RFC 3339 string; unparsable
/// input is returned unchanged.
pub fn format_upload_date_str(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| format_upload_date(&at))
        .unwrap_or_else(|_| raw.to_string())
}

/// Compact counter for tiles: 999, 1.2k, 3.4M.
pub fn compact_count(n: u64) -> String {
    let units: [&'static str; 3] = ["k", "M", "B"];
    if n < 1000 {
        return n.to_string();
    }

    let mut value = n as f64;
    let mut unit_idx = 0;
    value /= 1000.0;
    while value >= 1000.0 && unit_idx < units.len() - 1 {
        value /= 1000.0;
        unit_idx += 1;
    }

    if value >= 100.0 {
        format!("{:.0}{}", value, units[unit_idx])
    } else {
        format!("{:.1}{}", value, units[unit_idx])
    }
}
