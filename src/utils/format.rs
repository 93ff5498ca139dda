//! Display formatting for counts, dates and playback positions

use chrono::{DateTime, NaiveDate, Utc};

const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

/// Format a view count compactly: 950, 1.2K, 3M, 1.4B
///
/// Digits past the first decimal are truncated, so a count never rounds up
/// into the next unit.
pub fn format_views(views: u64) -> String {
    for (unit, suffix) in UNITS {
        if views >= unit {
            let tenths = views / (unit / 10);
            let (whole, frac) = (tenths / 10, tenths % 10);
            return if frac == 0 {
                format!("{}{}", whole, suffix)
            } else {
                format!("{}.{}{}", whole, frac, suffix)
            };
        }
    }
    views.to_string()
}

/// Format seconds as "m:ss", or "h:mm:ss" past the hour
pub fn format_video_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".into();
    }

    let total = seconds.floor() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Format an upload date relative to now, e.g. "3 days ago"
pub fn format_date(upload_date: &str) -> String {
    format_date_at(upload_date, Utc::now())
}

/// Format an upload date relative to `now`
///
/// Accepts "YYYY-MM-DD" or RFC 3339. Unparseable input is returned as is.
pub fn format_date_at(upload_date: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_date(upload_date) else {
        return upload_date.to_string();
    };

    let days = (now.date_naive() - date).num_days();
    match days {
        i64::MIN..=0 => "Today".into(),
        1 => "Yesterday".into(),
        2..=6 => format!("{} days ago", days),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => plural(days / 365, "year"),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
