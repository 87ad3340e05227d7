use time::{Duration, OffsetDateTime};

use crate::view::Tone;

/// `just now`, `5m ago`, `3h ago`, `12d ago`.
pub(crate) fn fmt_since(ts: OffsetDateTime, now: OffsetDateTime) -> String {
    // Clock skew can put remote timestamps slightly in the future.
    let mins = (now - ts).whole_minutes().max(0);
    let hours = mins / 60;
    let days = hours / 24;

    if mins < 1 {
        "just now".to_string()
    } else if mins < 60 {
        format!("{}m ago", mins)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else {
        format!("{}d ago", days)
    }
}

pub(crate) fn fmt_since_opt(ts: Option<OffsetDateTime>, now: OffsetDateTime, missing: &str) -> String {
    ts.map(|ts| fmt_since(ts, now))
        .unwrap_or_else(|| missing.to_string())
}

/// Fresh within the hour, stale after a day.
pub(crate) fn age_tone(ts: Option<OffsetDateTime>, now: OffsetDateTime) -> Tone {
    match ts.map(|ts| now - ts) {
        None => Tone::Dim,
        Some(age) if age < Duration::HOUR => Tone::Good,
        Some(age) if age < Duration::DAY => Tone::Warn,
        Some(_) => Tone::Dim,
    }
}

/// Wall-clock `HH:MM:SS` in UTC.
pub(crate) fn fmt_clock(ts: OffsetDateTime) -> String {
    let ts = ts.to_offset(time::UtcOffset::UTC);
    format!("{:02}:{:02}:{:02}", ts.hour(), ts.minute(), ts.second())
}

/// `1.5 KB` style sizes with one decimal, base 1024.
pub(crate) fn fmt_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
