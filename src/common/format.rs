use chrono::{DateTime, Local, Utc};
use std::time::Duration;

const SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format bytes into a human-readable size string (1024-based),
/// two decimals with trailing zeros and dot stripped.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut idx = 0;

    while size >= 1024.0 && idx < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        idx += 1;
    }

    let text = format!("{:.2}", size);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, SIZE_UNITS[idx])
}

/// Format an elapsed duration as a `H:MM:SS[.ffffff]` clock.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    let micros = elapsed.subsec_micros();

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!(
            "{} day{}, ",
            days,
            if days == 1 { "" } else { "s" }
        ));
    }
    out.push_str(&format!("{}:{:02}:{:02}", hours, mins, secs));
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

/// Format a file modification time for log output
pub fn format_modified(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Timestamp prefix used on every log line
pub fn log_timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}
