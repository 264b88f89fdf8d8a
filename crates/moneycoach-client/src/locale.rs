//! en-IN number formatting and relative-age text.

use chrono::{DateTime, TimeZone, Utc};

use crate::expense::format_locale_date;

const FRACTION_SCALE: f64 = 1000.0;

/// Formats with Indian digit grouping (`12,34,567.5`), at most three
/// fraction digits and no trailing zeros.
pub fn format_en_in(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value.abs() * FRACTION_SCALE).round() / FRACTION_SCALE;
    let fixed = format!("{rounded:.3}");
    let (integer_part, fraction_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction_part.trim_end_matches('0');

    let mut output = String::new();
    if value < 0.0 && rounded != 0.0 {
        output.push('-');
    }
    output.push_str(&group_indian(integer_part));
    if !fraction.is_empty() {
        output.push('.');
        output.push_str(fraction);
    }
    output
}

/// Indian digit grouping for whole amounts, exact for every `u64`.
pub fn format_en_in_whole(value: u64) -> String {
    group_indian(&value.to_string())
}

/// Shortest plain rendering of a number: `150`, `150.5`.
pub fn format_plain(value: f64) -> String {
    format!("{value}")
}

/// "Just now", "N min(s) ago", "N hour(s) ago", "N day(s) ago", or the
/// `D/M/YYYY` date once the entry is a week old.
pub fn time_ago<Tz: TimeZone>(timestamp: &DateTime<Utc>, now: &DateTime<Tz>) -> String {
    let elapsed_ms = now
        .with_timezone(&Utc)
        .signed_duration_since(timestamp)
        .num_milliseconds();
    let minutes = elapsed_ms.div_euclid(60_000);
    let hours = elapsed_ms.div_euclid(3_600_000);
    let days = elapsed_ms.div_euclid(86_400_000);

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes} min{} ago", plural_suffix(minutes));
    }
    if hours < 24 {
        return format!("{hours} hour{} ago", plural_suffix(hours));
    }
    if days < 7 {
        return format!("{days} day{} ago", plural_suffix(days));
    }

    format_locale_date(&timestamp.with_timezone(&now.timezone()))
}

fn plural_suffix(count: i64) -> &'static str {
    if count > 1 { "s" } else { "" }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut remaining = head;
    while remaining.len() > 2 {
        let (rest, pair) = remaining.split_at(remaining.len() - 2);
        groups.push(pair);
        remaining = rest;
    }
    if !remaining.is_empty() {
        groups.push(remaining);
    }
    groups.reverse();

    format!("{},{last_three}", groups.join(","))
}
