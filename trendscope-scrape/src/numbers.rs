//! Count and size parsing for GitHub's human-formatted numbers.

use std::sync::LazyLock;

use regex::Regex;

static COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s?([km])?\b").ok());

static SIZE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*([kmg]b)\b").ok());

/// Parses the first count in `text`.
///
/// Thousands separators are dropped and `k`/`m` suffixes expanded, rounding
/// to the nearest integer: `"15,420"` is 15420, `"2.1k"` is 2100,
/// `"1,234 stars today"` is 1234. Anything without a number is 0.
pub fn parse_count(text: &str) -> u64 {
    let Some(re) = COUNT.as_ref() else {
        return 0;
    };
    let Some(caps) = re.captures(text) else {
        return 0;
    };

    let digits = caps[1].replace(',', "");
    let Ok(value) = digits.parse::<f64>() else {
        return 0;
    };
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(s) if s == "k" => 1_000.0,
        Some(s) if s == "m" => 1_000_000.0,
        _ => 1.0,
    };

    to_u64((value * multiplier).round())
}

/// Parses a size such as `"12.5 MB"` into kilobytes.
pub fn parse_size_kb(text: &str) -> Option<u64> {
    let caps = SIZE.as_ref()?.captures(text)?;
    let value: f64 = caps[1].parse().ok()?;
    let factor = match caps[2].to_ascii_uppercase().as_str() {
        "KB" => 1.0,
        "MB" => 1024.0,
        "GB" => 1024.0 * 1024.0,
        _ => return None,
    };
    Some(to_u64((value * factor).round()))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}
