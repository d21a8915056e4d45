// Utility functions for revisit-service

use std::collections::HashSet;
use url::Url;

/// Tokens at or below this length are not treated as keywords.
pub const MIN_KEYWORD_LEN: usize = 3;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Extract the aggregation domain from a URL.
///
/// Uses the host with a leading `www.` removed. Anything that does not parse
/// as a URL with a host falls back to the raw string.
pub fn extract_domain(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => {
                let host = host.to_ascii_lowercase();
                host.strip_prefix("www.").unwrap_or(&host).to_string()
            }
            _ => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}

/// Lowercase alphanumeric tokens longer than [`MIN_KEYWORD_LEN`].
pub fn keyword_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > MIN_KEYWORD_LEN)
        .map(|token| token.to_lowercase())
}

/// Add the keyword tokens of `text` into `into`.
pub fn collect_keywords(text: &str, into: &mut HashSet<String>) {
    into.extend(keyword_tokens(text));
}

/// Fractional days elapsed between `then_ms` and `now_ms`.
///
/// Negative when `then_ms` lies in the future.
pub fn days_between(then_ms: i64, now_ms: i64) -> f64 {
    (now_ms.saturating_sub(then_ms)) as f64 / MILLIS_PER_DAY
}

/// Clamp to [0, 1], substituting `fallback` for NaN.
///
/// A NaN fallback yields 0.0.
pub fn unit_or(value: f64, fallback: f64) -> f64 {
    let value = if value.is_nan() { fallback } else { value };
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
