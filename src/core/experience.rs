use once_cell::sync::Lazy;
use regex::Regex;

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\+?\s*years?").expect("valid experience pattern"));

/// Estimate years of experience from the first "N years" / "N+ years" mention.
///
/// Only ASCII digits count. Later mentions are ignored. Falls back to `default_years` when nothing
/// matches or the number does not fit in a `u32`.
pub fn estimate_experience(text: &str, default_years: u32) -> u32 {
    YEARS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(default_years)
}
