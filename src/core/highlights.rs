/// Pick the first `max` lines whose trimmed length exceeds `min_chars`.
///
/// Length is counted in Unicode scalar values, so an emoji counts as one.
/// Lines are returned as written, in their original order.
pub fn select_highlights(text: &str, min_chars: usize, max: usize) -> Vec<String> {
    text.lines()
        .filter(|line| line.trim().chars().count() > min_chars)
        .take(max)
        .map(str::to_string)
        .collect()
}
