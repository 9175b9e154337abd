/// Return the vocabulary terms that occur anywhere in `text`, ignoring case.
///
/// Matching is plain substring containment, so "Java" is found inside
/// "JavaScript" and "AI" inside "maintain". Output keeps vocabulary order.
pub fn extract_skills(text: &str, vocabulary: &[String]) -> Vec<String> {
    let haystack = text.to_lowercase();

    vocabulary
        .iter()
        .filter(|skill| haystack.contains(&skill.to_lowercase()))
        .cloned()
        .collect()
}
