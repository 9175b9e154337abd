use crate::models::ScoringRules;

/// Calculate the requirement match score for a resume
///
/// Scoring formula:
/// score = min(
///     base_match_score +                       # 50 by default
///     requirement_bonus * matched_requirements, # 10 per requirement found
///     max_match_score                           # capped at 95
/// )
///
/// A requirement counts as matched when it appears anywhere in the resume,
/// ignoring case. Requirements are checked independently, so overlapping
/// requirements can both score.
pub fn calculate_match_score(resume_text: &str, requirements: &[String], rules: &ScoringRules) -> u8 {
    let resume = resume_text.to_lowercase();

    let matched = requirements
        .iter()
        .filter(|req| resume.contains(&req.to_lowercase()))
        .count() as u32;

    let score = rules
        .base_match_score
        .saturating_add(matched.saturating_mul(rules.requirement_bonus))
        .min(rules.max_match_score)
        .min(100);

    score as u8
}

/// Calculate the social proof score (0-100) from public activity figures
///
/// score = min(repos * 2 + stars * 0.5 + contributions * 0.1, 100)
#[inline]
pub fn calculate_social_score(repos: u32, stars: u32, contributions: u32) -> f64 {
    let raw = repos as f64 * 2.0 + stars as f64 * 0.5 + contributions as f64 * 0.1;
    raw.min(100.0)
}
