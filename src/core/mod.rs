// Core scoring exports
pub mod analyzer;
pub mod attrition;
pub mod experience;
pub mod highlights;
pub mod scoring;
pub mod skills;

pub use analyzer::Analyzer;
pub use attrition::{assess_attrition, count_year_ranges, AttritionAssessment};
pub use experience::estimate_experience;
pub use highlights::select_highlights;
pub use scoring::{calculate_match_score, calculate_social_score};
pub use skills::extract_skills;
