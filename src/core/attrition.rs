use once_cell::sync::Lazy;
use regex::Regex;
use crate::models::{ProgressionRate, RetentionPrediction};

static YEAR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{4}\s*-\s*[0-9]{4}").expect("valid year range pattern"));

const RISK_PER_CHANGE: u32 = 15;
const MAX_RISK_SCORE: u32 = 85;
const TENURE_WINDOW_MONTHS: u32 = 60;
const DEFAULT_TENURE_MONTHS: u32 = 24;
const FAST_PROGRESSION_CHANGES: u32 = 3;

/// Attrition heuristics derived from a resume, before being tied to an application
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionAssessment {
    pub risk_score: u8,
    pub job_hopping_frequency: f64,
    pub average_tenure_months: u32,
    pub recent_job_changes: u32,
    pub career_progression_rate: ProgressionRate,
    pub risk_factors: Vec<String>,
    pub retention_prediction: RetentionPrediction,
}

/// Count "YYYY-YYYY" ranges, each of which is read as one job change
pub fn count_year_ranges(text: &str) -> u32 {
    YEAR_RANGE_RE.find_iter(text).count() as u32
}

pub fn assess_attrition(text: &str) -> AttritionAssessment {
    let changes = count_year_ranges(text);
    let risk_score = changes.saturating_mul(RISK_PER_CHANGE).min(MAX_RISK_SCORE);

    let average_tenure_months = if changes > 0 {
        TENURE_WINDOW_MONTHS / changes
    } else {
        DEFAULT_TENURE_MONTHS
    };

    let frequent = changes > FAST_PROGRESSION_CHANGES;

    let risk_factors = if frequent {
        vec![
            "Frequent job changes".to_string(),
            "Short tenure at companies".to_string(),
        ]
    } else {
        vec!["Stable career progression".to_string()]
    };

    AttritionAssessment {
        risk_score: risk_score as u8,
        job_hopping_frequency: changes as f64 / 5.0,
        average_tenure_months,
        recent_job_changes: changes,
        career_progression_rate: if frequent {
            ProgressionRate::Fast
        } else {
            ProgressionRate::Moderate
        },
        risk_factors,
        retention_prediction: predict_retention(risk_score),
    }
}

/// Lower risk means higher expected retention
#[inline]
fn predict_retention(risk_score: u32) -> RetentionPrediction {
    if risk_score < 30 {
        RetentionPrediction::High
    } else if risk_score < 60 {
        RetentionPrediction::Medium
    } else {
        RetentionPrediction::Low
    }
}
