use uuid::Uuid;
use crate::models::{AttritionRisk, ResumeAnalysis, ScoringRules};
use crate::core::{
    attrition::assess_attrition,
    experience::estimate_experience,
    highlights::select_highlights,
    scoring::calculate_match_score,
    skills::extract_skills,
};

const DETECTED_LANGUAGE: &str = "English";
const ORIGINAL_LANGUAGE: &str = "en";

/// Resume scoring pipeline
///
/// # Pipeline Stages
/// 1. Skill extraction against the configured vocabulary
/// 2. Experience estimation
/// 3. Highlight selection
/// 4. Requirement match scoring
/// 5. Attrition risk assessment (separate record)
///
/// Every stage is a pure function of the resume text and the job's
/// requirements, so running the analyzer twice on the same input gives the
/// same records.
#[derive(Debug, Clone)]
pub struct Analyzer {
    rules: ScoringRules,
}

impl Analyzer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Build the resume analysis record for an application
    pub fn analyze_resume(
        &self,
        application_id: Uuid,
        resume_text: &str,
        requirements: &[String],
    ) -> ResumeAnalysis {
        ResumeAnalysis {
            application_id,
            skills_extracted: extract_skills(resume_text, &self.rules.skill_vocabulary),
            experience_years: estimate_experience(resume_text, self.rules.default_experience_years),
            languages_detected: vec![DETECTED_LANGUAGE.to_string()],
            original_language: ORIGINAL_LANGUAGE.to_string(),
            match_score: calculate_match_score(resume_text, requirements, &self.rules),
            key_highlights: select_highlights(
                resume_text,
                self.rules.highlight_min_chars,
                self.rules.max_highlights,
            ),
        }
    }

    /// Build the attrition risk record for an application
    pub fn assess_attrition(&self, application_id: Uuid, resume_text: &str) -> AttritionRisk {
        let assessment = assess_attrition(resume_text);

        AttritionRisk {
            application_id,
            risk_score: assessment.risk_score,
            job_hopping_frequency: assessment.job_hopping_frequency,
            average_tenure_months: assessment.average_tenure_months,
            recent_job_changes: assessment.recent_job_changes,
            career_progression_rate: assessment.career_progression_rate,
            risk_factors: assessment.risk_factors,
            retention_prediction: assessment.retention_prediction,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
