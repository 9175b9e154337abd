use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when a stored label does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! labelled_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($label => Ok(Self::$variant),)+
                    other => Err(UnknownLabel {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Whether a posting still accepts applications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
}

labelled_enum!(JobStatus, "job status", {
    Open => "open",
    Closed => "closed",
});

/// Recruiter-controlled review stage of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Submitted,
    Screening,
    Shortlisted,
    Interviewed,
    Rejected,
}

labelled_enum!(ApplicationStatus, "application status", {
    Submitted => "submitted",
    Screening => "screening",
    Shortlisted => "shortlisted",
    Interviewed => "interviewed",
    Rejected => "rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Partial,
}

labelled_enum!(VerificationStatus, "verification status", {
    Verified => "verified",
    Partial => "partial",
});

/// Where the star and contribution numbers of an external profile came from.
///
/// GitHub only reports the repository count; the other two figures are either
/// generated placeholders or explicitly absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Synthetic,
    Unavailable,
}

labelled_enum!(ActivitySource, "activity source", {
    Synthetic => "synthetic",
    Unavailable => "unavailable",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionRate {
    Fast,
    Moderate,
}

labelled_enum!(ProgressionRate, "progression rate", {
    Fast => "fast",
    Moderate => "moderate",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetentionPrediction {
    High,
    Medium,
    Low,
}

labelled_enum!(RetentionPrediction, "retention prediction", {
    High => "high",
    Medium => "medium",
    Low => "low",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    JobSeeker,
    Recruiter,
}

labelled_enum!(UserRole, "user role", {
    JobSeeker => "job_seeker",
    Recruiter => "recruiter",
});

/// Job posting owned by a recruiter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub experience_required: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }
}

/// Application row as submitted by a job seeker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    #[serde(default)]
    pub applicant_name: Option<String>,
    #[serde(default)]
    pub applicant_email: Option<String>,
    pub resume_text: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub application_id: Uuid,
    pub skills_extracted: Vec<String>,
    pub experience_years: u32,
    pub languages_detected: Vec<String>,
    pub original_language: String,
    pub match_score: u8,
    pub key_highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProfile {
    pub application_id: Uuid,
    #[serde(default)]
    pub github_username: Option<String>,
    pub github_repos_count: u32,
    pub github_stars: u32,
    pub github_contributions: u32,
    pub activity_source: ActivitySource,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    pub social_score: f64,
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttritionRisk {
    pub application_id: Uuid,
    pub risk_score: u8,
    pub job_hopping_frequency: f64,
    pub average_tenure_months: u32,
    pub recent_job_changes: u32,
    pub career_progression_rate: ProgressionRate,
    pub risk_factors: Vec<String>,
    pub retention_prediction: RetentionPrediction,
}

/// The four records produced by one submission, persisted together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionBundle {
    pub application: Application,
    pub resume_analysis: ResumeAnalysis,
    pub external_profile: ExternalProfile,
    pub attrition_risk: AttritionRisk,
}

/// Job fields embedded next to an application in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub title: String,
    pub company: String,
    pub recruiter_id: Uuid,
}

/// Application with its job summary and enrichment records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    #[serde(default)]
    pub job: Option<JobSummary>,
    #[serde(default)]
    pub resume_analysis: Option<ResumeAnalysis>,
    #[serde(default)]
    pub external_profile: Option<ExternalProfile>,
    #[serde(default)]
    pub attrition_risk: Option<AttritionRisk>,
}

/// Verified identity of the caller, passed explicitly to every service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub role: UserRole,
}

impl SessionContext {
    pub fn is_recruiter(&self) -> bool {
        self.role == UserRole::Recruiter
    }
}

/// Tunables for the resume scoring heuristics
#[derive(Debug, Clone)]
pub struct ScoringRules {
    pub skill_vocabulary: Vec<String>,
    pub default_experience_years: u32,
    pub highlight_min_chars: usize,
    pub max_highlights: usize,
    pub base_match_score: u32,
    pub requirement_bonus: u32,
    pub max_match_score: u32,
}

pub const DEFAULT_SKILL_VOCABULARY: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Java",
    "C++",
    "SQL",
    "MongoDB",
    "AWS",
    "Docker",
    "Kubernetes",
    "Git",
    "Agile",
    "Scrum",
    "Machine Learning",
    "AI",
    "Data Science",
    "UI/UX",
    "API",
    "REST",
    "GraphQL",
];

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            skill_vocabulary: DEFAULT_SKILL_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            default_experience_years: 2,
            highlight_min_chars: 20,
            max_highlights: 5,
            base_match_score: 50,
            requirement_bonus: 10,
            max_match_score: 95,
        }
    }
}
