//! TalentAI - Applicant scoring and application service
//!
//! This library provides the heuristic resume analysis used by the TalentAI
//! recruiting app and the orchestrator that records a submission together
//! with its analysis, external profile and attrition risk in a single write.

pub mod auth;
pub mod config;
pub mod core;
pub mod errors;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Analyzer, calculate_match_score, calculate_social_score};
pub use errors::AppError;
pub use models::{
    Application, AttritionRisk, ExternalProfile, Job, ResumeAnalysis, ScoringRules,
    SessionContext, SubmissionBundle,
};
