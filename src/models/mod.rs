// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivitySource, Application, ApplicationStatus, ApplicationView, AttritionRisk, ExternalProfile,
    Job, JobStatus, JobSummary, ProgressionRate, ResumeAnalysis, RetentionPrediction, ScoringRules,
    SessionContext, SubmissionBundle, UnknownLabel, UserRole, VerificationStatus,
};
pub use requests::{ApplyRequest, CreateJobRequest, UpdateStatusRequest};
pub use responses::{
    ApplicationListResponse, ErrorResponse, HealthResponse, JobListResponse, SubmitApplicationResponse,
};
