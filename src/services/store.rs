use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;
use crate::models::{Application, ApplicationStatus, ApplicationView, Job, JobStatus, SubmissionBundle};
use crate::services::{postgres::PostgresError, supabase::SupabaseError};

/// Errors surfaced by any record store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Which jobs to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFilter {
    Open,
    Recruiter(Uuid),
}

/// Which applications to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationFilter {
    Applicant(Uuid),
    Recruiter(Uuid),
}

/// Persistence boundary for jobs, applications and their enrichment records.
///
/// Listings are ordered newest first. `submit_application` writes all four
/// records of a bundle or none of them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<bool, StoreError>;

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError>;

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError>;

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError>;

    /// Change a job's status. `NotFound` unless the job belongs to `recruiter_id`.
    async fn update_job_status(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, StoreError>;

    async fn submit_application(&self, bundle: SubmissionBundle) -> Result<SubmissionBundle, StoreError>;

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationView>, StoreError>;

    /// Change an application's status. `NotFound` unless the application's job
    /// belongs to `recruiter_id`.
    async fn update_application_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError>;
}
