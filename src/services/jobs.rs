use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use crate::errors::AppError;
use crate::models::{CreateJobRequest, Job, JobStatus, SessionContext};
use crate::services::store::{JobFilter, RecordStore};

/// Job posting operations
#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn RecordStore>,
}

fn require_recruiter(session: &SessionContext) -> Result<(), AppError> {
    if session.is_recruiter() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only recruiters can manage job postings".into()))
    }
}

impl JobService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create_job(&self, session: &SessionContext, req: CreateJobRequest) -> Result<Job, AppError> {
        require_recruiter(session)?;
        req.validate()?;

        let company = req
            .company
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .or_else(|| session.company_name.clone())
            .ok_or_else(|| AppError::Validation("company: required".into()))?;

        let job = Job {
            id: Uuid::new_v4(),
            recruiter_id: session.user_id,
            title: req.title.trim().to_string(),
            company,
            location: req.location.trim().to_string(),
            job_type: req.job_type,
            experience_required: req.experience_required,
            description: req.description,
            requirements: req.requirements,
            salary_range: req.salary_range.filter(|s| !s.trim().is_empty()),
            status: JobStatus::Open,
            created_at: Utc::now(),
        };

        let job = self
            .store
            .insert_job(job)
            .await
            .map_err(|e| AppError::store("Failed to create job", e))?;

        tracing::info!("Recruiter {} posted job {} ({})", session.user_id, job.id, job.title);

        Ok(job)
    }

    pub async fn list_open_jobs(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.store.list_jobs(JobFilter::Open).await?)
    }

    pub async fn list_recruiter_jobs(&self, session: &SessionContext) -> Result<Vec<Job>, AppError> {
        require_recruiter(session)?;
        Ok(self.store.list_jobs(JobFilter::Recruiter(session.user_id)).await?)
    }

    pub async fn set_job_status(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, AppError> {
        require_recruiter(session)?;

        let job = self
            .store
            .update_job_status(session.user_id, job_id, status)
            .await
            .map_err(|e| AppError::store("Failed to update job", e))?;

        tracing::info!("Job {} is now {}", job.id, job.status);

        Ok(job)
    }
}
