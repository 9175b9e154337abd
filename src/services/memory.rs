use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::models::{
    Application, ApplicationStatus, ApplicationView, Job, JobStatus, JobSummary, SubmissionBundle,
};
use crate::services::store::{ApplicationFilter, JobFilter, RecordStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    jobs: Vec<Job>,
    submissions: Vec<SubmissionBundle>,
}

/// In-process record store for local runs and tests.
///
/// Nothing survives a restart. A submission is pushed under a single write
/// lock, so readers never see a partial bundle.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored applications, regardless of owner
    pub async fn application_count(&self) -> usize {
        self.state.read().await.submissions.len()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let mut state = self.state.write().await;
        state.jobs.push(job.clone());
        Ok(job)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let state = self.state.read().await;
        Ok(state.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError> {
        let state = self.state.read().await;

        let mut jobs: Vec<Job> = state
            .jobs
            .iter()
            .filter(|job| match filter {
                JobFilter::Open => job.status == JobStatus::Open,
                JobFilter::Recruiter(recruiter_id) => job.recruiter_id == recruiter_id,
            })
            .cloned()
            .collect();

        newest_first(&mut jobs, |j| j.created_at);
        Ok(jobs)
    }

    async fn update_job_status(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, StoreError> {
        let mut state = self.state.write().await;

        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id && j.recruiter_id == recruiter_id)
            .ok_or_else(|| StoreError::NotFound(format!("Job {} not found", job_id)))?;

        job.status = status;
        Ok(job.clone())
    }

    async fn submit_application(&self, bundle: SubmissionBundle) -> Result<SubmissionBundle, StoreError> {
        let mut state = self.state.write().await;

        if !state.jobs.iter().any(|j| j.id == bundle.application.job_id) {
            return Err(StoreError::NotFound(format!(
                "Job {} not found",
                bundle.application.job_id
            )));
        }

        state.submissions.push(bundle.clone());
        Ok(bundle)
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationView>, StoreError> {
        let state = self.state.read().await;

        let mut views: Vec<ApplicationView> = state
            .submissions
            .iter()
            .filter_map(|bundle| {
                let job = state.jobs.iter().find(|j| j.id == bundle.application.job_id)?;

                let visible = match filter {
                    ApplicationFilter::Applicant(applicant_id) => bundle.application.applicant_id == applicant_id,
                    ApplicationFilter::Recruiter(recruiter_id) => job.recruiter_id == recruiter_id,
                };
                if !visible {
                    return None;
                }

                Some(ApplicationView {
                    application: bundle.application.clone(),
                    job: Some(JobSummary {
                        title: job.title.clone(),
                        company: job.company.clone(),
                        recruiter_id: job.recruiter_id,
                    }),
                    resume_analysis: Some(bundle.resume_analysis.clone()),
                    external_profile: Some(bundle.external_profile.clone()),
                    attrition_risk: Some(bundle.attrition_risk.clone()),
                })
            })
            .collect();

        newest_first(&mut views, |v| v.application.created_at);
        Ok(views)
    }

    async fn update_application_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut state = self.state.write().await;
        let MemoryState { jobs, submissions } = &mut *state;

        let bundle = submissions
            .iter_mut()
            .find(|b| {
                b.application.id == application_id
                    && jobs
                        .iter()
                        .any(|j| j.id == b.application.job_id && j.recruiter_id == recruiter_id)
            })
            .ok_or_else(|| StoreError::NotFound(format!("Application {} not found", application_id)))?;

        bundle.application.status = status;
        Ok(bundle.application.clone())
    }
}
