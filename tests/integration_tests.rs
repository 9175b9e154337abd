// Integration tests for the application orchestrator

use async_trait::async_trait;
use std::sync::Arc;
use talent_ai::core::Analyzer;
use talent_ai::errors::AppError;
use talent_ai::models::{
    ActivitySource, Application, ApplicationStatus, ApplicationView, ApplyRequest,
    CreateJobRequest, Job, JobStatus, SessionContext, SubmissionBundle, UserRole,
    VerificationStatus,
};
use talent_ai::services::{
    ActivityMode, ApplicationFilter, ApplicationService, GithubError, JobFilter, JobService,
    MemoryStore, ProfileFetcher, RecordStore, RepositoryLookup, StoreError,
};
use uuid::Uuid;

struct FixedLookup(Option<u32>);

#[async_trait]
impl RepositoryLookup for FixedLookup {
    async fn public_repos(&self, _username: &str) -> Result<u32, GithubError> {
        self.0
            .ok_or_else(|| GithubError::InvalidResponse("lookup disabled".into()))
    }
}

/// Delegates to a memory store but refuses every submission
struct RejectingStore {
    inner: MemoryStore,
}

#[async_trait]
impl RecordStore for RejectingStore {
    fn backend(&self) -> &'static str {
        "rejecting"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        self.inner.insert_job(job).await
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        self.inner.get_job(job_id).await
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError> {
        self.inner.list_jobs(filter).await
    }

    async fn update_job_status(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, StoreError> {
        self.inner.update_job_status(recruiter_id, job_id, status).await
    }

    async fn submit_application(&self, _bundle: SubmissionBundle) -> Result<SubmissionBundle, StoreError> {
        Err(StoreError::Unavailable("connection reset".into()))
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationView>, StoreError> {
        self.inner.list_applications(filter).await
    }

    async fn update_application_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        self.inner
            .update_application_status(recruiter_id, application_id, status)
            .await
    }
}

fn recruiter() -> SessionContext {
    SessionContext {
        user_id: Uuid::new_v4(),
        email: Some("hiring@initech.example".to_string()),
        full_name: Some("Bill Lumbergh".to_string()),
        company_name: Some("Initech".to_string()),
        role: UserRole::Recruiter,
    }
}

fn seeker() -> SessionContext {
    SessionContext {
        user_id: Uuid::new_v4(),
        email: Some("peter@example.com".to_string()),
        full_name: Some("Peter Gibbons".to_string()),
        company_name: None,
        role: UserRole::JobSeeker,
    }
}

fn job_request(requirements: &[&str]) -> CreateJobRequest {
    serde_json::from_value(serde_json::json!({
        "title": "Data Engineer",
        "location": "Austin, TX",
        "experience_required": "3+ years",
        "description": "Own the reporting pipeline",
        "requirements": requirements,
    }))
    .unwrap()
}

fn apply(resume: &str, github: Option<&str>) -> ApplyRequest {
    ApplyRequest {
        resume_text: resume.to_string(),
        cover_letter: None,
        github_username: github.map(str::to_string),
        linkedin_url: None,
    }
}

fn services(store: Arc<dyn RecordStore>, repos: Option<u32>) -> (JobService, ApplicationService) {
    let profiles = ProfileFetcher::new(Arc::new(FixedLookup(repos)), ActivityMode::Synthetic);
    (
        JobService::new(store.clone()),
        ApplicationService::new(store, Analyzer::with_default_rules(), profiles),
    )
}

#[tokio::test]
async fn test_end_to_end_submission() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store.clone(), None);
    let recruiter = recruiter();
    let seeker = seeker();

    let job = jobs.create_job(&recruiter, job_request(&["Python"])).await.unwrap();
    assert_eq!(job.company, "Initech");
    assert_eq!(job.status, JobStatus::Open);

    let resume = "Data engineer with 5 years of Python and SQL experience\nBuilt nightly ETL jobs";
    let bundle = applications
        .submit(&seeker, job.id, apply(resume, None))
        .await
        .unwrap();

    assert_eq!(bundle.resume_analysis.experience_years, 5);
    assert!(bundle.resume_analysis.match_score >= 60);
    assert_eq!(bundle.resume_analysis.match_score, 60);
    assert_eq!(bundle.resume_analysis.skills_extracted, vec!["Python", "SQL"]);
    assert_eq!(bundle.external_profile.social_score, 0.0);
    assert_eq!(bundle.external_profile.activity_source, ActivitySource::Unavailable);
    assert_eq!(bundle.external_profile.verification_status, VerificationStatus::Partial);
    assert_eq!(bundle.attrition_risk.risk_score, 0);

    // One application id ties the four records together
    let id = bundle.application.id;
    assert_eq!(bundle.resume_analysis.application_id, id);
    assert_eq!(bundle.external_profile.application_id, id);
    assert_eq!(bundle.attrition_risk.application_id, id);

    assert_eq!(bundle.application.status, ApplicationStatus::Submitted);
    assert_eq!(bundle.application.applicant_id, seeker.user_id);
    assert_eq!(bundle.application.applicant_name.as_deref(), Some("Peter Gibbons"));
    assert_eq!(store.application_count().await, 1);
}

#[tokio::test]
async fn test_github_profile_feeds_social_score() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store, Some(12));

    let job = jobs.create_job(&recruiter(), job_request(&["Rust"])).await.unwrap();
    let bundle = applications
        .submit(&seeker(), job.id, apply("Rust developer", Some("  octocat ")))
        .await
        .unwrap();

    let profile = bundle.external_profile;
    assert_eq!(profile.github_username.as_deref(), Some("octocat"));
    assert_eq!(profile.github_repos_count, 12);
    assert_eq!(profile.activity_source, ActivitySource::Synthetic);
    assert_eq!(profile.verification_status, VerificationStatus::Verified);
    assert!(profile.github_stars < 100);
    assert!(profile.github_contributions < 500);
    assert!(profile.social_score >= 24.0 && profile.social_score <= 100.0);
}

#[tokio::test]
async fn test_github_failure_does_not_block_submission() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store.clone(), None);

    let job = jobs.create_job(&recruiter(), job_request(&[])).await.unwrap();
    let bundle = applications
        .submit(&seeker(), job.id, apply("Generalist", Some("ghost")))
        .await
        .unwrap();

    assert_eq!(bundle.external_profile.github_repos_count, 0);
    assert_eq!(bundle.external_profile.social_score, 0.0);
    assert_eq!(bundle.resume_analysis.match_score, 50);
    assert_eq!(store.application_count().await, 1);
}

#[tokio::test]
async fn test_store_failure_leaves_no_records() {
    let store = Arc::new(RejectingStore { inner: MemoryStore::new() });
    let (jobs, applications) = services(store.clone(), Some(3));
    let seeker = seeker();

    let job = jobs.create_job(&recruiter(), job_request(&["Python"])).await.unwrap();
    let err = applications
        .submit(&seeker, job.id, apply("5 years of Python", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Store { context: "Failed to submit application", .. }));
    assert_eq!(store.inner.application_count().await, 0);

    let mine = applications.list_my_applications(&seeker).await.unwrap();
    assert!(mine.is_empty());
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let (_, applications) = services(store.clone(), None);

    let err = applications
        .submit(&seeker(), Uuid::new_v4(), apply("Resume", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(store.application_count().await, 0);
}

#[tokio::test]
async fn test_closed_job_rejects_applications() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store.clone(), None);
    let recruiter = recruiter();

    let job = jobs.create_job(&recruiter, job_request(&["Python"])).await.unwrap();
    let closed = jobs.set_job_status(&recruiter, job.id, JobStatus::Closed).await.unwrap();
    assert_eq!(closed.status, JobStatus::Closed);

    let err = applications
        .submit(&seeker(), job.id, apply("Python", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.application_count().await, 0);
    assert!(jobs.list_open_jobs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_resume_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store.clone(), None);

    let job = jobs.create_job(&recruiter(), job_request(&[])).await.unwrap();
    let err = applications
        .submit(&seeker(), job.id, apply("   \n  ", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(store.application_count().await, 0);
}

#[tokio::test]
async fn test_role_checks() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store, None);
    let recruiter = recruiter();
    let seeker = seeker();

    let err = jobs.create_job(&seeker, job_request(&[])).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let job = jobs.create_job(&recruiter, job_request(&[])).await.unwrap();

    let err = applications
        .submit(&recruiter, job.id, apply("I am a recruiter", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = applications.list_recruiter_applications(&seeker).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = jobs.list_recruiter_jobs(&seeker).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_recruiter_review_flow() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, applications) = services(store, None);
    let recruiter = recruiter();
    let other_recruiter = recruiter_with_company("Globex");
    let seeker = seeker();

    let job = jobs.create_job(&recruiter, job_request(&["SQL"])).await.unwrap();
    let bundle = applications
        .submit(&seeker, job.id, apply("SQL analyst 2019-2021 2021-2024", None))
        .await
        .unwrap();

    let received = applications.list_recruiter_applications(&recruiter).await.unwrap();
    assert_eq!(received.len(), 1);
    let view = &received[0];
    assert_eq!(view.application.id, bundle.application.id);
    assert_eq!(view.job.as_ref().map(|j| j.title.as_str()), Some("Data Engineer"));
    assert_eq!(view.attrition_risk.as_ref().map(|a| a.risk_score), Some(30));

    assert!(applications
        .list_recruiter_applications(&other_recruiter)
        .await
        .unwrap()
        .is_empty());

    let err = applications
        .update_status(&other_recruiter, bundle.application.id, ApplicationStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let updated = applications
        .update_status(&recruiter, bundle.application.id, ApplicationStatus::Shortlisted)
        .await
        .unwrap();
    assert_eq!(updated.status, ApplicationStatus::Shortlisted);

    let mine = applications.list_my_applications(&seeker).await.unwrap();
    assert_eq!(mine[0].application.status, ApplicationStatus::Shortlisted);
}

#[tokio::test]
async fn test_company_falls_back_to_session() {
    let store = Arc::new(MemoryStore::new());
    let (jobs, _) = services(store, None);

    let mut anonymous = recruiter();
    anonymous.company_name = None;

    let err = jobs.create_job(&anonymous, job_request(&[])).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut req = job_request(&[]);
    req.company = Some("Hooli".to_string());
    let job = jobs.create_job(&anonymous, req).await.unwrap();
    assert_eq!(job.company, "Hooli");
}

fn recruiter_with_company(company: &str) -> SessionContext {
    SessionContext {
        company_name: Some(company.to_string()),
        ..recruiter()
    }
}
