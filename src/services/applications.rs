use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;
use crate::core::Analyzer;
use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, ApplicationView, ApplyRequest, SessionContext, SubmissionBundle,
    UserRole,
};
use crate::services::github::ProfileFetcher;
use crate::services::store::{ApplicationFilter, RecordStore};

/// Application submission and review
///
/// # Submission
/// 1. Check the caller is a job seeker and the form is valid
/// 2. Load the job and make sure it is still open
/// 3. Score the resume against the job's requirements
/// 4. Look up the external profile (never fails)
/// 5. Assess attrition risk
/// 6. Persist all four records in one atomic store call
///
/// Nothing is written before step 6, so a failure leaves no partial rows.
#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn RecordStore>,
    analyzer: Analyzer,
    profiles: ProfileFetcher,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn RecordStore>, analyzer: Analyzer, profiles: ProfileFetcher) -> Self {
        Self {
            store,
            analyzer,
            profiles,
        }
    }

    pub async fn submit(
        &self,
        session: &SessionContext,
        job_id: Uuid,
        form: ApplyRequest,
    ) -> Result<SubmissionBundle, AppError> {
        if session.role != UserRole::JobSeeker {
            return Err(AppError::Forbidden("Only job seekers can apply to jobs".into()));
        }
        form.validate()?;

        let job = self
            .store
            .get_job(job_id)
            .await
            .map_err(|e| AppError::store("Failed to load job", e))?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

        if !job.is_open() {
            return Err(AppError::Conflict(format!("Job {} is no longer accepting applications", job_id)));
        }

        let application = Application {
            id: Uuid::new_v4(),
            job_id: job.id,
            applicant_id: session.user_id,
            applicant_name: session.full_name.clone(),
            applicant_email: session.email.clone(),
            resume_text: form.resume_text,
            cover_letter: form.cover_letter.filter(|c| !c.trim().is_empty()),
            status: ApplicationStatus::Submitted,
            created_at: Utc::now(),
        };

        let resume_analysis = self
            .analyzer
            .analyze_resume(application.id, &application.resume_text, &job.requirements);

        let external_profile = self
            .profiles
            .fetch(
                application.id,
                form.github_username.as_deref(),
                form.linkedin_url.as_deref(),
            )
            .await;

        let attrition_risk = self
            .analyzer
            .assess_attrition(application.id, &application.resume_text);

        tracing::debug!(
            "Scored application {}: match={}, social={:.1}, risk={}",
            application.id,
            resume_analysis.match_score,
            external_profile.social_score,
            attrition_risk.risk_score
        );

        let bundle = SubmissionBundle {
            application,
            resume_analysis,
            external_profile,
            attrition_risk,
        };

        let stored = self
            .store
            .submit_application(bundle)
            .await
            .map_err(|e| AppError::store("Failed to submit application", e))?;

        tracing::info!(
            "Applicant {} applied to job {} (application {})",
            session.user_id,
            job_id,
            stored.application.id
        );

        Ok(stored)
    }

    /// Applications submitted by the calling job seeker
    pub async fn list_my_applications(&self, session: &SessionContext) -> Result<Vec<ApplicationView>, AppError> {
        Ok(self
            .store
            .list_applications(ApplicationFilter::Applicant(session.user_id))
            .await?)
    }

    /// Applications received on the calling recruiter's jobs
    pub async fn list_recruiter_applications(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<ApplicationView>, AppError> {
        if !session.is_recruiter() {
            return Err(AppError::Forbidden("Only recruiters can review applications".into()));
        }

        Ok(self
            .store
            .list_applications(ApplicationFilter::Recruiter(session.user_id))
            .await?)
    }

    pub async fn update_status(
        &self,
        session: &SessionContext,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, AppError> {
        if !session.is_recruiter() {
            return Err(AppError::Forbidden("Only recruiters can change application status".into()));
        }

        let application = self
            .store
            .update_application_status(session.user_id, application_id, status)
            .await
            .map_err(|e| AppError::store("Failed to update application", e))?;

        tracing::info!("Application {} moved to {}", application.id, application.status);

        Ok(application)
    }
}
