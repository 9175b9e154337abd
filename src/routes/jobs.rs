use actix_web::{web, HttpResponse};
use uuid::Uuid;
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{
    ApplyRequest, CreateJobRequest, JobListResponse, JobStatus, SubmitApplicationResponse,
    UpdateStatusRequest,
};
use crate::routes::AppState;

/// Configure all job-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/jobs", web::get().to(list_open_jobs))
        .route("/jobs", web::post().to(create_job))
        .route("/jobs/mine", web::get().to(list_my_jobs))
        .route("/jobs/{job_id}/status", web::patch().to(set_job_status))
        .route("/jobs/{job_id}/applications", web::post().to(apply_to_job));
}

/// Open postings for job seekers
///
/// GET /api/v1/jobs
async fn list_open_jobs(
    state: web::Data<AppState>,
    _session: Session,
) -> Result<HttpResponse, AppError> {
    let jobs = state.jobs.list_open_jobs().await?;

    Ok(HttpResponse::Ok().json(JobListResponse {
        total_results: jobs.len(),
        jobs,
    }))
}

/// Post a new job
///
/// POST /api/v1/jobs
///
/// Request body:
/// ```json
/// {
///   "title": "string",
///   "company": "string (defaults to the recruiter's company)",
///   "location": "string",
///   "job_type": "full-time",
///   "experience_required": "string",
///   "description": "string",
///   "requirements": ["string"] | "one\nper\nline",
///   "salary_range": "string"
/// }
/// ```
async fn create_job(
    state: web::Data<AppState>,
    Session(session): Session,
    req: web::Json<CreateJobRequest>,
) -> Result<HttpResponse, AppError> {
    let job = state.jobs.create_job(&session, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

/// The calling recruiter's postings, open and closed
///
/// GET /api/v1/jobs/mine
async fn list_my_jobs(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse, AppError> {
    let jobs = state.jobs.list_recruiter_jobs(&session).await?;

    Ok(HttpResponse::Ok().json(JobListResponse {
        total_results: jobs.len(),
        jobs,
    }))
}

/// Open or close a posting
///
/// PATCH /api/v1/jobs/{job_id}/status
///
/// Request body: `{ "status": "open|closed" }`
async fn set_job_status(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let status: JobStatus = req
        .status
        .parse()
        .map_err(|_| AppError::Validation("Status must be one of: open, closed".into()))?;

    let job = state
        .jobs
        .set_job_status(&session, path.into_inner(), status)
        .await?;

    Ok(HttpResponse::Ok().json(job))
}

/// Submit an application
///
/// POST /api/v1/jobs/{job_id}/applications
///
/// Request body:
/// ```json
/// {
///   "resume_text": "string",
///   "cover_letter": "string",
///   "github_username": "string",
///   "linkedin_url": "string"
/// }
/// ```
async fn apply_to_job(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    req: web::Json<ApplyRequest>,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .applications
        .submit(&session, path.into_inner(), req.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(SubmitApplicationResponse {
        success: true,
        submission,
    }))
}
