use actix_web::{web, HttpResponse};
use uuid::Uuid;
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{ApplicationListResponse, ApplicationStatus, UpdateStatusRequest};
use crate::routes::AppState;

/// Configure all application review routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/applications", web::get().to(list_received))
        .route("/applications/mine", web::get().to(list_mine))
        .route("/applications/{application_id}/status", web::patch().to(update_status));
}

/// GET /api/v1/applications/mine
async fn list_mine(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse, AppError> {
    let applications = state.applications.list_my_applications(&session).await?;

    Ok(HttpResponse::Ok().json(ApplicationListResponse {
        total_results: applications.len(),
        applications,
    }))
}

/// GET /api/v1/applications
async fn list_received(
    state: web::Data<AppState>,
    Session(session): Session,
) -> Result<HttpResponse, AppError> {
    let applications = state.applications.list_recruiter_applications(&session).await?;

    Ok(HttpResponse::Ok().json(ApplicationListResponse {
        total_results: applications.len(),
        applications,
    }))
}

/// Move an application through the review stages
///
/// PATCH /api/v1/applications/{application_id}/status
///
/// Request body:
/// ```json
/// { "status": "submitted|screening|shortlisted|interviewed|rejected" }
/// ```
async fn update_status(
    state: web::Data<AppState>,
    Session(session): Session,
    path: web::Path<Uuid>,
    req: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let status: ApplicationStatus = req.status.parse().map_err(|_| {
        AppError::Validation(
            "Status must be one of: submitted, screening, shortlisted, interviewed, rejected".into(),
        )
    })?;

    let application = state
        .applications
        .update_status(&session, path.into_inner(), status)
        .await?;

    Ok(HttpResponse::Ok().json(application))
}
