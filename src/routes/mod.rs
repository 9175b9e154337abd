// Route exports
pub mod applications;
pub mod health;
pub mod jobs;

use actix_web::web;
use std::sync::Arc;
use crate::services::{ApplicationService, JobService, RecordStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub jobs: JobService,
    pub applications: ApplicationService,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(jobs::configure)
            .configure(applications::configure),
    );
}
