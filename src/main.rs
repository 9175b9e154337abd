use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use talent_ai::auth::JwtVerifier;
use talent_ai::config::{Settings, StorageBackend};
use talent_ai::core::Analyzer;
use talent_ai::models::ErrorResponse;
use talent_ai::routes::{self, AppState};
use talent_ai::services::{
    ApplicationService, GithubClient, JobService, MemoryStore, PostgresClient, ProfileFetcher,
    RecordStore, SupabaseClient,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for malformed payloads
#[derive(Debug)]
struct PayloadError(ErrorResponse);

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for PayloadError {}

impl error::ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    PayloadError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

/// Handle path parameter errors, e.g. a job id that is not a UUID
fn handle_path_error(err: error::PathError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("Path error on {}: {}", req.path(), err);
    PayloadError(ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_tracing(default_level: &str, default_format: &str) {
    let filter = std::env::var("LOG_LEVEL")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn config_error(message: String) -> io::Error {
    error!("{}", message);
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

async fn build_store(settings: &Settings) -> io::Result<Arc<dyn RecordStore>> {
    match settings.storage.backend {
        StorageBackend::Supabase => {
            let supabase = settings
                .supabase
                .clone()
                .ok_or_else(|| config_error("Storage backend is supabase but [supabase] is not configured".into()))?;

            let client = SupabaseClient::new(supabase.url, supabase.service_key, supabase.tables.into())
                .map_err(|e| config_error(format!("Failed to initialize Supabase client: {}", e)))?;

            info!("Supabase client initialized");
            Ok(Arc::new(client))
        }
        StorageBackend::Postgres => {
            let database = settings
                .database
                .as_ref()
                .ok_or_else(|| config_error("Storage backend is postgres but [database] is not configured".into()))?;

            let client = PostgresClient::from_settings(
                &database.url,
                database.max_connections,
                database.min_connections,
                database.acquire_timeout_secs,
                database.idle_timeout_secs,
            )
            .await
            .map_err(|e| config_error(format!("Failed to connect to PostgreSQL: {}", e)))?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                database.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(client))
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store, records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing("info", "compact");
            return Err(config_error(format!("Failed to load configuration: {}", e)));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting TalentAI application service...");

    let store = build_store(&settings).await?;

    let github = GithubClient::new(
        settings.github.api_url.clone(),
        &settings.github.user_agent,
        Duration::from_secs(settings.github.timeout_secs),
    )
    .map_err(|e| config_error(format!("Failed to initialize GitHub client: {}", e)))?;

    let profiles = ProfileFetcher::new(Arc::new(github), settings.github.activity);
    info!("Profile fetcher initialized ({:?} activity)", settings.github.activity);

    let analyzer = Analyzer::new(settings.scoring.clone().into());
    info!(
        "Analyzer initialized with {} vocabulary terms",
        analyzer.rules().skill_vocabulary.len()
    );

    let verifier = JwtVerifier::new(&settings.auth.jwt_secret, &settings.auth.audience)
        .map_err(|e| config_error(format!("Invalid auth settings (set SUPABASE_JWT_SECRET): {}", e)))?;
    let verifier = web::Data::new(verifier);

    // Build application state
    let app_state = AppState {
        store: store.clone(),
        jobs: JobService::new(store.clone()),
        applications: ApplicationService::new(store, analyzer, profiles),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(verifier.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
