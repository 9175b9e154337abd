use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use uuid::Uuid;
use crate::errors::AppError;
use crate::models::{SessionContext, UnknownLabel, UserRole};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("invalid subject: {0}")]
    InvalidSubject(String),

    #[error("{0}")]
    UnknownRole(#[from] UnknownLabel),

    #[error("JWT secret must not be empty")]
    EmptySecret,
}

/// Profile fields the auth provider stores on the user at sign-up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Access token claims as issued by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Verifies HS256 session tokens signed with the project's JWT secret
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Fails with `EmptySecret` when `secret` is blank
    pub fn new(secret: &str, audience: &str) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[audience]);

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<SessionContext, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::InvalidSubject(claims.sub.clone()))?;

        let role = match claims.user_metadata.role.as_deref() {
            Some(role) => role.parse::<UserRole>()?,
            None => UserRole::JobSeeker,
        };

        Ok(SessionContext {
            user_id,
            email: claims.email,
            full_name: claims.user_metadata.full_name,
            company_name: claims.user_metadata.company_name,
            role,
        })
    }

    /// Verify the value of an `Authorization: Bearer <token>` header
    pub fn verify_header(&self, header: Option<&str>) -> Result<SessionContext, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.verify(token)
    }
}

/// Extractor yielding the verified session of the caller
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

impl FromRequest for Session {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let verifier = match req.app_data::<web::Data<JwtVerifier>>() {
            Some(v) => v,
            None => return ready(Err(AppError::Internal("JWT verifier not configured".into()))),
        };

        let header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let result = verifier.verify_header(header).map(Session).map_err(|e| {
            tracing::info!("Rejected request to {}: {}", req.path(), e);
            AppError::from(e)
        });

        ready(result)
    }
}
