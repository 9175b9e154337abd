use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::models::{Application, ApplicationStatus, ApplicationView, Job, JobStatus, SubmissionBundle};
use crate::services::store::{ApplicationFilter, JobFilter, RecordStore, StoreError};

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table and function names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub jobs: String,
    pub applications: String,
    pub resume_analysis: String,
    pub external_profiles: String,
    pub attrition_risk: String,
    pub submit_function: String,
    pub update_status_function: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            jobs: "jobs".to_string(),
            applications: "applications".to_string(),
            resume_analysis: "resume_analysis".to_string(),
            external_profiles: "external_profiles".to_string(),
            attrition_risk: "attrition_risk".to_string(),
            submit_function: "submit_application".to_string(),
            update_status_function: "update_application_status".to_string(),
        }
    }
}

/// Supabase REST (PostgREST) client
///
/// Handles all communication with the hosted database including:
/// - Creating and listing job postings
/// - Submitting applications through the transactional RPC
/// - Listing applications with their embedded enrichment records
/// - Recruiter status changes
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: SupabaseTables,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    fn rest_url(&self, resource: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), resource)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    /// Select clause embedding the job summary and the three enrichment records
    fn application_select(&self, inner_job: bool) -> String {
        format!(
            "*,job:{}{}(title,company,recruiter_id),resume_analysis:{}(*),external_profile:{}(*),attrition_risk:{}(*)",
            self.tables.jobs,
            if inner_job { "!inner" } else { "" },
            self.tables.resume_analysis,
            self.tables.external_profiles,
            self.tables.attrition_risk,
        )
    }

    async fn ensure_success(response: Response, action: &str) -> Result<Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Supabase request to {} failed: {} - {}", action, status, body);

        Err(SupabaseError::ApiError(format!("Failed to {}: {}", action, status)))
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, url: &str, action: &str) -> Result<Vec<T>, SupabaseError> {
        tracing::debug!("Fetching rows from: {}", url);

        let response = self.authorized(self.client.get(url)).send().await?;
        let response = Self::ensure_success(response, action).await?;

        let json: Value = response.json().await?;
        parse_rows(json, action)
    }

    async fn patch_rows<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
        action: &str,
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .authorized(self.client.patch(url))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response, action).await?;

        let json: Value = response.json().await?;
        parse_rows(json, action)
    }
}

fn parse_rows<T: DeserializeOwned>(json: Value, action: &str) -> Result<Vec<T>, SupabaseError> {
    let rows = json
        .as_array()
        .ok_or_else(|| SupabaseError::InvalidResponse(format!("Expected row array from {}", action)))?;

    rows.iter()
        .map(|row| {
            serde_json::from_value(row.clone())
                .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse row from {}: {}", action, e)))
        })
        .collect()
}

#[async_trait]
impl RecordStore for SupabaseClient {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let url = format!("{}?select=id&limit=1", self.rest_url(&self.tables.jobs));
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(SupabaseError::from)?;

        Ok(response.status().is_success())
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let url = self.rest_url(&self.tables.jobs);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(&job)
            .send()
            .await
            .map_err(SupabaseError::from)?;
        let response = Self::ensure_success(response, "insert job").await?;

        let json: Value = response.json().await.map_err(SupabaseError::from)?;
        let mut rows: Vec<Job> = parse_rows(json, "insert job")?;

        tracing::debug!("Inserted job {} for recruiter {}", job.id, job.recruiter_id);

        rows.pop()
            .ok_or_else(|| SupabaseError::InvalidResponse("Insert returned no rows".into()).into())
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let url = format!("{}?select=*&id=eq.{}", self.rest_url(&self.tables.jobs), job_id);
        let mut rows: Vec<Job> = self.fetch_rows(&url, "fetch job").await?;
        Ok(rows.pop())
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError> {
        let condition = match filter {
            JobFilter::Open => format!("status=eq.{}", JobStatus::Open),
            JobFilter::Recruiter(recruiter_id) => format!("recruiter_id=eq.{}", recruiter_id),
        };

        let url = format!(
            "{}?select=*&{}&order=created_at.desc",
            self.rest_url(&self.tables.jobs),
            condition
        );

        Ok(self.fetch_rows(&url, "list jobs").await?)
    }

    async fn update_job_status(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, StoreError> {
        let url = format!(
            "{}?id=eq.{}&recruiter_id=eq.{}",
            self.rest_url(&self.tables.jobs),
            job_id,
            recruiter_id
        );

        let mut rows: Vec<Job> = self
            .patch_rows(&url, json!({ "status": status }), "update job status")
            .await?;

        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("Job {} not found", job_id)))
    }

    async fn submit_application(&self, bundle: SubmissionBundle) -> Result<SubmissionBundle, StoreError> {
        let url = self.rest_url(&format!("rpc/{}", self.tables.submit_function));

        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "payload": &bundle }))
            .send()
            .await
            .map_err(SupabaseError::from)?;
        Self::ensure_success(response, "submit application").await?;

        tracing::debug!(
            "Submitted application {} for job {}",
            bundle.application.id,
            bundle.application.job_id
        );

        Ok(bundle)
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationView>, StoreError> {
        let (select, condition) = match filter {
            ApplicationFilter::Applicant(applicant_id) => (
                self.application_select(false),
                format!("applicant_id=eq.{}", applicant_id),
            ),
            ApplicationFilter::Recruiter(recruiter_id) => (
                self.application_select(true),
                format!("job.recruiter_id=eq.{}", recruiter_id),
            ),
        };

        let url = format!(
            "{}?select={}&{}&order=created_at.desc",
            self.rest_url(&self.tables.applications),
            urlencoding::encode(&select),
            condition
        );

        Ok(self.fetch_rows(&url, "list applications").await?)
    }

    async fn update_application_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        // Ownership goes through the job, which PATCH filters cannot reach,
        // so the check and the write run together in the SQL function
        let url = self.rest_url(&format!("rpc/{}", self.tables.update_status_function));

        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({
                "p_recruiter_id": recruiter_id,
                "p_application_id": application_id,
                "p_status": status,
            }))
            .send()
            .await
            .map_err(SupabaseError::from)?;
        let response = Self::ensure_success(response, "update application status").await?;

        let json: Value = response.json().await.map_err(SupabaseError::from)?;
        let mut rows: Vec<Application> = parse_rows(json, "update application status")?;

        rows.pop()
            .ok_or_else(|| StoreError::NotFound(format!("Application {} not found", application_id)))
    }
}
