use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::models::{
    Application, ApplicationStatus, ApplicationView, AttritionRisk, ExternalProfile, Job, JobStatus,
    JobSummary, ResumeAnalysis, SubmissionBundle, UnknownLabel,
};
use crate::services::store::{ApplicationFilter, JobFilter, RecordStore, StoreError};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid stored value: {0}")]
    InvalidData(#[from] UnknownLabel),

    #[error("Value out of range for column {0}")]
    OutOfRange(&'static str),
}

/// Direct PostgreSQL record store
///
/// Uses the same schema as the hosted Supabase project (see `migrations/`),
/// for deployments that talk to the database without the REST layer. A
/// submission is written inside one transaction.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Load the enrichment records for a set of applications
    async fn load_enrichment(
        &self,
        ids: &[Uuid],
    ) -> Result<
        (
            HashMap<Uuid, ResumeAnalysis>,
            HashMap<Uuid, ExternalProfile>,
            HashMap<Uuid, AttritionRisk>,
        ),
        PostgresError,
    > {
        let analyses = sqlx::query("SELECT * FROM resume_analysis WHERE application_id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| analysis_from_row(row).map(|a| (a.application_id, a)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        let profiles = sqlx::query("SELECT * FROM external_profiles WHERE application_id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| profile_from_row(row).map(|p| (p.application_id, p)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        let risks = sqlx::query("SELECT * FROM attrition_risk WHERE application_id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|row| risk_from_row(row).map(|r| (r.application_id, r)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok((analyses, profiles, risks))
    }

    async fn insert_bundle(&self, bundle: &SubmissionBundle) -> Result<(), PostgresError> {
        let mut tx = self.pool.begin().await?;

        let app = &bundle.application;
        sqlx::query(
            r#"
            INSERT INTO applications
                (id, job_id, applicant_id, applicant_name, applicant_email,
                 resume_text, cover_letter, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(app.id)
        .bind(app.job_id)
        .bind(app.applicant_id)
        .bind(&app.applicant_name)
        .bind(&app.applicant_email)
        .bind(&app.resume_text)
        .bind(&app.cover_letter)
        .bind(app.status.as_str())
        .bind(app.created_at)
        .execute(&mut *tx)
        .await?;

        let analysis = &bundle.resume_analysis;
        sqlx::query(
            r#"
            INSERT INTO resume_analysis
                (application_id, skills_extracted, experience_years, languages_detected,
                 original_language, match_score, key_highlights)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(analysis.application_id)
        .bind(&analysis.skills_extracted)
        .bind(to_i32(analysis.experience_years, "experience_years")?)
        .bind(&analysis.languages_detected)
        .bind(&analysis.original_language)
        .bind(analysis.match_score as i16)
        .bind(&analysis.key_highlights)
        .execute(&mut *tx)
        .await?;

        let profile = &bundle.external_profile;
        sqlx::query(
            r#"
            INSERT INTO external_profiles
                (application_id, github_username, github_repos_count, github_stars,
                 github_contributions, activity_source, linkedin_url, social_score,
                 verification_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(profile.application_id)
        .bind(&profile.github_username)
        .bind(to_i32(profile.github_repos_count, "github_repos_count")?)
        .bind(to_i32(profile.github_stars, "github_stars")?)
        .bind(to_i32(profile.github_contributions, "github_contributions")?)
        .bind(profile.activity_source.as_str())
        .bind(&profile.linkedin_url)
        .bind(profile.social_score)
        .bind(profile.verification_status.as_str())
        .execute(&mut *tx)
        .await?;

        let risk = &bundle.attrition_risk;
        sqlx::query(
            r#"
            INSERT INTO attrition_risk
                (application_id, risk_score, job_hopping_frequency, average_tenure_months,
                 recent_job_changes, career_progression_rate, risk_factors, retention_prediction)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(risk.application_id)
        .bind(risk.risk_score as i16)
        .bind(risk.job_hopping_frequency)
        .bind(to_i32(risk.average_tenure_months, "average_tenure_months")?)
        .bind(to_i32(risk.recent_job_changes, "recent_job_changes")?)
        .bind(risk.career_progression_rate.as_str())
        .bind(&risk.risk_factors)
        .bind(risk.retention_prediction.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

fn to_i32(value: u32, column: &'static str) -> Result<i32, PostgresError> {
    i32::try_from(value).map_err(|_| PostgresError::OutOfRange(column))
}

fn to_u32(value: i32, column: &'static str) -> Result<u32, PostgresError> {
    u32::try_from(value).map_err(|_| PostgresError::OutOfRange(column))
}

fn to_u8(value: i16, column: &'static str) -> Result<u8, PostgresError> {
    u8::try_from(value).map_err(|_| PostgresError::OutOfRange(column))
}

fn label<T: FromStr<Err = UnknownLabel>>(row: &PgRow, column: &str) -> Result<T, PostgresError> {
    let raw: String = row.try_get(column)?;
    Ok(raw.parse()?)
}

fn job_from_row(row: &PgRow) -> Result<Job, PostgresError> {
    Ok(Job {
        id: row.try_get("id")?,
        recruiter_id: row.try_get("recruiter_id")?,
        title: row.try_get("title")?,
        company: row.try_get("company")?,
        location: row.try_get("location")?,
        job_type: row.try_get("job_type")?,
        experience_required: row.try_get("experience_required")?,
        description: row.try_get("description")?,
        requirements: row.try_get("requirements")?,
        salary_range: row.try_get("salary_range")?,
        status: label(row, "status")?,
        created_at: row.try_get("created_at")?,
    })
}

fn application_from_row(row: &PgRow) -> Result<Application, PostgresError> {
    Ok(Application {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        applicant_id: row.try_get("applicant_id")?,
        applicant_name: row.try_get("applicant_name")?,
        applicant_email: row.try_get("applicant_email")?,
        resume_text: row.try_get("resume_text")?,
        cover_letter: row.try_get("cover_letter")?,
        status: label(row, "status")?,
        created_at: row.try_get("created_at")?,
    })
}

fn analysis_from_row(row: &PgRow) -> Result<ResumeAnalysis, PostgresError> {
    Ok(ResumeAnalysis {
        application_id: row.try_get("application_id")?,
        skills_extracted: row.try_get("skills_extracted")?,
        experience_years: to_u32(row.try_get("experience_years")?, "experience_years")?,
        languages_detected: row.try_get("languages_detected")?,
        original_language: row.try_get("original_language")?,
        match_score: to_u8(row.try_get("match_score")?, "match_score")?,
        key_highlights: row.try_get("key_highlights")?,
    })
}

fn profile_from_row(row: &PgRow) -> Result<ExternalProfile, PostgresError> {
    Ok(ExternalProfile {
        application_id: row.try_get("application_id")?,
        github_username: row.try_get("github_username")?,
        github_repos_count: to_u32(row.try_get("github_repos_count")?, "github_repos_count")?,
        github_stars: to_u32(row.try_get("github_stars")?, "github_stars")?,
        github_contributions: to_u32(row.try_get("github_contributions")?, "github_contributions")?,
        activity_source: label(row, "activity_source")?,
        linkedin_url: row.try_get("linkedin_url")?,
        social_score: row.try_get("social_score")?,
        verification_status: label(row, "verification_status")?,
    })
}

fn risk_from_row(row: &PgRow) -> Result<AttritionRisk, PostgresError> {
    Ok(AttritionRisk {
        application_id: row.try_get("application_id")?,
        risk_score: to_u8(row.try_get("risk_score")?, "risk_score")?,
        job_hopping_frequency: row.try_get("job_hopping_frequency")?,
        average_tenure_months: to_u32(row.try_get("average_tenure_months")?, "average_tenure_months")?,
        recent_job_changes: to_u32(row.try_get("recent_job_changes")?, "recent_job_changes")?,
        career_progression_rate: label(row, "career_progression_rate")?,
        risk_factors: row.try_get("risk_factors")?,
        retention_prediction: label(row, "retention_prediction")?,
    })
}

#[async_trait]
impl RecordStore for PostgresClient {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        let result: Result<i32, sqlx::Error> = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await;
        Ok(result.is_ok())
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let query = r#"
            INSERT INTO jobs
                (id, recruiter_id, title, company, location, job_type, experience_required,
                 description, requirements, salary_range, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
        "#;

        let row = sqlx::query(query)
            .bind(job.id)
            .bind(job.recruiter_id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.job_type)
            .bind(&job.experience_required)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.salary_range)
            .bind(job.status.as_str())
            .bind(job.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        tracing::debug!("Inserted job {} for recruiter {}", job.id, job.recruiter_id);

        Ok(job_from_row(&row)?)
    }

    async fn get_job(&self, job_id: Uuid) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        Ok(row.as_ref().map(job_from_row).transpose()?)
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<Job>, StoreError> {
        let rows = match filter {
            JobFilter::Open => {
                sqlx::query("SELECT * FROM jobs WHERE status = $1 ORDER BY created_at DESC")
                    .bind(JobStatus::Open.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            JobFilter::Recruiter(recruiter_id) => {
                sqlx::query("SELECT * FROM jobs WHERE recruiter_id = $1 ORDER BY created_at DESC")
                    .bind(recruiter_id)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(PostgresError::from)?;

        Ok(rows.iter().map(job_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    async fn update_job_status(
        &self,
        recruiter_id: Uuid,
        job_id: Uuid,
        status: JobStatus,
    ) -> Result<Job, StoreError> {
        let row = sqlx::query(
            "UPDATE jobs SET status = $1 WHERE id = $2 AND recruiter_id = $3 RETURNING *",
        )
        .bind(status.as_str())
        .bind(job_id)
        .bind(recruiter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(PostgresError::from)?;

        match row {
            Some(row) => Ok(job_from_row(&row)?),
            None => Err(StoreError::NotFound(format!("Job {} not found", job_id))),
        }
    }

    async fn submit_application(&self, bundle: SubmissionBundle) -> Result<SubmissionBundle, StoreError> {
        self.insert_bundle(&bundle).await?;

        tracing::debug!(
            "Submitted application {} for job {}",
            bundle.application.id,
            bundle.application.job_id
        );

        Ok(bundle)
    }

    async fn list_applications(&self, filter: ApplicationFilter) -> Result<Vec<ApplicationView>, StoreError> {
        let (condition, owner) = match filter {
            ApplicationFilter::Applicant(id) => ("a.applicant_id = $1", id),
            ApplicationFilter::Recruiter(id) => ("j.recruiter_id = $1", id),
        };

        let query = format!(
            r#"
            SELECT a.*, j.title AS job_title, j.company AS job_company, j.recruiter_id AS job_recruiter_id
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE {}
            ORDER BY a.created_at DESC
            "#,
            condition
        );

        let rows = sqlx::query(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in &rows {
            let application = application_from_row(row)?;
            let job = JobSummary {
                title: row.try_get("job_title").map_err(PostgresError::from)?,
                company: row.try_get("job_company").map_err(PostgresError::from)?,
                recruiter_id: row.try_get("job_recruiter_id").map_err(PostgresError::from)?,
            };
            listed.push((application, job));
        }

        let ids: Vec<Uuid> = listed.iter().map(|(a, _)| a.id).collect();
        let (mut analyses, mut profiles, mut risks) = self.load_enrichment(&ids).await?;

        Ok(listed
            .into_iter()
            .map(|(application, job)| ApplicationView {
                resume_analysis: analyses.remove(&application.id),
                external_profile: profiles.remove(&application.id),
                attrition_risk: risks.remove(&application.id),
                job: Some(job),
                application,
            })
            .collect())
    }

    async fn update_application_status(
        &self,
        recruiter_id: Uuid,
        application_id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let query = r#"
            UPDATE applications a
            SET status = $1
            FROM jobs j
            WHERE a.id = $2 AND j.id = a.job_id AND j.recruiter_id = $3
            RETURNING a.*
        "#;

        let row = sqlx::query(query)
            .bind(status.as_str())
            .bind(application_id)
            .bind(recruiter_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(PostgresError::from)?;

        match row {
            Some(row) => Ok(application_from_row(&row)?),
            None => Err(StoreError::NotFound(format!("Application {} not found", application_id))),
        }
    }
}
