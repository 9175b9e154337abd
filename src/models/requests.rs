use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Request to post a new job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    #[serde(default)]
    pub experience_required: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Either a JSON array or a single newline-separated string
    #[serde(default, deserialize_with = "requirements_from_list_or_text")]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
}

fn default_job_type() -> String {
    "full-time".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RequirementsInput {
    List(Vec<String>),
    Text(String),
}

fn requirements_from_list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match RequirementsInput::deserialize(deserializer)? {
        RequirementsInput::List(items) => items,
        RequirementsInput::Text(text) => text.lines().map(str::to_string).collect(),
    };

    Ok(raw
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect())
}

/// Application form submitted by a job seeker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplyRequest {
    #[validate(custom(function = "not_blank"))]
    pub resume_text: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub cover_letter: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub github_username: Option<String>,
    /// Empty form fields arrive as `""` and count as absent
    #[validate(url)]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub linkedin_url: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}
