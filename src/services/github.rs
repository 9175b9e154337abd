use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;
use crate::core::calculate_social_score;
use crate::models::{ActivitySource, ExternalProfile, VerificationStatus};

/// Errors that can occur when looking up a GitHub profile
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("GitHub returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of public repository counts for a username
#[async_trait]
pub trait RepositoryLookup: Send + Sync {
    async fn public_repos(&self, username: &str) -> Result<u32, GithubError>;
}

/// GitHub REST API client
pub struct GithubClient {
    api_url: String,
    client: Client,
}

impl GithubClient {
    pub fn new(api_url: String, user_agent: &str, timeout: Duration) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { api_url, client })
    }
}

#[async_trait]
impl RepositoryLookup for GithubClient {
    async fn public_repos(&self, username: &str) -> Result<u32, GithubError> {
        let url = format!(
            "{}/users/{}",
            self.api_url.trim_end_matches('/'),
            urlencoding::encode(username)
        );

        tracing::debug!("Looking up GitHub profile: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::Status(response.status()));
        }

        let json: Value = response.json().await?;

        json.get("public_repos")
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .ok_or_else(|| GithubError::InvalidResponse("Missing public_repos".into()))
    }
}

/// How to fill the star and contribution figures GitHub does not report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityMode {
    /// Random placeholders, regenerated on every fetch
    #[default]
    Synthetic,
    /// Always zero, tagged as unavailable
    Unavailable,
}

/// Raw figures feeding the social score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileActivity {
    pub repos: u32,
    pub stars: u32,
    pub contributions: u32,
    pub source: ActivitySource,
}

impl ProfileActivity {
    pub fn empty() -> Self {
        Self {
            repos: 0,
            stars: 0,
            contributions: 0,
            source: ActivitySource::Unavailable,
        }
    }
}

/// Builds the external profile record of an application.
///
/// Lookup failures never propagate: the applicant simply gets the empty
/// record. In synthetic mode the result is not reproducible.
#[derive(Clone)]
pub struct ProfileFetcher {
    lookup: Arc<dyn RepositoryLookup>,
    mode: ActivityMode,
}

impl ProfileFetcher {
    pub fn new(lookup: Arc<dyn RepositoryLookup>, mode: ActivityMode) -> Self {
        Self { lookup, mode }
    }

    /// Gather activity figures; blank handles skip the network entirely
    pub async fn fetch_activity(&self, username: Option<&str>) -> ProfileActivity {
        let username = match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(u) => u,
            None => return ProfileActivity::empty(),
        };

        let repos = match self.lookup.public_repos(username).await {
            Ok(repos) => repos,
            Err(e) => {
                tracing::warn!("GitHub lookup for {} failed, using empty profile: {}", username, e);
                return ProfileActivity::empty();
            }
        };

        match self.mode {
            ActivityMode::Synthetic => {
                let mut rng = rand::rng();
                ProfileActivity {
                    repos,
                    stars: rng.random_range(0..100),
                    contributions: rng.random_range(0..500),
                    source: ActivitySource::Synthetic,
                }
            }
            ActivityMode::Unavailable => ProfileActivity {
                repos,
                ..ProfileActivity::empty()
            },
        }
    }

    /// Build the full external profile record for an application
    pub async fn fetch(
        &self,
        application_id: Uuid,
        github_username: Option<&str>,
        linkedin_url: Option<&str>,
    ) -> ExternalProfile {
        let activity = self.fetch_activity(github_username).await;

        ExternalProfile {
            application_id,
            github_username: github_username
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            github_repos_count: activity.repos,
            github_stars: activity.stars,
            github_contributions: activity.contributions,
            activity_source: activity.source,
            linkedin_url: linkedin_url
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
            social_score: calculate_social_score(activity.repos, activity.stars, activity.contributions),
            verification_status: if activity.repos > 0 {
                VerificationStatus::Verified
            } else {
                VerificationStatus::Partial
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLookup {
        result: Option<u32>,
        calls: AtomicUsize,
    }

    impl FixedLookup {
        fn new(result: Option<u32>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RepositoryLookup for FixedLookup {
        async fn public_repos(&self, _username: &str) -> Result<u32, GithubError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .ok_or_else(|| GithubError::InvalidResponse("no data".into()))
        }
    }

    #[tokio::test]
    async fn test_blank_handle_skips_lookup() {
        let lookup = FixedLookup::new(Some(12));
        let fetcher = ProfileFetcher::new(lookup.clone(), ActivityMode::Synthetic);

        let profile = fetcher.fetch(Uuid::new_v4(), Some("   "), None).await;

        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
        assert_eq!(profile.github_username, None);
        assert_eq!(profile.github_repos_count, 0);
        assert_eq!(profile.github_stars, 0);
        assert_eq!(profile.github_contributions, 0);
        assert_eq!(profile.social_score, 0.0);
        assert_eq!(profile.verification_status, VerificationStatus::Partial);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_empty() {
        let fetcher = ProfileFetcher::new(FixedLookup::new(None), ActivityMode::Synthetic);

        let profile = fetcher.fetch(Uuid::new_v4(), Some("ghost"), None).await;

        assert_eq!(profile.github_username.as_deref(), Some("ghost"));
        assert_eq!(profile.github_repos_count, 0);
        assert_eq!(profile.activity_source, ActivitySource::Unavailable);
        assert_eq!(profile.social_score, 0.0);
        assert_eq!(profile.verification_status, VerificationStatus::Partial);
    }

    #[tokio::test]
    async fn test_synthetic_activity_stays_in_range() {
        let fetcher = ProfileFetcher::new(FixedLookup::new(Some(5)), ActivityMode::Synthetic);

        for _ in 0..20 {
            let profile = fetcher.fetch(Uuid::new_v4(), Some("octocat"), None).await;
            assert_eq!(profile.github_repos_count, 5);
            assert!(profile.github_stars < 100);
            assert!(profile.github_contributions < 500);
            assert_eq!(profile.activity_source, ActivitySource::Synthetic);
            assert_eq!(profile.verification_status, VerificationStatus::Verified);
            assert!(profile.social_score >= 10.0 && profile.social_score <= 100.0);
        }
    }

    #[tokio::test]
    async fn test_unavailable_mode_is_deterministic() {
        let fetcher = ProfileFetcher::new(FixedLookup::new(Some(7)), ActivityMode::Unavailable);

        let profile = fetcher
            .fetch(Uuid::nil(), Some("octocat"), Some("https://linkedin.com/in/octocat"))
            .await;

        assert_eq!(profile.github_stars, 0);
        assert_eq!(profile.github_contributions, 0);
        assert_eq!(profile.activity_source, ActivitySource::Unavailable);
        assert_eq!(profile.social_score, 14.0);
        assert_eq!(profile.linkedin_url.as_deref(), Some("https://linkedin.com/in/octocat"));
    }
}
