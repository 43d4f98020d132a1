use crate::models::{Decision, DecisionRecord, Profile};
use crate::services::{DecisionSink, ProfileSource};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Errors that can occur when talking to the matching service
#[derive(Debug, Error)]
pub enum MatchingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: matching service rejected the request")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct FindMatchesRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    limit: u16,
    #[serde(rename = "excludeUserIds")]
    exclude_user_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct FindMatchesResponse {
    #[serde(default)]
    matches: Vec<MatchRecord>,
}

/// Subset of a scored match the deck needs
#[derive(Debug, Deserialize, Validate)]
struct MatchRecord {
    #[serde(rename = "userId")]
    #[validate(length(min = 1))]
    user_id: String,
    #[validate(length(min = 1))]
    name: String,
    #[validate(range(min = 1))]
    age: u32,
    #[serde(rename = "imageFileIds", default)]
    image_file_ids: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct RecordEventRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "targetUserId")]
    target_user_id: &'a str,
    #[serde(rename = "eventType")]
    event_type: &'static str,
}

/// Event type the matching service records for a decision
pub fn event_type(decision: Decision) -> &'static str {
    match decision {
        Decision::Like | Decision::SuperLike => "liked",
        Decision::Nope => "passed",
    }
}

/// Matching service client
///
/// Acts as the deck's profile source (`/matches/find`) and decision sink
/// (`/matches/event`).
pub struct MatchingClient {
    base_url: String,
    photo_url_template: String,
    client: Client,
}

impl MatchingClient {
    /// `photo_url_template` turns an image file id into a URI, `{id}` is replaced
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        photo_url_template: impl Into<String>,
    ) -> Result<Self, MatchingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            photo_url_template: photo_url_template.into(),
            client,
        })
    }

    pub fn photo_url(&self, file_id: &str) -> String {
        self.photo_url_template.replace("{id}", file_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url.trim_end_matches('/'), path)
    }

    fn to_profile(&self, record: MatchRecord) -> Profile {
        Profile {
            photos: record
                .image_file_ids
                .iter()
                .map(|id| self.photo_url(id))
                .collect(),
            id: record.user_id,
            name: record.name,
            age: record.age,
            bio: record.description,
        }
    }

    fn check_status(status: StatusCode, what: &str) -> Result<(), MatchingError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(MatchingError::Unauthorized);
        }
        if !status.is_success() {
            return Err(MatchingError::ApiError(format!("Failed to {}: {}", what, status)));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileSource for MatchingClient {
    async fn fetch(
        &self,
        user_id: &str,
        limit: usize,
        exclude: &[String],
    ) -> Result<Vec<Profile>, MatchingError> {
        let url = self.url("/matches/find");
        let body = FindMatchesRequest {
            user_id,
            // The matching service caps limits at 100
            limit: limit.min(100) as u16,
            exclude_user_ids: exclude,
        };

        tracing::debug!("Fetching up to {} candidates for {} from {}", body.limit, user_id, url);

        let response = self.client.post(&url).json(&body).send().await?;
        Self::check_status(response.status(), "fetch candidates")?;

        let payload: FindMatchesResponse = response
            .json()
            .await
            .map_err(|e| MatchingError::InvalidResponse(e.to_string()))?;

        let profiles: Vec<Profile> = payload
            .matches
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(errors) => {
                    tracing::warn!("Skipping malformed match {:?}: {}", record.user_id, errors);
                    false
                }
            })
            .map(|record| self.to_profile(record))
            .collect();

        tracing::debug!("Fetched {} candidates for {}", profiles.len(), user_id);
        Ok(profiles)
    }
}

#[async_trait]
impl DecisionSink for MatchingClient {
    async fn report(&self, user_id: &str, record: &DecisionRecord) -> Result<(), MatchingError> {
        let body = RecordEventRequest {
            user_id,
            target_user_id: &record.profile_id,
            event_type: event_type(record.decision),
        };

        let response = self
            .client
            .post(self.url("/matches/event"))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response.status(), "record event")?;

        tracing::debug!("Reported {} on {} for {}", record.decision, record.profile_id, user_id);
        Ok(())
    }
}
