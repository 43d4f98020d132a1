// Service exports
pub mod matching;
pub mod registry;
pub mod session;

pub use matching::{MatchingClient, MatchingError};
pub use registry::DeckRegistry;
pub use session::DeckSession;

use crate::models::{DecisionRecord, Profile};
use async_trait::async_trait;
use std::path::Path;
use validator::Validate;

/// Supplies ordered candidate profiles for a viewing user
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch up to `limit` candidates, skipping the ids in `exclude`
    async fn fetch(
        &self,
        user_id: &str,
        limit: usize,
        exclude: &[String],
    ) -> Result<Vec<Profile>, MatchingError>;
}

/// Receives committed decisions; the deck never waits on the outcome
#[async_trait]
pub trait DecisionSink: Send + Sync {
    async fn report(&self, user_id: &str, record: &DecisionRecord) -> Result<(), MatchingError>;
}

/// Sink used when no matching service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

#[async_trait]
impl DecisionSink for NoopSink {
    async fn report(&self, user_id: &str, record: &DecisionRecord) -> Result<(), MatchingError> {
        tracing::debug!(
            "Dropping decision {} on {} for {} (no sink configured)",
            record.decision,
            record.profile_id,
            user_id
        );
        Ok(())
    }
}

/// Fixed candidate list, every user sees the same profiles
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    profiles: Vec<Profile>,
}

impl StaticSource {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Load a JSON array of profiles, invalid entries are dropped
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MatchingError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)?;

        let valid: Vec<Profile> = profiles
            .into_iter()
            .filter(|p| match p.validate() {
                Ok(()) => true,
                Err(errors) => {
                    tracing::warn!("Skipping invalid seed profile {:?}: {}", p.id, errors);
                    false
                }
            })
            .collect();

        Ok(Self::new(valid))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    async fn fetch(
        &self,
        _user_id: &str,
        limit: usize,
        exclude: &[String],
    ) -> Result<Vec<Profile>, MatchingError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| !exclude.contains(&p.id))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_respects_exclude_and_limit() {
        let source = StaticSource::new(vec![
            Profile::new("a", "A", 21),
            Profile::new("b", "B", 22),
            Profile::new("c", "C", 23),
        ]);

        let fetched = source.fetch("viewer", 1, &["a".to_string()]).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "b");
    }
}
