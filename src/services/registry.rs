use crate::models::DeckTuning;
use crate::services::{DecisionSink, DeckSession, ProfileSource};
use std::sync::Arc;
use std::time::Duration;

/// Deck sessions keyed by viewing user
///
/// Sessions are created and seeded on first access and dropped after
/// `idle_ttl` without any access.
pub struct DeckRegistry {
    sessions: moka::future::Cache<String, DeckSession>,
    tuning: DeckTuning,
    batch_size: usize,
    source: Arc<dyn ProfileSource>,
    sink: Arc<dyn DecisionSink>,
}

impl DeckRegistry {
    pub fn new(
        tuning: DeckTuning,
        batch_size: usize,
        max_sessions: u64,
        idle_ttl: Duration,
        source: Arc<dyn ProfileSource>,
        sink: Arc<dyn DecisionSink>,
    ) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(idle_ttl)
            .build();

        Self {
            sessions,
            tuning,
            batch_size,
            source,
            sink,
        }
    }

    /// Get the user's deck, seeding a new one from the profile source if needed
    pub async fn get_or_create(&self, user_id: &str) -> DeckSession {
        self.sessions
            .get_with(user_id.to_string(), async {
                let session = DeckSession::new(
                    user_id,
                    self.tuning.clone(),
                    self.batch_size,
                    Arc::clone(&self.source),
                    Arc::clone(&self.sink),
                );
                session.seed().await;
                session
            })
            .await
    }

    pub async fn remove(&self, user_id: &str) {
        self.sessions.invalidate(user_id).await;
    }

    pub fn session_count(&self) -> u64 {
        self.sessions.entry_count()
    }
}
