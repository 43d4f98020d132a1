use crate::core::{DeckEngine, GestureOutcome, TaskHandle};
use crate::models::{Decision, DecisionRecord, DeckTuning, DeckView, PointerInput, Profile, TapSide};
use crate::services::{DecisionSink, MatchingError, ProfileSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

struct SessionInner {
    id: Uuid,
    user_id: String,
    batch_size: usize,
    engine: Mutex<DeckEngine>,
    timers: Mutex<HashMap<TaskHandle, JoinHandle<()>>>,
    reports: UnboundedSender<DecisionRecord>,
    /// Taken by the reporter task on the first committed decision
    pending_reports: Mutex<Option<UnboundedReceiver<DecisionRecord>>>,
    source: Arc<dyn ProfileSource>,
    sink: Arc<dyn DecisionSink>,
}

/// One user's deck bound to real timers and its collaborators
///
/// Every input locks the engine, applies the operation, then starts timers for
/// newly scheduled tasks, aborts cancelled ones and queues committed
/// decisions for the sink. A single reporter task delivers them in commit
/// order. No lock is held across an await.
#[derive(Clone)]
pub struct DeckSession {
    inner: Arc<SessionInner>,
}

impl DeckSession {
    pub fn new(
        user_id: impl Into<String>,
        tuning: DeckTuning,
        batch_size: usize,
        source: Arc<dyn ProfileSource>,
        sink: Arc<dyn DecisionSink>,
    ) -> Self {
        let (reports, pending_reports) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                user_id: user_id.into(),
                batch_size,
                engine: Mutex::new(DeckEngine::new(tuning)),
                timers: Mutex::new(HashMap::new()),
                reports,
                pending_reports: Mutex::new(Some(pending_reports)),
                source,
                sink,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn user_id(&self) -> &str {
        &self.inner.user_id
    }

    /// Seed from the profile source, falling back to an empty deck
    pub async fn seed(&self) {
        let profiles = match self.fetch(&[]).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("Failed to seed deck for {}, starting empty: {}", self.user_id(), e);
                Vec::new()
            }
        };

        let count = profiles.len();
        self.with_engine(|engine| engine.initialize(profiles));
        tracing::info!("Deck {} seeded for {} with {} profiles", self.id(), self.user_id(), count);
    }

    /// Replace the deck with a fresh source snapshot
    pub async fn reload(&self) -> Result<DeckView, MatchingError> {
        let profiles = self.fetch(&[]).await?;
        Ok(self.with_engine(|engine| {
            engine.reset(profiles);
            engine.render()
        }))
    }

    /// Fetch candidates not already queued and put them in front
    pub async fn load_more(&self) -> Result<DeckView, MatchingError> {
        let queued = self.with_engine(|engine| engine.queue_ids());
        let profiles = self.fetch(&queued).await?;
        Ok(self.with_engine(|engine| {
            engine.load_more(profiles);
            engine.render()
        }))
    }

    pub fn pointer(&self, input: PointerInput) -> DeckView {
        self.with_engine(|engine| {
            match engine.pointer(input) {
                GestureOutcome::Released(Some(decision)) => {
                    tracing::debug!("Swipe resolved to {} for {}", decision, self.user_id());
                }
                GestureOutcome::Ignored => {
                    tracing::trace!("Ignored pointer event {:?}", input);
                }
                _ => {}
            }
            engine.render()
        })
    }

    pub fn tap_photo(&self, side: TapSide) -> DeckView {
        self.with_engine(|engine| {
            engine.tap_photo(side);
            engine.render()
        })
    }

    pub fn decide(&self, decision: Decision) -> DeckView {
        self.with_engine(|engine| {
            if !engine.decide_explicit(decision) {
                tracing::debug!("Ignored {} button for {}", decision, self.user_id());
            }
            engine.render()
        })
    }

    pub fn view(&self) -> DeckView {
        self.with_engine(|engine| engine.render())
    }

    /// Number of timers currently armed
    pub fn armed_timers(&self) -> usize {
        self.timers().len()
    }

    async fn fetch(&self, exclude: &[String]) -> Result<Vec<Profile>, MatchingError> {
        self.inner
            .source
            .fetch(self.user_id(), self.inner.batch_size, exclude)
            .await
    }

    fn engine(&self) -> MutexGuard<'_, DeckEngine> {
        self.inner.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<TaskHandle, JoinHandle<()>>> {
        self.inner.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_engine<R>(&self, f: impl FnOnce(&mut DeckEngine) -> R) -> R {
        let (result, scheduled, cancelled) = {
            let mut engine = self.engine();
            let result = f(&mut engine);

            // Queued under the engine lock so reports follow commit order
            let decisions = engine.take_decisions();
            if !decisions.is_empty() {
                self.start_reporter();
                for record in decisions {
                    if self.inner.reports.send(record).is_err() {
                        tracing::warn!("Decision reporter for {} is gone", self.user_id());
                    }
                }
            }

            (result, engine.take_scheduled(), engine.take_cancelled())
        };

        if !scheduled.is_empty() || !cancelled.is_empty() {
            let mut timers = self.timers();
            for handle in cancelled {
                if let Some(timer) = timers.remove(&handle) {
                    timer.abort();
                }
            }
            for task in scheduled {
                let session = self.clone();
                let timer = tokio::spawn(async move {
                    tokio::time::sleep(task.delay).await;
                    session.fire(task.handle);
                });
                timers.insert(task.handle, timer);
            }
        }

        result
    }

    fn start_reporter(&self) {
        let Some(mut reports) = self
            .inner
            .pending_reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };

        let sink = Arc::clone(&self.inner.sink);
        let user_id = self.inner.user_id.clone();
        tokio::spawn(async move {
            while let Some(record) = reports.recv().await {
                if let Err(e) = sink.report(&user_id, &record).await {
                    tracing::warn!(
                        "Failed to report {} on {} for {}: {}",
                        record.decision,
                        record.profile_id,
                        user_id,
                        e
                    );
                }
            }
        });
    }

    fn fire(&self, handle: TaskHandle) {
        self.timers().remove(&handle);
        self.with_engine(|engine| engine.run_task(handle));
    }
}
