use crate::core::deck::DeckQueue;
use crate::core::gesture;
use crate::core::timeline::{ScheduledTask, Task, TaskHandle, Timeline};
use crate::models::{
    BadgeOpacities, CardRole, CardTransform, CardView, Decision, DecisionRecord, DeckTuning,
    DeckView, DragOffset, PointerInput, Profile, TapSide, ToastView, TransitionPhase,
};

/// What a pointer event did to the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Ignored,
    Captured,
    Moved,
    Tapped(TapSide),
    Released(Option<Decision>),
    Cancelled,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    pointer_id: i64,
    start_x: f64,
    start_y: f64,
    offset: DragOffset,
    max_travel: f64,
}

/// Ephemeral visual state of the top card
#[derive(Debug, Clone, Default)]
struct CardState {
    profile_id: Option<String>,
    photo_index: usize,
    phase: TransitionPhase,
    drag: Option<DragState>,
    transform: CardTransform,
    badges: BadgeOpacities,
    /// Settle or commit task waiting on the current release animation
    pending: Option<TaskHandle>,
}

impl CardState {
    fn for_profile(profile_id: Option<String>) -> Self {
        Self {
            profile_id,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveToast {
    profile_name: String,
    decision: Decision,
    hide: TaskHandle,
}

impl ActiveToast {
    fn view(&self) -> ToastView {
        ToastView {
            profile_name: self.profile_name.clone(),
            decision: self.decision,
            message: format!("{} {}", self.decision.label(), self.profile_name),
        }
    }
}

/// Swipe deck state machine
///
/// The engine performs no I/O and never sleeps. Delayed work (commit after the
/// exit animation, settle after the reset animation, toast hiding) is recorded
/// on an internal [`Timeline`]; a driver drains [`DeckEngine::take_scheduled`],
/// waits the requested delay and calls [`DeckEngine::run_task`].
#[derive(Debug)]
pub struct DeckEngine {
    tuning: DeckTuning,
    queue: DeckQueue,
    card: CardState,
    timeline: Timeline,
    toast: Option<ActiveToast>,
    decisions: Vec<DecisionRecord>,
}

impl DeckEngine {
    pub fn new(tuning: DeckTuning) -> Self {
        Self {
            tuning,
            queue: DeckQueue::default(),
            card: CardState::default(),
            timeline: Timeline::new(),
            toast: None,
            decisions: Vec::new(),
        }
    }

    pub fn with_default_tuning() -> Self {
        Self::new(DeckTuning::default())
    }

    /// Seed the deck, an empty list renders the empty state
    pub fn initialize(&mut self, profiles: Vec<Profile>) {
        self.replace_queue(profiles);
        tracing::debug!("Deck initialized with {} profiles", self.queue.len());
    }

    /// Put new candidates ahead of the queued ones
    ///
    /// While the top card is being dragged or animated out, the new profiles
    /// go behind it instead of replacing it mid-gesture.
    pub fn load_more(&mut self, profiles: Vec<Profile>) -> usize {
        let engaged = self.card.phase != TransitionPhase::Idle;
        let offered = profiles.len();
        let added = self.queue.prepend(profiles, engaged);
        self.sync_top();

        if added < offered {
            tracing::debug!("Skipped {} already queued profiles", offered - added);
        }
        tracing::debug!("Loaded {} more profiles, deck size {}", added, self.queue.len());
        added
    }

    /// Replace the queue wholesale, discarding any in-flight gesture
    pub fn reset(&mut self, profiles: Vec<Profile>) {
        self.replace_queue(profiles);
        tracing::debug!("Deck reset with {} profiles", self.queue.len());
    }

    pub fn render(&self) -> DeckView {
        DeckView {
            top: self.queue.top().map(|p| self.card_view(p, CardRole::Top)),
            next: self.queue.next().map(|p| self.card_view(p, CardRole::Next)),
            empty: self.queue.is_empty(),
            controls_enabled: self.controls_enabled(),
            phase: self.card.phase,
            toast: self.toast(),
            remaining: self.queue.len(),
        }
    }

    /// Step through the top card's photos, clamped at both ends
    ///
    /// Accepted while idle or springing back; the card is already neutral
    /// during spring-back and the pending settle is left alone.
    pub fn tap_photo(&mut self, side: TapSide) -> bool {
        let Some(top) = self.queue.top() else {
            return false;
        };
        match self.card.phase {
            TransitionPhase::Idle | TransitionPhase::ReleasingToReset => {}
            TransitionPhase::Dragging | TransitionPhase::ReleasingToCommit => return false,
        }

        let last = top.photo_count() - 1;
        let index = match side {
            TapSide::Left => self.card.photo_index.saturating_sub(1),
            TapSide::Right => (self.card.photo_index + 1).min(last),
        };

        if index == self.card.photo_index {
            return false;
        }
        self.card.photo_index = index;
        true
    }

    pub fn begin_drag(&mut self, pointer_id: i64, start_x: f64, start_y: f64) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        match self.card.phase {
            TransitionPhase::Idle => {}
            // Grabbing the card again while it springs back
            TransitionPhase::ReleasingToReset => self.cancel_pending(),
            TransitionPhase::Dragging | TransitionPhase::ReleasingToCommit => return false,
        }

        let offset = DragOffset::default();
        self.card.phase = TransitionPhase::Dragging;
        self.card.drag = Some(DragState {
            pointer_id,
            start_x,
            start_y,
            offset,
            max_travel: 0.0,
        });
        self.card.transform = gesture::drag_transform(offset, &self.tuning);
        self.card.badges = BadgeOpacities::hidden();
        true
    }

    pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
        if self.card.phase != TransitionPhase::Dragging {
            return false;
        }
        let Some(drag) = self.card.drag.as_mut() else {
            return false;
        };

        drag.offset = DragOffset::new(x - drag.start_x, y - drag.start_y);
        drag.max_travel = drag.max_travel.max(drag.offset.distance());
        let offset = drag.offset;

        self.card.transform = gesture::drag_transform(offset, &self.tuning);
        self.card.badges = gesture::badge_opacities(offset, &self.tuning);
        tracing::trace!("Drag offset ({:.1}, {:.1})", offset.dx, offset.dy);
        true
    }

    /// Release the drag, committing if the offset is past a threshold
    pub fn end_drag(&mut self) -> Option<Decision> {
        if self.card.phase != TransitionPhase::Dragging {
            return None;
        }
        let drag = self.card.drag.take()?;
        let Some(top) = self.queue.top() else {
            self.release_to_reset();
            return None;
        };

        match gesture::decide(drag.offset, self.tuning.decision_threshold) {
            Some(decision) => {
                let profile_id = top.id.clone();
                let name = top.name.clone();

                self.card.phase = TransitionPhase::ReleasingToCommit;
                self.card.transform = gesture::exit_transform(decision, drag.offset, &self.tuning);
                self.card.badges = BadgeOpacities::solo(decision);
                self.show_toast(name, decision);
                self.card.pending = Some(self.timeline.schedule(
                    Task::Commit { profile_id, decision },
                    self.tuning.exit_duration(),
                ));
                Some(decision)
            }
            None => {
                self.release_to_reset();
                None
            }
        }
    }

    /// Lost pointer capture, always springs back
    pub fn cancel_drag(&mut self) -> bool {
        if self.card.phase != TransitionPhase::Dragging {
            return false;
        }
        self.release_to_reset();
        true
    }

    /// Button path, commits immediately without an exit animation
    pub fn decide_explicit(&mut self, decision: Decision) -> bool {
        let Some((profile_id, name)) = self.queue.top().map(|p| (p.id.clone(), p.name.clone()))
        else {
            return false;
        };
        match self.card.phase {
            TransitionPhase::Idle => {}
            TransitionPhase::ReleasingToReset => self.cancel_pending(),
            TransitionPhase::Dragging | TransitionPhase::ReleasingToCommit => return false,
        }

        self.show_toast(name, decision);
        self.commit(&profile_id, decision)
    }

    /// Feed a raw pointer event through tap/drag discrimination
    pub fn pointer(&mut self, input: PointerInput) -> GestureOutcome {
        match input {
            PointerInput::Down { pointer_id, x, y } => {
                if self.begin_drag(pointer_id, x, y) {
                    GestureOutcome::Captured
                } else {
                    GestureOutcome::Ignored
                }
            }
            PointerInput::Move { pointer_id, x, y } => {
                if self.owns_pointer(pointer_id) && self.update_drag(x, y) {
                    GestureOutcome::Moved
                } else {
                    GestureOutcome::Ignored
                }
            }
            PointerInput::Up { pointer_id, x, y, card_x, card_width } => {
                if !self.owns_pointer(pointer_id) {
                    return GestureOutcome::Ignored;
                }
                self.update_drag(x, y);

                let travel = self.card.drag.map(|d| d.max_travel).unwrap_or(0.0);
                if travel <= self.tuning.tap_slop {
                    self.discard_drag();
                    let side = TapSide::from_position(card_x, card_width);
                    self.tap_photo(side);
                    GestureOutcome::Tapped(side)
                } else {
                    GestureOutcome::Released(self.end_drag())
                }
            }
            PointerInput::Cancel { pointer_id } => {
                if self.owns_pointer(pointer_id) && self.cancel_drag() {
                    GestureOutcome::Cancelled
                } else {
                    GestureOutcome::Ignored
                }
            }
        }
    }

    /// Run a task whose delay has elapsed; stale or cancelled handles are no-ops
    pub fn run_task(&mut self, handle: TaskHandle) -> bool {
        let Some(task) = self.timeline.take(handle) else {
            tracing::trace!("Ignoring stale task {:?}", handle);
            return false;
        };

        match task {
            Task::Commit { profile_id, decision } => {
                if self.card.pending == Some(handle) {
                    self.card.pending = None;
                }
                self.commit(&profile_id, decision)
            }
            Task::Settle => {
                if self.card.pending == Some(handle) {
                    self.card.pending = None;
                    if self.card.phase == TransitionPhase::ReleasingToReset {
                        self.card.phase = TransitionPhase::Idle;
                    }
                }
                true
            }
            Task::HideToast => {
                if self.toast.as_ref().map(|t| t.hide) == Some(handle) {
                    self.toast = None;
                }
                true
            }
        }
    }

    pub fn take_scheduled(&mut self) -> Vec<ScheduledTask> {
        self.timeline.take_scheduled()
    }

    pub fn take_cancelled(&mut self) -> Vec<TaskHandle> {
        self.timeline.take_cancelled()
    }

    pub fn take_decisions(&mut self) -> Vec<DecisionRecord> {
        std::mem::take(&mut self.decisions)
    }

    pub fn pending_tasks(&self) -> Vec<TaskHandle> {
        self.timeline.pending_handles()
    }

    pub fn top_profile(&self) -> Option<&Profile> {
        self.queue.top()
    }

    pub fn next_profile(&self) -> Option<&Profile> {
        self.queue.next()
    }

    pub fn queue_ids(&self) -> Vec<String> {
        self.queue.ids()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn photo_index(&self) -> usize {
        self.card.photo_index
    }

    pub fn phase(&self) -> TransitionPhase {
        self.card.phase
    }

    pub fn drag_offset(&self) -> DragOffset {
        self.card.drag.map(|d| d.offset).unwrap_or_default()
    }

    pub fn transform(&self) -> CardTransform {
        self.card.transform
    }

    pub fn badges(&self) -> BadgeOpacities {
        self.card.badges
    }

    /// Decision buttons accept input only when `decide_explicit` would
    pub fn controls_enabled(&self) -> bool {
        !self.queue.is_empty()
            && matches!(
                self.card.phase,
                TransitionPhase::Idle | TransitionPhase::ReleasingToReset
            )
    }

    pub fn toast(&self) -> Option<ToastView> {
        self.toast.as_ref().map(ActiveToast::view)
    }

    pub fn tuning(&self) -> &DeckTuning {
        &self.tuning
    }

    fn replace_queue(&mut self, profiles: Vec<Profile>) {
        self.cancel_pending();
        self.card = CardState::default();
        self.queue.replace(profiles);
        self.sync_top();
    }

    fn commit(&mut self, profile_id: &str, decision: Decision) -> bool {
        let Some(profile) = self.queue.pop_front_if(profile_id) else {
            tracing::warn!("Commit for {} no longer matches the top card, skipping", profile_id);
            return false;
        };

        self.decisions.push(DecisionRecord {
            profile_id: profile.id,
            decision,
            decided_at: chrono::Utc::now(),
        });
        self.cancel_pending();
        self.card = CardState::default();
        self.sync_top();

        tracing::debug!("Committed {} for {}, {} left", decision, profile_id, self.queue.len());
        true
    }

    /// Fresh card state whenever a different profile becomes top
    fn sync_top(&mut self) {
        let top_id = self.queue.top().map(|p| p.id.clone());
        if self.card.profile_id != top_id {
            self.cancel_pending();
            self.card = CardState::for_profile(top_id);
        }
    }

    fn release_to_reset(&mut self) {
        self.card.drag = None;
        self.card.phase = TransitionPhase::ReleasingToReset;
        self.card.transform = CardTransform::neutral();
        self.card.badges = BadgeOpacities::hidden();
        self.card.pending = Some(
            self.timeline
                .schedule(Task::Settle, self.tuning.reset_duration()),
        );
    }

    /// Drop a drag that never moved, no spring-back needed
    fn discard_drag(&mut self) {
        self.card.drag = None;
        self.card.phase = TransitionPhase::Idle;
        self.card.transform = CardTransform::neutral();
        self.card.badges = BadgeOpacities::hidden();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.card.pending.take() {
            self.timeline.cancel(handle);
        }
    }

    fn owns_pointer(&self, pointer_id: i64) -> bool {
        self.card.phase == TransitionPhase::Dragging
            && self.card.drag.map(|d| d.pointer_id) == Some(pointer_id)
    }

    fn show_toast(&mut self, profile_name: String, decision: Decision) {
        if let Some(previous) = self.toast.take() {
            self.timeline.cancel(previous.hide);
        }
        let hide = self
            .timeline
            .schedule(Task::HideToast, self.tuning.toast_duration());
        self.toast = Some(ActiveToast {
            profile_name,
            decision,
            hide,
        });
    }

    fn card_view(&self, profile: &Profile, role: CardRole) -> CardView {
        let (photo_index, transform, badges, interactive, z_index, scale) = match role {
            CardRole::Top => (
                self.card.photo_index,
                self.card.transform,
                self.card.badges,
                self.card.phase != TransitionPhase::ReleasingToCommit,
                2,
                1.0,
            ),
            CardRole::Next => (
                0,
                CardTransform::neutral(),
                BadgeOpacities::hidden(),
                false,
                1,
                self.tuning.next_card_scale,
            ),
        };

        let photo = profile
            .photos
            .get(photo_index)
            .cloned()
            .unwrap_or_else(|| self.tuning.placeholder_photo.clone());

        CardView {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            age: profile.age,
            bio: profile.display_bio().map(str::to_string),
            photo,
            photo_index,
            photo_count: profile.photo_count(),
            role,
            interactive,
            z_index,
            scale,
            opacity: 1.0,
            transform,
            badges,
        }
    }
}

impl Default for DeckEngine {
    fn default() -> Self {
        Self::with_default_tuning()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, photos: usize) -> Profile {
        Profile::new(id, format!("User {}", id), 25)
            .with_photos((0..photos).map(|i| format!("{}-{}.jpg", id, i)))
    }

    fn engine_with(ids: &[&str]) -> DeckEngine {
        let mut engine = DeckEngine::with_default_tuning();
        engine.initialize(ids.iter().map(|id| profile(id, 3)).collect());
        engine
    }

    fn drag(engine: &mut DeckEngine, dx: f64, dy: f64) -> Option<Decision> {
        assert!(engine.begin_drag(1, 100.0, 100.0));
        assert!(engine.update_drag(100.0 + dx, 100.0 + dy));
        engine.end_drag()
    }

    fn commit_handle(engine: &mut DeckEngine) -> Option<TaskHandle> {
        engine.take_scheduled();
        engine.card.pending
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut engine = engine_with(&["A"]);

        assert!(engine.begin_drag(1, 0.0, 0.0));
        assert!(engine.update_drag(40.0, 0.0));
        assert!(!engine.begin_drag(2, 500.0, 500.0));
        assert_eq!(engine.drag_offset(), DragOffset::new(40.0, 0.0));
    }

    #[test]
    fn test_drag_disables_transition() {
        let mut engine = engine_with(&["A"]);
        engine.begin_drag(1, 0.0, 0.0);
        engine.update_drag(36.0, 10.0);

        let transform = engine.transform();
        assert!(!transform.animated);
        assert!((transform.rotate_deg - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_after_up_is_ignored() {
        let mut engine = engine_with(&["A"]);
        drag(&mut engine, 10.0, 0.0);

        assert!(!engine.update_drag(400.0, 0.0));
        assert!(engine.end_drag().is_none());
        assert!(engine.transform().is_neutral());
    }

    #[test]
    fn test_commit_waits_for_exit_animation() {
        let mut engine = engine_with(&["A", "B"]);
        assert_eq!(drag(&mut engine, 200.0, 0.0), Some(Decision::Like));

        assert_eq!(engine.phase(), TransitionPhase::ReleasingToCommit);
        assert_eq!(engine.len(), 2);
        assert!(!engine.controls_enabled());

        let handle = commit_handle(&mut engine).unwrap();
        assert!(engine.run_task(handle));
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.top_profile().unwrap().id, "B");
        assert_eq!(engine.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_buttons_ignored_while_commit_pending() {
        let mut engine = engine_with(&["A", "B", "C"]);
        drag(&mut engine, -200.0, 0.0);

        assert!(!engine.decide_explicit(Decision::Like));
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_button_during_spring_back_cancels_settle() {
        let mut engine = engine_with(&["A", "B"]);
        drag(&mut engine, 30.0, 0.0);
        let settle = commit_handle(&mut engine).unwrap();

        assert!(engine.decide_explicit(Decision::Nope));
        assert_eq!(engine.top_profile().unwrap().id, "B");
        assert!(!engine.run_task(settle));
        assert_eq!(engine.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_settle_returns_to_idle() {
        let mut engine = engine_with(&["A"]);
        drag(&mut engine, 30.0, 0.0);
        assert_eq!(engine.phase(), TransitionPhase::ReleasingToReset);

        let settle = commit_handle(&mut engine).unwrap();
        assert!(engine.run_task(settle));
        assert_eq!(engine.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn test_regrab_during_spring_back() {
        let mut engine = engine_with(&["A"]);
        drag(&mut engine, 30.0, 0.0);
        let settle = commit_handle(&mut engine).unwrap();

        assert!(engine.begin_drag(4, 0.0, 0.0));
        assert_eq!(engine.phase(), TransitionPhase::Dragging);
        assert!(!engine.run_task(settle));
        assert_eq!(engine.phase(), TransitionPhase::Dragging);
    }

    #[test]
    fn test_pointer_from_other_id_is_ignored() {
        let mut engine = engine_with(&["A"]);
        engine.pointer(PointerInput::Down { pointer_id: 1, x: 0.0, y: 0.0 });

        let outcome = engine.pointer(PointerInput::Move { pointer_id: 2, x: 300.0, y: 0.0 });
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(
            engine.pointer(PointerInput::Cancel { pointer_id: 2 }),
            GestureOutcome::Ignored
        );
        assert_eq!(engine.phase(), TransitionPhase::Dragging);
    }

    #[test]
    fn test_tap_ignored_while_dragging_or_departing() {
        let mut engine = engine_with(&["A"]);
        engine.begin_drag(1, 0.0, 0.0);

        assert!(!engine.tap_photo(TapSide::Right));
        assert_eq!(engine.photo_index(), 0);

        engine.update_drag(200.0, 0.0);
        assert_eq!(engine.end_drag(), Some(Decision::Like));
        assert!(!engine.tap_photo(TapSide::Right));
        assert_eq!(engine.photo_index(), 0);
    }

    #[test]
    fn test_tap_during_spring_back() {
        let mut engine = engine_with(&["A"]);
        drag(&mut engine, 30.0, 0.0);
        let settle = commit_handle(&mut engine).unwrap();

        assert!(engine.tap_photo(TapSide::Right));
        assert_eq!(engine.photo_index(), 1);
        assert_eq!(engine.phase(), TransitionPhase::ReleasingToReset);

        assert!(engine.run_task(settle));
        assert_eq!(engine.phase(), TransitionPhase::Idle);
        assert_eq!(engine.photo_index(), 1);
    }

    #[test]
    fn test_load_more_while_dragging_keeps_top() {
        let mut engine = engine_with(&["A", "B"]);
        engine.begin_drag(1, 0.0, 0.0);
        engine.update_drag(50.0, 0.0);

        engine.load_more(vec![profile("C", 1)]);
        assert_eq!(engine.queue_ids(), vec!["A", "C", "B"]);
        assert_eq!(engine.phase(), TransitionPhase::Dragging);
    }

    #[test]
    fn test_load_more_when_idle_resets_photo_index() {
        let mut engine = engine_with(&["A"]);
        engine.tap_photo(TapSide::Right);
        assert_eq!(engine.photo_index(), 1);

        engine.load_more(vec![profile("C", 2)]);
        assert_eq!(engine.top_profile().unwrap().id, "C");
        assert_eq!(engine.photo_index(), 0);
    }

    #[test]
    fn test_empty_photos_render_placeholder() {
        let mut engine = DeckEngine::with_default_tuning();
        engine.initialize(vec![Profile::new("A", "Ana", 30)]);

        let view = engine.render();
        let top = view.top.unwrap();
        assert_eq!(top.photo, engine.tuning().placeholder_photo);
        assert_eq!(top.photo_count, 1);
        assert!(!engine.tap_photo(TapSide::Right));
    }

    #[test]
    fn test_render_stack_order() {
        let engine = engine_with(&["A", "B", "C"]);
        let view = engine.render();

        let top = view.top.unwrap();
        let next = view.next.unwrap();
        assert_eq!(top.profile_id, "A");
        assert_eq!(next.profile_id, "B");
        assert!(top.z_index > next.z_index);
        assert!(top.interactive && !next.interactive);
        assert!(next.scale < top.scale);
        assert_eq!(view.remaining, 3);
    }

    #[test]
    fn test_committed_decision_reaches_outbox() {
        let mut engine = engine_with(&["A", "B"]);
        engine.decide_explicit(Decision::SuperLike);

        let decisions = engine.take_decisions();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].profile_id, "A");
        assert_eq!(decisions[0].decision, Decision::SuperLike);
        assert!(engine.take_decisions().is_empty());
    }
}
