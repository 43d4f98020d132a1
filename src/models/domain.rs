use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Candidate profile shown on a deck card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub age: u32,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            bio: None,
            photos: Vec::new(),
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_photos<I, S>(mut self, photos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos = photos.into_iter().map(Into::into).collect();
        self
    }

    /// Bio text worth rendering, `None` when absent or blank
    pub fn display_bio(&self) -> Option<&str> {
        self.bio
            .as_deref()
            .map(str::trim)
            .filter(|bio| !bio.is_empty())
    }

    /// Number of photo slots; an empty photo list still renders one placeholder
    pub fn photo_count(&self) -> usize {
        self.photos.len().max(1)
    }
}

/// Outcome of a committed swipe or button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Like,
    Nope,
    SuperLike,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Like => "LIKE",
            Decision::Nope => "NOPE",
            Decision::SuperLike => "SUPER LIKE",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decision handed to the decision sink once its card has been committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub decision: Decision,
    #[serde(rename = "decidedAt")]
    pub decided_at: chrono::DateTime<chrono::Utc>,
}

/// Half of the top card that received a photo tap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TapSide {
    Left,
    Right,
}

impl TapSide {
    /// Pick the side from a position relative to the card's left edge
    pub fn from_position(card_x: f64, card_width: f64) -> Self {
        if card_x < card_width / 2.0 {
            TapSide::Left
        } else {
            TapSide::Right
        }
    }
}

/// Animation phase of the top card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPhase {
    #[default]
    Idle,
    Dragging,
    ReleasingToReset,
    ReleasingToCommit,
}

/// Pointer displacement since the drag started
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragOffset {
    pub dx: f64,
    pub dy: f64,
}

impl DragOffset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn distance(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Visual transform applied to a card
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTransform {
    #[serde(rename = "translateX")]
    pub translate_x: f64,
    #[serde(rename = "translateY")]
    pub translate_y: f64,
    #[serde(rename = "rotateDeg")]
    pub rotate_deg: f64,
    /// Whether the view should ease into this transform
    pub animated: bool,
}

impl CardTransform {
    pub fn neutral() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotate_deg: 0.0,
            animated: true,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.translate_x == 0.0 && self.translate_y == 0.0 && self.rotate_deg == 0.0
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Opacities of the LIKE / NOPE / SUPER LIKE stamps on the top card
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BadgeOpacities {
    pub like: f64,
    pub nope: f64,
    #[serde(rename = "superLike")]
    pub super_like: f64,
}

impl BadgeOpacities {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Only the badge of the given decision, fully opaque
    pub fn solo(decision: Decision) -> Self {
        let mut badges = Self::hidden();
        match decision {
            Decision::Like => badges.like = 1.0,
            Decision::Nope => badges.nope = 1.0,
            Decision::SuperLike => badges.super_like = 1.0,
        }
        badges
    }

    pub fn is_hidden(&self) -> bool {
        self.like == 0.0 && self.nope == 0.0 && self.super_like == 0.0
    }
}

/// Gesture thresholds, animation timings and card geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckTuning {
    /// Offset in px a drag must pass to produce a decision
    pub decision_threshold: f64,
    /// Horizontal px per degree of card tilt
    pub rotation_divisor: f64,
    pub badge_dead_zone: f64,
    pub badge_travel: f64,
    /// Maximum pointer travel in px still treated as a tap
    pub tap_slop: f64,
    pub exit_duration_ms: u64,
    pub reset_duration_ms: u64,
    pub toast_duration_ms: u64,
    pub fly_out_x: f64,
    pub fly_out_y: f64,
    pub fly_out_rotation: f64,
    pub next_card_scale: f64,
    pub placeholder_photo: String,
}

impl DeckTuning {
    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    pub fn reset_duration(&self) -> Duration {
        Duration::from_millis(self.reset_duration_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl Default for DeckTuning {
    fn default() -> Self {
        Self {
            decision_threshold: 120.0,
            rotation_divisor: 18.0,
            badge_dead_zone: 20.0,
            badge_travel: 100.0,
            tap_slop: 8.0,
            exit_duration_ms: 300,
            reset_duration_ms: 200,
            toast_duration_ms: 1500,
            fly_out_x: 1000.0,
            fly_out_y: 1000.0,
            fly_out_rotation: 30.0,
            next_card_scale: 0.95,
            placeholder_photo: "/static/placeholder.png".to_string(),
        }
    }
}
