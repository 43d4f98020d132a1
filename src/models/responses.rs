use serde::{Deserialize, Serialize};
use crate::models::domain::{BadgeOpacities, CardTransform, Decision, TransitionPhase};

/// Position of a rendered card in the two-card stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardRole {
    Top,
    Next,
}

/// Render state of a single card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    #[serde(rename = "profileId")]
    pub profile_id: String,
    pub name: String,
    pub age: u32,
    pub bio: Option<String>,
    pub photo: String,
    #[serde(rename = "photoIndex")]
    pub photo_index: usize,
    #[serde(rename = "photoCount")]
    pub photo_count: usize,
    pub role: CardRole,
    pub interactive: bool,
    #[serde(rename = "zIndex")]
    pub z_index: u8,
    pub scale: f64,
    pub opacity: f64,
    pub transform: CardTransform,
    pub badges: BadgeOpacities,
}

/// Transient decision notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastView {
    #[serde(rename = "profileName")]
    pub profile_name: String,
    pub decision: Decision,
    pub message: String,
}

/// Everything a view layer needs to draw the deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckView {
    pub top: Option<CardView>,
    pub next: Option<CardView>,
    pub empty: bool,
    #[serde(rename = "controlsEnabled")]
    pub controls_enabled: bool,
    pub phase: TransitionPhase,
    pub toast: Option<ToastView>,
    pub remaining: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
