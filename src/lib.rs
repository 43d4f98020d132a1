//! Lume Deck - swipe deck engine and session service for Lume dating app
//!
//! The core is a pure state machine over a queue of candidate profiles that
//! turns pointer drags into LIKE / NOPE / SUPER LIKE decisions. Sessions bind
//! it to timers, a profile source and a decision sink, and the routes expose
//! it to a view layer over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DeckEngine, GestureOutcome, decide};
pub use models::{Decision, DeckTuning, DeckView, PointerInput, Profile, TapSide, TransitionPhase};
pub use services::{DeckRegistry, DeckSession, DecisionSink, ProfileSource};
