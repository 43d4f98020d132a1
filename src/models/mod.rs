// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BadgeOpacities, CardTransform, Decision, DecisionRecord, DeckTuning, DragOffset, Profile,
    TapSide, TransitionPhase,
};
pub use requests::{DecideRequest, PointerInput, TapRequest};
pub use responses::{CardRole, CardView, DeckView, ErrorResponse, HealthResponse, ToastView};
