// Deck engine exports
pub mod deck;
pub mod engine;
pub mod gesture;
pub mod timeline;

pub use deck::DeckQueue;
pub use engine::{DeckEngine, GestureOutcome};
pub use gesture::{badge_opacities, decide, drag_transform, exit_transform};
pub use timeline::{ScheduledTask, Task, TaskHandle, Timeline};
