use serde::{Deserialize, Serialize};
use crate::models::domain::{Decision, TapSide};

/// Raw pointer event on the top card's hit region
///
/// Coordinates are in view space. `cardX` on `up` is the release position
/// relative to the card's left edge and decides which half a tap landed on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PointerInput {
    Down { pointer_id: i64, x: f64, y: f64 },
    Move { pointer_id: i64, x: f64, y: f64 },
    Up { pointer_id: i64, x: f64, y: f64, card_x: f64, card_width: f64 },
    Cancel { pointer_id: i64 },
}

/// Photo navigation click
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapRequest {
    pub side: TapSide,
}

/// NOPE / LIKE / SUPER LIKE button press
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideRequest {
    pub decision: Decision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_input_wire_format() {
        let up: PointerInput = serde_json::from_str(
            r#"{"type":"up","pointerId":3,"x":40.0,"y":12.5,"cardX":20.0,"cardWidth":320.0}"#,
        )
        .unwrap();

        assert_eq!(
            up,
            PointerInput::Up { pointer_id: 3, x: 40.0, y: 12.5, card_x: 20.0, card_width: 320.0 }
        );
    }

    #[test]
    fn test_decide_request() {
        let req: DecideRequest = serde_json::from_str(r#"{"decision":"nope"}"#).unwrap();
        assert_eq!(req.decision, Decision::Nope);
    }
}
