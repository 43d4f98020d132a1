use crate::models::{BadgeOpacities, CardTransform, Decision, DeckTuning, DragOffset};

/// Resolve a released drag into a decision
///
/// Horizontal thresholds are checked before the vertical one, so a drag that
/// passes both resolves to LIKE or NOPE.
#[inline]
pub fn decide(offset: DragOffset, threshold: f64) -> Option<Decision> {
    if offset.dx > threshold {
        Some(Decision::Like)
    } else if offset.dx < -threshold {
        Some(Decision::Nope)
    } else if offset.dy < -threshold {
        Some(Decision::SuperLike)
    } else {
        None
    }
}

/// Transform that tracks the pointer while dragging
///
/// Tilt is the horizontal offset divided by the rotation divisor, in degrees.
#[inline]
pub fn drag_transform(offset: DragOffset, tuning: &DeckTuning) -> CardTransform {
    CardTransform {
        translate_x: offset.dx,
        translate_y: offset.dy,
        rotate_deg: offset.dx / tuning.rotation_divisor,
        animated: false,
    }
}

/// Badge opacities as continuous feedback for the current offset
#[inline]
pub fn badge_opacities(offset: DragOffset, tuning: &DeckTuning) -> BadgeOpacities {
    BadgeOpacities {
        like: ramp(offset.dx, tuning.badge_dead_zone, tuning.badge_travel),
        nope: ramp(-offset.dx, tuning.badge_dead_zone, tuning.badge_travel),
        super_like: ramp(-offset.dy, tuning.badge_dead_zone, tuning.badge_travel),
    }
}

/// Off-screen transform the card flies to once a decision is made
pub fn exit_transform(decision: Decision, offset: DragOffset, tuning: &DeckTuning) -> CardTransform {
    let (translate_x, translate_y, rotate_deg) = match decision {
        Decision::Like => (tuning.fly_out_x, offset.dy, tuning.fly_out_rotation),
        Decision::Nope => (-tuning.fly_out_x, offset.dy, -tuning.fly_out_rotation),
        Decision::SuperLike => (0.0, -tuning.fly_out_y, 0.0),
    };

    CardTransform {
        translate_x,
        translate_y,
        rotate_deg,
        animated: true,
    }
}

/// Linear 0..1 ramp starting after `dead_zone` and saturating `travel` later
#[inline]
fn ramp(value: f64, dead_zone: f64, travel: f64) -> f64 {
    if travel <= 0.0 {
        return if value > dead_zone { 1.0 } else { 0.0 };
    }
    ((value - dead_zone) / travel).clamp(0.0, 1.0)
}
