//! Demo autopilot
//!
//! Drives the truck for attract mode and the headless runner: chase the lowest
//! good object, but never park under a hazard that is about to land.

use super::state::{ObjectKind, Session};
use crate::input::InputFrame;

/// How far above the truck a hazard counts as incoming
const DANGER_BAND: f32 = 260.0;
/// Extra clearance kept from an incoming hazard
const DODGE_MARGIN: f32 = 12.0;

/// Steering for this frame, expressed as a drag toward a world x
pub fn autopilot(session: &Session) -> InputFrame {
    let tuning = &session.tuning;
    let catch_box = session.vehicle.body_bounds();
    let glow = tuning.hazard_glow_padding;
    let half_body = session.vehicle.body_size.x / 2.0;

    // Lowest good object still above the truck
    let mut target = session
        .objects
        .values()
        .filter(|o| o.kind == ObjectKind::Good && o.bounds(glow).bottom <= catch_box.bottom)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|o| o.pos.x)
        .unwrap_or(session.vehicle.x);

    for hazard in session.objects.values().filter(|o| {
        o.kind == ObjectKind::Hazard && o.bounds(glow).bottom > catch_box.top - DANGER_BAND
    }) {
        let bounds = hazard.bounds(glow);
        let unsafe_left = bounds.left - half_body - DODGE_MARGIN;
        let unsafe_right = bounds.right + half_body + DODGE_MARGIN;
        if target > unsafe_left && target < unsafe_right {
            // Dodge toward whichever side is closer to where we already are
            target = if session.vehicle.x < hazard.pos.x {
                unsafe_left
            } else {
                unsafe_right
            };
        }
    }

    let min_x = tuning.edge_margin;
    let max_x = tuning.world_width - tuning.edge_margin;
    InputFrame::drag(target.clamp(min_x, max_x))
}
