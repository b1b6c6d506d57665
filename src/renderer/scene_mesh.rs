//! Scene to triangle list
//!
//! Back to front: rail, smoke, locomotive body, wheels, linkage, pins.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::PIN_DIAMETER;
use crate::sim::SceneState;

const WHEEL_SEGMENTS: u32 = 32;
const SMOKE_SEGMENTS: u32 = 16;
const SPOKE_COUNT: u32 = 8;

/// Build every vertex for the scene as of its last frame
pub fn build(state: &SceneState) -> Vec<Vertex> {
    let t = state.time;
    let stage = &state.stage;
    let layout = &state.layout;
    let origin = layout.origin_on(stage, state.motion.offset_x);

    let mut v = Vec::with_capacity(4096);

    // Rail
    v.extend(shapes::rect(
        Vec2::new(0.0, stage.rail_top()),
        Vec2::new(stage.width, stage.height - stage.rail_top()),
        colors::RAIL,
    ));

    // Smoke sits behind the body so puffs emerge from the chimney
    for puff in state.smoke.particles() {
        let [r, g, b] = colors::SMOKE;
        v.extend(shapes::circle(
            puff.position(t),
            puff.radius(t),
            [r, g, b, puff.opacity(t)],
            SMOKE_SEGMENTS,
        ));
    }

    // Body: boiler, cab, chimney stack
    let w = layout.width;
    let h = layout.height;
    v.extend(shapes::rect(
        origin + Vec2::new(0.0, 0.35 * h),
        Vec2::new(0.7 * w, 0.35 * h),
        colors::BOILER,
    ));
    v.extend(shapes::rect(
        origin + Vec2::new(0.7 * w, 0.1 * h),
        Vec2::new(0.3 * w, 0.6 * h),
        colors::CAB,
    ));
    let stack = Vec2::new(24.0, 0.35 * h - layout.chimney.y);
    v.extend(shapes::rect(
        origin + layout.chimney - Vec2::new(stack.x / 2.0, 0.0),
        stack,
        colors::CHIMNEY,
    ));

    // Wheels turn with their rotation timelines
    for (wheel, angle) in state.motion.wheels.iter().zip(state.motion.wheel_angles) {
        let r = layout.wheel_radius;
        v.extend(shapes::ring(wheel.center, r * 0.8, r, colors::WHEEL, WHEEL_SEGMENTS));
        v.extend(shapes::spokes(wheel.center, r * 0.8, angle, SPOKE_COUNT, 3.0, colors::WHEEL));
        v.extend(shapes::circle(wheel.center, r * 0.2, colors::HUB, WHEEL_SEGMENTS / 2));
    }

    // Linkage
    for (center, pin) in state.linkage.crank_arms() {
        v.extend(shapes::segment(center, pin, 6.0, colors::CRANK_ARM));
    }
    let (a, b) = state.linkage.side_rod();
    v.extend(shapes::segment(a, b, 8.0, colors::SIDE_ROD));
    for i in 0..2 {
        let marker = state.linkage.pin_marker_origin(i, PIN_DIAMETER);
        v.extend(shapes::circle(
            marker + Vec2::splat(PIN_DIAMETER / 2.0),
            PIN_DIAMETER / 2.0,
            colors::PIN,
            12,
        ));
    }

    v
}
