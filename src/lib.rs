//! Steam Loco - an animated 2D locomotive
//!
//! Core modules:
//! - `sim`: Deterministic scene simulation (linkage kinematics, motion timelines, smoke)
//! - `renderer`: WebGPU rendering pipeline

pub mod renderer;
pub mod sim;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    use std::ops::Range;

    /// Wheel sprite radius (the sprite is a 2r x 2r square)
    pub const WHEEL_RADIUS: f32 = 40.0;
    /// Distance from wheel center to crank pin
    pub const CRANK_RADIUS: f32 = 20.0;
    /// One full wheel revolution (seconds)
    pub const WHEEL_PERIOD: f32 = 2.0;
    /// Crank pin marker diameter
    pub const PIN_DIAMETER: f32 = 8.0;

    /// One-way travel time along the rail (seconds); round trip is twice this
    pub const TRAVEL_DURATION: f32 = 6.0;
    /// Gap kept between the locomotive and either stage edge
    pub const TRAVEL_MARGIN: f32 = 20.0;

    /// Locomotive sprite bounds
    pub const LOCO_WIDTH: f32 = 300.0;
    pub const LOCO_HEIGHT: f32 = 180.0;
    /// Top-left corners of the wheel sprites, sprite-local
    pub const WHEEL_ANCHORS: [(f32, f32); 2] = [(40.0, 100.0), (180.0, 100.0)];
    /// Chimney mouth, sprite-local
    pub const CHIMNEY_ANCHOR: (f32, f32) = (62.0, 8.0);

    /// Default stage dimensions (logical pixels)
    pub const STAGE_WIDTH: f32 = 900.0;
    pub const STAGE_HEIGHT: f32 = 360.0;

    /// Smoke spawn cadence (seconds)
    pub const SMOKE_INTERVAL: f32 = 0.16;
    /// Per-puff parameter ranges (uniform, half-open)
    pub const SMOKE_SIZE: Range<f32> = 10.0..20.0;
    pub const SMOKE_DRIFT: Range<f32> = -20.0..20.0;
    pub const SMOKE_RISE: Range<f32> = 70.0..110.0;
    pub const SMOKE_DURATION: Range<f32> = 1.4..2.0;
    /// Puff scale at the end of its life (starts at 1.0)
    pub const SMOKE_END_SCALE: f32 = 1.8;

    /// Maximum interval firings per frame to prevent spiral of death
    pub const MAX_SPAWNS_PER_FRAME: u32 = 8;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(20.0, PI / 2.0);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 20.0).abs() < 1e-4);
    }
}
