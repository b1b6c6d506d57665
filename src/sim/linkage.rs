//! Crank and side-rod kinematics
//!
//! Forward kinematics only: each crank pin is placed on its own wheel from
//! the elapsed time, and the side rod simply joins the two pins. The rod is
//! not length-constrained, so its length wobbles slightly as the wheels turn.
//!
//! Every call recomputes from absolute time. There is no state carried
//! between frames, so dropped frames cost angular resolution and nothing else.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::consts::{CRANK_RADIUS, WHEEL_PERIOD};
use crate::polar_to_cartesian;

/// Crank phase of the second wheel relative to the first
pub const CRANK_PHASE_OFFSET: f32 = PI;

/// A driving wheel as seen by the linkage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    /// Wheel center in stage coordinates
    pub center: Vec2,
    /// Crank phase relative to the reference angle (radians)
    pub phase_offset: f32,
}

impl WheelState {
    pub fn new(center: Vec2, phase_offset: f32) -> Self {
        Self {
            center,
            phase_offset,
        }
    }

    /// Crank angle of this wheel at elapsed time `t`
    pub fn crank_angle(&self, t: f32, period: f32) -> f32 {
        crank_angle(t, period) + self.phase_offset
    }

    /// Crank pin position at elapsed time `t`
    pub fn crank_pin(&self, t: f32, crank_radius: f32, period: f32) -> Vec2 {
        self.center + polar_to_cartesian(crank_radius, self.crank_angle(t, period))
    }
}

/// Reference crank angle (wheel 1) at elapsed time `t`, in [0, 2π).
///
/// Equal to `2π·t/period` modulo 2π. The revolution count is dropped before
/// scaling so long runs keep full precision.
pub fn crank_angle(t: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    TAU * (t / period).rem_euclid(1.0)
}

/// Linkage geometry for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkageFrame {
    pub centers: [Vec2; 2],
    pub crank_pins: [Vec2; 2],
}

impl LinkageFrame {
    /// Side rod endpoints (pin 1, pin 2)
    pub fn side_rod(&self) -> (Vec2, Vec2) {
        (self.crank_pins[0], self.crank_pins[1])
    }

    /// Crank arms, center to pin, per wheel
    pub fn crank_arms(&self) -> [(Vec2, Vec2); 2] {
        [
            (self.centers[0], self.crank_pins[0]),
            (self.centers[1], self.crank_pins[1]),
        ]
    }

    /// Current side rod length
    pub fn rod_length(&self) -> f32 {
        self.crank_pins[0].distance(self.crank_pins[1])
    }

    /// Top-left corner of a pin marker of `diameter` centered on pin `index`
    pub fn pin_marker_origin(&self, index: usize, diameter: f32) -> Vec2 {
        self.crank_pins[index.min(1)] - Vec2::splat(diameter / 2.0)
    }
}

/// Solve the linkage with the scene's crank radius and wheel period
pub fn solve_linkage(t: f32, wheels: &[WheelState; 2]) -> LinkageFrame {
    solve_linkage_with(t, wheels, CRANK_RADIUS, WHEEL_PERIOD)
}

/// Solve the linkage for arbitrary crank radius and period
pub fn solve_linkage_with(
    t: f32,
    wheels: &[WheelState; 2],
    crank_radius: f32,
    period: f32,
) -> LinkageFrame {
    LinkageFrame {
        centers: [wheels[0].center, wheels[1].center],
        crank_pins: [
            wheels[0].crank_pin(t, crank_radius, period),
            wheels[1].crank_pin(t, crank_radius, period),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wheels(c1: Vec2, c2: Vec2) -> [WheelState; 2] {
        [
            WheelState::new(c1, 0.0),
            WheelState::new(c2, CRANK_PHASE_OFFSET),
        ]
    }

    fn assert_near(a: Vec2, b: Vec2) {
        assert!(a.distance(b) < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn test_quarter_turns() {
        let w = wheels(Vec2::new(100.0, 100.0), Vec2::new(240.0, 100.0));

        let f = solve_linkage_with(0.0, &w, 20.0, 2.0);
        assert_near(f.crank_pins[0], Vec2::new(120.0, 100.0));
        assert_near(f.crank_pins[1], Vec2::new(220.0, 100.0));

        let f = solve_linkage_with(0.5, &w, 20.0, 2.0);
        assert!((crank_angle(0.5, 2.0) - PI / 2.0).abs() < 1e-6);
        assert_near(f.crank_pins[0], Vec2::new(100.0, 120.0));

        let f = solve_linkage_with(1.0, &w, 20.0, 2.0);
        assert!((crank_angle(1.0, 2.0) - PI).abs() < 1e-6);
        assert_near(f.crank_pins[0], Vec2::new(80.0, 100.0));
    }

    #[test]
    fn test_segments() {
        let w = wheels(Vec2::new(100.0, 100.0), Vec2::new(240.0, 100.0));
        let f = solve_linkage(0.0, &w);
        let (a, b) = f.side_rod();
        assert_eq!(a, f.crank_pins[0]);
        assert_eq!(b, f.crank_pins[1]);
        let arms = f.crank_arms();
        assert_eq!(arms[1].0, Vec2::new(240.0, 100.0));
        assert_eq!(arms[1].1, f.crank_pins[1]);
        // Pins 180° apart on level wheels: rod spans center distance - 2r at t=0
        assert!((f.rod_length() - (140.0 - 2.0 * CRANK_RADIUS)).abs() < 1e-3);
    }

    #[test]
    fn test_pin_marker_centered() {
        let w = wheels(Vec2::new(100.0, 100.0), Vec2::new(240.0, 100.0));
        let f = solve_linkage_with(0.0, &w, 20.0, 2.0);
        assert_near(f.pin_marker_origin(0, 8.0), Vec2::new(116.0, 96.0));
    }

    #[test]
    fn test_degenerate_shared_center() {
        let c = Vec2::new(50.0, 50.0);
        let f = solve_linkage(0.3, &wheels(c, c));
        // Opposite pins on the same wheel: rod is a diameter
        assert!((f.rod_length() - 2.0 * CRANK_RADIUS).abs() < 1e-3);
        assert!(f.crank_pins.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_stateless_out_of_order() {
        let w = wheels(Vec2::new(80.0, 140.0), Vec2::new(220.0, 140.0));
        let late = solve_linkage(7.3, &w);
        let _ = solve_linkage(0.1, &w);
        assert_eq!(solve_linkage(7.3, &w), late);
    }

    #[test]
    fn test_zero_period_is_total() {
        let w = wheels(Vec2::ZERO, Vec2::X);
        let f = solve_linkage_with(1.0, &w, 20.0, 0.0);
        assert!(f.crank_pins.iter().all(|p| p.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_pins_on_crank_circle(
            t in 0.0f32..10_000.0,
            cx in -2000.0f32..2000.0,
            cy in -2000.0f32..2000.0,
        ) {
            let w = wheels(Vec2::new(cx, cy), Vec2::new(cx + 140.0, cy));
            let f = solve_linkage(t, &w);
            for i in 0..2 {
                let r = f.crank_pins[i].distance(f.centers[i]);
                prop_assert!((r - CRANK_RADIUS).abs() < 1e-2);
            }
        }

        #[test]
        fn prop_phase_locked(t in 0.0f32..10_000.0) {
            let w = wheels(Vec2::ZERO, Vec2::new(140.0, 0.0));
            let diff = w[1].crank_angle(t, WHEEL_PERIOD) - w[0].crank_angle(t, WHEEL_PERIOD);
            prop_assert!((crate::wrap_angle(diff) - PI).abs() < 1e-4);
        }

        #[test]
        fn prop_rotation_periodic(t in 0.0f32..1_000.0) {
            let a = crank_angle(t, WHEEL_PERIOD);
            let b = crank_angle(t + WHEEL_PERIOD, WHEEL_PERIOD);
            // Compare on the unit circle to sidestep the 0/2π seam
            let d = Vec2::from_angle(a).distance(Vec2::from_angle(b));
            prop_assert!(d < 1e-3);
        }
    }
}
