//! Declarative, time-parameterized animations
//!
//! A `Timeline` is a pure function of elapsed time: start time, endpoints,
//! duration, easing and loop policy. Nothing is stepped; every poll evaluates
//! the closed form, so replacing a timeline is the only way to change motion.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use super::linkage::WheelState;
use super::state::{MotionState, SpriteLayout, Stage};
use crate::consts::{TRAVEL_DURATION, WHEEL_PERIOD};
use crate::wrap_angle;

/// Progress shaping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Sinusoidal ease-in/ease-out: slow at both ends
    SineInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress in [0, 1]
    pub fn apply(self, p: f32) -> f32 {
        let p = p.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::SineInOut => (1.0 - (PI * p).cos()) / 2.0,
        }
    }
}

/// What happens when a timeline reaches its end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoopPolicy {
    /// Run once and hold the end value
    #[default]
    Once,
    /// Jump back to the start value and run again, forever
    Repeat,
    /// Run forward then backward, forever (period is twice the duration)
    AutoReverse,
}

/// A single animated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub start_time: f32,
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub easing: Easing,
    pub loop_policy: LoopPolicy,
}

impl Timeline {
    /// A linear, run-once ramp starting at t = 0
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            start_time: 0.0,
            from,
            to,
            duration,
            easing: Easing::Linear,
            loop_policy: LoopPolicy::Once,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_loop(mut self, loop_policy: LoopPolicy) -> Self {
        self.loop_policy = loop_policy;
        self
    }

    pub fn starting_at(mut self, start_time: f32) -> Self {
        self.start_time = start_time;
        self
    }

    /// Eased progress in [0, 1] at time `t` (direction already applied)
    pub fn progress(&self, t: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }

        let elapsed = (t - self.start_time).max(0.0);
        let linear = match self.loop_policy {
            LoopPolicy::Once => elapsed / self.duration,
            LoopPolicy::Repeat => elapsed.rem_euclid(self.duration) / self.duration,
            LoopPolicy::AutoReverse => {
                let phase = elapsed.rem_euclid(2.0 * self.duration) / self.duration;
                if phase <= 1.0 { phase } else { 2.0 - phase }
            }
        };

        self.easing.apply(linear)
    }

    /// Animated value at time `t`, always within [from, to]
    pub fn value_at(&self, t: f32) -> f32 {
        let v = self.from + (self.to - self.from) * self.progress(t);
        let (lo, hi) = self.bounds();
        v.clamp(lo, hi)
    }

    /// Smallest and largest value this timeline can produce
    pub fn bounds(&self) -> (f32, f32) {
        (self.from.min(self.to), self.from.max(self.to))
    }

    /// Whether a run-once timeline has finished. Looping timelines never do.
    pub fn is_complete(&self, t: f32) -> bool {
        match self.loop_policy {
            LoopPolicy::Once => t - self.start_time >= self.duration,
            LoopPolicy::Repeat | LoopPolicy::AutoReverse => false,
        }
    }
}

/// Horizontal travel available to the sprite.
///
/// Clamps to 0 for degenerate stages (zero width, sprite wider than stage).
pub fn max_travel(stage_width: f32, sprite_width: f32, margin: f32) -> f32 {
    (stage_width - sprite_width - 2.0 * margin).max(0.0)
}

/// Owns the wheel-rotation and locomotive-translation timelines.
///
/// At most one timeline per axis is ever active: every rebuild stops the
/// in-flight timeline before installing its replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionComposer {
    margin: f32,
    sprite_width: f32,
    max_travel: f32,
    rotation: Option<[Timeline; 2]>,
    translation: Option<Timeline>,
}

impl MotionComposer {
    pub fn new(margin: f32, sprite_width: f32) -> Self {
        Self {
            margin,
            sprite_width,
            max_travel: 0.0,
            rotation: None,
            translation: None,
        }
    }

    /// Travel bound of the current translation timeline
    pub fn max_travel(&self) -> f32 {
        self.max_travel
    }

    pub fn rotation(&self) -> Option<&[Timeline; 2]> {
        self.rotation.as_ref()
    }

    pub fn translation(&self) -> Option<&Timeline> {
        self.translation.as_ref()
    }

    /// Install the two wheel rotations: 0→2π and π→3π, one revolution per
    /// wheel period, constant speed, repeating forever.
    pub fn build_rotation(&mut self, start: f32) {
        self.stop_rotation();
        let spin = |from: f32| {
            Timeline::new(from, from + TAU, WHEEL_PERIOD)
                .with_loop(LoopPolicy::Repeat)
                .starting_at(start)
        };
        self.rotation = Some([spin(0.0), spin(PI)]);
    }

    /// Replace the translation timeline for a stage of `stage_width`,
    /// starting at `now`.
    ///
    /// Restarts from the left margin: an in-flight locomotive snaps back.
    pub fn rebuild_translation(&mut self, stage_width: f32, now: f32) {
        self.stop_translation();

        self.max_travel = max_travel(stage_width, self.sprite_width, self.margin);
        self.translation = Some(
            Timeline::new(self.margin, self.margin + self.max_travel, TRAVEL_DURATION)
                .with_easing(Easing::SineInOut)
                .with_loop(LoopPolicy::AutoReverse)
                .starting_at(now),
        );

        log::debug!(
            "Translation rebuilt at t={:.3}: stage {:.0}px, travel {:.0}px",
            now,
            stage_width,
            self.max_travel
        );
    }

    pub fn stop_rotation(&mut self) -> Option<[Timeline; 2]> {
        self.rotation.take()
    }

    pub fn stop_translation(&mut self) -> Option<Timeline> {
        self.translation.take()
    }

    /// Locomotive offset at `t` (rests at the margin with no timeline)
    pub fn offset_at(&self, t: f32) -> f32 {
        self.translation
            .as_ref()
            .map_or(self.margin, |tl| tl.value_at(t))
    }

    /// Wheel sprite angles at `t`, wrapped to [0, 2π)
    pub fn wheel_angles_at(&self, t: f32) -> [f32; 2] {
        match &self.rotation {
            Some([a, b]) => [wrap_angle(a.value_at(t)), wrap_angle(b.value_at(t))],
            None => [0.0, PI],
        }
    }

    /// Write the motion fields of the scene for time `t`.
    ///
    /// This is the only writer of `MotionState`.
    pub fn apply(&self, t: f32, stage: &Stage, layout: &SpriteLayout, motion: &mut MotionState) {
        let offset = self.offset_at(t);
        let origin = layout.origin_on(stage, offset);

        motion.offset_x = offset;
        motion.wheel_angles = self.wheel_angles_at(t);
        for (i, wheel) in motion.wheels.iter_mut().enumerate() {
            *wheel = WheelState::new(origin + layout.wheel_center(i), wheel.phase_offset);
        }
        motion.chimney = origin + layout.chimney;
    }
}
