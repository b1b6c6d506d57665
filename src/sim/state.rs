//! Scene state and layout types
//!
//! Single writer per field: `MotionComposer::apply` owns `SceneState::motion`,
//! the linkage solver owns `SceneState::linkage`, and only the spawn trigger
//! and the frame driver touch `SceneState::smoke`. Readers see values from
//! the same tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::linkage::{CRANK_PHASE_OFFSET, LinkageFrame, WheelState, solve_linkage};
use super::smoke::SmokeSystem;
use super::timeline::MotionComposer;
use crate::consts::*;

/// Thickness of the rail strip under the wheels
pub const RAIL_THICKNESS: f32 = 10.0;

/// Logical drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: f32,
    pub height: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            width: STAGE_WIDTH,
            height: STAGE_HEIGHT,
        }
    }
}

impl Stage {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Top edge of the rail
    pub fn rail_top(&self) -> f32 {
        (self.height - RAIL_THICKNESS).max(0.0)
    }
}

/// Fixed geometry of the locomotive sprite, in sprite-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteLayout {
    pub width: f32,
    pub height: f32,
    pub wheel_radius: f32,
    /// Top-left corners of the two wheel sprites
    pub wheel_anchors: [Vec2; 2],
    /// Chimney mouth, where smoke is emitted
    pub chimney: Vec2,
}

impl Default for SpriteLayout {
    fn default() -> Self {
        let anchor = |(x, y): (f32, f32)| Vec2::new(x, y);
        Self {
            width: LOCO_WIDTH,
            height: LOCO_HEIGHT,
            wheel_radius: WHEEL_RADIUS,
            wheel_anchors: WHEEL_ANCHORS.map(anchor),
            chimney: anchor(CHIMNEY_ANCHOR),
        }
    }
}

impl SpriteLayout {
    /// Wheel center, sprite-local (anchor plus radius on each axis)
    pub fn wheel_center(&self, index: usize) -> Vec2 {
        self.wheel_anchors[index.min(1)] + Vec2::splat(self.wheel_radius)
    }

    /// Stage position of the sprite's top-left corner for a horizontal offset.
    /// The sprite sits on the rail.
    pub fn origin_on(&self, stage: &Stage, offset_x: f32) -> Vec2 {
        Vec2::new(offset_x, stage.rail_top() - self.height)
    }
}

/// Motion outputs, written only by the composer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    /// Horizontal translation of the sprite
    pub offset_x: f32,
    /// Wheel sprite rotation (radians, [0, 2π))
    pub wheel_angles: [f32; 2],
    /// Wheel centers in stage coordinates
    pub wheels: [WheelState; 2],
    /// Chimney mouth in stage coordinates
    pub chimney: Vec2,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            wheel_angles: [0.0, CRANK_PHASE_OFFSET],
            wheels: [
                WheelState::new(Vec2::ZERO, 0.0),
                WheelState::new(Vec2::ZERO, CRANK_PHASE_OFFSET),
            ],
            chimney: Vec2::ZERO,
        }
    }
}

/// Complete scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    pub stage: Stage,
    pub layout: SpriteLayout,
    /// Elapsed seconds at the last frame
    pub time: f32,
    pub motion: MotionState,
    pub linkage: LinkageFrame,
    /// Live smoke puffs (visual only)
    #[serde(skip)]
    pub smoke: SmokeSystem,
    pub(crate) composer: MotionComposer,
}

impl SceneState {
    /// Build the scene at t = 0 on a stage of the given size
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let layout = SpriteLayout::default();
        let mut composer = MotionComposer::new(TRAVEL_MARGIN, layout.width);
        composer.build_rotation(0.0);
        composer.rebuild_translation(width, 0.0);

        let mut state = Self {
            stage: Stage::new(width, height),
            layout,
            time: 0.0,
            motion: MotionState::default(),
            linkage: LinkageFrame::default(),
            smoke: SmokeSystem::new(seed),
            composer,
        };

        state
            .composer
            .apply(0.0, &state.stage, &state.layout, &mut state.motion);
        state.linkage = solve_linkage(0.0, &state.motion.wheels);

        state
    }

    pub fn composer(&self) -> &MotionComposer {
        &self.composer
    }

    /// Apply a new stage size at elapsed time `now`.
    ///
    /// Rebuilds the translation timeline for the new width. Live smoke keeps
    /// its spawn-time anchors.
    pub fn resize(&mut self, width: f32, height: f32, now: f32) {
        self.stage = Stage::new(width, height);
        self.composer.rebuild_translation(width, now);
        self.composer
            .apply(now, &self.stage, &self.layout, &mut self.motion);
        self.linkage = solve_linkage(now, &self.motion.wheels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_scene() {
        let state = SceneState::new(1, 900.0, 360.0);
        assert_eq!(state.motion.offset_x, TRAVEL_MARGIN);
        assert_eq!(state.composer().max_travel(), 900.0 - LOCO_WIDTH - 2.0 * TRAVEL_MARGIN);
        assert!(state.smoke.is_empty());

        // Wheel 1: anchor (40, 100) + radius, sprite sits on the rail
        let top = 360.0 - RAIL_THICKNESS - LOCO_HEIGHT;
        let c1 = state.motion.wheels[0].center;
        assert_eq!(c1, Vec2::new(TRAVEL_MARGIN + 80.0, top + 140.0));
        assert_eq!(state.linkage.centers[0], c1);
        assert_eq!(state.linkage.crank_pins[0], c1 + Vec2::new(CRANK_RADIUS, 0.0));
    }

    #[test]
    fn test_wheels_rest_on_rail() {
        let stage = Stage::new(900.0, 360.0);
        let layout = SpriteLayout::default();
        let origin = layout.origin_on(&stage, 0.0);
        let bottom = origin.y + layout.wheel_center(0).y + layout.wheel_radius;
        assert_eq!(bottom, stage.rail_top());
    }

    #[test]
    fn test_resize_rebuilds_translation() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        state.resize(400.0, 300.0, 4.0);
        assert_eq!(state.composer().max_travel(), 400.0 - LOCO_WIDTH - 2.0 * TRAVEL_MARGIN);
        assert_eq!(state.motion.offset_x, TRAVEL_MARGIN);
        assert_eq!(state.stage, Stage::new(400.0, 300.0));
    }

    #[test]
    fn test_resize_narrower_than_sprite_pins_to_margin() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        state.resize(300.0, 300.0, 4.0);
        assert_eq!(state.composer().max_travel(), 0.0);

        // No room to travel: the locomotive stays put for the whole cycle
        for t in [4.0, 7.0, 10.0, 13.0] {
            state.composer.apply(t, &state.stage, &state.layout, &mut state.motion);
            assert_eq!(state.motion.offset_x, TRAVEL_MARGIN);
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SceneState::new(1, 900.0, 360.0);
        let json = serde_json::to_string(&state.linkage).expect("serialize linkage");
        let back: LinkageFrame = serde_json::from_str(&json).expect("deserialize linkage");
        assert_eq!(back, state.linkage);
    }
}
