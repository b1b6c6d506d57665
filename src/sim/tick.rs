//! Frame driver
//!
//! Two independent entry points feed the scene: `frame` once per rendered
//! frame, and `spawn_tick` on the fixed smoke cadence. Both take absolute
//! elapsed time and neither blocks.

use super::linkage::solve_linkage;
use super::state::SceneState;

/// Advance the scene to elapsed time `t`.
///
/// Order within a frame: the composer writes motion, the linkage reads the
/// wheel centers it just wrote, then finished smoke is retired.
pub fn frame(state: &mut SceneState, t: f32) {
    state.time = t;
    state
        .composer
        .apply(t, &state.stage, &state.layout, &mut state.motion);
    state.linkage = solve_linkage(t, &state.motion.wheels);
    state.smoke.update(t);
}

/// Emit one smoke puff from the chimney's current position.
///
/// Samples the chimney as of the last frame; the puff keeps that origin for
/// its whole life.
pub fn spawn_tick(state: &mut SceneState, t: f32) -> u32 {
    let origin = state.motion.chimney;
    state.smoke.spawn(t, origin)
}

/// Rolling frame-rate over the last 60 frames (observational only)
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_times: [f64; 60],
    frame_index: usize,
    frames: u64,
    fps: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            frames: 0,
            fps: 0,
        }
    }
}

impl FrameStats {
    /// Record a frame presented at `time_ms`
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        self.frames += 1;

        // Oldest slot is the one we'll overwrite next
        if self.frames >= self.frame_times.len() as u64 {
            let elapsed = time_ms - self.frame_times[self.frame_index];
            if elapsed > 0.0 {
                let span = (self.frame_times.len() - 1) as f64;
                self.fps = (span * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::ParticlePhase;

    #[test]
    fn test_frame_tracks_translation() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        frame(&mut state, TRAVEL_DURATION);
        let far = TRAVEL_MARGIN + state.composer().max_travel();
        assert!((state.motion.offset_x - far).abs() < 1e-3);

        // Wheel centers and chimney move with the sprite
        let origin = state.layout.origin_on(&state.stage, state.motion.offset_x);
        assert_eq!(state.motion.wheels[0].center, origin + state.layout.wheel_center(0));
        assert_eq!(state.motion.chimney, origin + state.layout.chimney);
        assert_eq!(state.linkage.centers, [
            state.motion.wheels[0].center,
            state.motion.wheels[1].center,
        ]);
    }

    #[test]
    fn test_linkage_follows_wheels_each_frame() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        let mut t = 0.0;
        while t < 5.0 {
            frame(&mut state, t);
            for i in 0..2 {
                let r = state.linkage.crank_pins[i].distance(state.motion.wheels[i].center);
                assert!((r - CRANK_RADIUS).abs() < 1e-3);
            }
            t += 1.0 / 60.0;
        }
    }

    #[test]
    fn test_skipped_frames_do_not_drift() {
        let mut stepped = SceneState::new(1, 900.0, 360.0);
        for i in 0..=300 {
            frame(&mut stepped, i as f32 / 60.0);
        }
        let mut jumped = SceneState::new(1, 900.0, 360.0);
        frame(&mut jumped, 300.0 / 60.0);
        assert_eq!(stepped.linkage, jumped.linkage);
        assert_eq!(stepped.motion, jumped.motion);
    }

    #[test]
    fn test_spawn_uses_chimney_at_spawn() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        frame(&mut state, 1.0);
        let chimney = state.motion.chimney;
        let id = spawn_tick(&mut state, 1.0);

        // The locomotive moves on; the puff does not follow
        frame(&mut state, 1.2);
        assert_ne!(state.motion.chimney, chimney);
        let puff = state.smoke.get(id).expect("puff is live");
        assert_eq!(puff.start_pos, chimney);
        assert_eq!(puff.phase(), ParticlePhase::Animating);
    }

    #[test]
    fn test_resize_leaves_smoke_anchored() {
        let mut state = SceneState::new(1, 900.0, 360.0);
        frame(&mut state, 2.0);
        let id = spawn_tick(&mut state, 2.0);
        let origin = state.smoke.get(id).map(|p| p.start_pos);

        state.resize(500.0, 300.0, 2.1);
        frame(&mut state, 2.1);
        assert_eq!(state.smoke.get(id).map(|p| p.start_pos), origin);
        assert_eq!(state.motion.offset_x, TRAVEL_MARGIN);
    }

    #[test]
    fn test_resize_keeps_wheel_and_crank_phase() {
        let mut resized = SceneState::new(1, 900.0, 360.0);
        let mut steady = SceneState::new(1, 900.0, 360.0);
        frame(&mut resized, 2.0);
        resized.resize(500.0, 300.0, 2.3);

        for t in [2.3, 2.8, 3.55, 5.0] {
            frame(&mut resized, t);
            frame(&mut steady, t);
            assert_eq!(resized.motion.wheel_angles, steady.motion.wheel_angles);
            for i in 0..2 {
                let a = resized.linkage.crank_pins[i] - resized.linkage.centers[i];
                let b = steady.linkage.crank_pins[i] - steady.linkage.centers[i];
                assert!(a.distance(b) < 1e-3, "wheel {i} at t={t}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn test_spawn_ticks_then_retire() {
        let mut state = SceneState::new(9, 900.0, 360.0);
        for n in 0..5 {
            let t = n as f32 * SMOKE_INTERVAL;
            frame(&mut state, t);
            spawn_tick(&mut state, t);
        }
        assert_eq!(state.smoke.len(), 5);

        frame(&mut state, 10.0);
        assert!(state.smoke.is_empty());
        assert_eq!(state.smoke.removed_total(), 5);
    }

    #[test]
    fn test_zero_width_stage_is_total() {
        let mut state = SceneState::new(1, 0.0, 0.0);
        frame(&mut state, 3.0);
        spawn_tick(&mut state, 3.0);
        assert_eq!(state.composer().max_travel(), 0.0);
        assert!(state.motion.chimney.is_finite());
        assert_eq!(state.smoke.len(), 1);
    }

    #[test]
    fn test_frame_stats_fps() {
        let mut stats = FrameStats::default();
        for i in 0..120 {
            stats.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(stats.fps(), 60);
        assert_eq!(stats.frames(), 120);
    }
}
