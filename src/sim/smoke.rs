//! Chimney smoke puffs
//!
//! Each puff carries its own spawn time and four run-once timelines (drift,
//! rise, scale, fade) sharing one duration. Completion is a predicate on the
//! fade timeline evaluated every frame, so a puff can never outlive its
//! duration by more than one frame.
//!
//! There is no hard cap on live puffs. At one puff per 0.16s and lifetimes
//! of 1.4-2.0s the live set holds 8-13 puffs (about 11 on average) in
//! steady state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timeline::Timeline;
use crate::consts::{SMOKE_DRIFT, SMOKE_DURATION, SMOKE_END_SCALE, SMOKE_RISE, SMOKE_SIZE};

/// Randomized per-puff parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmokeParams {
    /// Base diameter (pixels)
    pub size: f32,
    /// Total horizontal drift (pixels, signed)
    pub drift_x: f32,
    /// Total upward travel (pixels)
    pub rise_height: f32,
    /// Lifetime (seconds)
    pub duration: f32,
}

impl SmokeParams {
    /// Draw every parameter independently and uniformly from its range
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            size: rng.random_range(SMOKE_SIZE),
            drift_x: rng.random_range(SMOKE_DRIFT),
            rise_height: rng.random_range(SMOKE_RISE),
            duration: rng.random_range(SMOKE_DURATION),
        }
    }
}

/// Lifecycle of a puff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticlePhase {
    /// Created, not yet seen by a frame
    Spawned,
    /// Its timelines are running
    Animating,
    /// Fade finished. Transient: `update` removes it before returning, so
    /// callers observe `Removed` next
    Completed,
    /// Gone from the live set (terminal)
    Removed,
}

/// A single smoke puff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeParticle {
    pub id: u32,
    pub spawn_time: f32,
    /// Chimney position at spawn; never re-sampled
    pub start_pos: Vec2,
    pub params: SmokeParams,
    phase: ParticlePhase,
    drift: Timeline,
    rise: Timeline,
    scale: Timeline,
    opacity: Timeline,
}

impl SmokeParticle {
    pub fn new(id: u32, spawn_time: f32, start_pos: Vec2, params: SmokeParams) -> Self {
        let ramp = |from: f32, to: f32| {
            Timeline::new(from, to, params.duration).starting_at(spawn_time)
        };
        Self {
            id,
            spawn_time,
            start_pos,
            params,
            phase: ParticlePhase::Spawned,
            drift: ramp(0.0, params.drift_x),
            rise: ramp(0.0, params.rise_height),
            scale: ramp(1.0, SMOKE_END_SCALE),
            opacity: ramp(1.0, 0.0),
        }
    }

    pub fn phase(&self) -> ParticlePhase {
        self.phase
    }

    /// Stage position at `t` (rise is upward, toward smaller y)
    pub fn position(&self, t: f32) -> Vec2 {
        self.start_pos + Vec2::new(self.drift.value_at(t), -self.rise.value_at(t))
    }

    pub fn scale(&self, t: f32) -> f32 {
        self.scale.value_at(t)
    }

    pub fn opacity(&self, t: f32) -> f32 {
        self.opacity.value_at(t)
    }

    /// Rendered radius at `t`
    pub fn radius(&self, t: f32) -> f32 {
        self.params.size * self.scale(t) / 2.0
    }

    /// The fade timeline drives the lifecycle
    pub fn is_complete(&self, t: f32) -> bool {
        self.opacity.is_complete(t)
    }

    /// Step the lifecycle forward. Transitions are taken in order, so a puff
    /// first seen after its duration (a stalled frame loop) still passes
    /// through `Animating` on its way to `Completed`.
    fn advance(&mut self, now: f32) {
        if self.phase == ParticlePhase::Spawned && now >= self.spawn_time {
            self.phase = ParticlePhase::Animating;
        }
        if self.phase == ParticlePhase::Animating && self.is_complete(now) {
            self.phase = ParticlePhase::Completed;
        }
    }
}

/// Owns every live puff and the RNG that parameterizes them
#[derive(Debug, Clone)]
pub struct SmokeSystem {
    particles: Vec<SmokeParticle>,
    rng: Pcg32,
    next_id: u32,
    removed_total: u64,
}

impl Default for SmokeSystem {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SmokeSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            removed_total: 0,
        }
    }

    /// Spawn a puff at `origin` with freshly sampled parameters
    pub fn spawn(&mut self, now: f32, origin: Vec2) -> u32 {
        let params = SmokeParams::sample(&mut self.rng);
        self.spawn_with(now, origin, params)
    }

    /// Spawn a puff with explicit parameters
    pub fn spawn_with(&mut self, now: f32, origin: Vec2, params: SmokeParams) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.particles.push(SmokeParticle::new(id, now, origin, params));
        log::trace!(
            "Smoke {} spawned at ({:.1}, {:.1}) for {:.2}s",
            id,
            origin.x,
            origin.y,
            params.duration
        );
        id
    }

    /// Advance every puff to `now` and drop the completed ones.
    /// Returns how many were removed.
    pub fn update(&mut self, now: f32) -> usize {
        for particle in self.particles.iter_mut() {
            particle.advance(now);
        }

        let before = self.particles.len();
        self.particles.retain(|p| {
            let done = p.phase == ParticlePhase::Completed;
            if done {
                log::trace!("Smoke {} retired", p.id);
            }
            !done
        });

        let removed = before - self.particles.len();
        self.removed_total += removed as u64;
        removed
    }

    pub fn particles(&self) -> &[SmokeParticle] {
        &self.particles
    }

    pub fn get(&self, id: u32) -> Option<&SmokeParticle> {
        self.particles.iter().find(|p| p.id == id)
    }

    /// Lifecycle phase of any id ever issued; `None` for ids never spawned
    pub fn phase_of(&self, id: u32) -> Option<ParticlePhase> {
        if id == 0 || id >= self.next_id {
            return None;
        }
        Some(self.get(id).map_or(ParticlePhase::Removed, SmokeParticle::phase))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Total puffs ever spawned
    pub fn spawned_total(&self) -> u64 {
        u64::from(self.next_id - 1)
    }

    /// Total puffs retired
    pub fn removed_total(&self) -> u64 {
        self.removed_total
    }
}
