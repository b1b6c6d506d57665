//! Deterministic scene simulation
//!
//! Everything here is a pure function of elapsed time plus a seeded RNG:
//! - Absolute time only, never integrated deltas
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod clock;
pub mod linkage;
pub mod smoke;
pub mod state;
pub mod tick;
pub mod timeline;

pub use clock::{FrameClock, IntervalTimer};
pub use linkage::{
    CRANK_PHASE_OFFSET, LinkageFrame, WheelState, crank_angle, solve_linkage, solve_linkage_with,
};
pub use smoke::{ParticlePhase, SmokeParams, SmokeParticle, SmokeSystem};
pub use state::{MotionState, RAIL_THICKNESS, SceneState, SpriteLayout, Stage};
pub use tick::{FrameStats, frame, spawn_tick};
pub use timeline::{Easing, LoopPolicy, MotionComposer, Timeline, max_travel};
