//! Waterbomb Duel - A turn-based water balloon artillery duel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, projectiles, match state, turn rules)
//! - `ai`: AI opponent decisions and difficulty profiles
//! - `autopilot`: Scripted player for headless runs
//! - `schedule`: Cancellable delayed tasks (think time, reaction jitter, effect expiry)
//! - `game`: The single owner of match state, exposing the action API
//! - `progress`: Persisted unlock level and tutorial flag
//! - `tuning`: Data-driven game balance

pub mod ai;
pub mod autopilot;
pub mod game;
pub mod progress;
pub mod schedule;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use ai::Difficulty;
pub use game::Game;
pub use progress::{MemoryStorage, Progress, Storage};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Simulation rate (one physics step per rendered frame)
    pub const TICK_HZ: u64 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field width (y grows downward)
    pub const GAME_WIDTH: f32 = 1280.0;
    /// Anything below this line has hit the ground
    pub const GROUND_HEIGHT: f32 = 600.0;

    /// Launch points
    pub const PLAYER_POSITION: Vec2 = Vec2::new(150.0, 500.0);
    pub const AI_POSITION: Vec2 = Vec2::new(1150.0, 500.0);

    /// Flag anchors (bottom-centre of the hit-box)
    pub const PLAYER_FLAG_POSITION: Vec2 = Vec2::new(50.0, 500.0);
    pub const AI_FLAG_POSITION: Vec2 = Vec2::new(1230.0, 500.0);
    pub const FLAG_WIDTH: f32 = 60.0;
    pub const FLAG_HEIGHT: f32 = 100.0;

    /// Trajectory preview length and sampling stride
    pub const PREVIEW_TICKS: usize = 100;
    pub const PREVIEW_STRIDE: usize = 2;

    /// Number of tutorial overlay steps
    pub const TUTORIAL_STEPS: u8 = 4;

    /// Scheduled delays (milliseconds)
    pub const AI_THINK_MS: u64 = 2000;
    pub const AI_REACTION_MIN_MS: u64 = 300;
    pub const AI_REACTION_JITTER_MS: u64 = 400;
    pub const RESOLVE_PAUSE_MS: u64 = 2000;
    pub const FORFEIT_PAUSE_MS: u64 = 2000;
    pub const TURN_LOCK_MS: u64 = 100;
    pub const EFFECT_LIFETIME_MS: u64 = 1500;
    pub const NOTIFICATION_MS: u64 = 2000;
    pub const SHORT_NOTIFICATION_MS: u64 = 1500;
}

/// Convert a delay in milliseconds to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u64) -> u64 {
    (ms * consts::TICK_HZ).div_ceil(1000)
}
