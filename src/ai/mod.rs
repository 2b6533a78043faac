//! AI opponent decisions
//!
//! The AI aims at the player's flag with difficulty-scaled noise and partial
//! wind compensation, and defends by forward-simulating the incoming balloon
//! to pick an intercept point.

pub mod profiles;

pub use profiles::{Difficulty, DifficultyProfile};

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::physics::{predict_position, velocity_toward};
use crate::sim::state::{AttackProjectile, Side, Wind};
use crate::tuning::Tuning;

/// Launch velocity from `launch` toward `target`
///
/// Power scales with distance up to the gesture cap. The wind drift is
/// cancelled in proportion to `1 - wind_error_factor`.
pub fn aim_velocity(launch: Vec2, target: Vec2, wind: &Wind, wind_error_factor: f32, tuning: &Tuning) -> Vec2 {
    let power = (launch.distance(target) * tuning.ai_power_scale).min(tuning.max_launch_power());
    let mut velocity = velocity_toward(launch, target, power);
    velocity.x -= wind.force(tuning.wind_factor) * tuning.ai_wind_compensation * (1.0 - wind_error_factor);
    velocity
}

/// Pick the launch velocity for `attacker`'s shot at the opposing flag
pub fn plan_attack<R: Rng>(
    rng: &mut R,
    attacker: Side,
    wind: &Wind,
    profile: &DifficultyProfile,
    tuning: &Tuning,
) -> Vec2 {
    let flag = attacker.opponent().flag_position();
    let mut noise = || (rng.random::<f32>() - 0.5) * profile.accuracy_error;
    let target = Vec2::new(flag.x + noise(), flag.y - FLAG_HEIGHT / 2.0 + noise());
    let velocity = aim_velocity(attacker.launch_position(), target, wind, profile.wind_error_factor, tuning);
    log::debug!(
        "AI aims at ({:.0}, {:.0}) with velocity ({:.2}, {:.2})",
        target.x,
        target.y,
        velocity.x,
        velocity.y
    );
    velocity
}

/// Per-shot coin flip: will the AI try to intercept, and can it afford to?
pub fn wants_to_defend<R: Rng>(rng: &mut R, profile: &DifficultyProfile, charge: u32, tuning: &Tuning) -> bool {
    rng.random::<f32>() < profile.defense_probability && charge >= tuning.shield_cost
}

/// Randomised reaction time before the AI launches its interceptor
pub fn reaction_delay_ms<R: Rng>(rng: &mut R) -> u64 {
    AI_REACTION_MIN_MS + rng.random_range(0..AI_REACTION_JITTER_MS)
}

/// Interceptor velocity and target point against an incoming projectile
///
/// The target is where the projectile will be `ai_prediction_ticks` from now,
/// using the same integration the simulation runs.
pub fn plan_interception(incoming: &AttackProjectile, defender: Side, wind: &Wind, tuning: &Tuning) -> (Vec2, Vec2) {
    let target = predict_position(
        incoming.position,
        incoming.velocity,
        wind,
        tuning.ai_prediction_ticks,
        tuning,
    );
    let velocity = velocity_toward(defender.launch_position(), target, tuning.interceptor_speed);
    (velocity, target)
}
