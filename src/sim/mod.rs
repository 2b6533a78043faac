//! Deterministic simulation module
//!
//! All match logic that does not depend on wall-clock time lives here:
//! - Fixed timestep only
//! - Randomness only through a caller-supplied RNG (physics uses none)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod physics;
pub mod state;
pub mod tick;
pub mod turn;

pub use state::{
    AimingState, AttackProjectile, Combatant, Detonation, Effect, EffectKind, Interceptor, MatchState,
    MatchStatus, Phase, Projectile, Side, Wind, WindDirection, Winner,
};
pub use tick::{SimEvent, TickOutcome, tick};
pub use turn::{TurnAdvance, advance_turn, decide_winner};
