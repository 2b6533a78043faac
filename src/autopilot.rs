//! Scripted stand-in for the human player
//!
//! Drives a `Game` through the same action API a pointer would: a drag to
//! throw on the player's turn, one interceptor per AI balloon. Used by the
//! headless binary and the integration tests.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::ai::{self, DifficultyProfile};
use crate::game::Game;
use crate::progress::Storage;
use crate::sim::physics::drag_for_velocity;
use crate::sim::{MatchStatus, Phase, Side};

pub struct Autopilot {
    rng: Pcg32,
    profile: DifficultyProfile,
    /// Id of the last AI balloon answered with an interceptor
    answered: Option<u32>,
}

impl Autopilot {
    /// An autopilot aiming with the skill of `profile`
    pub fn new(profile: DifficultyProfile, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            profile,
            answered: None,
        }
    }

    /// Act on the current state, if there is anything to do
    ///
    /// Returns true when an action was accepted.
    pub fn act<S: Storage>(&mut self, game: &mut Game<S>) -> bool {
        let state = game.state();
        if state.status != MatchStatus::Playing || !state.is_live() {
            return false;
        }

        match (state.current_turn, state.phase) {
            (Side::Player, Phase::Aiming) if state.player.bombs > 0 => {
                let velocity = ai::plan_attack(&mut self.rng, Side::Player, &state.wind, &self.profile, game.tuning());
                let start = state.player.position;
                let end = drag_for_velocity(start, velocity, game.tuning());
                game.start_aim(start) && game.update_aim(end) && game.fire(end)
            }
            (Side::Ai, Phase::Defending) if self.profile.defense_probability > 0.0 => {
                let Some(incoming) = state.attack_in_flight(Side::Ai) else {
                    return false;
                };
                if self.answered == Some(incoming.id) || state.player.charge < game.tuning().shield_cost {
                    return false;
                }
                self.answered = Some(incoming.id);
                let (_, target) = ai::plan_interception(incoming, Side::Player, &state.wind, game.tuning());
                game.defend(target)
            }
            _ => false,
        }
    }
}
