//! Turn hand-off rules
//!
//! Pure transitions on `MatchState`: win evaluation, round counting, charge
//! regeneration and wind changes. Scheduling of when these run lives in
//! `Game`.

use rand::Rng;

use super::state::{Combatant, MatchState, MatchStatus, Phase, Side, Wind, WindDirection, Winner};
use crate::tuning::Tuning;

/// Result of a turn hand-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAdvance {
    /// The match ended with this result
    GameOver(Winner),
    /// Play passes to this side
    NextTurn(Side),
}

fn random_direction<R: Rng>(rng: &mut R) -> WindDirection {
    if rng.random::<f32>() > 0.5 {
        WindDirection::East
    } else {
        WindDirection::West
    }
}

/// Wind for the start of a match
pub fn opening_wind<R: Rng>(rng: &mut R, tuning: &Tuning) -> Wind {
    let direction = random_direction(rng);
    Wind::new(direction, rng.random::<f32>() * tuning.initial_wind_max)
}

/// New direction, speed drifted by at most half of `wind_drift` either way
pub fn reroll_wind<R: Rng>(rng: &mut R, wind: &Wind, tuning: &Tuning) -> Wind {
    let direction = random_direction(rng);
    let drift = (rng.random::<f32>() - 0.5) * tuning.wind_drift;
    Wind::new(direction, wind.speed + drift)
}

/// Whether the turn that just finished ends the match
///
/// The round limit is only checked once the AI has thrown, so the player
/// always gets their throw in the final round.
pub fn is_match_over(state: &MatchState, tuning: &Tuning) -> bool {
    state.player.is_defeated()
        || state.ai.is_defeated()
        || (state.current_turn == Side::Ai && state.round >= tuning.max_rounds)
}

/// Winner by knockout, then remaining dryness, then remaining ammo
pub fn decide_winner(player: &Combatant, ai: &Combatant) -> Winner {
    match (player.is_defeated(), ai.is_defeated()) {
        (true, false) => return Winner::Ai,
        (false, true) => return Winner::Player,
        _ => {}
    }

    if player.dryness > ai.dryness {
        Winner::Player
    } else if ai.dryness > player.dryness {
        Winner::Ai
    } else if player.bombs > ai.bombs {
        Winner::Player
    } else if ai.bombs > player.bombs {
        Winner::Ai
    } else {
        Winner::Draw
    }
}

/// Finish the current turn: end the match or hand play to the other side
///
/// Returns `None` when no match is being played.
pub fn advance_turn<R: Rng>(state: &mut MatchState, rng: &mut R, tuning: &Tuning) -> Option<TurnAdvance> {
    if state.status != MatchStatus::Playing {
        return None;
    }

    if is_match_over(state, tuning) {
        let winner = decide_winner(&state.player, &state.ai);
        state.status = MatchStatus::GameOver;
        state.winner = Some(winner);
        state.notification = None;
        state.projectiles.clear();
        return Some(TurnAdvance::GameOver(winner));
    }

    if state.current_turn == Side::Ai {
        state.round += 1;
    }
    let next = state.current_turn.opponent();
    state.current_turn = next;

    let regen = match next {
        Side::Player => tuning.charge_regen,
        Side::Ai => tuning.charge_regen + state.difficulty.profile().charge_regen_bonus,
    };
    state.combatant_mut(next).regen_charge(regen, tuning.initial_charge);

    state.wind = reroll_wind(rng, &state.wind, tuning);
    state.projectiles.clear();
    state.aiming = Default::default();
    state.phase = Phase::Transition;

    Some(TurnAdvance::NextTurn(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(difficulty: Difficulty) -> (MatchState, Tuning, Pcg32) {
        let tuning = Tuning::default();
        let state = MatchState::new(difficulty, Wind::new(WindDirection::East, 10.0), &tuning);
        (state, tuning, Pcg32::seed_from_u64(42))
    }

    #[test]
    fn test_knockout_wins() {
        let (mut state, _, _) = playing(Difficulty::SplishSplash);
        state.player.dryness = 0.0;
        state.ai.dryness = 40.0;
        assert_eq!(decide_winner(&state.player, &state.ai), Winner::Ai);
    }

    #[test]
    fn test_ammo_breaks_dryness_tie() {
        let (mut state, _, _) = playing(Difficulty::SplishSplash);
        state.player.dryness = 50.0;
        state.ai.dryness = 50.0;
        state.player.bombs = 3;
        state.ai.bombs = 5;
        assert_eq!(decide_winner(&state.player, &state.ai), Winner::Ai);
        state.player.bombs = 5;
        assert_eq!(decide_winner(&state.player, &state.ai), Winner::Draw);
    }

    #[test]
    fn test_double_knockout_is_a_draw_on_equal_ammo() {
        let (mut state, _, _) = playing(Difficulty::SplishSplash);
        state.player.dryness = 0.0;
        state.ai.dryness = 0.0;
        assert_eq!(decide_winner(&state.player, &state.ai), Winner::Draw);
    }

    #[test]
    fn test_round_limit_only_after_ai_turn() {
        let (mut state, tuning, mut rng) = playing(Difficulty::SplishSplash);
        state.round = tuning.max_rounds;
        state.current_turn = Side::Player;
        assert_eq!(advance_turn(&mut state, &mut rng, &tuning), Some(TurnAdvance::NextTurn(Side::Ai)));
        assert_eq!(state.round, tuning.max_rounds);

        state.player.dryness = 60.0;
        state.ai.dryness = 50.0;
        assert_eq!(
            advance_turn(&mut state, &mut rng, &tuning),
            Some(TurnAdvance::GameOver(Winner::Player))
        );
        assert_eq!(state.status, MatchStatus::GameOver);
        assert_eq!(state.winner, Some(Winner::Player));
    }

    #[test]
    fn test_round_increments_after_ai_turn_only() {
        let (mut state, tuning, mut rng) = playing(Difficulty::SplishSplash);
        advance_turn(&mut state, &mut rng, &tuning);
        assert_eq!((state.round, state.current_turn), (1, Side::Ai));
        advance_turn(&mut state, &mut rng, &tuning);
        assert_eq!((state.round, state.current_turn), (2, Side::Player));
        assert_eq!(state.phase, Phase::Transition);
    }

    #[test]
    fn test_regen_applies_to_incoming_side_with_bonus() {
        let (mut state, tuning, mut rng) = playing(Difficulty::WetAndWild);
        state.player.charge = 50;
        state.ai.charge = 50;
        advance_turn(&mut state, &mut rng, &tuning);
        assert_eq!(state.ai.charge, 50 + tuning.charge_regen + 5);
        assert_eq!(state.player.charge, 50);
        advance_turn(&mut state, &mut rng, &tuning);
        assert_eq!(state.player.charge, 50 + tuning.charge_regen);
    }

    #[test]
    fn test_not_playing_is_ignored() {
        let tuning = Tuning::default();
        let mut state = MatchState::menu(&tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(advance_turn(&mut state, &mut rng, &tuning), None);
    }

    proptest! {
        #[test]
        fn prop_wind_never_negative(seed in any::<u64>(), speed in 0.0f32..30.0) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let wind = reroll_wind(&mut rng, &Wind::new(WindDirection::West, speed), &tuning);
            prop_assert!(wind.speed >= 0.0);
            prop_assert!(wind.speed <= speed + tuning.wind_drift / 2.0);
        }

        #[test]
        fn prop_charge_capped_after_regen(seed in any::<u64>(), charge in 0u32..=100) {
            let tuning = Tuning::default();
            let mut state = MatchState::new(Difficulty::WetAndWild, Wind::default(), &tuning);
            let mut rng = Pcg32::seed_from_u64(seed);
            state.player.charge = charge;
            state.ai.charge = charge;
            advance_turn(&mut state, &mut rng, &tuning);
            advance_turn(&mut state, &mut rng, &tuning);
            prop_assert!(state.player.charge <= tuning.initial_charge);
            prop_assert!(state.ai.charge <= tuning.initial_charge);
        }
    }
}
