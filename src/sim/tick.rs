//! Fixed timestep simulation tick
//!
//! Advances every projectile one step and resolves ground impacts, flag hits
//! and interceptions. Ordering within a tick:
//! 1. exploded interceptors age (and are dropped once faded), everything else integrates
//! 2. attack projectiles resolve against the opposing flag
//! 3. interceptors check for an opposing attack before checking their target,
//!    so a last-instant intercept preempts fuse detonation

use glam::Vec2;

use super::physics::{
    distance, in_flag_hitbox, integrate_attack, integrate_interceptor, out_of_bounds, splash_damage,
    splash_distance,
};
use super::state::{AttackProjectile, Detonation, EffectKind, Interceptor, MatchState, Phase, Projectile, Side};
use crate::tuning::Tuning;

/// Offset of the "+1 Bomb" marker below the interception point
const BONUS_EFFECT_OFFSET: Vec2 = Vec2::new(0.0, 30.0);

/// Something the owner of the match should react to (notifications, logging)
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// `target`'s flag lost `damage` dryness
    FlagHit { target: Side, damage: f32, direct: bool },
    /// Attack projectile from `owner` hit the ground away from the flag
    Miss { owner: Side, position: Vec2 },
    /// `defender` destroyed the incoming projectile and captured it
    Intercepted { defender: Side, position: Vec2 },
}

/// Result of one simulation step
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    /// An attack projectile finished (hit, miss or interception); the turn is over
    pub attack_resolved: bool,
    pub events: Vec<SimEvent>,
    /// Effects created this tick, in creation order
    pub new_effects: Vec<u32>,
}

/// Advance all projectiles by one tick
pub fn tick(state: &mut MatchState, tuning: &Tuning) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.projectiles.is_empty() {
        return outcome;
    }

    let wind = state.wind;
    let mut attacks: Vec<AttackProjectile> = Vec::new();
    let mut flying: Vec<Interceptor> = Vec::new();
    let mut fading: Vec<Interceptor> = Vec::new();

    for projectile in std::mem::take(&mut state.projectiles) {
        match projectile {
            Projectile::Attack(mut attack) => {
                (attack.position, attack.velocity) =
                    integrate_attack(attack.position, attack.velocity, &wind, tuning);
                attacks.push(attack);
            }
            Projectile::Interceptor(mut shield) => {
                if let Some(detonation) = shield.detonation.as_mut() {
                    detonation.age += 1;
                    if detonation.age <= tuning.interceptor_decay_ticks {
                        fading.push(shield);
                    }
                    continue;
                }
                (shield.position, shield.velocity) = integrate_interceptor(shield.position, shield.velocity);
                flying.push(shield);
            }
        }
    }

    let mut in_flight = Vec::with_capacity(attacks.len());
    for attack in attacks {
        if resolve_attack(state, &attack, tuning, &mut outcome) {
            outcome.attack_resolved = true;
        } else {
            in_flight.push(attack);
        }
    }

    for mut shield in flying {
        if out_of_bounds(shield.position) {
            continue;
        }

        let radius = tuning.interceptor_explosion_radius;
        let hit = in_flight
            .iter()
            .position(|a| a.owner != shield.owner && distance(a.position, shield.position) < radius);
        if let Some(idx) = hit {
            let captured = in_flight.remove(idx);
            intercept(state, &shield, &captured, &mut outcome);
            outcome.attack_resolved = true;
            continue;
        }

        if distance(shield.position, shield.target) < tuning.interceptor_target_tolerance {
            shield.detonation = Some(Detonation { radius, age: 0 });
        }
        fading.push(shield);
    }

    if outcome.attack_resolved {
        state.projectiles.clear();
        state.phase = Phase::Resolving;
        return outcome;
    }

    state.projectiles = in_flight
        .into_iter()
        .map(Projectile::Attack)
        .chain(fading.into_iter().map(Projectile::Interceptor))
        .collect();
    state.projectiles.sort_by_key(Projectile::id);
    outcome
}

/// Ground impact or direct flag hit; returns true if the projectile is done
fn resolve_attack(state: &mut MatchState, attack: &AttackProjectile, tuning: &Tuning, outcome: &mut TickOutcome) -> bool {
    let target = attack.owner.opponent();
    let flag = target.flag_position();

    if out_of_bounds(attack.position) {
        match splash_damage(splash_distance(attack.position, flag), tuning) {
            Some(damage) => soak_flag(state, target, damage, false, attack.position, tuning, outcome),
            None => {
                let id = state.push_effect(EffectKind::Miss, attack.position, "Miss!");
                outcome.new_effects.push(id);
                outcome.events.push(SimEvent::Miss {
                    owner: attack.owner,
                    position: attack.position,
                });
                log::debug!("{:?} missed at ({:.0}, {:.0})", attack.owner, attack.position.x, attack.position.y);
            }
        }
        return true;
    }

    if in_flag_hitbox(attack.position, flag) {
        soak_flag(state, target, tuning.direct_hit_damage, true, attack.position, tuning, outcome);
        return true;
    }

    false
}

fn soak_flag(
    state: &mut MatchState,
    target: Side,
    damage: f32,
    direct: bool,
    position: Vec2,
    tuning: &Tuning,
    outcome: &mut TickOutcome,
) {
    state.combatant_mut(target).soak(damage, tuning);
    let id = state.push_effect(EffectKind::Sploosh, position, format!("{}%", damage.round()));
    outcome.new_effects.push(id);
    outcome.events.push(SimEvent::FlagHit { target, damage, direct });
    log::debug!(
        "{:?} flag soaked for {:.1} ({}), dryness now {:.1}",
        target,
        damage,
        if direct { "direct" } else { "splash" },
        state.combatant(target).dryness
    );
}

fn intercept(state: &mut MatchState, shield: &Interceptor, captured: &AttackProjectile, outcome: &mut TickOutcome) {
    let defender = shield.owner;
    state.combatant_mut(defender).bombs += 1;

    let at = shield.position;
    let boom = state.push_effect(EffectKind::Intercept, at, "Intercept!");
    let bonus = state.push_effect(EffectKind::BonusAmmo, at + BONUS_EFFECT_OFFSET, "+1 Bomb");
    outcome.new_effects.extend([boom, bonus]);
    outcome.events.push(SimEvent::Intercepted { defender, position: at });
    log::debug!("{:?} intercepted projectile {} from {:?}", defender, captured.id, captured.owner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Difficulty;
    use crate::consts::*;
    use crate::sim::state::{EffectKind, Wind, WindDirection};

    fn calm_match() -> (MatchState, Tuning) {
        let tuning = Tuning::default();
        let state = MatchState::new(Difficulty::SplishSplash, Wind::new(WindDirection::East, 0.0), &tuning);
        (state, tuning)
    }

    fn place_attack(state: &mut MatchState, owner: Side, position: Vec2, velocity: Vec2) {
        let id = state.spawn_attack(owner, velocity);
        if let Some(Projectile::Attack(a)) = state.projectiles.iter_mut().find(|p| p.id() == id) {
            a.position = position;
        }
    }

    fn place_interceptor(state: &mut MatchState, owner: Side, position: Vec2, velocity: Vec2, target: Vec2) {
        let id = state.spawn_interceptor(owner, velocity, target);
        if let Some(Projectile::Interceptor(i)) = state.projectiles.iter_mut().find(|p| p.id() == id) {
            i.position = position;
        }
    }

    #[test]
    fn test_flight_continues_in_bounds() {
        let (mut state, tuning) = calm_match();
        state.phase = Phase::Defending;
        place_attack(&mut state, Side::Player, Vec2::new(600.0, 200.0), Vec2::new(5.0, -5.0));
        let outcome = tick(&mut state, &tuning);
        assert!(!outcome.attack_resolved);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.phase, Phase::Defending);
        assert!(state.projectiles[0].position().abs_diff_eq(Vec2::new(605.0, 195.2), 1e-3));
    }

    #[test]
    fn test_direct_hit_applies_fixed_damage() {
        let (mut state, tuning) = calm_match();
        state.phase = Phase::Defending;
        // One tick away from the middle of the AI flag
        let inside = Vec2::new(AI_FLAG_POSITION.x, AI_FLAG_POSITION.y - 50.0);
        place_attack(&mut state, Side::Player, inside - Vec2::new(2.0, 0.0), Vec2::new(2.0, -tuning.gravity));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert_eq!(state.phase, Phase::Resolving);
        assert!(state.projectiles.is_empty());
        assert!((state.ai.dryness - (100.0 - tuning.direct_hit_damage)).abs() < 1e-4);
        assert_eq!(state.player.dryness, 100.0);
        assert_eq!(state.effects[0].kind, EffectKind::Sploosh);
        assert_eq!(state.effects[0].text, "20%");
        assert!(matches!(outcome.events[0], SimEvent::FlagHit { target: Side::Ai, direct: true, .. }));
    }

    #[test]
    fn test_splash_near_flag() {
        let (mut state, tuning) = calm_match();
        // Lands 50 units short of the player's flag
        let x = PLAYER_FLAG_POSITION.x + 50.0;
        place_attack(&mut state, Side::Ai, Vec2::new(x, GROUND_HEIGHT - 1.0), Vec2::new(0.0, 5.0));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert!((state.player.dryness - 90.0).abs() < 1e-3);
        assert_eq!(state.effects[0].text, "10%");
        assert!(matches!(outcome.events[0], SimEvent::FlagHit { target: Side::Player, direct: false, .. }));
    }

    #[test]
    fn test_far_impact_is_a_miss() {
        let (mut state, tuning) = calm_match();
        place_attack(&mut state, Side::Player, Vec2::new(640.0, GROUND_HEIGHT - 1.0), Vec2::new(0.0, 5.0));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert_eq!(state.ai.dryness, 100.0);
        assert_eq!(state.effects[0].kind, EffectKind::Miss);
        assert!(matches!(outcome.events[0], SimEvent::Miss { owner: Side::Player, .. }));
    }

    #[test]
    fn test_high_exit_past_edge_is_a_miss() {
        let (mut state, tuning) = calm_match();
        place_attack(&mut state, Side::Player, Vec2::new(GAME_WIDTH - 5.0, -300.0), Vec2::new(10.0, -tuning.gravity));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert_eq!(state.ai.dryness, 100.0);
        assert_eq!(state.effects[0].kind, EffectKind::Miss);
        assert!(matches!(outcome.events[0], SimEvent::Miss { owner: Side::Player, .. }));
    }

    #[test]
    fn test_low_exit_past_edge_splashes() {
        let (mut state, tuning) = calm_match();
        // Leaves past the left edge just above the ground, 50 from the player's flag
        place_attack(&mut state, Side::Ai, Vec2::new(2.0, GROUND_HEIGHT - 1.0), Vec2::new(-4.0, -tuning.gravity));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert!(state.player.dryness < 100.0);
        assert!(matches!(outcome.events[0], SimEvent::FlagHit { target: Side::Player, direct: false, .. }));
    }

    #[test]
    fn test_dryness_floors_at_zero() {
        let (mut state, tuning) = calm_match();
        state.ai.dryness = 5.0;
        let inside = Vec2::new(AI_FLAG_POSITION.x, AI_FLAG_POSITION.y - 50.0);
        place_attack(&mut state, Side::Player, inside, Vec2::new(0.0, -tuning.gravity));
        tick(&mut state, &tuning);
        assert_eq!(state.ai.dryness, 0.0);
    }

    #[test]
    fn test_interception_captures_bomb() {
        let (mut state, tuning) = calm_match();
        state.phase = Phase::Defending;
        let ai_bombs = state.ai.bombs;
        place_attack(&mut state, Side::Player, Vec2::new(600.0, 200.0), Vec2::ZERO);
        place_interceptor(&mut state, Side::Ai, Vec2::new(640.0, 200.0), Vec2::ZERO, Vec2::new(0.0, 0.0));
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert_eq!(state.ai.bombs, ai_bombs + 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase, Phase::Resolving);
        let kinds: Vec<_> = state.effects.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EffectKind::Intercept, EffectKind::BonusAmmo]);
        assert_eq!(outcome.new_effects.len(), 2);
        assert_eq!(state.effects[1].position, state.effects[0].position + Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_interceptor_ignores_own_side() {
        let (mut state, tuning) = calm_match();
        place_attack(&mut state, Side::Player, Vec2::new(600.0, 200.0), Vec2::ZERO);
        place_interceptor(&mut state, Side::Player, Vec2::new(610.0, 200.0), Vec2::ZERO, Vec2::new(0.0, 0.0));
        let outcome = tick(&mut state, &tuning);
        assert!(!outcome.attack_resolved);
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_interception_preempts_target_detonation() {
        let (mut state, tuning) = calm_match();
        let spot = Vec2::new(600.0, 200.0);
        place_attack(&mut state, Side::Ai, spot, Vec2::ZERO);
        // Arrives at its target this very tick, with the bomb inside the radius
        place_interceptor(&mut state, Side::Player, spot - Vec2::new(15.0, 0.0), Vec2::new(15.0, 0.0), spot);
        let outcome = tick(&mut state, &tuning);
        assert!(outcome.attack_resolved);
        assert!(matches!(outcome.events[0], SimEvent::Intercepted { defender: Side::Player, .. }));
    }

    #[test]
    fn test_interceptor_detonates_then_fades() {
        let (mut state, tuning) = calm_match();
        let target = Vec2::new(400.0, 300.0);
        place_interceptor(&mut state, Side::Player, target - Vec2::new(15.0, 0.0), Vec2::new(15.0, 0.0), target);
        tick(&mut state, &tuning);
        match &state.projectiles[0] {
            Projectile::Interceptor(i) => assert!(i.has_exploded()),
            other => panic!("unexpected projectile {other:?}"),
        }
        let pos = state.projectiles[0].position();

        for _ in 0..tuning.interceptor_decay_ticks {
            tick(&mut state, &tuning);
            assert_eq!(state.projectiles.len(), 1);
            assert_eq!(state.projectiles[0].position(), pos);
        }
        let outcome = tick(&mut state, &tuning);
        assert!(state.projectiles.is_empty());
        assert!(!outcome.attack_resolved);
    }

    #[test]
    fn test_exploded_interceptor_does_not_intercept() {
        let (mut state, tuning) = calm_match();
        let spot = Vec2::new(600.0, 200.0);
        place_interceptor(&mut state, Side::Player, spot, Vec2::ZERO, spot);
        if let Projectile::Interceptor(i) = &mut state.projectiles[0] {
            i.detonation = Some(Detonation { radius: 50.0, age: 0 });
        }
        place_attack(&mut state, Side::Ai, spot, Vec2::ZERO);
        let outcome = tick(&mut state, &tuning);
        assert!(!outcome.attack_resolved);
    }

    #[test]
    fn test_interceptor_out_of_bounds_does_not_end_turn() {
        let (mut state, tuning) = calm_match();
        state.phase = Phase::Defending;
        place_attack(&mut state, Side::Ai, Vec2::new(900.0, 100.0), Vec2::ZERO);
        place_interceptor(&mut state, Side::Player, Vec2::new(5.0, 300.0), Vec2::new(-15.0, 0.0), Vec2::new(-500.0, 300.0));
        let outcome = tick(&mut state, &tuning);
        assert!(!outcome.attack_resolved);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].as_attack().is_some());
        assert_eq!(state.phase, Phase::Defending);
    }
}
