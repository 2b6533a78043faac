//! Match state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here, so a snapshot of
//! `MatchState` is a complete picture of the match.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::consts::*;
use crate::tuning::Tuning;

/// One of the two combatants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Fixed launch point for this side
    pub fn launch_position(self) -> Vec2 {
        match self {
            Side::Player => PLAYER_POSITION,
            Side::Ai => AI_POSITION,
        }
    }

    /// Anchor of this side's own flag
    pub fn flag_position(self) -> Vec2 {
        match self {
            Side::Player => PLAYER_FLAG_POSITION,
            Side::Ai => AI_FLAG_POSITION,
        }
    }
}

/// Final result of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player,
    Ai,
    Draw,
}

/// Top-level match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    MainMenu,
    Playing,
    GameOver,
}

/// Phase within the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Active side may fire, the idle side may pre-emptively defend
    #[default]
    Aiming,
    /// An attack projectile is in flight
    Defending,
    /// End-of-turn effects are playing
    Resolving,
    /// Turn hand-off in progress
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindDirection {
    #[default]
    East,
    West,
}

impl WindDirection {
    /// +1 pushes toward larger x
    pub fn sign(self) -> f32 {
        match self {
            WindDirection::East => 1.0,
            WindDirection::West => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    pub direction: WindDirection,
    pub speed: f32,
}

impl Wind {
    pub fn new(direction: WindDirection, speed: f32) -> Self {
        Self {
            direction,
            speed: speed.max(0.0),
        }
    }

    /// Horizontal acceleration applied to attack projectiles each tick
    #[inline]
    pub fn force(&self, wind_factor: f32) -> f32 {
        self.direction.sign() * self.speed * wind_factor
    }
}

/// Per-side resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Health-like resource, 0 is defeat
    pub dryness: f32,
    /// Ammo
    pub bombs: u32,
    /// Defence resource spent on interceptors
    pub charge: u32,
    pub position: Vec2,
}

impl Combatant {
    pub fn new(side: Side, tuning: &Tuning) -> Self {
        Self {
            dryness: tuning.initial_dryness,
            bombs: tuning.initial_bombs,
            charge: tuning.initial_charge,
            position: side.launch_position(),
        }
    }

    /// Remove dryness, clamped to [0, initial]
    pub fn soak(&mut self, damage: f32, tuning: &Tuning) {
        self.dryness = (self.dryness - damage).clamp(0.0, tuning.initial_dryness);
    }

    pub fn is_defeated(&self) -> bool {
        self.dryness <= 0.0
    }

    /// Spend charge on an interceptor; refused when it would go negative
    pub fn try_spend_charge(&mut self, cost: u32) -> bool {
        if self.charge < cost {
            return false;
        }
        self.charge -= cost;
        true
    }

    /// Regain charge, capped
    pub fn regen_charge(&mut self, amount: u32, cap: u32) {
        self.charge = self.charge.saturating_add(amount).min(cap);
    }
}

/// A lobbed water bomb, subject to gravity and wind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackProjectile {
    pub id: u32,
    pub owner: Side,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Area-of-effect left behind by an interceptor that reached its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    pub radius: f32,
    /// Ticks since detonation
    pub age: u32,
}

/// An air shield flying in a straight line toward its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interceptor {
    pub id: u32,
    pub owner: Side,
    pub position: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    pub detonation: Option<Detonation>,
}

impl Interceptor {
    pub fn has_exploded(&self) -> bool {
        self.detonation.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projectile {
    Attack(AttackProjectile),
    Interceptor(Interceptor),
}

impl Projectile {
    pub fn id(&self) -> u32 {
        match self {
            Projectile::Attack(p) => p.id,
            Projectile::Interceptor(p) => p.id,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Projectile::Attack(p) => p.position,
            Projectile::Interceptor(p) => p.position,
        }
    }

    pub fn as_attack(&self) -> Option<&AttackProjectile> {
        match self {
            Projectile::Attack(p) => Some(p),
            Projectile::Interceptor(_) => None,
        }
    }
}

/// Drag gesture and its preview arc
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AimingState {
    pub start: Option<Vec2>,
    pub end: Option<Vec2>,
    pub active: bool,
    pub trajectory: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Flag soaked (direct or splash)
    Sploosh,
    Miss,
    Intercept,
    /// Captured bomb added to the defender's ammo
    BonusAmmo,
}

/// Short-lived visual marker; expires after a fixed display time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: u32,
    pub kind: EffectKind,
    pub position: Vec2,
    pub text: String,
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub status: MatchStatus,
    pub player: Combatant,
    pub ai: Combatant,
    pub difficulty: Difficulty,
    pub wind: Wind,
    /// In-flight projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub current_turn: Side,
    pub phase: Phase,
    /// 1..=max_rounds
    pub round: u32,
    pub winner: Option<Winner>,
    pub aiming: AimingState,
    pub effects: Vec<Effect>,
    pub notification: Option<String>,
    /// 0 when no tutorial is running
    pub tutorial_step: u8,
    /// Next entity ID
    next_id: u32,
}

impl MatchState {
    /// Idle state shown behind the main menu
    pub fn menu(tuning: &Tuning) -> Self {
        Self {
            status: MatchStatus::MainMenu,
            player: Combatant::new(Side::Player, tuning),
            ai: Combatant::new(Side::Ai, tuning),
            difficulty: Difficulty::default(),
            wind: Wind::default(),
            projectiles: Vec::new(),
            current_turn: Side::Player,
            phase: Phase::Aiming,
            round: 1,
            winner: None,
            aiming: AimingState::default(),
            effects: Vec::new(),
            notification: None,
            tutorial_step: 0,
            next_id: 1,
        }
    }

    /// Fresh match: full resources, round 1, player to move
    pub fn new(difficulty: Difficulty, wind: Wind, tuning: &Tuning) -> Self {
        let mut state = Self::menu(tuning);
        state.status = MatchStatus::Playing;
        state.difficulty = difficulty;
        state.ai.bombs += difficulty.profile().bomb_bonus;
        state.wind = wind;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }

    /// The attack projectile launched by `owner`, if one is in flight
    pub fn attack_in_flight(&self, owner: Side) -> Option<&AttackProjectile> {
        self.projectiles
            .iter()
            .filter_map(Projectile::as_attack)
            .find(|p| p.owner == owner)
    }

    /// Whether the simulation and turn controller should run
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Playing && self.tutorial_step == 0
    }

    /// Launch an attack projectile for `owner`
    pub fn spawn_attack(&mut self, owner: Side, velocity: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::Attack(AttackProjectile {
            id,
            owner,
            position: owner.launch_position(),
            velocity,
        }));
        id
    }

    /// Launch an interceptor for `owner` toward `target`
    pub fn spawn_interceptor(&mut self, owner: Side, velocity: Vec2, target: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::Interceptor(Interceptor {
            id,
            owner,
            position: owner.launch_position(),
            velocity,
            target,
            detonation: None,
        }));
        id
    }

    /// Queue a visual effect, returning its id
    pub fn push_effect(&mut self, kind: EffectKind, position: Vec2, text: impl Into<String>) -> u32 {
        let id = self.next_entity_id();
        self.effects.push(Effect {
            id,
            kind,
            position,
            text: text.into(),
        });
        id
    }

    pub fn remove_effect(&mut self, id: u32) {
        self.effects.retain(|e| e.id != id);
    }
}
