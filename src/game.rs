//! The match owner
//!
//! `Game` is the only thing that mutates `MatchState`. Input actions, the
//! fixed-step simulation and every delayed task (AI think time, reaction
//! jitter, effect expiry, turn hand-off) are applied here one at a time
//! against the current state, so a delayed task never works from a stale
//! copy. Tasks are cancelled wholesale when a match starts or the player
//! returns to the menu.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::ai::{self, Difficulty};
use crate::consts::*;
use crate::ms_to_ticks;
use crate::progress::{MemoryStorage, Progress, Storage};
use crate::schedule::Scheduler;
use crate::sim::physics::{launch_velocity, preview_trajectory, velocity_toward};
use crate::sim::turn::{advance_turn, opening_wind};
use crate::sim::{AimingState, MatchState, MatchStatus, Phase, Side, SimEvent, TickOutcome, TurnAdvance, Winner, tick};
use crate::tuning::Tuning;

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    /// Finish the current turn
    AdvanceTurn,
    /// Allow the next turn hand-off
    ReleaseTurnLock,
    /// AI has finished "thinking" and throws
    AiThink,
    /// AI reacts to the player's shot
    AiDefend,
    ExpireEffect(u32),
    /// Clear the notification if it is still the one with this serial
    ClearNotification(u64),
}

/// A match plus everything needed to drive it
pub struct Game<S: Storage = MemoryStorage> {
    state: MatchState,
    tuning: Tuning,
    rng: Pcg32,
    storage: S,
    progress: Progress,
    timers: Scheduler<Task>,
    /// Ticks since creation
    clock: u64,
    /// Unsimulated frame time (seconds)
    accumulator: f32,
    /// Set while a turn hand-off is settling
    turn_lock: bool,
    notification_serial: u64,
}

impl<S: Storage> Game<S> {
    pub fn new(storage: S, seed: u64) -> Self {
        Self::with_tuning(storage, seed, Tuning::default())
    }

    pub fn with_tuning(storage: S, seed: u64, tuning: Tuning) -> Self {
        let progress = Progress::load(&storage);
        Self {
            state: MatchState::menu(&tuning),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            storage,
            progress,
            timers: Scheduler::new(),
            clock: 0,
            accumulator: 0.0,
            turn_lock: false,
            notification_serial: 0,
        }
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.state)
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Ticks simulated so far
    pub fn clock(&self) -> u64 {
        self.clock
    }

    // === Match lifecycle ===

    /// Start a fresh match against `difficulty`; ignored if the tier is locked
    pub fn start_game(&mut self, difficulty: Difficulty) -> bool {
        self.progress = Progress::load(&self.storage);
        if !self.progress.is_unlocked(difficulty) {
            log::warn!("{} is locked (unlocked level {})", difficulty.as_str(), self.progress.unlocked_level);
            return false;
        }

        self.timers.cancel_all();
        self.turn_lock = false;

        let wind = opening_wind(&mut self.rng, &self.tuning);
        self.state = MatchState::new(difficulty, wind, &self.tuning);
        self.state.notification = None;

        if self.progress.tutorial_completed {
            self.begin_turn(Side::Player);
        } else {
            self.state.tutorial_step = 1;
        }

        log::info!(
            "Match started vs {} (wind {:?} {:.1}, tutorial: {})",
            difficulty.as_str(),
            wind.direction,
            wind.speed,
            self.state.tutorial_step > 0
        );
        true
    }

    /// Start again at the current difficulty
    pub fn restart(&mut self) -> bool {
        self.start_game(self.state.difficulty)
    }

    pub fn return_to_menu(&mut self) {
        self.timers.cancel_all();
        self.turn_lock = false;
        self.state = MatchState::menu(&self.tuning);
        self.progress = Progress::load(&self.storage);
    }

    /// Move to the next tutorial overlay, completing the tutorial after the last
    pub fn advance_tutorial(&mut self) -> bool {
        if self.state.status != MatchStatus::Playing || self.state.tutorial_step == 0 {
            return false;
        }

        self.state.tutorial_step += 1;
        if self.state.tutorial_step > TUTORIAL_STEPS {
            self.state.tutorial_step = 0;
            self.progress.complete_tutorial(&mut self.storage);
            self.begin_turn(Side::Player);
        }
        true
    }

    // === Player actions ===

    fn player_may_throw(&self) -> bool {
        self.state.is_live()
            && self.state.current_turn == Side::Player
            && self.state.phase == Phase::Aiming
            && self.state.player.bombs > 0
    }

    /// Begin a drag gesture at `point`
    pub fn start_aim(&mut self, point: Vec2) -> bool {
        if !self.player_may_throw() {
            return false;
        }
        self.state.aiming = AimingState {
            start: Some(point),
            end: None,
            active: true,
            trajectory: Vec::new(),
        };
        true
    }

    /// Move the drag to `point` and recompute the preview arc
    pub fn update_aim(&mut self, point: Vec2) -> bool {
        let Some(start) = self.state.aiming.start else {
            return false;
        };
        if !self.player_may_throw() {
            return false;
        }
        let velocity = launch_velocity(start, point, &self.tuning);
        self.state.aiming.end = Some(point);
        self.state.aiming.trajectory =
            preview_trajectory(self.state.player.position, velocity, &self.state.wind, &self.tuning);
        true
    }

    /// Release the drag at `point` and throw
    pub fn fire(&mut self, point: Vec2) -> bool {
        let Some(start) = self.state.aiming.start else {
            return false;
        };
        if !self.player_may_throw() {
            return false;
        }

        let velocity = launch_velocity(start, point, &self.tuning);
        self.state.spawn_attack(Side::Player, velocity);
        self.state.player.bombs -= 1;
        self.state.aiming = AimingState::default();
        self.state.phase = Phase::Defending;
        log::debug!("Player throws with velocity ({:.2}, {:.2})", velocity.x, velocity.y);

        let profile = self.state.difficulty.profile();
        if ai::wants_to_defend(&mut self.rng, &profile, self.state.ai.charge, &self.tuning) {
            let delay = ai::reaction_delay_ms(&mut self.rng);
            self.schedule(delay, Task::AiDefend);
        }
        true
    }

    /// Launch an interceptor toward `point` during the AI's turn
    pub fn defend(&mut self, point: Vec2) -> bool {
        if !self.state.is_live()
            || self.state.current_turn != Side::Ai
            || !matches!(self.state.phase, Phase::Aiming | Phase::Defending)
        {
            return false;
        }
        if !self.state.player.try_spend_charge(self.tuning.shield_cost) {
            return false;
        }

        let origin = self.state.player.position;
        let velocity = velocity_toward(origin, point, self.tuning.interceptor_speed);
        self.state.spawn_interceptor(Side::Player, velocity, point);
        true
    }

    // === Driving ===

    /// Advance by a frame's worth of wall-clock time (seconds)
    pub fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Run as many ticks as fit in `ms`
    pub fn advance_ms(&mut self, ms: u64) {
        for _ in 0..ms_to_ticks(ms) {
            self.step();
        }
    }

    /// One fixed tick: due tasks first, then the simulation
    pub fn step(&mut self) {
        self.clock += 1;

        for task in self.timers.drain_due(self.clock) {
            self.run_task(task);
        }

        if self.state.is_live() {
            let outcome = tick(&mut self.state, &self.tuning);
            self.apply_outcome(outcome);
        }
    }

    fn schedule(&mut self, delay_ms: u64, task: Task) {
        self.timers.schedule(self.clock, ms_to_ticks(delay_ms), task);
    }

    /// Show `text`, replacing any current notification
    fn notify(&mut self, text: &str, duration_ms: u64) {
        self.notification_serial += 1;
        self.state.notification = Some(text.to_string());
        self.schedule(duration_ms, Task::ClearNotification(self.notification_serial));
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::AdvanceTurn => self.next_turn(),
            Task::ReleaseTurnLock => self.turn_lock = false,
            Task::AiThink => self.ai_throw(),
            Task::AiDefend => self.ai_defend(),
            Task::ExpireEffect(id) => self.state.remove_effect(id),
            Task::ClearNotification(serial) => {
                if serial == self.notification_serial {
                    self.state.notification = None;
                }
            }
        }
    }

    fn apply_outcome(&mut self, outcome: TickOutcome) {
        for id in outcome.new_effects {
            self.schedule(EFFECT_LIFETIME_MS, Task::ExpireEffect(id));
        }
        for event in &outcome.events {
            match event {
                SimEvent::FlagHit { .. } => self.notify("FLAG HIT!", SHORT_NOTIFICATION_MS),
                SimEvent::Intercepted { .. } => self.notify("INTERCEPTED!", SHORT_NOTIFICATION_MS),
                SimEvent::Miss { .. } => {}
            }
        }
        if outcome.attack_resolved {
            self.schedule(RESOLVE_PAUSE_MS, Task::AdvanceTurn);
        }
    }

    // === Turn controller ===

    /// Hand the turn over; repeated calls while settling collapse into one
    fn next_turn(&mut self) {
        if self.turn_lock {
            log::debug!("Turn hand-off already in progress");
            return;
        }
        if self.state.status != MatchStatus::Playing {
            return;
        }
        self.turn_lock = true;
        self.schedule(TURN_LOCK_MS, Task::ReleaseTurnLock);

        match advance_turn(&mut self.state, &mut self.rng, &self.tuning) {
            Some(TurnAdvance::GameOver(winner)) => self.finish(winner),
            Some(TurnAdvance::NextTurn(side)) => self.begin_turn(side),
            None => {}
        }
    }

    fn finish(&mut self, winner: Winner) {
        // Drop pending notification clears so the result screen stays quiet
        self.notification_serial += 1;
        log::info!(
            "Game over after round {}: {:?} (player {:.1}/{} vs AI {:.1}/{})",
            self.state.round,
            winner,
            self.state.player.dryness,
            self.state.player.bombs,
            self.state.ai.dryness,
            self.state.ai.bombs
        );
        if winner == Winner::Player {
            self.progress.record_win(&mut self.storage, self.state.difficulty);
        }
    }

    fn begin_turn(&mut self, side: Side) {
        log::info!(
            "Round {}: {:?} to move (wind {:?} {:.1})",
            self.state.round,
            side,
            self.state.wind.direction,
            self.state.wind.speed
        );
        match side {
            Side::Player if self.state.player.bombs == 0 => self.forfeit("NO AMMO!"),
            Side::Player => {
                self.state.phase = Phase::Aiming;
                self.notify("YOUR TURN", NOTIFICATION_MS);
            }
            Side::Ai => {
                self.state.phase = Phase::Aiming;
                self.notify("AI'S TURN", SHORT_NOTIFICATION_MS);
                self.schedule(AI_THINK_MS, Task::AiThink);
            }
        }
    }

    /// Skip the active side's throw
    fn forfeit(&mut self, message: &str) {
        log::info!("{:?} has no ammo, turn forfeited", self.state.current_turn);
        self.state.phase = Phase::Transition;
        self.notify(message, NOTIFICATION_MS);
        self.schedule(FORFEIT_PAUSE_MS, Task::AdvanceTurn);
    }

    fn ai_throw(&mut self) {
        if !self.state.is_live() || self.state.current_turn != Side::Ai || self.state.phase != Phase::Aiming {
            return;
        }
        if self.state.ai.bombs == 0 {
            self.forfeit("AI HAS NO AMMO!");
            return;
        }

        let profile = self.state.difficulty.profile();
        let velocity = ai::plan_attack(&mut self.rng, Side::Ai, &self.state.wind, &profile, &self.tuning);
        self.state.spawn_attack(Side::Ai, velocity);
        self.state.ai.bombs -= 1;
        self.state.phase = Phase::Defending;
    }

    fn ai_defend(&mut self) {
        if !self.state.is_live() || self.state.current_turn != Side::Player || self.state.phase != Phase::Defending {
            return;
        }
        let Some(incoming) = self.state.attack_in_flight(Side::Player) else {
            return;
        };
        let (velocity, target) = ai::plan_interception(incoming, Side::Ai, &self.state.wind, &self.tuning);
        if !self.state.ai.try_spend_charge(self.tuning.shield_cost) {
            return;
        }
        self.state.spawn_interceptor(Side::Ai, velocity, target);
        log::debug!("AI launches interceptor toward ({:.0}, {:.0})", target.x, target.y);
    }
}
