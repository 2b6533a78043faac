//! Data-driven game balance
//!
//! Every value has a default matching the shipped game, and any subset can be
//! overridden from JSON.

use serde::{Deserialize, Serialize};

/// Balance values consumed by the simulation, turn rules and AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Last round; the match ends after the AI's turn in this round
    pub max_rounds: u32,
    pub initial_bombs: u32,
    pub initial_dryness: f32,
    /// Starting charge, also the charge cap
    pub initial_charge: u32,
    /// Charge spent per interceptor
    pub shield_cost: u32,
    /// Charge regained when a side's turn begins
    pub charge_regen: u32,

    // === Damage ===
    pub direct_hit_damage: f32,
    pub max_splash_damage: f32,
    pub min_splash_damage: f32,
    pub splash_radius: f32,

    // === Physics (per tick) ===
    pub gravity: f32,
    pub wind_factor: f32,
    /// Upper bound of the opening wind speed
    pub initial_wind_max: f32,
    /// Total width of the per-turn wind speed drift
    pub wind_drift: f32,

    // === Aiming ===
    pub aim_power_factor: f32,
    pub max_aim_distance: f32,

    // === Interceptors ===
    pub interceptor_speed: f32,
    pub interceptor_explosion_radius: f32,
    /// Distance at which an interceptor counts as arrived at its target
    pub interceptor_target_tolerance: f32,
    /// Ticks an exploded interceptor lingers before removal
    pub interceptor_decay_ticks: u32,

    // === AI ===
    /// Ticks the AI looks ahead when predicting an intercept point
    pub ai_prediction_ticks: u32,
    /// Launch power per unit of distance to the aim point
    pub ai_power_scale: f32,
    /// Velocity correction per unit of wind force when compensating fully
    pub ai_wind_compensation: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_rounds: 20,
            initial_bombs: 10,
            initial_dryness: 100.0,
            initial_charge: 100,
            shield_cost: 25,
            charge_regen: 10,

            direct_hit_damage: 20.0,
            max_splash_damage: 15.0,
            min_splash_damage: 5.0,
            splash_radius: 100.0,

            gravity: 0.2,
            wind_factor: 0.005,
            initial_wind_max: 20.0,
            wind_drift: 5.0,

            aim_power_factor: 0.15,
            max_aim_distance: 200.0,

            interceptor_speed: 15.0,
            interceptor_explosion_radius: 50.0,
            interceptor_target_tolerance: 10.0,
            interceptor_decay_ticks: 10,

            ai_prediction_ticks: 30,
            ai_power_scale: 0.1,
            ai_wind_compensation: 50.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Strongest launch the aiming gesture can produce
    pub fn max_launch_power(&self) -> f32 {
        self.max_aim_distance * self.aim_power_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_rounds": 5, "gravity": 0.3 }"#).unwrap();
        assert_eq!(tuning.max_rounds, 5);
        assert!((tuning.gravity - 0.3).abs() < f32::EPSILON);
        assert_eq!(tuning.shield_cost, Tuning::default().shield_cost);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ max_rounds: ").is_err());
    }

    #[test]
    fn test_max_launch_power() {
        assert!((Tuning::default().max_launch_power() - 30.0).abs() < 1e-4);
    }
}
