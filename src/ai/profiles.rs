//! Difficulty tiers and their behaviour profiles.
//!
//! Five fixed tiers, from a sloppy thrower that ignores the wind to perfect
//! play with extra ammo and faster recharge.

use serde::{Deserialize, Serialize};

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    SplishSplash,
    SprayAndPray,
    PowerShower,
    SuperSoaker,
    WetAndWild,
}

/// Behaviour parameters for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Width of the uniform noise added to the aim point
    pub accuracy_error: f32,
    /// Share of the wind drift left uncorrected (1.0 ignores wind, 0.0 corrects fully)
    pub wind_error_factor: f32,
    /// Chance of attempting a defence against each player shot
    pub defense_probability: f32,
    /// Extra starting ammo
    pub bomb_bonus: u32,
    /// Extra charge regained at the start of each AI turn
    pub charge_regen_bonus: u32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::SplishSplash,
        Difficulty::SprayAndPray,
        Difficulty::PowerShower,
        Difficulty::SuperSoaker,
        Difficulty::WetAndWild,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::SplishSplash => "Splish Splash",
            Difficulty::SprayAndPray => "Spray and Pray",
            Difficulty::PowerShower => "Power Shower",
            Difficulty::SuperSoaker => "Super Soaker",
            Difficulty::WetAndWild => "Wet and Wild",
        }
    }

    /// 1-based level used for unlock progression
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::SplishSplash => 1,
            Difficulty::SprayAndPray => 2,
            Difficulty::PowerShower => 3,
            Difficulty::SuperSoaker => 4,
            Difficulty::WetAndWild => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        Self::ALL.get(usize::from(level).checked_sub(1)?).copied()
    }

    /// The tier above this one, if any
    pub fn next(&self) -> Option<Self> {
        Self::from_level(self.level() + 1)
    }

    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::SplishSplash => DifficultyProfile {
                accuracy_error: 50.0,
                wind_error_factor: 1.0,
                defense_probability: 0.2,
                bomb_bonus: 0,
                charge_regen_bonus: 0,
            },
            Difficulty::SprayAndPray => DifficultyProfile {
                accuracy_error: 25.0,
                wind_error_factor: 0.7,
                defense_probability: 0.5,
                bomb_bonus: 0,
                charge_regen_bonus: 0,
            },
            Difficulty::PowerShower => DifficultyProfile {
                accuracy_error: 10.0,
                wind_error_factor: 0.3,
                defense_probability: 0.8,
                bomb_bonus: 0,
                charge_regen_bonus: 0,
            },
            Difficulty::SuperSoaker => DifficultyProfile {
                accuracy_error: 2.0,
                wind_error_factor: 0.1,
                defense_probability: 1.0,
                bomb_bonus: 0,
                charge_regen_bonus: 0,
            },
            Difficulty::WetAndWild => DifficultyProfile {
                accuracy_error: 0.0,
                wind_error_factor: 0.0,
                defense_probability: 1.0,
                bomb_bonus: 5,
                charge_regen_bonus: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_level(d.level()), Some(d));
        }
        assert_eq!(Difficulty::from_level(0), None);
        assert_eq!(Difficulty::from_level(6), None);
    }

    #[test]
    fn test_next_tier() {
        assert_eq!(Difficulty::SplishSplash.next(), Some(Difficulty::SprayAndPray));
        assert_eq!(Difficulty::WetAndWild.next(), None);
    }

    #[test]
    fn test_profiles_get_stricter() {
        let profiles: Vec<_> = Difficulty::ALL.iter().map(|d| d.profile()).collect();
        for pair in profiles.windows(2) {
            assert!(pair[1].accuracy_error <= pair[0].accuracy_error);
            assert!(pair[1].wind_error_factor <= pair[0].wind_error_factor);
            assert!(pair[1].defense_probability >= pair[0].defense_probability);
        }
        let top = Difficulty::WetAndWild.profile();
        assert_eq!(top.accuracy_error, 0.0);
        assert_eq!(top.wind_error_factor, 0.0);
    }
}
