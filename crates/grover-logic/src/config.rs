//! Game rule configuration

use serde::{Deserialize, Serialize};

use crate::error::{GroverError, Result};

/// Named rule presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruleset {
    /// Scores start at 0-0 and the gun ends the game
    Classic,
    /// Scores start at 2-2 and the gun is only for show
    Handicap,
}

/// Tunable rules for one game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Score at which either side wins
    pub points_to_win: i32,
    pub player_start_points: i32,
    pub opponent_start_points: i32,
    /// Gun outcome ends the game in the opponent's favor
    pub gun_is_instant_win: bool,
    /// Log every sampler draw
    pub debug_sampler: bool,
    pub opponent_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    pub fn classic() -> Self {
        Self {
            points_to_win: 5,
            player_start_points: 0,
            opponent_start_points: 0,
            gun_is_instant_win: true,
            debug_sampler: false,
            opponent_name: "Grover".to_string(),
        }
    }

    pub fn handicap() -> Self {
        Self {
            player_start_points: 2,
            opponent_start_points: 2,
            gun_is_instant_win: false,
            ..Self::classic()
        }
    }

    pub fn for_ruleset(ruleset: Ruleset) -> Self {
        match ruleset {
            Ruleset::Classic => Self::classic(),
            Ruleset::Handicap => Self::handicap(),
        }
    }

    /// Parse a (possibly partial) JSON config; missing fields take classic defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.points_to_win < 1 {
            return Err(GroverError::InvalidConfig(format!(
                "points_to_win must be at least 1, got {}",
                self.points_to_win
            )));
        }
        if self.player_start_points >= self.points_to_win
            || self.opponent_start_points >= self.points_to_win
        {
            return Err(GroverError::InvalidConfig(format!(
                "starting scores {}-{} must be below points_to_win {}",
                self.player_start_points, self.opponent_start_points, self.points_to_win
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let classic = GameConfig::classic();
        assert_eq!(classic.points_to_win, 5);
        assert_eq!((classic.player_start_points, classic.opponent_start_points), (0, 0));
        assert!(classic.gun_is_instant_win);

        let handicap = GameConfig::for_ruleset(Ruleset::Handicap);
        assert_eq!(handicap.points_to_win, 5);
        assert_eq!((handicap.player_start_points, handicap.opponent_start_points), (2, 2));
        assert!(!handicap.gun_is_instant_win);
        assert_eq!(handicap.opponent_name, "Grover");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{"points_to_win": 3, "gun_is_instant_win": false}"#).unwrap();
        assert_eq!(config.points_to_win, 3);
        assert!(!config.gun_is_instant_win);
        assert_eq!(config.player_start_points, 0);
        assert_eq!(config.opponent_name, "Grover");
    }

    #[test]
    fn test_validate_rejects_bad_targets() {
        let mut config = GameConfig::classic();
        config.points_to_win = 0;
        assert!(matches!(config.validate(), Err(GroverError::InvalidConfig(_))));

        let mut config = GameConfig::classic();
        config.opponent_start_points = 5;
        assert!(matches!(config.validate(), Err(GroverError::InvalidConfig(_))));

        assert!(GameConfig::from_json(r#"{"player_start_points": 9}"#).is_err());
    }

    #[test]
    fn test_negative_start_allowed() {
        let mut config = GameConfig::classic();
        config.player_start_points = -3;
        assert!(config.validate().is_ok());
    }
}
