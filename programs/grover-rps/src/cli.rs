//! Command-line options and their merge into a GameConfig

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};

use grover_logic::{CountHistogram, GameConfig, Ruleset};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RulesetArg {
    /// 0-0 start, the gun ends the game
    Classic,
    /// 2-2 start, the gun is only for show
    Handicap,
}

impl From<RulesetArg> for Ruleset {
    fn from(arg: RulesetArg) -> Self {
        match arg {
            RulesetArg::Classic => Ruleset::Classic,
            RulesetArg::Handicap => Ruleset::Handicap,
        }
    }
}

/// Play rock-paper-scissors against Grover, whose choices are weighted by
/// the measurement counts of a quantum circuit run.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("histogram").required(true).args(["counts_file", "counts"])))]
pub struct Cli {
    /// JSON file with measurement counts, e.g. {"00": 12, "01": 30, "10": 40, "11": 942}
    #[arg(long, value_name = "FILE")]
    pub counts_file: Option<PathBuf>,

    /// Counts for "00","01","10","11" in order, comma separated
    #[arg(long, value_name = "N,N,N,N", value_delimiter = ',')]
    pub counts: Option<Vec<u64>>,

    /// Rule preset the other options refine
    #[arg(long, value_enum, default_value_t = RulesetArg::Classic)]
    pub ruleset: RulesetArg,

    /// JSON GameConfig file; fields it omits keep the preset's values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub points_to_win: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub player_start: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    pub opponent_start: Option<i32>,

    /// Whether the gun outcome ends the game
    #[arg(long, value_name = "BOOL")]
    pub gun_instant_win: Option<bool>,

    /// Log every random draw and the outcome it selected
    #[arg(long)]
    pub debug_rng: bool,

    /// Seed for a reproducible game instead of system entropy
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub opponent_name: Option<String>,
}

impl Cli {
    pub fn histogram(&self) -> Result<CountHistogram> {
        if let Some(path) = &self.counts_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading counts file {}", path.display()))?;
            return CountHistogram::from_json(&json)
                .with_context(|| format!("parsing counts file {}", path.display()));
        }
        match self.counts.as_deref() {
            Some([a, b, c, d]) => Ok(CountHistogram::new([*a, *b, *c, *d])),
            Some(other) => bail!("expected 4 counts, got {}", other.len()),
            None => bail!("no histogram supplied; use --counts-file or --counts"),
        }
    }

    /// Preset, then config file, then explicit flags
    pub fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                let base = serde_json::to_value(GameConfig::for_ruleset(self.ruleset.into()))?;
                let overrides: serde_json::Value = serde_json::from_str(&json)
                    .with_context(|| format!("parsing config file {}", path.display()))?;
                serde_json::from_value(merge(base, overrides))
                    .with_context(|| format!("applying config file {}", path.display()))?
            }
            None => GameConfig::for_ruleset(self.ruleset.into()),
        };

        if let Some(points) = self.points_to_win {
            config.points_to_win = points;
        }
        if let Some(points) = self.player_start {
            config.player_start_points = points;
        }
        if let Some(points) = self.opponent_start {
            config.opponent_start_points = points;
        }
        if let Some(fatal) = self.gun_instant_win {
            config.gun_is_instant_win = fatal;
        }
        if self.debug_rng {
            config.debug_sampler = true;
        }
        if let Some(name) = &self.opponent_name {
            config.opponent_name = name.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Shallow object merge; `overrides` wins
fn merge(base: serde_json::Value, overrides: serde_json::Value) -> serde_json::Value {
    match (base, overrides) {
        (serde_json::Value::Object(mut base), serde_json::Value::Object(overrides)) => {
            base.extend(overrides);
            serde_json::Value::Object(base)
        }
        (_, overrides) => overrides,
    }
}
