//! Round resolution and score state

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::Result;
use crate::histogram::CountHistogram;
use crate::probability::CumulativeTable;
use crate::random::UniformSource;
use crate::sampler::WeightedSampler;

/// What the opponent does this round, indexed by histogram outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeType {
    /// "00"
    Gun,
    /// "01"
    Laugh,
    /// "10"
    ForgetPoint,
    /// "11"
    NormalThrow,
}

impl OutcomeType {
    pub const ALL: [OutcomeType; 4] = [
        OutcomeType::Gun,
        OutcomeType::Laugh,
        OutcomeType::ForgetPoint,
        OutcomeType::NormalThrow,
    ];

    /// Out-of-range indices map to the last outcome
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// A rock-paper-scissors throw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowType {
    Rock,
    Paper,
    Scissors,
}

impl ThrowType {
    pub const ALL: [ThrowType; 3] = [ThrowType::Rock, ThrowType::Paper, ThrowType::Scissors];

    /// Out-of-range indices map to the last throw
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThrowType::Rock => "rock",
            ThrowType::Paper => "paper",
            ThrowType::Scissors => "scissors",
        }
    }

    /// Check if this throw beats the other
    pub fn beats(&self, other: &ThrowType) -> bool {
        matches!(
            (self, other),
            (ThrowType::Rock, ThrowType::Scissors)
                | (ThrowType::Scissors, ThrowType::Paper)
                | (ThrowType::Paper, ThrowType::Rock)
        )
    }
}

/// One player command
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Throw(ThrowType),
    Forfeit,
}

impl PlayerAction {
    /// Only the first character counts, case-insensitively
    ///
    /// `r`, `p`, `s` throw; `e` (exit) or `f` forfeit. Anything else is `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let first = line.chars().next()?.to_ascii_lowercase();
        match first {
            'r' => Some(PlayerAction::Throw(ThrowType::Rock)),
            'p' => Some(PlayerAction::Throw(ThrowType::Paper)),
            's' => Some(PlayerAction::Throw(ThrowType::Scissors)),
            'e' | 'f' => Some(PlayerAction::Forfeit),
            _ => None,
        }
    }
}

/// Result of a single throw-vs-throw comparison
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThrowResult {
    PlayerWins,
    OpponentWins,
    Draw,
}

/// Standard rock-paper-scissors judgement from the player's side
pub fn judge(player: ThrowType, opponent: ThrowType) -> ThrowResult {
    if player == opponent {
        ThrowResult::Draw
    } else if player.beats(&opponent) {
        ThrowResult::PlayerWins
    } else {
        ThrowResult::OpponentWins
    }
}

/// What happened in one resolved round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    Forfeit,
    Gun { fatal: bool },
    Laugh,
    ForgetPoint,
    Throw {
        player: ThrowType,
        opponent: ThrowType,
        result: ThrowResult,
    },
}

/// How a finished game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    PlayerVictory,
    OpponentVictory,
    /// Instant-win gun outcome
    OpponentShot,
    Forfeited,
}

/// Scores for one game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub player_points: i32,
    pub opponent_points: i32,
    pub points_to_win: i32,
    pub verdict: Option<Verdict>,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            player_points: config.player_start_points,
            opponent_points: config.opponent_start_points,
            points_to_win: config.points_to_win,
            verdict: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.verdict.is_some()
    }

    /// Score-based end check run after every non-terminal round
    pub fn check_game_over(self) -> Self {
        if self.is_over() {
            return self;
        }
        let verdict = if self.player_points >= self.points_to_win {
            Some(Verdict::PlayerVictory)
        } else if self.opponent_points >= self.points_to_win {
            Some(Verdict::OpponentVictory)
        } else {
            None
        };
        Self { verdict, ..self }
    }
}

/// The two tables the opponent samples from, built once before play
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTables {
    /// Gun / Laugh / ForgetPoint / NormalThrow
    pub outcome: CumulativeTable,
    /// Rock / Paper / Scissors
    pub throw: CumulativeTable,
}

impl ProbabilityTables {
    /// Both tables come from copies; the histogram itself is untouched
    ///
    /// Fails when the histogram sums to zero or overflows.
    pub fn from_histogram(histogram: &CountHistogram) -> Result<Self> {
        let outcome = CumulativeTable::from_counts(&histogram.outcome_counts())?;
        let throw = CumulativeTable::from_counts(&effective_throw_counts(histogram))?;
        Ok(Self { outcome, throw })
    }
}

/// Counts behind the throw table
///
/// A noiseless run can put every shot on "11", leaving nothing to weight the
/// throws with. Throws are then uniform.
pub fn effective_throw_counts(histogram: &CountHistogram) -> [u64; 3] {
    let counts = histogram.throw_counts();
    if counts.iter().all(|c| *c == 0) {
        warn!("Histogram has no counts outside \"11\"; throws will be uniform");
        return [1, 1, 1];
    }
    counts
}

/// Sample the opponent's behavior for one round
///
/// Consumes one draw, or two when the outcome is a normal throw. A forfeit
/// consumes none.
pub fn draw_event<S: UniformSource + ?Sized>(
    action: PlayerAction,
    tables: &ProbabilityTables,
    config: &GameConfig,
    sampler: &WeightedSampler,
    source: &mut S,
) -> RoundEvent {
    let player = match action {
        PlayerAction::Forfeit => return RoundEvent::Forfeit,
        PlayerAction::Throw(throw) => throw,
    };

    match OutcomeType::from_index(sampler.sample(&tables.outcome, source)) {
        OutcomeType::Gun => RoundEvent::Gun {
            fatal: config.gun_is_instant_win,
        },
        OutcomeType::Laugh => RoundEvent::Laugh,
        OutcomeType::ForgetPoint => RoundEvent::ForgetPoint,
        OutcomeType::NormalThrow => {
            let opponent = ThrowType::from_index(sampler.sample(&tables.throw, source));
            RoundEvent::Throw {
                player,
                opponent,
                result: judge(player, opponent),
            }
        }
    }
}

/// Apply a round's event to the score, then run the end check
pub fn apply_event(state: GameState, event: RoundEvent) -> GameState {
    if state.is_over() {
        return state;
    }
    let next = match event {
        RoundEvent::Forfeit => {
            return GameState {
                verdict: Some(Verdict::Forfeited),
                ..state
            }
        }
        RoundEvent::Gun { fatal: true } => {
            return GameState {
                verdict: Some(Verdict::OpponentShot),
                ..state
            }
        }
        RoundEvent::Gun { fatal: false } => state,
        RoundEvent::Laugh => GameState {
            opponent_points: state.opponent_points.saturating_add(1),
            ..state
        },
        RoundEvent::ForgetPoint => GameState {
            player_points: state.player_points.saturating_sub(1),
            ..state
        },
        RoundEvent::Throw { result, .. } => match result {
            ThrowResult::Draw => state,
            ThrowResult::PlayerWins => GameState {
                player_points: state.player_points.saturating_add(1),
                ..state
            },
            ThrowResult::OpponentWins => GameState {
                opponent_points: state.opponent_points.saturating_add(1),
                ..state
            },
        },
    };
    next.check_game_over()
}

/// Resolve one round: sample the opponent, score it, check for game over
pub fn resolve_round<S: UniformSource + ?Sized>(
    state: GameState,
    action: PlayerAction,
    tables: &ProbabilityTables,
    config: &GameConfig,
    sampler: &WeightedSampler,
    source: &mut S,
) -> (GameState, RoundEvent) {
    let event = draw_event(action, tables, config, sampler, source);
    (apply_event(state, event), event)
}
