//! Game Logic for Grover RPS
//!
//! Rock-paper-scissors against an opponent whose behavior is weighted by
//! quantum measurement counts. This crate is compiled to:
//! - Native (for the console program)
//! - WASM (for frontend game replay)

mod error;
mod histogram;
mod probability;
mod sampler;
mod random;
mod config;
mod game;
mod session;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GroverError, Result};
pub use histogram::{CountHistogram, OUTCOME_KEYS};
pub use probability::{flat_distribution, CumulativeTable};
pub use sampler::{select_index, WeightedSampler};
pub use random::{RandSource, ScriptedSource, SeededRng, UniformSource};
pub use config::{GameConfig, Ruleset};
pub use game::{
    apply_event, draw_event, effective_throw_counts, judge, resolve_round, GameState,
    OutcomeType, PlayerAction, ProbabilityTables, RoundEvent, ThrowResult, ThrowType, Verdict,
};
pub use session::{narrate, DiagnosticReport, GameLoop, GameSummary, LoopState, PROMPT};
