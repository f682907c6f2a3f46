//! Interactive game loop
//!
//! An explicit state machine over an injected line reader, writer and
//! randomness source. The console program wires it to stdin/stdout; tests and
//! the WASM replay wire it to in-memory buffers.

use std::io::{BufRead, Write};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::Result;
use crate::game::{
    effective_throw_counts, resolve_round, GameState, PlayerAction, ProbabilityTables,
    RoundEvent, ThrowResult, Verdict,
};
use crate::histogram::CountHistogram;
use crate::probability::flat_distribution;
use crate::random::UniformSource;
use crate::sampler::WeightedSampler;

pub const PROMPT: &str = "Rock, paper, or scissors? ";

/// Loop phases
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    Resolving(PlayerAction),
    RoundOver,
    GameOver,
}

/// End-of-game dump of the histogram and the flat distributions derived from it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub histogram: CountHistogram,
    /// Gun / Laugh / Forget / Normal
    pub outcome_distribution: Vec<f64>,
    /// Rock / Paper / Scissors
    pub throw_distribution: Vec<f64>,
    /// No counts outside "11", so throws were uniform rather than measured
    pub uniform_throw_fallback: bool,
}

impl DiagnosticReport {
    pub fn new(histogram: &CountHistogram) -> Result<Self> {
        Ok(Self {
            histogram: *histogram,
            outcome_distribution: flat_distribution(&histogram.outcome_counts())?,
            throw_distribution: flat_distribution(&effective_throw_counts(histogram))?,
            uniform_throw_fallback: histogram.throw_counts().iter().all(|c| *c == 0),
        })
    }

    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "Results of the quantum computation:")?;
        writeln!(out, "Counts: {}", self.histogram)?;
        writeln!(
            out,
            "AI probabilities:       {:?} (Gun/Laugh/Forget/Normal)",
            self.outcome_distribution
        )?;
        let note = if self.uniform_throw_fallback {
            " [uniform fallback: no counts outside '11']"
        } else {
            ""
        };
        writeln!(
            out,
            "AI throw probabilities: {:?} (Rock/Paper/Scissors){}",
            self.throw_distribution, note
        )?;
        writeln!(out)?;
        Ok(())
    }
}

/// Everything a finished game produced
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_state: GameState,
    pub events: Vec<RoundEvent>,
    /// Lines that did not parse as an action
    pub rejected_inputs: u32,
    pub report: DiagnosticReport,
}

/// Narration lines for one round
pub fn narrate(event: &RoundEvent, name: &str) -> Vec<String> {
    match event {
        RoundEvent::Forfeit => vec!["You give up...".to_string()],
        RoundEvent::Gun { fatal: true } => vec![
            format!("{} pulls a gun! *BANG*", name),
            "You appear to have died...".to_string(),
            String::new(),
            format!("Incidentally, that means {} wins.", name),
        ],
        RoundEvent::Gun { fatal: false } => vec![
            format!("{} pulls a gun! *BANG*", name),
            "A little flag reading \"BANG!\" pops out of the barrel.".to_string(),
            "(Nobody scores this round...)".to_string(),
        ],
        RoundEvent::Laugh => vec![
            format!("{} laughs hysterically!", name),
            "(You seem to have lost this round...)".to_string(),
        ],
        RoundEvent::ForgetPoint => vec![
            format!("{} forgot the score... oh, they remembered it again!", name),
            "(You seem to have lost a point...)".to_string(),
        ],
        RoundEvent::Throw { opponent, result, .. } => {
            let verdict = match result {
                ThrowResult::Draw => "It's a draw!".to_string(),
                ThrowResult::PlayerWins => "You win the round!".to_string(),
                ThrowResult::OpponentWins => format!("{} wins the round!", name),
            };
            vec![format!("{} throws {}!", name, opponent.name()), verdict]
        }
    }
}

/// Drives one game from first prompt to final report
pub struct GameLoop<R, W, S> {
    config: GameConfig,
    tables: ProbabilityTables,
    report: DiagnosticReport,
    sampler: WeightedSampler,
    state: GameState,
    phase: LoopState,
    events: Vec<RoundEvent>,
    rejected_inputs: u32,
    input: R,
    output: W,
    source: S,
}

impl<R: BufRead, W: Write, S: UniformSource> GameLoop<R, W, S> {
    /// Validate the rules and build both tables before any round is played
    pub fn new(
        histogram: &CountHistogram,
        config: GameConfig,
        input: R,
        output: W,
        source: S,
    ) -> Result<Self> {
        config.validate()?;
        let tables = ProbabilityTables::from_histogram(histogram)?;
        let report = DiagnosticReport::new(histogram)?;
        debug!(
            "Outcome table {:?}, throw table {:?}",
            tables.outcome.entries(),
            tables.throw.entries()
        );

        Ok(Self {
            state: GameState::new(&config),
            sampler: WeightedSampler::new(config.debug_sampler),
            config,
            tables,
            report,
            phase: LoopState::AwaitingInput,
            events: Vec::new(),
            rejected_inputs: 0,
            input,
            output,
            source,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> LoopState {
        self.phase
    }

    pub fn tables(&self) -> &ProbabilityTables {
        &self.tables
    }

    /// Perform one transition and return the new phase
    pub fn step(&mut self) -> Result<LoopState> {
        self.phase = match self.phase {
            LoopState::AwaitingInput => self.await_input()?,
            LoopState::Resolving(action) => self.resolve(action)?,
            LoopState::RoundOver => self.finish_round()?,
            LoopState::GameOver => LoopState::GameOver,
        };
        Ok(self.phase)
    }

    /// Play until the game ends, then write the diagnostic report
    pub fn run(mut self) -> Result<GameSummary> {
        while self.step()? != LoopState::GameOver {}

        self.report.write_to(&mut self.output)?;
        self.output.flush()?;

        Ok(GameSummary {
            final_state: self.state,
            events: self.events,
            rejected_inputs: self.rejected_inputs,
            report: self.report,
        })
    }

    fn await_input(&mut self) -> Result<LoopState> {
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        // Raw bytes, so a line that is not UTF-8 is rejected instead of failing the read
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            debug!("Input closed; treating as forfeit");
            writeln!(self.output)?;
            return Ok(LoopState::Resolving(PlayerAction::Forfeit));
        }

        let line = String::from_utf8_lossy(&raw);
        match PlayerAction::parse(&line) {
            Some(action) => Ok(LoopState::Resolving(action)),
            None => {
                debug!("Rejected input {:?}", line.trim_end());
                self.rejected_inputs += 1;
                Ok(LoopState::AwaitingInput)
            }
        }
    }

    fn resolve(&mut self, action: PlayerAction) -> Result<LoopState> {
        if action != PlayerAction::Forfeit {
            writeln!(self.output)?;
        }

        let (state, event) = resolve_round(
            self.state,
            action,
            &self.tables,
            &self.config,
            &self.sampler,
            &mut self.source,
        );
        self.state = state;
        self.events.push(event);

        for line in narrate(&event, &self.config.opponent_name) {
            writeln!(self.output, "{}", line)?;
        }

        // Forfeits and a fatal gun skip the score line entirely
        Ok(match self.state.verdict {
            Some(Verdict::Forfeited) | Some(Verdict::OpponentShot) => LoopState::GameOver,
            _ => LoopState::RoundOver,
        })
    }

    fn finish_round(&mut self) -> Result<LoopState> {
        let name = &self.config.opponent_name;
        let GameState {
            player_points,
            opponent_points,
            ..
        } = self.state;

        writeln!(self.output)?;
        let next = match self.state.verdict {
            Some(Verdict::PlayerVictory) => {
                writeln!(self.output, "You have {} points, so you win the game!", player_points)?;
                writeln!(self.output, "{} congratulates you on your hard-fought victory.", name)?;
                LoopState::GameOver
            }
            Some(Verdict::OpponentVictory) => {
                writeln!(self.output, "{} has {} points, so {} wins the game.", name, opponent_points, name)?;
                writeln!(self.output, "{} smiles with glee!", name)?;
                LoopState::GameOver
            }
            Some(_) => LoopState::GameOver,
            None => {
                writeln!(self.output, "You have {} points, and {} has {}", player_points, name, opponent_points)?;
                LoopState::AwaitingInput
            }
        };
        writeln!(self.output)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GroverError;
    use crate::game::ThrowType;
    use crate::random::ScriptedSource;

    const LAUGH: f64 = 0.3;
    const GUN: f64 = 0.1;
    const NORMAL: f64 = 0.9;
    const SCISSORS: f64 = 0.9;

    fn uniform() -> CountHistogram {
        CountHistogram::new([1, 1, 1, 1])
    }

    fn play(config: GameConfig, input: &str, draws: Vec<f64>) -> (GameSummary, String) {
        let mut out = Vec::new();
        let summary = GameLoop::new(&uniform(), config, input.as_bytes(), &mut out, ScriptedSource::new(draws))
            .unwrap()
            .run()
            .unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_five_laughs_end_game() {
        let input = "r\n".repeat(10);
        let (summary, out) = play(GameConfig::classic(), &input, vec![LAUGH]);

        assert_eq!(summary.final_state.opponent_points, 5);
        assert_eq!(summary.final_state.player_points, 0);
        assert_eq!(summary.final_state.verdict, Some(Verdict::OpponentVictory));
        assert_eq!(summary.events, vec![RoundEvent::Laugh; 5]);
        assert_eq!(out.matches(PROMPT).count(), 5, "no prompts after game over");
        assert!(out.contains("Grover has 5 points, so Grover wins the game."));
    }

    #[test]
    fn test_rock_beats_scissors_five_times() {
        let input = "rock\n".repeat(5);
        let (summary, out) = play(GameConfig::classic(), &input, vec![NORMAL, SCISSORS]);

        assert_eq!(summary.final_state.player_points, 5);
        assert_eq!(summary.final_state.verdict, Some(Verdict::PlayerVictory));
        assert!(summary.events.iter().all(|e| *e
            == RoundEvent::Throw {
                player: ThrowType::Rock,
                opponent: ThrowType::Scissors,
                result: ThrowResult::PlayerWins,
            }));
        assert!(out.contains("Grover throws scissors!"));
        assert!(out.contains("You have 5 points, so you win the game!"));
    }

    #[test]
    fn test_forfeit_keeps_scores() {
        let (summary, out) = play(GameConfig::handicap(), "r\ne\nr\n", vec![LAUGH]);

        assert_eq!(summary.final_state.verdict, Some(Verdict::Forfeited));
        assert_eq!(summary.final_state.player_points, 2);
        assert_eq!(summary.final_state.opponent_points, 3);
        assert_eq!(summary.events, vec![RoundEvent::Laugh, RoundEvent::Forfeit]);
        assert_eq!(out.matches(PROMPT).count(), 2);
        assert!(out.contains("You give up..."));
    }

    #[test]
    fn test_malformed_input_reprompts() {
        let (summary, out) = play(GameConfig::classic(), "\nlizard\n42\nF\n", vec![LAUGH]);

        assert_eq!(summary.rejected_inputs, 3);
        assert_eq!(summary.events, vec![RoundEvent::Forfeit]);
        assert_eq!(out.matches(PROMPT).count(), 4);
    }

    #[test]
    fn test_non_utf8_line_reprompts() {
        let mut out = Vec::new();
        let summary = GameLoop::new(
            &uniform(),
            GameConfig::classic(),
            &b"\xff\xfe\nf\n"[..],
            &mut out,
            ScriptedSource::new(vec![LAUGH]),
        )
        .unwrap()
        .run()
        .unwrap();

        assert_eq!(summary.rejected_inputs, 1);
        assert_eq!(summary.events, vec![RoundEvent::Forfeit]);
        assert_eq!(summary.final_state.verdict, Some(Verdict::Forfeited));
    }

    #[test]
    fn test_report_flags_uniform_throw_fallback() {
        let mut out = Vec::new();
        let summary = GameLoop::new(
            &CountHistogram::new([0, 0, 0, 1024]),
            GameConfig::classic(),
            "e\n".as_bytes(),
            &mut out,
            ScriptedSource::default(),
        )
        .unwrap()
        .run()
        .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(summary.report.uniform_throw_fallback);
        assert!(out.contains("(Rock/Paper/Scissors) [uniform fallback: no counts outside '11']"));
        assert!(out.contains("Counts: {'00': 0, '01': 0, '10': 0, '11': 1024}"));
    }

    #[test]
    fn test_end_of_input_forfeits() {
        let (summary, _) = play(GameConfig::classic(), "p\n", vec![LAUGH]);
        assert_eq!(summary.events, vec![RoundEvent::Laugh, RoundEvent::Forfeit]);
        assert_eq!(summary.final_state.verdict, Some(Verdict::Forfeited));
    }

    #[test]
    fn test_fatal_gun_ends_at_zero_zero() {
        let (summary, out) = play(GameConfig::classic(), "s\ns\n", vec![GUN]);
        assert_eq!(summary.final_state.verdict, Some(Verdict::OpponentShot));
        assert_eq!((summary.final_state.player_points, summary.final_state.opponent_points), (0, 0));
        assert_eq!(out.matches(PROMPT).count(), 1);
        assert!(out.contains("Incidentally, that means Grover wins."));
    }

    #[test]
    fn test_harmless_gun_continues() {
        let config = GameConfig {
            gun_is_instant_win: false,
            ..GameConfig::classic()
        };
        let (summary, out) = play(config, "s\ne\n", vec![GUN]);
        assert_eq!(summary.events, vec![RoundEvent::Gun { fatal: false }, RoundEvent::Forfeit]);
        assert_eq!(summary.final_state.verdict, Some(Verdict::Forfeited));
        assert!(out.contains("You have 0 points, and Grover has 0"));
    }

    #[test]
    fn test_step_phases() {
        let mut out = Vec::new();
        let mut game = GameLoop::new(
            &uniform(),
            GameConfig::classic(),
            "r\n".as_bytes(),
            &mut out,
            ScriptedSource::new(vec![LAUGH]),
        )
        .unwrap();

        assert_eq!(game.phase(), LoopState::AwaitingInput);
        assert_eq!(game.step().unwrap(), LoopState::Resolving(PlayerAction::Throw(ThrowType::Rock)));
        assert_eq!(game.step().unwrap(), LoopState::RoundOver);
        assert_eq!(game.state().opponent_points, 1);
        assert_eq!(game.step().unwrap(), LoopState::AwaitingInput);
    }

    #[test]
    fn test_report_shows_original_counts() {
        let mut out = Vec::new();
        let hist = CountHistogram::new([2, 2, 4, 8]);
        let summary = GameLoop::new(&hist, GameConfig::classic(), "e\n".as_bytes(), &mut out, ScriptedSource::default())
            .unwrap()
            .run()
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(summary.report.histogram, hist);
        assert_eq!(summary.report.outcome_distribution, vec![0.125, 0.125, 0.25, 0.5]);
        assert_eq!(summary.report.throw_distribution, vec![0.25, 0.25, 0.5]);
        assert!(out.contains("Counts: {'00': 2, '01': 2, '10': 4, '11': 8}"));
        assert!(out.contains("AI probabilities:       [0.125, 0.125, 0.25, 0.5] (Gun/Laugh/Forget/Normal)"));
        assert!(out.contains("AI throw probabilities: [0.25, 0.25, 0.5] (Rock/Paper/Scissors)\n"));
        assert!(!summary.report.uniform_throw_fallback);
    }

    #[test]
    fn test_zero_histogram_fails_before_play() {
        let mut out = Vec::new();
        let rejected = matches!(
            GameLoop::new(
                &CountHistogram::default(),
                GameConfig::classic(),
                "r\n".as_bytes(),
                &mut out,
                ScriptedSource::default(),
            ),
            Err(GroverError::InvalidInput)
        );
        assert!(rejected);
        assert!(out.is_empty());
    }

    #[test]
    fn test_narration_uses_opponent_name() {
        let lines = narrate(&RoundEvent::Laugh, "Qubit");
        assert_eq!(lines[0], "Qubit laughs hysterically!");
    }
}
