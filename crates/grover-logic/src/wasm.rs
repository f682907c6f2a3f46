//! WASM bindings for frontend game replay

#![cfg(feature = "wasm")]

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    effective_throw_counts, flat_distribution, CountHistogram, GameConfig, GameLoop, GameSummary,
    ProbabilityTables, ScriptedSource,
};

/// Tables for display alongside a replay
#[derive(Serialize)]
struct TableInfo {
    outcome_cumulative: Vec<f64>,
    throw_cumulative: Vec<f64>,
    outcome_flat: Vec<f64>,
    throw_flat: Vec<f64>,
}

/// Replay output: structured summary plus the console transcript
#[derive(Serialize)]
struct Replay {
    summary: GameSummary,
    transcript: String,
}

fn parse_config(config_json: &str) -> Result<GameConfig, JsError> {
    if config_json.trim().is_empty() {
        return Ok(GameConfig::default());
    }
    GameConfig::from_json(config_json).map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
}

/// Build the cumulative and flat tables for a histogram
///
/// # Arguments
/// * `counts_json` - JSON object keyed by "00", "01", "10", "11"
#[wasm_bindgen]
pub fn probability_tables(counts_json: &str) -> Result<JsValue, JsError> {
    let histogram = CountHistogram::from_json(counts_json)
        .map_err(|e| JsError::new(&format!("Invalid counts: {}", e)))?;
    let tables = ProbabilityTables::from_histogram(&histogram)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let info = TableInfo {
        outcome_cumulative: tables.outcome.entries().to_vec(),
        throw_cumulative: tables.throw.entries().to_vec(),
        outcome_flat: flat_distribution(&histogram.outcome_counts())
            .map_err(|e| JsError::new(&e.to_string()))?,
        throw_flat: flat_distribution(&effective_throw_counts(&histogram))
            .map_err(|e| JsError::new(&e.to_string()))?,
    };

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Replay a game headlessly with scripted input lines and scripted draws
///
/// # Arguments
/// * `counts_json` - JSON object keyed by "00", "01", "10", "11"
/// * `config_json` - JSON GameConfig (partial allowed; empty for defaults)
/// * `inputs_json` - JSON array of input lines, e.g. `["rock", "paper"]`
/// * `draws` - uniform draws in [0, 1), consumed in order and cycled
///
/// # Returns
/// JSON object `{ summary, transcript }`
#[wasm_bindgen]
pub fn replay_game(
    counts_json: &str,
    config_json: &str,
    inputs_json: &str,
    draws: &[f64],
) -> Result<JsValue, JsError> {
    let histogram = CountHistogram::from_json(counts_json)
        .map_err(|e| JsError::new(&format!("Invalid counts: {}", e)))?;
    let config = parse_config(config_json)?;
    let inputs: Vec<String> = serde_json::from_str(inputs_json)
        .map_err(|e| JsError::new(&format!("Invalid inputs: {}", e)))?;

    let mut script = inputs.join("\n");
    script.push('\n');

    let mut transcript = Vec::new();
    let summary = GameLoop::new(
        &histogram,
        config,
        script.as_bytes(),
        &mut transcript,
        ScriptedSource::new(draws.to_vec()),
    )
    .and_then(|game| game.run())
    .map_err(|e| JsError::new(&e.to_string()))?;

    let replay = Replay {
        summary,
        transcript: String::from_utf8_lossy(&transcript).into_owned(),
    };

    serde_wasm_bindgen::to_value(&replay)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Default rules as JSON, for populating a settings form
#[wasm_bindgen]
pub fn default_config(handicap: bool) -> Result<String, JsError> {
    let config = if handicap { GameConfig::handicap() } else { GameConfig::classic() };
    serde_json::to_string(&config).map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
