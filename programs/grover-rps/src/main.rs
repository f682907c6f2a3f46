//! Grover RPS - console front end
//!
//! Loads a measurement-count histogram, then plays rock-paper-scissors
//! against Grover on stdin/stdout.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use grover_logic::{GameLoop, RandSource, SeededRng, UniformSource};

mod cli;

use cli::Cli;

fn init_logging(debug_rng: bool) {
    let default_filter = if debug_rng { "warn,grover_logic=info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug_rng);

    let histogram = cli.histogram()?;
    let config = cli.game_config()?;
    debug!("Histogram {}, config {:?}", histogram, config);

    let name = config.opponent_name.clone();
    println!("{} is an AI whose decisions are based on the result of running the Grover algorithm.", name);
    println!("They tend to cheat more on bad days, when there's more noise in the quantum computer...");
    println!();

    let source: Box<dyn UniformSource> = match cli.seed {
        Some(seed) => {
            info!("Using seeded generator {}", seed);
            Box::new(SeededRng::new(seed))
        }
        None => Box::new(RandSource(rand::thread_rng())),
    };

    let game = GameLoop::new(&histogram, config, io::stdin().lock(), io::stdout(), source)
        .context("cannot start the game with this histogram")?;

    println!("Thanks for waiting! {}'s ready to play!", name);
    println!();
    let summary = game.run()?;

    debug!(
        "Game over: {:?} after {} rounds ({} rejected inputs)",
        summary.final_state.verdict,
        summary.events.len(),
        summary.rejected_inputs
    );
    Ok(())
}
