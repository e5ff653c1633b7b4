//! Rock, Paper, Scissors, Lizard, Spock against a computer personality

mod terminal;

use anyhow::Result;
use clap::Parser;
use log::info;
use rps_logic::{
    expand_seed, MatchConfig, Personality, Session, CLASSIC_WINNING_SCORE, QUICK_WINNING_SCORE,
};

use crate::terminal::{Console, ConsoleOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Points needed to win a match
    #[arg(short, long, default_value_t = CLASSIC_WINNING_SCORE)]
    winning_score: u32,

    /// Short game: first to 3 points
    #[arg(short, long, conflicts_with = "winning_score")]
    quick: bool,

    /// Seed for the computer's choices (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Don't offer the round history after a match
    #[arg(long)]
    no_history: bool,

    /// Only accept full move names (no r, p, sc, l, sp)
    #[arg(long)]
    no_abbreviations: bool,

    /// Print the round history as JSON
    #[arg(long)]
    json_history: bool,
}

impl Args {
    fn match_config(&self) -> MatchConfig {
        MatchConfig {
            winning_score: match self.quick {
                true => QUICK_WINNING_SCORE,
                false => self.winning_score,
            },
            show_history: !self.no_history,
        }
    }

    fn console_options(&self) -> ConsoleOptions {
        ConsoleOptions {
            abbreviations: !self.no_abbreviations,
            json_history: self.json_history,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.match_config();
    let seed = match args.seed {
        Some(seed) => expand_seed(seed),
        None => rand::random(),
    };
    info!("starting session: {:?}, seed {:02x?}", config, seed);

    let session = Session::new(config, Personality::roster()?, seed)?;
    let mut console = Console::new(args.console_options());
    let summary = session.run(&mut console)?;

    info!(
        "session over: {} matches, {} won by the player, {} by the computer",
        summary.matches_played, summary.human_wins, summary.computer_wins
    );
    Ok(())
}
