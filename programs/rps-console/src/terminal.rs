//! Interactive terminal: prompts with validation loops and colored output

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::Input;
use rps_logic::{
    history_json, parse_yes_no, Event, Match, Move, Outcome, RoundRecord, Side, Terminal,
};

const RULE_WIDTH: usize = 39;

/// Console options that only affect presentation and input parsing
#[derive(Clone, Copy, Debug)]
pub struct ConsoleOptions {
    pub abbreviations: bool,
    pub json_history: bool,
}

pub struct Console {
    options: ConsoleOptions,
}

impl Console {
    pub fn new(options: ConsoleOptions) -> Self {
        Self { options }
    }

    fn parse_move(&self, input: &str) -> Result<Move, rps_logic::InvalidMoveError> {
        if self.options.abbreviations {
            Move::parse_abbreviated(input)
        } else {
            input.parse()
        }
    }

    fn move_prompt(&self) -> String {
        let choices: Vec<String> = Move::ALL
            .iter()
            .map(|m| match self.options.abbreviations {
                true => format!("{} ({})", m, m.abbreviation()),
                false => m.to_string(),
            })
            .collect();
        format!("Please choose {}", choices.join(", "))
    }
}

/// `--------RESULTS--------` style section header
fn heading(title: &str) -> String {
    let pad = RULE_WIDTH.saturating_sub(title.len());
    let left = pad / 2;
    format!("{}{}{}", "-".repeat(left), title, "-".repeat(pad - left))
}

fn round_winner<'a>(game: &'a Match, record: &RoundRecord) -> &'a str {
    match record.outcome {
        Outcome::HumanWins => &game.human().name,
        Outcome::ComputerWins => &game.computer().name,
        Outcome::Tie => "tie",
    }
}

fn print_round(game: &Match, record: &RoundRecord) {
    let human = game.human();
    let computer = game.computer();

    println!();
    println!("{}", heading("RESULTS").bold());
    println!("{} chose {}.", human.name, record.human_move.to_string().cyan());
    println!("{} chose {}.", computer.name, record.computer_move.to_string().magenta());
    match record.outcome {
        Outcome::HumanWins => println!("{}", format!("{} won!", human.name).green()),
        Outcome::ComputerWins => println!("{}", format!("{} won!", computer.name).red()),
        Outcome::Tie => println!("{}", "It's a tie!".yellow()),
    }

    println!();
    println!("{}", heading("SCORE").bold());
    println!("{}'s score: {}", human.name, record.human_score);
    println!("{}'s score: {}", computer.name, record.computer_score);
}

fn print_history(game: &Match) {
    println!();
    println!("{}", heading("ROUND HISTORY").bold());
    println!(
        "{:>5}  {:<10} {:<10} {:<10} {}",
        "Round",
        game.human().name,
        game.computer().name,
        "Winner",
        "Score"
    );
    for record in game.history() {
        println!(
            "{:>5}  {:<10} {:<10} {:<10} {}-{}",
            record.round,
            record.human_move.label(),
            record.computer_move.label(),
            round_winner(game, record),
            record.human_score,
            record.computer_score
        );
    }
}

impl Terminal for Console {
    type Error = anyhow::Error;

    fn read_player_name(&mut self) -> Result<String> {
        let name: String = Input::new()
            .with_prompt("What's your name?")
            .validate_with(|input: &String| -> Result<(), &str> {
                match input.trim().is_empty() {
                    true => Err("Sorry, must enter a value."),
                    false => Ok(()),
                }
            })
            .interact_text()
            .context("reading player name")?;
        Ok(name.trim().to_string())
    }

    fn read_move_choice(&mut self) -> Result<Move> {
        let abbreviations = self.options.abbreviations;
        let raw: String = Input::new()
            .with_prompt(self.move_prompt())
            .validate_with(move |input: &String| -> Result<(), &str> {
                let parsed = match abbreviations {
                    true => Move::parse_abbreviated(input),
                    false => input.parse::<Move>(),
                };
                parsed.map(|_| ()).map_err(|_| "Sorry, invalid choice.")
            })
            .interact_text()
            .context("reading move")?;
        Ok(self.parse_move(&raw)?)
    }

    fn read_yes_no(&mut self, prompt: &str) -> Result<bool> {
        let raw: String = Input::new()
            .with_prompt(format!("{} (y/n)", prompt))
            .validate_with(|input: &String| -> Result<(), &str> {
                parse_yes_no(input).map(|_| ()).map_err(|_| "Sorry, must be y or n.")
            })
            .interact_text()
            .context("reading yes/no answer")?;
        Ok(parse_yes_no(&raw)?)
    }

    fn announce(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Welcome { winning_score } => {
                println!();
                println!(
                    "{}",
                    "***** Welcome to Rock, Paper, Scissors, Lizard, Spock! *****".bold()
                );
                println!("The first player to score {} points wins", winning_score);
            }
            Event::OpponentIntroduced { personality } => {
                println!();
                println!(
                    "Your opponent is {}. {}",
                    personality.name.bold(),
                    personality.describe().dimmed()
                );
            }
            Event::RoundPlayed { game, record } => print_round(game, record),
            Event::MatchWon { game, winner } => {
                let name = &game.player(winner).name;
                let line = format!(
                    "{} is the first to {} points and wins the game!",
                    name,
                    game.config().winning_score
                );
                println!();
                println!("{}", heading("WINNER").bold());
                match winner {
                    Side::Human => println!("{}", line.green().bold()),
                    Side::Computer => println!("{}", line.red().bold()),
                }
            }
            Event::History { game } => match self.options.json_history {
                true => println!(
                    "{}",
                    history_json(game.history()).context("serializing round history")?
                ),
                false => print_history(game),
            },
            Event::Goodbye => {
                println!();
                println!("Thanks for playing Rock, Paper, Scissors, Lizard, Spock. Good bye!");
            }
        }
        Ok(())
    }
}
