//! Command-line interface for emojitoe.

use clap::{Parser, Subcommand};
use emojitoe_engine::Difficulty;
use std::path::PathBuf;

/// Emojitoe - tic-tac-toe against the computer with unlockable emoji
#[derive(Parser, Debug)]
#[command(name = "emojitoe")]
#[command(about = "Tic-tac-toe against the computer with unlockable emoji", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = emojitoe::DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Seed for the opponent and ad pacing (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively on stdin (cells 1-9)
    Play,

    /// Pit two AI tiers against each other
    Simulate {
        /// Tier playing the player's side
        #[arg(long, default_value = "hard")]
        difficulty: Difficulty,

        /// Tier playing the opponent's side
        #[arg(long, default_value = "easy")]
        against: Difficulty,

        /// Number of games
        #[arg(long, default_value = "100")]
        games: u32,
    },

    /// Open a bonus reward
    Bonus,

    /// Show unlocked emoji per category
    Progress,

    /// Set the opponent's difficulty
    Difficulty {
        /// easy, normal or hard
        tier: Difficulty,
    },

    /// Set the player's name
    Name {
        /// New name (trimmed, at most 8 characters)
        name: String,
    },
}
