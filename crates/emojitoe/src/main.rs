//! Emojitoe - unified CLI
//!
//! Interactive play, AI batch simulation and profile edits over one save.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use emojitoe::{GameConfig, MatchSession, ResultScreen};
use emojitoe_engine::{AiPolicy, Difficulty, MatchEngine, MatchPhase, MoveDisposition, Side};
use emojitoe_progress::{KvStore, ProgressService, RewardResult};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,emojitoe=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::load_or_default(&cli.config)?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    debug!(seed, "Session seed");

    match cli.command {
        Command::Simulate {
            difficulty,
            against,
            games,
        } => {
            simulate(difficulty, against, games, seed);
            Ok(())
        }
        Command::Play => play(&config, open_progress(&config)?, seed).await,
        Command::Bonus => {
            let mut progress = open_progress(&config)?;
            let reward = progress.open_bonus();
            print_reward(&reward);
            progress.flush().map_err(Into::into)
        }
        Command::Progress => {
            print_progress(&config, &open_progress(&config)?);
            Ok(())
        }
        Command::Difficulty { tier } => {
            let mut progress = open_progress(&config)?;
            progress.set_difficulty(tier);
            println!(
                "Opponent difficulty set to {}, now playing {}",
                tier,
                progress.opponent().name()
            );
            progress.flush().map_err(Into::into)
        }
        Command::Name { name } => {
            let mut progress = open_progress(&config)?;
            progress.set_player_name(&name);
            println!("Player name set to {}", progress.player().name());
            progress.flush().map_err(Into::into)
        }
    }
}

/// Loads the configured save
fn open_progress(config: &GameConfig) -> Result<ProgressService<Box<dyn KvStore>>> {
    config.open_progress().context("Failed to load save")
}

/// Run an interactive session on stdin
#[instrument(skip(config, progress))]
async fn play<S: KvStore>(
    config: &GameConfig,
    progress: ProgressService<S>,
    seed: u64,
) -> Result<()> {
    let mut session = MatchSession::new(config, progress, seed);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{} vs {} ({}). Enter a cell 1-9, or q to quit.",
        session.progress().player().name(),
        session.progress().opponent().name(),
        session.opponent().difficulty()
    );

    loop {
        println!("\n{}\n", session.board());

        if session.phase() == MatchPhase::GameOver {
            let screen = reveal(&mut session, config).await;
            println!("{}", banner(screen));
            if let Some(reward) = session.last_reward() {
                print_reward(&reward);
            }

            tokio::time::sleep(config.popup_block()).await;
            session.tick(config.popup_block());

            println!("Play again? [y/N]");
            let again = lines.next_line().await?.unwrap_or_default();
            if !again.trim().eq_ignore_ascii_case("y") {
                break;
            }
            if session.close_result() == Some(true) {
                println!("(interstitial break)");
            }
            continue;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.eq_ignore_ascii_case("q") {
            break;
        }
        let Ok(cell) = input.parse::<usize>() else {
            println!("Not a cell: {}", input);
            continue;
        };
        if !(1..=9).contains(&cell) {
            println!("Cells are numbered 1-9");
            continue;
        }
        if let MoveDisposition::Rejected(reason) = session.submit_move(cell - 1) {
            println!("Move rejected: {}", reason);
        }
    }

    session.progress_mut().flush()?;
    info!(matches = session.matches_finished(), "Session ended");
    Ok(())
}

/// Waits out the reveal delay and returns the result screen
async fn reveal<S: KvStore>(session: &mut MatchSession<S>, config: &GameConfig) -> ResultScreen {
    if let Some(screen) = session.result_screen() {
        return screen;
    }
    tokio::time::sleep(config.draw_reveal_delay()).await;
    session.tick(config.draw_reveal_delay());
    session.result_screen().unwrap_or(ResultScreen::Draw)
}

fn banner(screen: ResultScreen) -> &'static str {
    match screen {
        ResultScreen::Victory => "You win! A new emoji is yours.",
        ResultScreen::Complete => "You win! Every emoji is already unlocked.",
        ResultScreen::Defeat => "You lose.",
        ResultScreen::Draw => "Draw.",
    }
}

fn print_reward(reward: &RewardResult) {
    match reward.unlocked() {
        Some(unlock) => println!(
            "Unlocked emoji {} of set {} (#{})",
            unlock.index(),
            unlock.category(),
            unlock.sequence()
        ),
        None if *reward.all_items_unlocked() => println!("Every emoji is unlocked."),
        None => println!("No new emoji this time."),
    }
}

fn print_progress<S: KvStore>(config: &GameConfig, progress: &ProgressService<S>) {
    let ledger = progress.ledger();
    println!(
        "{}: {} of {} emoji unlocked",
        progress.player().name(),
        ledger.total_unlocked_globally(),
        config.catalog().values().sum::<usize>()
    );
    for (category, capacity) in config.catalog() {
        let row: String = ledger
            .get_sorted_for_view(category, capacity)
            .iter()
            .map(|item| if item.unlocked { '#' } else { '.' })
            .collect();
        println!("  set {:>2}: {}", category, row);
    }
    if let Some(last) = ledger.last_unlocked() {
        println!(
            "Latest unlock: emoji {} of set {} (#{})",
            last.index(),
            last.category(),
            last.sequence()
        );
    }
}

/// Play AI against AI and print the tally
#[instrument]
fn simulate(difficulty: Difficulty, against: Difficulty, games: u32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let player = AiPolicy::new(difficulty, Side::Player);
    let opponent = AiPolicy::new(against, Side::Opponent);
    let (mut wins, mut losses, mut draws) = (0u32, 0u32, 0u32);

    for game in 0..games {
        let first = if game % 2 == 0 {
            Side::Player
        } else {
            Side::Opponent
        };
        let mut engine = MatchEngine::new();
        engine.start(first);
        while let Some(side) = engine.current_turn() {
            let policy = if side == Side::Player { player } else { opponent };
            let index = policy.choose_on(engine.board(), &mut rng);
            engine.process_move(index, side);
        }
        match engine.outcome().and_then(|o| o.winner()) {
            Some(Side::Player) => wins += 1,
            Some(Side::Opponent) => losses += 1,
            None => draws += 1,
        }
    }

    info!(wins, losses, draws, "Simulation finished");
    println!(
        "{} vs {} over {} games: {} wins, {} losses, {} draws",
        difficulty, against, games, wins, losses, draws
    );
}
