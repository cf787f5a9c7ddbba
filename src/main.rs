//! Tesuji: a small-board Go engine with a family of search agents.
//!
//! ## Usage
//!
//! - `tesuji play --black minimax --white greedy` - Play a match
//! - `tesuji play --black qlearn --q-table table.json` - Play with a trained table
//! - `tesuji train --games 1000 --output table.json` - Q-learning self-play

use std::io;
use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};

use tesuji::game::{self, Match};
use tesuji::strategy::StrategyKind;

/// Tesuji: small-board Go with minimax, expectimax, MCTS and Q-learning
#[derive(Parser)]
#[command(name = "tesuji")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log verbosity: debug instead of info
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a series of games between two strategies
    Play {
        /// Board size (size x size)
        #[arg(long, default_value_t = 5)]
        size: usize,
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: usize,
        /// Black's strategy
        #[arg(long, value_enum, default_value_t = StrategyKind::Minimax)]
        black: StrategyKind,
        /// White's strategy (random or greedy)
        #[arg(long, value_enum, default_value_t = StrategyKind::Random)]
        white: StrategyKind,
        /// Print the board after every move
        #[arg(long)]
        display: bool,
        /// Trained Q-table to load when Black plays qlearn
        #[arg(long)]
        q_table: Option<PathBuf>,
    },
    /// Train two Q-learners through self-play and save Black's table
    Train {
        /// Board size (size x size)
        #[arg(long, default_value_t = 5)]
        size: usize,
        /// Number of self-play games
        #[arg(long, default_value_t = 1000)]
        games: usize,
        /// Where to write the trained Q-table
        #[arg(long, default_value = "q_table.json")]
        output: PathBuf,
    },
}

fn init_logger(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose)?;

    match cli.command {
        Commands::Play {
            size,
            games,
            black,
            white,
            display,
            q_table,
        } => {
            if !matches!(white, StrategyKind::Random | StrategyKind::Greedy) {
                bail!("white must play random or greedy");
            }
            let mut black = black.build(q_table.as_deref())?;
            let mut white = white.build(None)?;
            let records = Match::new(size, games, display).run(&mut black, &mut white);

            let black_wins = records.iter().filter(|r| r.black_win).count();
            let white_wins = records.iter().filter(|r| r.white_win).count();
            let ties = records.iter().filter(|r| r.tie).count();
            println!("BLACK {black_wins} wins, WHITE {white_wins} wins, {ties} ties");
        }
        Commands::Train {
            size,
            games,
            output,
        } => {
            let (black, _white, records) = game::train_qlearning(size, games);
            black.save(&output)?;
            let black_wins = records.iter().filter(|r| r.black_win).count();
            log::info!(
                "trained {} games ({} black wins), q-table saved to {}",
                games,
                black_wins,
                output.display()
            );
        }
    }
    Ok(())
}
