//! SokoZero self-play and evaluation tool.
//!
//! Generates Sokoban self-play training examples with MCTS and saves them in
//! MessagePack format for the external trainer. Also evaluates search and
//! heuristic players in the arena.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sokozero_core::Puzzle;
use sokozero_mcts::{Mcts, MctsConfig, RolloutEvaluator};
use sokozero_selfplay::{
    mcts_policy, Arena, ArenaResult, Coach, HeuristicPlayer, IterationSummary, SelfPlayConfig,
    TrainingHistory,
};
use sokozero_sokoban::{score, Board, Sokoban};
use tracing::info;

/// SokoZero self-play and evaluation tool.
#[derive(Parser)]
#[command(name = "sokozero")]
#[command(about = "Generate Sokoban self-play data and evaluate search policies")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LevelArgs {
    /// Level file in the standard text format.
    #[arg(short, long)]
    level: PathBuf,
}

#[derive(Args)]
struct SearchArgs {
    /// Number of MCTS simulations per move.
    #[arg(short, long, default_value = "25")]
    simulations: usize,

    /// PUCT exploration weight.
    #[arg(long, default_value = "1.0")]
    cpuct: f32,

    /// Maximum rollout depth for the evaluator.
    #[arg(long, default_value = "50")]
    rollout_depth: usize,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run coach iterations and write training examples.
    Generate {
        #[command(flatten)]
        level: LevelArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Number of coach iterations.
        #[arg(short, long, default_value = "1000")]
        iterations: usize,

        /// Self-play episodes per iteration.
        #[arg(short, long, default_value = "100")]
        episodes: usize,

        /// Decision count (from 1) below which moves are sampled at temperature 1.
        #[arg(long, default_value = "15")]
        temp_threshold: usize,

        /// Step cap for a self-play episode.
        #[arg(long, default_value = "10000")]
        max_steps: usize,

        /// Newest examples kept per iteration.
        #[arg(long, default_value = "200000")]
        max_queue_len: usize,

        /// Iterations of examples kept in the history.
        #[arg(long, default_value = "20")]
        history_iters: usize,

        /// Arena episodes after each iteration.
        #[arg(long, default_value = "40")]
        arena_compare: usize,

        /// Step cap for an arena episode.
        #[arg(long, default_value = "10000")]
        arena_max_steps: usize,

        /// Minimum arena solve rate to accept a model.
        #[arg(long, default_value = "0.6")]
        update_threshold: f32,

        /// Outcome recorded for unsolved episodes.
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        unsolved_value: f32,

        /// Keep one search tree for a whole episode.
        #[arg(long)]
        reuse_tree: bool,

        /// Directory for example checkpoints and iteration summaries.
        #[arg(short, long, default_value = "./temp/")]
        checkpoint: PathBuf,

        /// Resume from a saved `.examples` checkpoint.
        #[arg(long)]
        load: Option<PathBuf>,
    },

    /// Evaluate zero-temperature MCTS in the arena.
    Evaluate {
        #[command(flatten)]
        level: LevelArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Number of episodes to play.
        #[arg(short, long, default_value = "40")]
        episodes: usize,

        /// Step cap per episode.
        #[arg(long, default_value = "10000")]
        max_steps: usize,
    },

    /// Evaluate the greedy heuristic player in the arena.
    Baseline {
        #[command(flatten)]
        level: LevelArgs,

        /// Number of episodes to play.
        #[arg(short, long, default_value = "40")]
        episodes: usize,

        /// Step cap per episode.
        #[arg(long, default_value = "10000")]
        max_steps: usize,
    },

    /// Show a level, its legal moves and heuristic score.
    Inspect {
        #[command(flatten)]
        level: LevelArgs,
    },
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn load_level(path: &Path) -> Result<Sokoban> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read level file: {:?}", path))?;
    Sokoban::from_level(&text).with_context(|| format!("Failed to parse level file: {:?}", path))
}

fn rollout_evaluator(seed: u64, depth: usize) -> RolloutEvaluator<ChaCha8Rng> {
    RolloutEvaluator::new(ChaCha8Rng::seed_from_u64(seed), depth)
}

fn write_summary(dir: &Path, summary: &IterationSummary) -> Result<()> {
    let path = dir.join(format!("summary_{}.json", summary.iteration));
    let file = File::create(&path).with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("Failed to write summary: {:?}", path))?;
    Ok(())
}

fn print_arena(label: &str, result: &ArenaResult) {
    println!("\n================================================");
    println!("{} RESULTS", label);
    println!("================================================");
    println!("Solved:    {}", result.solved);
    println!("Timed out: {}", result.timed_out);
    println!("------------------------------------------------");
    println!("Solve rate: {:.1}%", result.solve_rate() * 100.0);
}

/// Run the generate command.
fn cmd_generate(
    level: &Path,
    config: SelfPlayConfig,
    rollout_depth: usize,
    load: Option<PathBuf>,
) -> Result<()> {
    config.validate()?;
    let game = load_level(level)?;

    fs::create_dir_all(&config.checkpoint).with_context(|| {
        format!("Failed to create checkpoint directory: {:?}", config.checkpoint)
    })?;

    info!(
        level = ?level,
        iterations = config.num_iterations,
        episodes = config.num_episodes,
        simulations = config.num_simulations,
        seed = config.seed,
        "generating self-play data"
    );
    let start = Instant::now();

    let checkpoint = config.checkpoint.clone();
    let mut coach = Coach::new(game, config.clone(), move |seed| {
        rollout_evaluator(seed, rollout_depth)
    });

    if let Some(path) = load {
        info!(path = ?path, "loading training examples");
        let history =
            TrainingHistory::load(&path, config.num_iters_for_history, config.max_len_of_queue)?;
        coach = coach.with_history(history);
    }

    let summaries = coach.learn(|summary| write_summary(&checkpoint, summary))?;

    let elapsed = start.elapsed();
    let solved: usize = summaries.iter().map(|s| s.solved).sum();
    let episodes: usize = summaries.iter().map(|s| s.episodes).sum();
    println!("\nCompleted in {:.2}s", elapsed.as_secs_f64());
    println!("Iterations: {}", summaries.len());
    println!("Episodes solved: {}/{}", solved, episodes);
    println!("Examples retained: {}", coach.history().num_examples());
    println!("Files saved to: {:?}", checkpoint);

    Ok(())
}

fn cmd_evaluate(level: &Path, search: SearchArgs, episodes: usize, max_steps: usize) -> Result<()> {
    let game = load_level(level)?;
    let config = MctsConfig {
        c_puct: search.cpuct,
        ..MctsConfig::for_evaluation(search.simulations)
    };
    let evaluator = rollout_evaluator(search.seed.wrapping_add(1), search.rollout_depth);
    let mut mcts = Mcts::new(config, evaluator, ChaCha8Rng::seed_from_u64(search.seed));

    info!(
        episodes,
        simulations = search.simulations,
        "evaluating zero-temperature MCTS"
    );
    let arena = Arena::new(&game, max_steps);
    let mut policy = mcts_policy(&game, &mut mcts);
    let result = arena.play_episodes(episodes, &mut policy)?;

    print_arena("MCTS", &result);
    Ok(())
}

fn cmd_baseline(level: &Path, episodes: usize, max_steps: usize) -> Result<()> {
    let game = load_level(level)?;
    let arena = Arena::new(&game, max_steps);
    let mut policy = |board: &Board| Ok(HeuristicPlayer.choose_index(&game, board));
    let result = arena.play_episodes(episodes, &mut policy)?;

    print_arena("HEURISTIC", &result);
    Ok(())
}

fn cmd_inspect(level: &Path) -> Result<()> {
    let game = load_level(level)?;
    let board = game.initial_state();

    println!("{}", board);
    println!();
    println!("Size: {}x{}", board.width(), board.height());
    println!("Actions: {}", game.num_actions());
    let moves: Vec<String> = board.legal_moves().iter().map(|d| d.to_string()).collect();
    println!("Legal moves: {}", moves.join(" "));
    println!("Score: {:.3}", score::score(&board));
    println!("Solved: {}", board.is_solved());
    match game.outcome(&board) {
        Some(outcome) => println!("Terminal: {:?}", outcome),
        None => println!("Terminal: no"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Generate {
            level,
            search,
            iterations,
            episodes,
            temp_threshold,
            max_steps,
            max_queue_len,
            history_iters,
            arena_compare,
            arena_max_steps,
            update_threshold,
            unsolved_value,
            reuse_tree,
            checkpoint,
            load,
        } => {
            let config = SelfPlayConfig {
                num_iterations: iterations,
                num_episodes: episodes,
                num_simulations: search.simulations,
                c_puct: search.cpuct,
                temperature_threshold: temp_threshold,
                max_episode_steps: max_steps,
                max_len_of_queue: max_queue_len,
                num_iters_for_history: history_iters,
                arena_compare,
                arena_max_steps,
                update_threshold,
                unsolved_value,
                reuse_tree,
                seed: search.seed,
                checkpoint,
                ..SelfPlayConfig::default()
            };
            cmd_generate(&level.level, config, search.rollout_depth, load)
        }

        Commands::Evaluate {
            level,
            search,
            episodes,
            max_steps,
        } => cmd_evaluate(&level.level, search, episodes, max_steps),

        Commands::Baseline {
            level,
            episodes,
            max_steps,
        } => cmd_baseline(&level.level, episodes, max_steps),

        Commands::Inspect { level } => cmd_inspect(&level.level),
    }
}
