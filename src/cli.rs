//! Command-line front end: parse or generate a start board, solve it, print
//! the path.

use std::io::Write;

use clap::{Args, Parser, Subcommand};
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use crate::error::SearchError;
use crate::puzzle::{Board, BLANK};
use crate::search::{solve, Outcome, SearchReport};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Process exit status for any [`CliError`].
pub const ERROR_EXIT_CODE: i32 = 1;

/// Largest side length solved from a uniform shuffle. Larger boards need
/// `--walk` to keep the optimal depth within reach of uninformed search.
pub const MAX_SHUFFLE_SIZE: usize = 3;

#[derive(Debug, Parser)]
#[command(
    name = "slider-search",
    about = "Find the shortest solution of a sliding-tile puzzle",
    version
)]
pub struct Cli {
    /// Log search progress at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Solve a given start board.
    Solve(SolveArgs),

    /// Generate a random solvable board and solve it.
    Random(RandomArgs),
}

#[derive(Debug, Args)]
pub struct SolveArgs {
    /// Row-major tiles, blank as 0 or `_`, e.g. `1,2,3,4,0,6,7,5,8`.
    #[arg(long)]
    pub start: Board,

    /// Target board; defaults to the standard goal of the same size.
    #[arg(long)]
    pub goal: Option<Board>,

    /// Print only the move string and cost.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct RandomArgs {
    /// Side length of the board. Sizes above 3 require `--walk`.
    #[arg(long, default_value_t = 3)]
    pub size: usize,

    /// Seed for a reproducible board.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Scramble with this many random moves from the goal instead of a
    /// uniform shuffle.
    #[arg(long)]
    pub walk: Option<usize>,

    #[arg(short, long)]
    pub quiet: bool,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Solved,
    Unsolvable,
}

impl RunStatus {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Solved => 0,
            Self::Unsolvable => 2,
        }
    }
}

/// Presentation settings for [`render_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStyle {
    pub quiet: bool,
    pub color: bool,
}

/// Execute `cli`, writing to `out` and flushing it before returning.
pub fn run(cli: Cli, out: &mut impl Write, color: bool) -> Result<RunStatus> {
    let status = dispatch(cli, out, color)?;
    out.flush()?;
    Ok(status)
}

fn dispatch(cli: Cli, out: &mut impl Write, color: bool) -> Result<RunStatus> {
    match cli.command {
        Commands::Solve(args) => {
            let goal = match args.goal {
                Some(goal) => goal,
                None => Board::goal(args.start.size())?,
            };
            let style = RenderStyle {
                quiet: args.quiet,
                color,
            };
            solve_and_render(&args.start, &goal, out, style)
        }
        Commands::Random(args) => {
            if args.walk.is_none() && args.size > MAX_SHUFFLE_SIZE {
                return Err(CliError::InvalidArgument {
                    message: format!(
                        "a uniform shuffle of size {} is out of reach; pass --walk",
                        args.size
                    ),
                });
            }
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let goal = Board::goal(args.size)?;
            let start = match args.walk {
                Some(steps) => goal.random_walk(steps, &mut rng),
                None => Board::random_solvable(args.size, &mut rng)?,
            };
            info!(seed = ?args.seed, walk = ?args.walk, "generated start board");
            let style = RenderStyle {
                quiet: args.quiet,
                color,
            };
            solve_and_render(&start, &goal, out, style)
        }
    }
}

fn solve_and_render(
    start: &Board,
    goal: &Board,
    out: &mut impl Write,
    style: RenderStyle,
) -> Result<RunStatus> {
    let report = solve(start, goal)?;
    render_report(out, start, &report, style)?;
    Ok(match report.outcome {
        Outcome::Solved(_) => RunStatus::Solved,
        Outcome::Unsolvable => RunStatus::Unsolvable,
    })
}

/// Write the outcome of a search for `start`.
pub fn render_report(
    out: &mut impl Write,
    start: &Board,
    report: &SearchReport,
    style: RenderStyle,
) -> std::io::Result<()> {
    let Outcome::Solved(solution) = &report.outcome else {
        if !style.quiet {
            write_board(out, start, style.color)?;
        }
        return writeln!(out, "This start state is unsolvable.");
    };

    let moves: String = solution.moves.iter().map(|m| m.as_char()).collect();
    if style.quiet {
        return writeln!(out, "{} {moves}", solution.cost);
    }

    let header = format!(
        "Solution found with cost {} in {} moves:",
        solution.cost,
        solution.moves.len()
    );
    if style.color {
        writeln!(out, "{}", header.bold())?;
    } else {
        writeln!(out, "{header}")?;
    }
    writeln!(out, "Moves: {moves}")?;
    writeln!(
        out,
        "Expanded {} boards ({} stale entries skipped, frontier peak {}).",
        report.stats.expanded, report.stats.stale_discarded, report.stats.frontier_high_water
    )?;
    writeln!(out)?;

    for (step, board) in solution.states.iter().enumerate() {
        match step.checked_sub(1).map(|i| solution.moves[i]) {
            Some(m) => writeln!(out, "step {step}: {m}")?,
            None => writeln!(out, "start")?,
        }
        write_board(out, board, style.color)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_board(out: &mut impl Write, board: &Board, color: bool) -> std::io::Result<()> {
    if !color {
        return write!(out, "{board}");
    }

    let width = (board.tiles().len() - 1).to_string().len();
    for row in board.tiles().chunks(board.size()) {
        let cells: Vec<String> = row
            .iter()
            .map(|&val| {
                if val == BLANK {
                    format!("{:>width$}", "_").reverse().to_string()
                } else {
                    format!("{val:>width$}")
                }
            })
            .collect();
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(())
}
