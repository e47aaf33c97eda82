//! Render Janggi positions to SVG (or plain text).
//!
//! Usage:
//!   # Position after a move sequence (a pass is written e9-e9)
//!   cargo run --release --bin render -- --moves "a7-a6 a4-b4 b8-b4" -o board.svg
//!
//!   # One frame per ply
//!   cargo run --release --bin render -- --game "a7-a6 a4-b4" --output-dir ./frames/
//!
//!   # Text diagram of the start with a custom formation
//!   cargo run --release --bin render -- --text --red ma-sang-ma-sang

mod svg;

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use janggi_core::{cell_of, Cell, Formation, GameConfig, JanggiGame};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::svg::{render_svg, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormationArg {
    SangMaSangMa,
    MaSangMaSang,
    MaSangSangMa,
    SangMaMaSang,
}

impl From<FormationArg> for Formation {
    fn from(arg: FormationArg) -> Formation {
        match arg {
            FormationArg::SangMaSangMa => Formation::SangMaSangMa,
            FormationArg::MaSangMaSang => Formation::MaSangMaSang,
            FormationArg::MaSangSangMa => Formation::MaSangSangMa,
            FormationArg::SangMaMaSang => Formation::SangMaMaSang,
        }
    }
}

/// Render Janggi positions to SVG.
#[derive(Debug, Parser)]
#[command(name = "render", version)]
struct Args {
    /// Render the position after these moves, e.g. "a7-a6 a4-b4"
    #[arg(long, conflicts_with = "game")]
    moves: Option<String>,

    /// Render every position of this move sequence into --output-dir
    #[arg(long)]
    game: Option<String>,

    /// Output file for single-position mode
    #[arg(short, long, default_value = "board.svg")]
    output: PathBuf,

    /// Output directory for --game
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the text diagram instead of writing SVG
    #[arg(long)]
    text: bool,

    /// Scale factor
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Outline the source and destination of the last move
    #[arg(long)]
    highlight_last: bool,

    /// Red's Horse/Elephant formation
    #[arg(long, value_enum, default_value_t = FormationArg::SangMaSangMa)]
    red: FormationArg,

    /// Blue's Horse/Elephant formation
    #[arg(long, value_enum, default_value_t = FormationArg::SangMaSangMa)]
    blue: FormationArg,
}

// ============================================================================
// Move notation parser
// ============================================================================

/// Parse "from-to", e.g. "b7-b6"
fn parse_move(s: &str) -> Result<(Cell, Cell)> {
    let (from, to) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("move {s:?} is not of the form from-to"))?;
    let from = cell_of(from).with_context(|| format!("bad source in {s:?}"))?;
    let to = cell_of(to).with_context(|| format!("bad destination in {s:?}"))?;
    Ok((from, to))
}

/// Parse a sequence of moves separated by whitespace
fn parse_moves(s: &str) -> Result<Vec<(Cell, Cell)>> {
    s.split_whitespace().map(parse_move).collect()
}

/// Play one move, naming it in the error if refused
fn play(game: &mut JanggiGame, ply: usize, (from, to): (Cell, Cell)) -> Result<()> {
    game.play(from, to)
        .with_context(|| format!("move {} ({from}-{to}) was refused", ply + 1))?;
    debug!(ply = ply + 1, %from, %to, state = %game.game_state(), "played");
    Ok(())
}

// ============================================================================
// CLI
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = GameConfig { red: args.red.into(), blue: args.blue.into() };
    let mut game = JanggiGame::with_config(&config);

    // Batch mode: one frame per ply
    if let Some(sequence) = &args.game {
        let moves = parse_moves(sequence)?;
        fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("creating {}", args.output_dir.display()))?;

        let mut opts = RenderOptions { last_move: None, scale: args.scale };
        write_frame(&args, &game, &opts, 0)?;
        for (ply, &mv) in moves.iter().enumerate() {
            play(&mut game, ply, mv)?;
            if args.highlight_last {
                opts.last_move = Some(mv);
            }
            write_frame(&args, &game, &opts, ply + 1)?;
        }

        println!("\nRendered {} frames ({})", moves.len() + 1, game.game_state());
        return Ok(());
    }

    // Single position mode
    let moves = match &args.moves {
        Some(sequence) => parse_moves(sequence)?,
        None => Vec::new(),
    };
    for (ply, &mv) in moves.iter().enumerate() {
        play(&mut game, ply, mv)?;
    }

    if args.text {
        print!("{}", game.position().board());
        println!("{} to move, {}", game.side_to_move(), game.game_state());
        return Ok(());
    }

    let opts = RenderOptions {
        last_move: moves.last().copied().filter(|_| args.highlight_last),
        scale: args.scale,
    };
    let svg = render_svg(game.position(), &opts);
    fs::write(&args.output, svg).with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn write_frame(args: &Args, game: &JanggiGame, opts: &RenderOptions, ply: usize) -> Result<()> {
    let path = args.output_dir.join(format!("move-{ply:03}.svg"));
    if args.text {
        println!("--- ply {ply} ---\n{}", game.position().board());
    }
    fs::write(&path, render_svg(game.position(), opts))
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
