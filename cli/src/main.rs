//! # Tile Merge CLI
//!
//! Command-line front-end for the tile merge engine: play interactively in
//! the terminal, or run headless simulations with simple policies.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tile_merge_core::{Direction, Engine, EngineConfig, EngineError};

#[derive(Parser, Debug)]
#[command(name = "tile-merge")]
#[command(author, version, about = "Play the tile merge puzzle in the terminal or run simulations")]
struct Args {
    /// Number of episodes to run in headless mode (interactive if omitted)
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Random seed for deterministic runs
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Board rows
    #[arg(long, default_value = "4")]
    rows: usize,

    /// Board columns
    #[arg(long, default_value = "4")]
    cols: usize,

    /// How many moves undo can step back
    #[arg(long, default_value = "1")]
    max_snapshots: usize,

    /// Chance that a spawned tile is a 4
    #[arg(long, default_value = "0.15")]
    four_probability: f64,

    /// Maximum steps per episode (0 = unlimited)
    #[arg(short, long, default_value = "10000")]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Chance that the random policy undoes instead of moving
    #[arg(long, default_value = "0.0")]
    undo_rate: f64,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn config(&self, seed: u64) -> EngineConfig {
        EngineConfig {
            rows: self.rows,
            cols: self.cols,
            max_snapshots: self.max_snapshots,
            seed,
            four_probability: self.four_probability,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through directions: Left, Down, Right, Up
    Cycle,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("--undo-rate must be within [0, 1], got {0}")]
    UndoRate(f64),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let result = match args.episodes {
        Some(episodes) => run_headless(&args, episodes),
        None => run_interactive(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

const CONTROLS: &str = "Controls: WASD or Arrow Keys | Space/U to undo | R to restart | Q to quit";

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args) -> Result<(), CliError> {
    let mut engine = Engine::new(args.config(args.seed))?;
    let _raw = RawMode::enable();
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    redraw(&engine, None)?;

    loop {
        let bytes_read = stdin.read(&mut buffer)?;
        if bytes_read == 0 {
            continue;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(dir) => {
                if engine.is_done() {
                    continue;
                }
                let outcome = engine.submit_direction(dir)?;
                let note = (outcome.gained > 0).then(|| format!("+{} points!", outcome.gained));
                redraw(&engine, note.as_deref())?;

                if engine.settle() {
                    println!("\n  *** GAME OVER ***");
                    println!("  Final Score: {}", engine.score());
                    println!("  Max Tile: {}", engine.max_tile());
                    println!("\n  Press U to undo, R to restart or Q to quit");
                    io::stdout().flush()?;
                }
            }
            InputAction::Undo => {
                let note = if engine.request_undo().restored {
                    "Undone."
                } else {
                    "Nothing to undo."
                };
                redraw(&engine, Some(note))?;
            }
            InputAction::Restart => {
                engine.initialize(args.config(args.seed))?;
                redraw(&engine, None)?;
            }
            InputAction::Quit => {
                println!("\nGoodbye!");
                break;
            }
            InputAction::None => {}
        }
    }
    Ok(())
}

/// Per-episode statistics gathered in headless mode.
struct Episode {
    score: u64,
    max_tile: u32,
    steps: u32,
    undos: u32,
}

/// Run headless simulation mode.
fn run_headless(args: &Args, episodes: u32) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&args.undo_rate) {
        return Err(CliError::UndoRate(args.undo_rate));
    }

    let mut policy_rng = SmallRng::seed_from_u64(args.seed.wrapping_add(1000));
    let mut results: Vec<Episode> = Vec::with_capacity(episodes as usize);

    for episode in 0..episodes {
        let seed = args.seed.wrapping_add(u64::from(episode));
        let result = run_episode(args, seed, &mut policy_rng)?;

        if args.verbose {
            println!(
                "Episode {}: Score={}, MaxTile={}, Steps={}, Undos={}",
                episode + 1,
                result.score,
                result.max_tile,
                result.steps,
                result.undos
            );
        }
        results.push(result);
    }

    print_summary(args, &results);
    Ok(())
}

fn run_episode(args: &Args, seed: u64, rng: &mut SmallRng) -> Result<Episode, CliError> {
    let mut engine = Engine::new(args.config(seed))?;
    let mut steps = 0;
    let mut undos = 0;
    let mut cycle = 0;

    while !engine.is_done() && (args.max_steps == 0 || steps < args.max_steps) {
        if matches!(args.policy, Policy::Random)
            && engine.can_undo()
            && rng.gen_bool(args.undo_rate)
        {
            engine.request_undo();
            undos += 1;
            steps += 1;
            continue;
        }

        let dir = match args.policy {
            Policy::Random => select_random_direction(&engine, rng),
            Policy::Cycle => select_cycle_direction(&engine, &mut cycle),
        };
        let Some(dir) = dir else {
            break;
        };

        let outcome = engine.play(dir)?;
        steps += 1;
        debug!("seed {seed} step {steps}: {dir} -> {outcome:?}");

        if args.verbose {
            println!("Step {}: {}", steps, dir);
            print!("{}", engine);
        }
    }

    info!("episode seed {seed} finished with score {}", engine.score());
    Ok(Episode {
        score: engine.score(),
        max_tile: engine.max_tile(),
        steps,
        undos,
    })
}

fn print_summary(args: &Args, results: &[Episode]) {
    let episodes = results.len();
    if episodes == 0 {
        println!("=== Simulation Results ===");
        println!("episodes=0");
        return;
    }

    let mut scores: Vec<u64> = results.iter().map(|e| e.score).collect();
    scores.sort_unstable();
    let total: u64 = scores.iter().sum();
    let avg_score = total as f64 / episodes as f64;
    let median_score = if episodes % 2 == 0 {
        (scores[episodes / 2 - 1] + scores[episodes / 2]) as f64 / 2.0
    } else {
        scores[episodes / 2] as f64
    };
    let max_tile_overall = results.iter().map(|e| e.max_tile).max().unwrap_or(0);
    let total_undos: u64 = results.iter().map(|e| u64::from(e.undos)).sum();

    let mut tile_counts: HashMap<u32, u32> = HashMap::new();
    for e in results {
        *tile_counts.entry(e.max_tile).or_insert(0) += 1;
    }

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", episodes);
    println!("board={}x{}", args.rows, args.cols);
    println!("policy={:?}", args.policy);
    println!("seed={}", args.seed);
    println!("max_steps={}", args.max_steps);
    println!("avg_score={:.2}", avg_score);
    println!("median_score={:.2}", median_score);
    println!("min_score={}", scores.first().unwrap_or(&0));
    println!("max_score={}", scores.last().unwrap_or(&0));
    println!("max_tile_overall={}", max_tile_overall);
    println!("undos={}", total_undos);

    let mut tile_list: Vec<_> = tile_counts.into_iter().collect();
    tile_list.sort_by_key(|&(tile, _)| tile);
    let distribution: Vec<String> = tile_list
        .iter()
        .map(|(tile, count)| format!("{}:{}", tile, count))
        .collect();
    println!("tile_distribution={}", distribution.join(","));
}

/// Select a random legal direction.
fn select_random_direction(engine: &Engine, rng: &mut SmallRng) -> Option<Direction> {
    let legal = engine.legal_directions();
    let valid: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| legal[d.index()])
        .collect();

    if valid.is_empty() {
        None
    } else {
        Some(valid[rng.gen_range(0..valid.len())])
    }
}

/// Select directions in a cycle: Left, Down, Right, Up.
fn select_cycle_direction(engine: &Engine, cycle: &mut usize) -> Option<Direction> {
    let order = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
    let legal = engine.legal_directions();

    for _ in 0..order.len() {
        let dir = order[*cycle % order.len()];
        *cycle += 1;
        if legal[dir.index()] {
            return Some(dir);
        }
    }

    None
}

#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Move(Direction),
    Undo,
    Restart,
    Quit,
    None,
}

fn parse_input(bytes: &[u8]) -> InputAction {
    match bytes {
        // Arrow keys (escape sequences)
        [27, 91, 65] => InputAction::Move(Direction::Up),
        [27, 91, 66] => InputAction::Move(Direction::Down),
        [27, 91, 67] => InputAction::Move(Direction::Right),
        [27, 91, 68] => InputAction::Move(Direction::Left),

        // WASD keys
        [b'w'] | [b'W'] => InputAction::Move(Direction::Up),
        [b's'] | [b'S'] => InputAction::Move(Direction::Down),
        [b'a'] | [b'A'] => InputAction::Move(Direction::Left),
        [b'd'] | [b'D'] => InputAction::Move(Direction::Right),

        // Control keys
        [b' '] | [b'u'] | [b'U'] => InputAction::Undo,
        [b'q'] | [b'Q'] | [3] | [27] => InputAction::Quit, // q, Q, Ctrl+C, Esc
        [b'r'] | [b'R'] => InputAction::Restart,

        _ => InputAction::None,
    }
}

fn redraw(engine: &Engine, note: Option<&str>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?; // Clear screen
    writeln!(out, "=== {}x{} ===", engine.rows(), engine.cols())?;
    writeln!(out, "{CONTROLS}\n")?;
    write!(out, "{}", engine)?;
    if let Some(note) = note {
        writeln!(out, "  {note}")?;
    }
    out.flush()
}

/// Puts the terminal in non-canonical, no-echo mode until dropped.
struct RawMode {
    #[cfg(unix)]
    saved: Option<libc::termios>,
}

#[cfg(unix)]
impl RawMode {
    fn enable() -> Self {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        // SAFETY: termios is plain data and fd is the process's stdin.
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) != 0 {
                return RawMode { saved: None };
            }
            let saved = termios;
            termios.c_lflag &= !(libc::ICANON | libc::ECHO);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;
            libc::tcsetattr(fd, libc::TCSANOW, &termios);
            RawMode { saved: Some(saved) }
        }
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        if let Some(saved) = self.saved {
            // SAFETY: restores the attributes read in `enable`.
            unsafe {
                libc::tcsetattr(io::stdin().as_raw_fd(), libc::TCSANOW, &saved);
            }
        }
    }
}

// On non-Unix systems input stays line-buffered: press Enter after each key.
#[cfg(not(unix))]
impl RawMode {
    fn enable() -> Self {
        RawMode {}
    }
}
