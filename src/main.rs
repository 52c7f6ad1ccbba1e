//! # Gridcrawl Main Entry Point
//!
//! Runs a headless simulation: a scripted player walks toward the nearest NPC
//! on its level and fights whatever it bumps into, one command per turn.

use clap::Parser;
use gridcrawl::{
    Direction, GameConfig, GameState, GridcrawlError, GridcrawlResult, MoveOutcome, PlayerState,
    Position,
};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Command line arguments for the Gridcrawl simulation.
#[derive(Parser, Debug)]
#[command(name = "gridcrawl")]
#[command(about = "Headless simulation of the Gridcrawl NPC lifecycle engine")]
#[command(version)]
struct Args {
    /// Random seed for NPC generation and respawns
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of turns to simulate
    #[arg(short, long, default_value_t = 100)]
    turns: u64,

    /// Override the boss chance (0.0 to 1.0)
    #[arg(long)]
    boss_chance: Option<f64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Write the final game state to this JSON file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(&args) {
        error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_default_env()
        .parse_filters(log_level)
        .format_target(false)
        .init();
}

fn run(args: &Args) -> GridcrawlResult<()> {
    info!("Starting Gridcrawl v{}", gridcrawl::VERSION);

    let mut config = GameConfig::from_env(args.seed);
    if let Some(chance) = args.boss_chance {
        if !(0.0..=1.0).contains(&chance) {
            return Err(GridcrawlError::InvalidState(format!(
                "boss chance {} is outside 0.0..=1.0",
                chance
            )));
        }
        config.generation.boss_chance = chance;
    }

    let mut state = GameState::new_populated(config)?;
    // Separate stream so the walk does not perturb NPC generation
    let mut walker = StdRng::seed_from_u64(args.seed.wrapping_add(1));

    for _ in 0..args.turns {
        if !state.player.is_alive() {
            info!("The player is dead after {} turns", state.turn_number);
            break;
        }
        let direction = choose_direction(&state, &mut walker);
        match state.move_player(direction)? {
            MoveOutcome::Engaged(report) if report.npc_defeated() => {
                info!("Turn {}: defeated NPC {}", state.turn_number, report.npc_id)
            }
            outcome => debug!("Turn {}: {:?}", state.turn_number, outcome),
        }
        state.advance_turn();
        for event in state.drain_events() {
            debug!("{:?}", event);
        }
    }

    print_summary(&state);

    if let Some(path) = &args.save {
        state.save_to_file(path)?;
        info!("Saved game to {}", path.display());
    }
    Ok(())
}

/// Steps toward the nearest live NPC on the player's level, or wanders.
fn choose_direction(state: &GameState, rng: &mut StdRng) -> Direction {
    let here = state.player.position;
    let target = state
        .lifecycle
        .live_npcs(here.level)
        .into_iter()
        .map(|npc| npc.position)
        .min_by_key(|pos| here.manhattan_distance(*pos).unwrap_or(u32::MAX));

    match target {
        Some(Position { row, .. }) if row < here.row => Direction::Up,
        Some(Position { row, .. }) if row > here.row => Direction::Down,
        Some(Position { col, .. }) if col < here.col => Direction::Left,
        Some(Position { col, .. }) if col > here.col => Direction::Right,
        _ => Direction::all()[rng.gen_range(0..4)],
    }
}

fn print_summary(state: &GameState) {
    let stats = &state.statistics;
    println!("{}", state.render_current_level());
    println!(
        "Turns: {}  Player level: {}  HP: {}/{}  Credits: {}",
        state.turn_number,
        state.player.level,
        state.player.hp(),
        state.player.stats.max_hp,
        state.player.credits
    );
    println!(
        "NPCs defeated: {}  respawned: {}  deferred: {}  live: {}",
        stats.npcs_defeated,
        stats.npcs_respawned,
        stats.respawns_deferred,
        state.lifecycle.live_count()
    );
    println!(
        "Damage dealt: {}  taken: {}  steps: {}",
        stats.damage_dealt, stats.damage_taken, stats.steps_taken
    );
    println!(
        "Battles won: {}  lost: {}  credits lost: {}",
        stats.battles_won, stats.battles_lost, stats.credits_lost
    );
}
