//! Desert Trooper headless host
//!
//! Runs the simulation without a window: a scripted pointer wanders the
//! desert and heads for the evacuation zone once it opens. Useful for soak
//! testing balance changes and for reproducing runs from a seed.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use desert_trooper::consts::*;
use desert_trooper::renderer::{Hud, SpriteTable, draw_list};
use desert_trooper::sim::{
    FixedStep, GameEvent, GamePhase, GameState, LevelGrid, PhaseCommand, StaticMap, TickInput, tick,
};
use desert_trooper::{Tuning, format_clock};

/// Headless Desert Trooper simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RNG seed for spawns and placement
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Stop after this many playing ticks (default: one full round)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Level grid: CSV with a header row, or plain rows of G/B/W
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// JSON file overriding balance values
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Pace ticks against the wall clock instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write the final game state as JSON
    #[arg(long)]
    dump_state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Ticks between HUD snapshots in the log
const REPORT_EVERY_TICKS: u64 = 30 * TICKS_PER_SECOND;

#[derive(Debug, Default)]
struct Summary {
    shots: u64,
    kills: u64,
    power_ups: u64,
    damage_taken: u64,
    explosions: u64,
}

impl Summary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotFired { .. } => self.shots += 1,
            GameEvent::EnemyKilled { .. } => self.kills += 1,
            GameEvent::PowerUpCollected { .. } => self.power_ups += 1,
            GameEvent::PlayerHurt { damage, .. } => self.damage_taken += u64::from(*damage),
            GameEvent::Explosion { .. } => self.explosions += 1,
            GameEvent::EvacWindowOpened => log::info!("Evacuation window is open"),
            GameEvent::Timeout => log::info!("Time is up"),
            _ => {}
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Open desert walled by cave rock with scattered stone outcrops, big enough to hold the evac zone
fn default_level() -> LevelGrid {
    const COLS: usize = 128;
    const ROWS: usize = 120;
    let rows = (0..ROWS)
        .map(|row| {
            (0..COLS)
                .map(|col| {
                    let border = row == 0 || col == 0 || row == ROWS - 1 || col == COLS - 1;
                    let spawn_area = col.abs_diff(COLS / 2) < 4 && row.abs_diff(ROWS / 2) < 4;
                    if border {
                        'W'
                    } else if !spawn_area && (col * 7 + row * 13) % 47 == 0 {
                        'B'
                    } else {
                        'G'
                    }
                })
                .collect()
        })
        .collect();
    LevelGrid { rows }
}

fn load_level(path: Option<&PathBuf>) -> Result<StaticMap> {
    match path {
        Some(path) => StaticMap::load(path)
            .with_context(|| format!("when loading level at {}", path.display())),
        None => StaticMap::from_grid(&default_level()).context("when building the default level"),
    }
}

/// Pointer path: wander in a slow loop, then run for the evac zone once it opens
fn scripted_pointer(state: &GameState) -> Vec2 {
    if state.clock.evac_open {
        let zone = state.tuning.evac_zone.to_world();
        let heading = (zone.center() - state.player.center()).normalize_or_zero();
        return SCREEN_CENTER + heading * MOUSE_THRESHOLD * 2.0;
    }
    let angle = state.clock.tick as f32 / 900.0;
    SCREEN_CENTER + Vec2::new(angle.cos(), angle.sin()) * MOUSE_THRESHOLD * 0.75
}

fn report(state: &GameState, map: &StaticMap, sprites: &SpriteTable) {
    let hud = Hud::from_state(state);
    let draws = draw_list(state, map, sprites).len();
    log::info!(
        "[{}] hp {} | enemies {} | bullets {} | {} rpm | draws {}",
        hud.countdown,
        hud.health,
        state.enemies.len(),
        state.bullets.len(),
        hud.shots_per_minute,
        draws
    );
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("when loading tuning at {}", path.display()))?,
        None => Tuning::default(),
    };
    let map = load_level(args.level.as_ref())?;
    log::info!(
        "Level {}x{} tiles, seed {}",
        map.cols(),
        map.rows(),
        args.seed
    );

    let tick_limit = args.ticks.unwrap_or(tuning.round_ticks() + 1);
    let mut state = GameState::new(args.seed, map.world_size(), tuning);
    let sprites = SpriteTable::default();
    let mut summary = Summary::default();

    for command in [PhaseCommand::Start, PhaseCommand::BeginMission] {
        let input = TickInput {
            pointer: None,
            command: Some(command),
        };
        tick(&mut state, &map, &input);
    }

    let mut step = FixedStep::default();
    let mut last_frame = Instant::now();
    let frame_budget = Duration::from_secs_f32(SIM_DT);

    while state.phase == GamePhase::Playing && state.clock.tick < tick_limit {
        let substeps = if args.realtime {
            std::thread::sleep(frame_budget.saturating_sub(last_frame.elapsed()));
            let now = Instant::now();
            let frame_dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;
            step.advance(frame_dt)
        } else {
            1
        };

        for _ in 0..substeps {
            let input = TickInput {
                pointer: Some(scripted_pointer(&state)),
                command: None,
            };
            tick(&mut state, &map, &input);
            for event in state.drain_events() {
                summary.record(&event);
            }
            if state.clock.tick % REPORT_EVERY_TICKS == 0 {
                report(&state, &map, &sprites);
            }
            if state.phase != GamePhase::Playing || state.clock.tick >= tick_limit {
                break;
            }
        }
    }

    log::info!(
        "Finished in {:?} at {} elapsed: {} shots, {} kills, {} power-ups, {} explosions, {} damage taken",
        state.phase,
        format_clock(state.clock.elapsed_secs()),
        summary.shots,
        summary.kills,
        summary.power_ups,
        summary.explosions,
        summary.damage_taken
    );

    if let Some(path) = &args.dump_state {
        let json = serde_json::to_string_pretty(&state).context("when serializing game state")?;
        std::fs::write(path, json)
            .with_context(|| format!("when writing game state to {}", path.display()))?;
        log::info!("Wrote game state to {}", path.display());
    }

    Ok(())
}
