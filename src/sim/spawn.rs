//! Wave and power-up spawning
//!
//! Every spawn decision is a pure function of the tick counter, elapsed
//! minutes and the current intervals. Only placement draws from the RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::clock::GameClock;
use super::state::{EnemyKind, GameEvent, GameState, Grenade, PowerUpKind, RingOfFire};
use crate::consts::*;
use crate::tuning::Tuning;

/// Gap between the viewport edge and a freshly spawned enemy
const SPAWN_MARGIN: f32 = 10.0;

/// Spawn intervals that change during a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Ripper cadence; grows each time the player picks up shooting speed
    pub ripper_interval_ticks: u64,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            ripper_interval_ticks: tuning.enemies.ripper.spawn_interval_ticks,
        }
    }

    /// Current spawn interval for `kind`
    pub fn interval(&self, kind: EnemyKind, tuning: &Tuning) -> u64 {
        match kind {
            EnemyKind::Ripper => self.ripper_interval_ticks,
            _ => tuning.enemies.get(kind).spawn_interval_ticks,
        }
    }

    /// Stretch the ripper interval by `growth`, rounding down
    pub fn slow_rippers(&mut self, growth: f32) {
        let grown = (self.ripper_interval_ticks as f32 * growth).floor() as u64;
        self.ripper_interval_ticks = grown.max(1);
        log::debug!("Ripper interval now {} ticks", self.ripper_interval_ticks);
    }

    /// Whether `kind` is unlocked and its spawn interval lands on this tick
    pub fn enemy_due(&self, kind: EnemyKind, clock: &GameClock, tuning: &Tuning) -> bool {
        clock.elapsed_minutes() >= tuning.enemies.get(kind).unlock_minute
            && clock.every(self.interval(kind, tuning))
    }

    /// Whether power-up `kind` is unlocked and due on this tick
    pub fn power_up_due(kind: PowerUpKind, clock: &GameClock, tuning: &Tuning) -> bool {
        let schedule = tuning.power_ups.get(kind);
        clock.elapsed_minutes() >= schedule.unlock_minute && clock.every(schedule.interval_ticks)
    }
}

/// Uniform integer in `[lo, hi]`, truncating fractional bounds toward zero
fn random_coord(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = (lo as i32, hi as i32);
    if hi <= lo {
        return lo as f32;
    }
    rng.random_range(lo..=hi) as f32
}

/// Off-screen spawn point just beyond a random viewport edge
pub fn enemy_spawn_position(rng: &mut Pcg32, camera: &Camera) -> Vec2 {
    let off = camera.offset;
    let along_x = |rng: &mut Pcg32| random_coord(rng, off.x, off.x + SCREEN_WIDTH - TILE_SIZE);
    let along_y = |rng: &mut Pcg32| random_coord(rng, off.y, off.y + SCREEN_HEIGHT - TILE_SIZE);

    match rng.random_range(0..4u8) {
        0 => Vec2::new(off.x - TILE_SIZE - SPAWN_MARGIN, along_y(rng)),
        1 => Vec2::new(off.x + SCREEN_WIDTH + SPAWN_MARGIN, along_y(rng)),
        2 => Vec2::new(along_x(rng), off.y - TILE_SIZE - SPAWN_MARGIN),
        _ => Vec2::new(along_x(rng), off.y + SCREEN_HEIGHT + SPAWN_MARGIN),
    }
}

/// Point inside the viewport inset by one tile
pub fn power_up_spawn_position(rng: &mut Pcg32, camera: &Camera) -> Vec2 {
    let off = camera.offset;
    Vec2::new(
        random_coord(rng, off.x + TILE_SIZE, off.x + SCREEN_WIDTH - TILE_SIZE),
        random_coord(rng, off.y + TILE_SIZE, off.y + SCREEN_HEIGHT - TILE_SIZE),
    )
}

/// Grenade landing point anywhere on screen
pub fn grenade_landing_position(rng: &mut Pcg32, camera: &Camera) -> Vec2 {
    let off = camera.offset;
    Vec2::new(
        random_coord(rng, off.x, off.x + SCREEN_WIDTH - TILE_SIZE),
        random_coord(rng, off.y, off.y + SCREEN_HEIGHT - TILE_SIZE),
    )
}

/// Run the enemy and power-up spawn gates for the current tick
pub fn run_spawner(state: &mut GameState) {
    for kind in EnemyKind::ALL {
        if !state.spawner.enemy_due(kind, &state.clock, &state.tuning) {
            continue;
        }
        if kind != EnemyKind::Ripper && state.clock.every(TICKS_PER_SECOND * 60) {
            let minute = state.clock.elapsed_minutes();
            if minute == state.tuning.enemies.get(kind).unlock_minute {
                log::info!("{:?} wave unlocked at minute {}", kind, minute);
            }
        }
        let pos = enemy_spawn_position(&mut state.rng, &state.camera);
        let id = state.spawn_enemy(kind, pos);
        log::debug!("Spawned {:?} #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        state.emit(GameEvent::EnemySpawned { id, kind });
    }

    for kind in PowerUpKind::ALL {
        if !Spawner::power_up_due(kind, &state.clock, &state.tuning) {
            continue;
        }
        let pos = power_up_spawn_position(&mut state.rng, &state.camera);
        let id = state.spawn_power_up(kind, pos);
        log::debug!("Spawned {:?} power-up #{} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
        state.emit(GameEvent::PowerUpSpawned { id, kind });
    }
}

/// Throw grenades and set off the ring of fire on their cadences
pub fn arm_hazards(state: &mut GameState) {
    if state.clock.elapsed_secs() < state.tuning.hazards_unlock_secs {
        return;
    }
    let fuse_ticks = state.tuning.hazard_fuse_ticks;

    if state.player.grenade_charges > 0 && state.clock.every(state.tuning.grenade_cadence_ticks) {
        for _ in 0..state.player.grenade_charges {
            let world_pos = grenade_landing_position(&mut state.rng, &state.camera);
            let id = state.next_entity_id();
            state.grenades.push(Grenade {
                id,
                world_pos,
                fuse_ticks,
                blast_size: state.tuning.grenade_blast_size,
                damage: state.tuning.grenade_damage,
            });
            state.emit(GameEvent::GrenadeThrown { id });
        }
        log::trace!("Threw {} grenade(s)", state.player.grenade_charges);
    }

    if state.player.ring_of_fire && state.clock.every(state.player.ring_of_fire_interval_ticks) {
        let id = state.next_entity_id();
        state.fires.push(RingOfFire {
            id,
            world_center: state.camera.to_world(SCREEN_CENTER),
            fuse_ticks,
            blast_size: state.tuning.fire_blast_size,
            damage: state.tuning.fire_damage,
        });
        state.emit(GameEvent::FireSetOff { id });
        log::trace!("Ring of fire #{} set off", id);
    }
}
