//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here. Defaults reproduce the
//! shipped game; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;
use crate::sim::state::{EnemyKind, PowerUpKind};

/// How an enemy's collision box sits inside its sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitboxAnchor {
    /// Box hangs from the middle of the sprite's top edge
    MidTop,
    /// Box shares the sprite's center
    Center,
}

/// Per-kind enemy stats and spawn schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub speed: f32,
    pub health: u32,
    pub damage: u32,
    pub sprite_size: Vec2,
    pub hitbox_size: Vec2,
    pub hitbox_anchor: HitboxAnchor,
    pub spawn_interval_ticks: u64,
    pub unlock_minute: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub ripper: EnemyStats,
    pub arachnid: EnemyStats,
    pub rhino: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        let ripper_interval = 20;
        let arachnid_interval = ripper_interval * 3;
        Self {
            ripper: EnemyStats {
                speed: ENEMY_SPEED,
                health: 10,
                damage: ENEMY_DAMAGE,
                sprite_size: Vec2::new(32.0, 32.0),
                hitbox_size: Vec2::new(14.0, 14.0),
                hitbox_anchor: HitboxAnchor::MidTop,
                spawn_interval_ticks: ripper_interval,
                unlock_minute: 0,
            },
            arachnid: EnemyStats {
                speed: ENEMY_SPEED / 2.0,
                health: 20,
                damage: ENEMY_DAMAGE * 2,
                sprite_size: Vec2::new(64.0, 64.0),
                hitbox_size: Vec2::new(50.0, 50.0),
                hitbox_anchor: HitboxAnchor::Center,
                spawn_interval_ticks: arachnid_interval,
                unlock_minute: 3,
            },
            rhino: EnemyStats {
                speed: ENEMY_SPEED / 4.0,
                health: 40,
                damage: ENEMY_DAMAGE * 4,
                sprite_size: Vec2::new(180.0, 64.0),
                hitbox_size: Vec2::new(165.0, 50.0),
                hitbox_anchor: HitboxAnchor::Center,
                spawn_interval_ticks: arachnid_interval * 3,
                unlock_minute: 6,
            },
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Ripper => &self.ripper,
            EnemyKind::Arachnid => &self.arachnid,
            EnemyKind::Rhino => &self.rhino,
        }
    }
}

/// When a power-up kind starts appearing and how often
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUpSchedule {
    pub interval_ticks: u64,
    pub unlock_minute: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTable {
    pub grenade: PowerUpSchedule,
    pub fire: PowerUpSchedule,
    pub shooting_speed: PowerUpSchedule,
    pub hp: PowerUpSchedule,
}

impl Default for PowerUpTable {
    fn default() -> Self {
        Self {
            grenade: PowerUpSchedule { interval_ticks: 3600, unlock_minute: 0 },
            fire: PowerUpSchedule { interval_ticks: 6900, unlock_minute: 6 },
            shooting_speed: PowerUpSchedule { interval_ticks: 4200, unlock_minute: 0 },
            hp: PowerUpSchedule { interval_ticks: 6600, unlock_minute: 5 },
        }
    }
}

impl PowerUpTable {
    pub fn get(&self, kind: PowerUpKind) -> &PowerUpSchedule {
        match kind {
            PowerUpKind::Grenade => &self.grenade,
            PowerUpKind::Fire => &self.fire,
            PowerUpKind::ShootingSpeed => &self.shooting_speed,
            PowerUpKind::Hp => &self.hp,
        }
    }
}

/// Rectangle measured in tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn to_world(&self) -> crate::Rect {
        crate::Rect::new(
            Vec2::new(self.x as f32, self.y as f32) * TILE_SIZE,
            Vec2::new(self.width as f32, self.height as f32) * TILE_SIZE,
        )
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub enemies: EnemyTable,
    pub power_ups: PowerUpTable,

    /// Push applied per neighbour that crowds an enemy
    pub separation_push: f32,
    /// Enemies ignore walls in the shipped game
    pub enemies_blocked_by_walls: bool,
    /// Multiplier on the ripper interval each time shooting speed is picked up
    pub ripper_interval_growth: f32,

    // === Player weapons ===
    pub shoot_interval_ticks: u64,
    pub bullet_speed: f32,
    pub bullet_damage: u32,
    /// Bullets older than this are dropped (None keeps them forever)
    pub bullet_max_ticks: Option<u32>,
    /// Grenades and the ring of fire stay idle until this much time has passed
    pub hazards_unlock_secs: u64,
    pub hazard_fuse_ticks: u32,
    pub grenade_cadence_ticks: u64,
    pub grenade_blast_size: f32,
    pub grenade_damage: u32,
    pub fire_interval_ticks: u64,
    pub fire_interval_step: u64,
    pub fire_interval_min: u64,
    pub fire_blast_size: f32,
    pub fire_damage: u32,
    pub hp_restore: u32,

    // === Round ===
    /// Elapsed time at which the round times out
    pub round_secs: u64,
    /// Remaining time below which the evacuation zone is shown
    pub evac_warning_secs: u64,
    pub evac_zone: TileRect,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemies: EnemyTable::default(),
            power_ups: PowerUpTable::default(),
            separation_push: ENEMY_SPEED / 2.0,
            enemies_blocked_by_walls: false,
            ripper_interval_growth: 1.5,

            shoot_interval_ticks: 30,
            bullet_speed: 10.0,
            bullet_damage: 5,
            bullet_max_ticks: None,
            hazards_unlock_secs: 10,
            hazard_fuse_ticks: 50,
            grenade_cadence_ticks: 300,
            grenade_blast_size: TILE_SIZE * 2.0,
            grenade_damage: 10,
            fire_interval_ticks: 360,
            fire_interval_step: 60,
            fire_interval_min: 60,
            fire_blast_size: 124.0,
            fire_damage: 20,
            hp_restore: 50,

            round_secs: 9 * 60,
            evac_warning_secs: 2 * 60,
            evac_zone: TileRect { x: 86, y: 80, width: 30, height: 29 },
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON balance sheet
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON balance sheet from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Every cadence is used as a modulus, so none may be zero
    pub fn validate(&self) -> Result<(), TuningError> {
        let intervals = [
            ("enemies.ripper.spawn_interval_ticks", self.enemies.ripper.spawn_interval_ticks),
            ("enemies.arachnid.spawn_interval_ticks", self.enemies.arachnid.spawn_interval_ticks),
            ("enemies.rhino.spawn_interval_ticks", self.enemies.rhino.spawn_interval_ticks),
            ("power_ups.grenade.interval_ticks", self.power_ups.grenade.interval_ticks),
            ("power_ups.fire.interval_ticks", self.power_ups.fire.interval_ticks),
            ("power_ups.shooting_speed.interval_ticks", self.power_ups.shooting_speed.interval_ticks),
            ("power_ups.hp.interval_ticks", self.power_ups.hp.interval_ticks),
            ("shoot_interval_ticks", self.shoot_interval_ticks),
            ("grenade_cadence_ticks", self.grenade_cadence_ticks),
            ("fire_interval_ticks", self.fire_interval_ticks),
            ("fire_interval_min", self.fire_interval_min),
            ("hazard_fuse_ticks", self.hazard_fuse_ticks as u64),
        ];
        match intervals.iter().find(|(_, ticks)| *ticks == 0) {
            Some(&(field, _)) => Err(TuningError::ZeroInterval { field }),
            None => Ok(()),
        }
    }

    /// Tick at which the round times out
    pub fn round_ticks(&self) -> u64 {
        self.round_secs * TICKS_PER_SECOND
    }
}
