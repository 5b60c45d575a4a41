//! Sprite table and draw list
//!
//! Animation data is shared: one table keyed by sprite and animation, read
//! by every entity. Frames are derived from the tick counter so the draw
//! list is a pure function of the game state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::geom::Rect;
use crate::sim::map::{StaticMap, TileMaterial};
use crate::sim::state::{EnemyKind, Facing, GameState, PowerUpKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Tile(TileMaterial),
    Player,
    Enemy(EnemyKind),
    Bullet,
    Grenade,
    RingOfFire,
    PowerUp(PowerUpKind),
    EvacZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Animation {
    Still,
    RunLeft,
    RunRight,
    Explode,
    Spin,
}

impl Animation {
    fn run(facing: Facing) -> Self {
        match facing {
            Facing::Left => Animation::RunLeft,
            Facing::Right => Animation::RunRight,
        }
    }
}

pub type SpriteKey = (SpriteKind, Animation);

/// Frame count and playback rate of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub frames: u32,
    pub ticks_per_frame: u32,
}

impl AnimationSpec {
    pub const STILL: Self = Self {
        frames: 1,
        ticks_per_frame: 1,
    };

    pub const fn new(frames: u32, ticks_per_frame: u32) -> Self {
        Self {
            frames,
            ticks_per_frame,
        }
    }

    /// Frame shown at `tick`
    pub fn frame_at(&self, tick: u64) -> u32 {
        let frames = self.frames.max(1) as u64;
        let ticks_per_frame = self.ticks_per_frame.max(1) as u64;
        ((tick / ticks_per_frame) % frames) as u32
    }
}

/// Read-only animation table shared by all entities
#[derive(Debug, Clone)]
pub struct SpriteTable {
    specs: HashMap<SpriteKey, AnimationSpec>,
}

impl Default for SpriteTable {
    fn default() -> Self {
        let mut specs = HashMap::new();
        for anim in [Animation::RunLeft, Animation::RunRight] {
            specs.insert((SpriteKind::Player, anim), AnimationSpec::new(6, 10));
            specs.insert((SpriteKind::Enemy(EnemyKind::Ripper), anim), AnimationSpec::new(2, 10));
            specs.insert((SpriteKind::Enemy(EnemyKind::Arachnid), anim), AnimationSpec::new(2, 10));
            specs.insert((SpriteKind::Enemy(EnemyKind::Rhino), anim), AnimationSpec::new(3, 20));
        }
        specs.insert((SpriteKind::Grenade, Animation::Explode), AnimationSpec::new(5, 10));
        specs.insert((SpriteKind::RingOfFire, Animation::Explode), AnimationSpec::new(6, 10));
        for kind in PowerUpKind::ALL {
            specs.insert((SpriteKind::PowerUp(kind), Animation::Spin), AnimationSpec::new(5, 10));
        }
        Self { specs }
    }
}

impl SpriteTable {
    /// Spec for `key`; unknown keys are drawn as a single still frame
    pub fn get(&self, key: SpriteKey) -> AnimationSpec {
        self.specs.get(&key).copied().unwrap_or(AnimationSpec::STILL)
    }

    pub fn insert(&mut self, key: SpriteKey, spec: AnimationSpec) {
        self.specs.insert(key, spec);
    }
}

/// One sprite blit, in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawCommand {
    pub key: SpriteKey,
    pub frame: u32,
    pub screen_rect: Rect,
    /// Health bar fill in `[0, 1]` for entities that show one
    pub health_fraction: Option<f32>,
}

struct DrawListBuilder<'a> {
    table: &'a SpriteTable,
    state: &'a GameState,
    commands: Vec<DrawCommand>,
}

impl DrawListBuilder<'_> {
    fn push(&mut self, key: SpriteKey, world_rect: Rect, health_fraction: Option<f32>) {
        self.commands.push(DrawCommand {
            key,
            frame: self.table.get(key).frame_at(self.state.clock.tick),
            screen_rect: self.state.camera.apply_rect(&world_rect),
            health_fraction,
        });
    }
}

/// Everything to draw this frame, back to front
pub fn draw_list(state: &GameState, map: &StaticMap, table: &SpriteTable) -> Vec<DrawCommand> {
    let mut out = DrawListBuilder {
        table,
        state,
        commands: Vec::new(),
    };

    for tile in map.visible_tiles(&state.camera) {
        out.push((SpriteKind::Tile(tile.material), Animation::Still), tile.rect(), None);
    }

    if state.clock.evac_open {
        let zone = state.tuning.evac_zone.to_world();
        if zone.overlaps(&state.camera.viewport()) {
            out.push((SpriteKind::EvacZone, Animation::Still), zone, None);
        }
    }

    for power_up in &state.power_ups {
        out.push((SpriteKind::PowerUp(power_up.kind), Animation::Spin), power_up.rect(), None);
    }
    for grenade in &state.grenades {
        out.push((SpriteKind::Grenade, Animation::Explode), grenade.blast_rect(), None);
    }
    for fire in &state.fires {
        out.push((SpriteKind::RingOfFire, Animation::Explode), fire.blast_rect(), None);
    }

    for enemy in &state.enemies {
        let fraction = enemy.health as f32 / enemy.max_health.max(1) as f32;
        out.push(
            (SpriteKind::Enemy(enemy.kind), Animation::run(enemy.facing)),
            enemy.sprite_rect(),
            Some(fraction),
        );
    }

    for bullet in &state.bullets {
        out.push((SpriteKind::Bullet, Animation::Still), bullet.rect(), None);
    }

    let player = &state.player;
    out.push(
        (SpriteKind::Player, Animation::run(player.facing)),
        player.rect(),
        Some(player.health as f32 / PLAYER_MAX_HEALTH as f32),
    );

    out.commands
}
