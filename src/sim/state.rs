//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]: entities,
//! counters, spawn intervals and the RNG. Nothing here is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::clock::GameClock;
use super::geom::Rect;
use super::spawn::Spawner;
use crate::consts::*;
use crate::tuning::{EnemyStats, HitboxAnchor, Tuning};

/// Top-level game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    StartMenu,
    /// Story crawl before the mission
    Intro,
    /// Active gameplay (the only phase in which the simulation advances)
    Playing,
    /// Player died or failed to reach the evacuation zone in time
    GameOver,
    /// Player was inside the evacuation zone when time ran out
    Evac,
}

/// Menu-level commands fed in by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseCommand {
    /// StartMenu -> Intro
    Start,
    /// Intro -> Playing
    BeginMission,
    /// GameOver/Evac -> Playing (fresh session)
    Retry,
    /// GameOver/Evac -> StartMenu (fresh session)
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing implied by a horizontal movement component
    pub fn from_dx(dx: f32) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Ripper,
    Arachnid,
    Rhino,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Ripper, EnemyKind::Arachnid, EnemyKind::Rhino];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Grenade,
    Fire,
    ShootingSpeed,
    Hp,
}

impl PowerUpKind {
    /// Spawn check order within a tick
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Grenade,
        PowerUpKind::ShootingSpeed,
        PowerUpKind::Hp,
        PowerUpKind::Fire,
    ];
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the sprite in world space
    pub world_pos: Vec2,
    pub health: u32,
    pub shoot_interval_ticks: u64,
    pub grenade_charges: u32,
    pub ring_of_fire: bool,
    pub ring_of_fire_interval_ticks: u64,
    pub facing: Facing,
}

impl Player {
    /// Player whose sprite is centered on `center`
    pub fn new(center: Vec2, tuning: &Tuning) -> Self {
        Self {
            world_pos: center - PLAYER_SIZE * 0.5,
            health: PLAYER_MAX_HEALTH,
            shoot_interval_ticks: tuning.shoot_interval_ticks,
            grenade_charges: 0,
            ring_of_fire: false,
            ring_of_fire_interval_ticks: tuning.fire_interval_ticks,
            facing: Facing::Right,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.world_pos, PLAYER_SIZE)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, clamping at zero
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Restore health, capped at the maximum
    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(PLAYER_MAX_HEALTH);
    }
}

/// A hostile bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left of the sprite in world space
    pub world_pos: Vec2,
    pub speed: f32,
    pub max_health: u32,
    pub health: u32,
    pub contact_damage: u32,
    pub sprite_size: Vec2,
    pub hitbox_size: Vec2,
    pub hitbox_anchor: HitboxAnchor,
    /// Ticks since this enemy last hurt the player (starts at 0: fresh spawns can't bite yet)
    pub ticks_since_contact_hit: u32,
    pub facing: Facing,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, world_pos: Vec2, stats: &EnemyStats) -> Self {
        Self {
            id,
            kind,
            world_pos,
            speed: stats.speed,
            max_health: stats.health,
            health: stats.health,
            contact_damage: stats.damage,
            sprite_size: stats.sprite_size,
            hitbox_size: stats.hitbox_size,
            hitbox_anchor: stats.hitbox_anchor,
            ticks_since_contact_hit: 0,
            facing: Facing::Right,
        }
    }

    /// Full sprite bounds in world space
    #[inline]
    pub fn sprite_rect(&self) -> Rect {
        Rect::new(self.world_pos, self.sprite_size)
    }

    /// Damage box in world space
    pub fn hitbox(&self) -> Rect {
        let sprite = self.sprite_rect();
        match self.hitbox_anchor {
            HitboxAnchor::MidTop => Rect::from_mid_top(sprite.mid_top(), self.hitbox_size),
            HitboxAnchor::Center => Rect::from_center(sprite.center(), self.hitbox_size),
        }
    }

    /// Apply damage, clamping at zero
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// Autofire projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Center of the bullet in world space
    pub world_pos: Vec2,
    /// Unit direction
    pub direction: Vec2,
    pub speed: f32,
    pub age_ticks: u32,
    /// Set once the bullet has hit something
    pub spent: bool,
}

impl Bullet {
    pub fn new(world_pos: Vec2, direction: Vec2, speed: f32) -> Self {
        Self {
            world_pos,
            direction,
            speed,
            age_ticks: 0,
            spent: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.world_pos, Vec2::splat(BULLET_SIZE))
    }
}

/// Thrown explosive waiting for its fuse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub id: u32,
    /// Landing point (top-left of the blast area) in world space
    pub world_pos: Vec2,
    pub fuse_ticks: u32,
    pub blast_size: f32,
    pub damage: u32,
}

impl Grenade {
    pub fn blast_rect(&self) -> Rect {
        Rect::new(self.world_pos, Vec2::splat(self.blast_size))
    }
}

/// Flame burst around the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingOfFire {
    pub id: u32,
    /// Blast center in world space; follows the viewport center
    pub world_center: Vec2,
    pub fuse_ticks: u32,
    pub blast_size: f32,
    pub damage: u32,
}

impl RingOfFire {
    pub fn blast_rect(&self) -> Rect {
        Rect::from_center(self.world_center, Vec2::splat(self.blast_size))
    }
}

/// Collectible upgrade lying on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Top-left of the sprite in world space
    pub world_pos: Vec2,
    /// Cleared on pickup; an inactive power-up has no further effect
    pub active: bool,
}

impl PowerUp {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.world_pos, POWER_UP_SIZE)
    }
}

/// Things that happened during a tick, for audio/visual layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    EnemySpawned { id: u32, kind: EnemyKind },
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    ShotFired { target: u32 },
    EnemyHit { id: u32, damage: u32 },
    EnemyKilled { id: u32, kind: EnemyKind },
    PlayerHurt { damage: u32, health: u32 },
    PlayerDied,
    GrenadeThrown { id: u32 },
    FireSetOff { id: u32 },
    Explosion { center: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    EvacWindowOpened,
    Timeout,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn/placement RNG; keeps running across resets
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Level extent, used to place the player on reset
    pub world_size: Vec2,
    pub phase: GamePhase,
    pub clock: GameClock,
    pub camera: Camera,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub grenades: Vec<Grenade>,
    pub fires: Vec<RingOfFire>,
    pub power_ups: Vec<PowerUp>,
    pub spawner: Spawner,
    /// Latched once the death has been reported
    pub death_reported: bool,
    /// Events produced since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session in the start menu
    pub fn new(seed: u64, world_size: Vec2, tuning: Tuning) -> Self {
        let player = Player::new(world_size * 0.5, &tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            world_size,
            phase: GamePhase::StartMenu,
            clock: GameClock::default(),
            camera: Camera::centered_on(player.center()),
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            grenades: Vec::new(),
            fires: Vec::new(),
            power_ups: Vec::new(),
            spawner: Spawner::new(&tuning),
            death_reported: false,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Reinitialize player, camera, entity collections and counters, and
    /// drop any undrained events. The phase is left to the caller.
    pub fn reset(&mut self) {
        self.player = Player::new(self.world_size * 0.5, &self.tuning);
        self.camera = Camera::centered_on(self.player.center());
        self.clock = GameClock::default();
        self.enemies.clear();
        self.bullets.clear();
        self.grenades.clear();
        self.fires.clear();
        self.power_ups.clear();
        self.events.clear();
        self.spawner = Spawner::new(&self.tuning);
        self.death_reported = false;
        self.next_id = 1;
        log::debug!("Session reset (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy of `kind` at `world_pos` using the current stat table
    pub fn spawn_enemy(&mut self, kind: EnemyKind, world_pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::new(id, kind, world_pos, self.tuning.enemies.get(kind));
        self.enemies.push(enemy);
        id
    }

    /// Add an active power-up of `kind` at `world_pos`
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, world_pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp {
            id,
            kind,
            world_pos,
            active: true,
        });
        id
    }

    /// Move to `to`, recording the transition
    pub fn set_phase(&mut self, to: GamePhase) {
        if self.phase != to {
            log::info!("Phase {:?} -> {:?}", self.phase, to);
            self.emit(GameEvent::PhaseChanged {
                from: self.phase,
                to,
            });
            self.phase = to;
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Development-build tripwires; release builds rely on clamped arithmetic
    pub fn debug_validate(&self) {
        debug_assert!(self.player.health <= PLAYER_MAX_HEALTH);
        debug_assert!(self.player.world_pos.is_finite(), "player position is not finite");
        debug_assert!(self.camera.offset.is_finite(), "camera offset is not finite");
        for enemy in &self.enemies {
            debug_assert!(!enemy.is_dead(), "dead enemy {} survived the tick", enemy.id);
            debug_assert!(enemy.world_pos.is_finite(), "enemy {} position is not finite", enemy.id);
        }
        for bullet in &self.bullets {
            debug_assert!(bullet.world_pos.is_finite(), "bullet position is not finite");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Vec2::new(1280.0, 1280.0), Tuning::default())
    }

    #[test]
    fn test_new_centers_player_and_camera() {
        let s = state();
        assert_eq!(s.player.center(), Vec2::new(640.0, 640.0));
        assert_eq!(s.camera.apply(s.player.center()), SCREEN_CENTER);
        assert_eq!(s.phase, GamePhase::StartMenu);
        assert_eq!(s.player.health, 100);
        assert_eq!(s.player.shoot_interval_ticks, 30);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = state();
        s.spawn_enemy(EnemyKind::Rhino, Vec2::ZERO);
        s.spawn_power_up(PowerUpKind::Hp, Vec2::ZERO);
        s.player.take_damage(30);
        s.player.grenade_charges = 3;
        s.camera.update(Vec2::new(50.0, 0.0));
        s.clock.tick = 999;
        s.spawner.ripper_interval_ticks = 45;

        s.reset();

        assert!(s.enemies.is_empty());
        assert!(s.power_ups.is_empty());
        assert_eq!(s.player.health, 100);
        assert_eq!(s.player.grenade_charges, 0);
        assert_eq!(s.clock.tick, 0);
        assert_eq!(s.spawner.ripper_interval_ticks, 20);
        assert_eq!(s.camera.apply(s.player.center()), SCREEN_CENTER);
    }

    #[test]
    fn test_health_clamps() {
        let mut p = Player::new(Vec2::ZERO, &Tuning::default());
        p.take_damage(250);
        assert_eq!(p.health, 0);
        assert!(!p.is_alive());
        p.heal(50);
        p.heal(80);
        assert_eq!(p.health, 100);
    }

    #[test]
    fn test_enemy_hitbox_anchors() {
        let t = Tuning::default();
        let ripper = Enemy::new(1, EnemyKind::Ripper, Vec2::new(100.0, 100.0), &t.enemies.ripper);
        let hb = ripper.hitbox();
        assert_eq!(hb.size, Vec2::new(14.0, 14.0));
        assert_eq!(hb.mid_top(), ripper.sprite_rect().mid_top());

        let rhino = Enemy::new(2, EnemyKind::Rhino, Vec2::new(0.0, 0.0), &t.enemies.rhino);
        assert_eq!(rhino.hitbox().center(), rhino.sprite_rect().center());
        assert_eq!(rhino.hitbox().size, Vec2::new(165.0, 50.0));
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut s = state();
        let a = s.spawn_enemy(EnemyKind::Ripper, Vec2::ZERO);
        let b = s.spawn_power_up(PowerUpKind::Grenade, Vec2::ZERO);
        let c = s.spawn_enemy(EnemyKind::Arachnid, Vec2::ZERO);
        assert!(a != b && b != c && a != c);
    }

    #[test]
    fn test_state_serializes() {
        let mut s = state();
        s.spawn_enemy(EnemyKind::Ripper, Vec2::new(3.0, 4.0));
        let json = serde_json::to_string(&s).expect("state serializes");
        let back: GameState = serde_json::from_str(&json).expect("state deserializes");
        assert_eq!(back.enemies.len(), 1);
        assert_eq!(back.enemies[0].world_pos, Vec2::new(3.0, 4.0));
    }
}
