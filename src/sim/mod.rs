//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order, IDs handed out in spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod clock;
pub mod combat;
pub mod geom;
pub mod map;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use clock::{FixedStep, GameClock};
pub use geom::Rect;
pub use map::{LevelGrid, StaticMap, StaticTile, TileKind, TileMaterial};
pub use movement::{compute_move_vector, resolve_wall_collision};
pub use spawn::Spawner;
pub use state::{
    Bullet, Enemy, EnemyKind, Facing, GameEvent, GamePhase, GameState, Grenade, PhaseCommand,
    Player, PowerUp, PowerUpKind, RingOfFire,
};
pub use tick::{TickInput, apply_command, tick};
