//! Desert Trooper - top-down arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, spawning, game state)
//! - `renderer`: Draw list and HUD model handed to an external renderer
//! - `tuning`: Data-driven game balance
//! - `error`: Loader errors for level and tuning data

pub mod error;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    pub const SCREEN_SIZE: Vec2 = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    pub const SCREEN_CENTER: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);

    /// Edge length of a level tile
    pub const TILE_SIZE: f32 = 64.0;

    /// Player displacement per tick at full speed
    pub const CAMERA_SPEED: f32 = 2.0;
    /// Pointer distance from screen center at which the player reaches full speed
    pub const MOUSE_THRESHOLD: f32 = 2.0 * TILE_SIZE;
    /// Base enemy speed (rippers move at this, heavier kinds at fractions of it)
    pub const ENEMY_SPEED: f32 = CAMERA_SPEED / 1.6;
    /// Base enemy contact damage
    pub const ENEMY_DAMAGE: u32 = 5;

    /// Player sprite dimensions
    pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
    pub const PLAYER_MAX_HEALTH: u32 = 100;

    /// Bullet box edge
    pub const BULLET_SIZE: f32 = 3.0;
    /// Power-up sprite dimensions
    pub const POWER_UP_SIZE: Vec2 = Vec2::new(32.0, 32.0);

    /// Ticks an enemy must wait between contact hits on the player
    pub const CONTACT_COOLDOWN_TICKS: u32 = 60;
}

pub use sim::geom::Rect;

/// Format a number of seconds as `MM:SS`
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Angle in degrees of a vector (screen space, y down)
#[inline]
pub fn heading_degrees(v: Vec2) -> f32 {
    v.y.atan2(v.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(540), "09:00");
        assert_eq!(format_clock(119), "01:59");
    }

    #[test]
    fn test_heading_degrees() {
        assert!((heading_degrees(Vec2::new(1.0, 0.0))).abs() < 1e-6);
        assert!((heading_degrees(Vec2::new(0.0, 1.0)) - 90.0).abs() < 1e-4);
        assert!((heading_degrees(Vec2::new(-1.0, 0.0)).abs() - 180.0).abs() < 1e-4);
    }
}
