//! Scrolling camera
//!
//! The camera is a single world-to-screen translation. The player always
//! stays near the middle of the viewport; every displacement the player
//! makes is applied to the offset, which scrolls the world under it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::{SCREEN_CENTER, SCREEN_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World position of the viewport's top-left corner
    pub offset: Vec2,
}

impl Camera {
    pub fn new(offset: Vec2) -> Self {
        Self { offset }
    }

    /// Camera whose viewport is centered on `world_point`
    pub fn centered_on(world_point: Vec2) -> Self {
        Self::new(world_point - SCREEN_CENTER)
    }

    /// World position to screen position
    #[inline]
    pub fn apply(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }

    /// Screen position back to world position
    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    /// World rectangle to screen rectangle
    #[inline]
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        rect.translated(-self.offset)
    }

    /// Scroll by the player's displacement for this tick
    pub fn update(&mut self, displacement: Vec2) {
        self.offset += displacement;
    }

    /// Viewport in world space
    pub fn viewport(&self) -> Rect {
        Rect::new(self.offset, SCREEN_SIZE)
    }

    /// Whether a world point falls inside the viewport (edges inclusive)
    pub fn sees(&self, world: Vec2) -> bool {
        Rect::new(Vec2::ZERO, SCREEN_SIZE).contains_point(self.apply(world))
    }
}
