//! Presentation model
//!
//! Turns game state into draw commands and HUD values. Nothing here touches
//! a graphics API.

pub mod hud;
pub mod sprites;

pub use hud::{EvacMarker, Hud};
pub use sprites::{AnimationSpec, Animation, DrawCommand, SpriteKey, SpriteKind, SpriteTable, draw_list};
