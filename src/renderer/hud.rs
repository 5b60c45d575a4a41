//! Heads-up display model
//!
//! Plain data for the overlay text and the evacuation marker. Fonts, colors
//! and layout belong to whoever draws it.

use serde::Serialize;

use crate::consts::*;
use crate::sim::geom::Rect;
use crate::sim::state::GameState;
use crate::{format_clock, heading_degrees};

/// Where the evacuation zone is, relative to the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EvacMarker {
    /// Zone overlaps the viewport; draw the overlay at this screen rect
    OnScreen(Rect),
    /// Zone is off screen; point an arrow at this angle (degrees, y down)
    Arrow { angle_degrees: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    /// Remaining round time as `MM:SS`
    pub countdown: String,
    /// Countdown should be drawn in the warning color
    pub urgent: bool,
    /// Blinking "return to evac" prompt is visible this frame
    pub show_evac_prompt: bool,
    pub health: u32,
    pub shots_per_minute: u64,
    /// Grenades thrown per volley, when the player has any
    pub grenades_per_volley: Option<u32>,
    /// Seconds between rings of fire, once unlocked
    pub ring_of_fire_secs: Option<u64>,
    pub evac_marker: Option<EvacMarker>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let remaining = state.clock.remaining_secs(&state.tuning);
        let urgent = state.clock.evac_open;
        let seconds_field = remaining % 60;
        let player = &state.player;

        Self {
            countdown: format_clock(remaining),
            urgent,
            show_evac_prompt: urgent && seconds_field > 50 && seconds_field % 2 == 0,
            health: player.health,
            shots_per_minute: 60 * TICKS_PER_SECOND / player.shoot_interval_ticks.max(1),
            grenades_per_volley: (player.grenade_charges > 0).then_some(player.grenade_charges),
            ring_of_fire_secs: player
                .ring_of_fire
                .then(|| player.ring_of_fire_interval_ticks / TICKS_PER_SECOND),
            evac_marker: urgent.then(|| evac_marker(state)),
        }
    }
}

fn evac_marker(state: &GameState) -> EvacMarker {
    let zone = state.tuning.evac_zone.to_world();
    if zone.overlaps(&state.camera.viewport()) {
        EvacMarker::OnScreen(state.camera.apply_rect(&zone))
    } else {
        let view_center = state.camera.to_world(SCREEN_CENTER);
        EvacMarker::Arrow {
            angle_degrees: heading_degrees(zone.center() - view_center),
        }
    }
}
