//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The order of
//! the steps inside [`tick`] is part of the game's behaviour: enemies move
//! before the player, and the resolver runs after every entity has moved.

use glam::Vec2;

use super::map::StaticMap;
use super::state::{GameEvent, GamePhase, GameState, PhaseCommand};
use super::{combat, movement, spawn};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in screen space; `None` leaves the player standing still
    pub pointer: Option<Vec2>,
    /// Menu-level command (start, retry, ...)
    pub command: Option<PhaseCommand>,
}

/// Apply a phase command. Returns false if the command is not valid in the current phase.
pub fn apply_command(state: &mut GameState, command: PhaseCommand) -> bool {
    match (state.phase, command) {
        (GamePhase::StartMenu, PhaseCommand::Start) => state.set_phase(GamePhase::Intro),
        (GamePhase::Intro, PhaseCommand::BeginMission) => state.set_phase(GamePhase::Playing),
        (GamePhase::GameOver | GamePhase::Evac, PhaseCommand::Retry) => {
            state.reset();
            state.set_phase(GamePhase::Playing);
        }
        (GamePhase::GameOver | GamePhase::Evac, PhaseCommand::ReturnToMenu) => {
            state.reset();
            state.set_phase(GamePhase::StartMenu);
        }
        (phase, command) => {
            log::debug!("Ignoring {:?} in {:?}", command, phase);
            return false;
        }
    }
    true
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, map: &StaticMap, input: &TickInput) {
    if let Some(command) = input.command {
        apply_command(state, command);
    }

    // Menus and end screens are frozen
    if state.phase != GamePhase::Playing {
        return;
    }

    let signals = state.clock.enter_tick(&state.tuning);
    if signals.evac_opened {
        log::info!(
            "Evacuation window open ({} s left)",
            state.clock.remaining_secs(&state.tuning)
        );
        state.emit(GameEvent::EvacWindowOpened);
    }

    spawn::run_spawner(state);

    movement::update_enemies(state, map);
    movement::move_player(state, map, input.pointer);

    combat::reanchor_fires(state);
    spawn::arm_hazards(state);

    if state.clock.every(state.player.shoot_interval_ticks) {
        combat::autofire(state);
    }

    combat::resolve(state);

    check_round_end(state, signals.timed_out);

    state.clock.advance();
    state.debug_validate();
}

/// Death always ends the round; otherwise a timeout decides between evac and game over
fn check_round_end(state: &mut GameState, timed_out: bool) {
    if !state.player.is_alive() {
        if !state.death_reported {
            state.death_reported = true;
            log::info!("Player died at {}", crate::format_clock(state.clock.elapsed_secs()));
            state.emit(GameEvent::PlayerDied);
            state.set_phase(GamePhase::GameOver);
        }
        return;
    }

    if timed_out {
        state.emit(GameEvent::Timeout);
        let zone = state.tuning.evac_zone.to_world();
        if state.player.rect().overlaps(&zone) {
            state.set_phase(GamePhase::Evac);
        } else {
            state.set_phase(GamePhase::GameOver);
        }
    }
}
