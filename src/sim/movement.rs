//! Player and enemy movement
//!
//! Movement is resolved per axis so that a wall can cancel one component
//! while the other survives; that is what lets the player slide along walls.

use glam::Vec2;

use super::combat;
use super::geom::Rect;
use super::map::StaticMap;
use super::state::{Enemy, Facing, GameEvent, GameState};
use crate::consts::*;

/// Player displacement for a pointer position, split into X-only and Y-only parts.
///
/// Inside `MOUSE_THRESHOLD` of the screen center the speed ramps linearly
/// from zero, beyond it the player moves at `CAMERA_SPEED`.
pub fn compute_move_vector(pointer_screen: Vec2) -> (Vec2, Vec2) {
    let direction = pointer_screen - SCREEN_CENTER;
    if direction == Vec2::ZERO {
        return (Vec2::ZERO, Vec2::ZERO);
    }

    let distance = direction.length();
    let speed = if distance < MOUSE_THRESHOLD {
        CAMERA_SPEED * (distance / MOUSE_THRESHOLD)
    } else {
        CAMERA_SPEED
    };
    let velocity = direction / distance * speed;
    (Vec2::new(velocity.x, 0.0), Vec2::new(0.0, velocity.y))
}

/// Cancel the components of a per-axis move that would enter blocking tiles.
///
/// Each axis is probed on its own; every blocking tile hit by a probe adds
/// one inward normal, and each normal is projected out of both components.
pub fn resolve_wall_collision(
    rect: Rect,
    mut move_x: Vec2,
    mut move_y: Vec2,
    map: &StaticMap,
) -> (Vec2, Vec2) {
    let mut normals = Vec::new();
    if let Some(normal) = (-move_x).try_normalize() {
        let hits = map.blocking_tiles_overlapping(rect.translated(move_x)).count();
        normals.extend(std::iter::repeat_n(normal, hits));
    }
    if let Some(normal) = (-move_y).try_normalize() {
        let hits = map.blocking_tiles_overlapping(rect.translated(move_y)).count();
        normals.extend(std::iter::repeat_n(normal, hits));
    }

    for normal in normals {
        move_x -= normal * move_x.dot(normal);
        move_y -= normal * move_y.dot(normal);
    }
    (move_x, move_y)
}

/// Move the player toward the pointer and scroll the camera by the same amount.
/// Returns the applied displacement.
pub fn move_player(state: &mut GameState, map: &StaticMap, pointer_screen: Option<Vec2>) -> Vec2 {
    let Some(pointer) = pointer_screen else {
        return Vec2::ZERO;
    };

    let (move_x, move_y) = compute_move_vector(pointer);
    state.player.facing = Facing::from_dx(move_x.x);

    let (move_x, move_y) = resolve_wall_collision(state.player.rect(), move_x, move_y, map);
    let displacement = move_x + move_y;

    state.player.world_pos += displacement;
    state.camera.update(displacement);
    displacement
}

/// Velocity of `enemies[index]`: chase `target`, minus a push away from
/// every neighbour closer than its hitbox width plus two.
pub fn enemy_velocity(enemies: &[Enemy], index: usize, target: Vec2, push: f32) -> Vec2 {
    let me = &enemies[index];
    let mut velocity = (target - me.world_pos).normalize_or_zero() * me.speed;

    let reach = me.hitbox_size.x + 2.0;
    for (j, other) in enemies.iter().enumerate() {
        if j == index {
            continue;
        }
        let delta = other.world_pos - me.world_pos;
        let distance = delta.length();
        if distance > 0.0 && distance < reach {
            velocity -= delta / distance * push;
        }
    }
    velocity
}

/// Advance every enemy one tick and apply contact damage to the player.
///
/// Enemies update in collection order, so later enemies separate from the
/// already-moved positions of earlier ones.
pub fn update_enemies(state: &mut GameState, map: &StaticMap) {
    let target = state.player.world_pos;
    let push = state.tuning.separation_push;
    let blocked_by_walls = state.tuning.enemies_blocked_by_walls;
    let mut hits = Vec::new();

    for i in 0..state.enemies.len() {
        let velocity = enemy_velocity(&state.enemies, i, target, push);
        let (mut move_x, mut move_y) = (Vec2::new(velocity.x, 0.0), Vec2::new(0.0, velocity.y));
        if blocked_by_walls {
            (move_x, move_y) = resolve_wall_collision(state.enemies[i].hitbox(), move_x, move_y, map);
        }

        let enemy = &mut state.enemies[i];
        enemy.facing = Facing::from_dx(target.x - enemy.world_pos.x);
        enemy.world_pos += move_x + move_y;

        if let Some(damage) = combat::contact_damage(enemy, &mut state.player) {
            hits.push(damage);
        }
        enemy.ticks_since_contact_hit = enemy.ticks_since_contact_hit.saturating_add(1);
    }

    for damage in hits {
        log::debug!("Player hit for {} (health {})", damage, state.player.health);
        state.emit(GameEvent::PlayerHurt {
            damage,
            health: state.player.health,
        });
    }
}
