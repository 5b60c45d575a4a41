//! Weapons and damage resolution
//!
//! Removal is two-phase throughout: a pass marks entities (health 0, bullet
//! spent, fuse burnt, power-up inactive) and a `retain` sweeps them before
//! the next pass looks at the collection.

use glam::Vec2;

use super::camera::Camera;
use super::geom::Rect;
use super::state::{Bullet, Enemy, GameEvent, GameState, Player, PowerUpKind};

/// Apply an enemy's contact damage if its cooldown allows. Returns the damage dealt.
pub fn contact_damage(enemy: &mut Enemy, player: &mut Player) -> Option<u32> {
    if !player.is_alive()
        || enemy.ticks_since_contact_hit < crate::consts::CONTACT_COOLDOWN_TICKS
        || !enemy.hitbox().overlaps(&player.rect())
    {
        return None;
    }
    player.take_damage(enemy.contact_damage);
    enemy.ticks_since_contact_hit = 0;
    Some(enemy.contact_damage)
}

/// Index of the on-screen enemy closest to `from`; ties go to the earlier enemy
pub fn select_target(enemies: &[Enemy], camera: &Camera, from: Vec2) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| camera.sees(enemy.world_pos))
        .fold(None, |best: Option<(usize, f32)>, (i, enemy)| {
            let distance = from.distance(enemy.world_pos);
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((i, distance)),
            }
        })
        .map(|(i, _)| i)
}

/// Fire one bullet from the player's center at the nearest visible enemy.
/// Returns false when there is nothing to shoot at.
pub fn autofire(state: &mut GameState) -> bool {
    let Some(index) = select_target(&state.enemies, &state.camera, state.player.world_pos) else {
        return false;
    };
    let target = &state.enemies[index];
    let origin = state.player.center();
    let Some(direction) = (target.hitbox().center() - origin).try_normalize() else {
        return false;
    };

    let target_id = target.id;
    state.bullets.push(Bullet::new(origin, direction, state.tuning.bullet_speed));
    state.emit(GameEvent::ShotFired { target: target_id });
    log::trace!("Shot at enemy #{}", target_id);
    true
}

/// Move bullets and let each one damage the first live enemy it touches
pub fn resolve_bullets(state: &mut GameState) {
    let damage = state.tuning.bullet_damage;
    let max_age = state.tuning.bullet_max_ticks;
    let mut hits = Vec::new();

    for bullet in &mut state.bullets {
        bullet.world_pos += bullet.direction * bullet.speed;
        bullet.age_ticks = bullet.age_ticks.saturating_add(1);

        let rect = bullet.rect();
        if let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|enemy| !enemy.is_dead() && enemy.hitbox().overlaps(&rect))
        {
            enemy.take_damage(damage);
            bullet.spent = true;
            hits.push(enemy.id);
        } else if max_age.is_some_and(|max| bullet.age_ticks >= max) {
            bullet.spent = true;
        }
    }
    state.bullets.retain(|bullet| !bullet.spent);

    for id in hits {
        state.emit(GameEvent::EnemyHit { id, damage });
    }
}

/// Remove enemies whose health reached zero
pub fn cull_dead(state: &mut GameState) {
    if !state.enemies.iter().any(Enemy::is_dead) {
        return;
    }
    let killed: Vec<_> = state
        .enemies
        .iter()
        .filter(|enemy| enemy.is_dead())
        .map(|enemy| (enemy.id, enemy.kind))
        .collect();
    state.enemies.retain(|enemy| !enemy.is_dead());

    for (id, kind) in killed {
        log::debug!("{:?} #{} killed", kind, id);
        state.emit(GameEvent::EnemyKilled { id, kind });
    }
}

/// Burn hazard fuses; each hazard whose fuse runs out blasts once and is removed
pub fn detonate_hazards(state: &mut GameState) {
    let mut blasts: Vec<(Rect, u32)> = Vec::new();

    for grenade in &mut state.grenades {
        grenade.fuse_ticks = grenade.fuse_ticks.saturating_sub(1);
        if grenade.fuse_ticks == 0 {
            blasts.push((grenade.blast_rect(), grenade.damage));
        }
    }
    for fire in &mut state.fires {
        fire.fuse_ticks = fire.fuse_ticks.saturating_sub(1);
        if fire.fuse_ticks == 0 {
            blasts.push((fire.blast_rect(), fire.damage));
        }
    }
    state.grenades.retain(|grenade| grenade.fuse_ticks > 0);
    state.fires.retain(|fire| fire.fuse_ticks > 0);

    for (area, damage) in blasts {
        state.emit(GameEvent::Explosion {
            center: area.center(),
        });
        let mut hits = Vec::new();
        for enemy in state.enemies.iter_mut().filter(|e| !e.is_dead()) {
            if area.overlaps(&enemy.sprite_rect()) {
                enemy.take_damage(damage);
                hits.push(enemy.id);
            }
        }
        for id in hits {
            state.emit(GameEvent::EnemyHit { id, damage });
        }
    }
    cull_dead(state);
}

/// Keep pending rings of fire centered on the viewport
pub fn reanchor_fires(state: &mut GameState) {
    let center = state.camera.to_world(crate::consts::SCREEN_CENTER);
    for fire in &mut state.fires {
        fire.world_center = center;
    }
}

/// Apply one power-up's effect to the player
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    let tuning = &state.tuning;
    let player = &mut state.player;
    match kind {
        PowerUpKind::Grenade => {
            player.grenade_charges = player.grenade_charges.saturating_add(1);
        }
        PowerUpKind::Fire => {
            player.ring_of_fire = true;
            player.ring_of_fire_interval_ticks = player
                .ring_of_fire_interval_ticks
                .saturating_sub(tuning.fire_interval_step)
                .max(tuning.fire_interval_min);
        }
        PowerUpKind::ShootingSpeed => {
            player.shoot_interval_ticks = (player.shoot_interval_ticks / 2).max(1);
            state.spawner.slow_rippers(tuning.ripper_interval_growth);
        }
        PowerUpKind::Hp => player.heal(tuning.hp_restore),
    }
}

/// Pick up every active power-up touching the player
pub fn collect_power_ups(state: &mut GameState) {
    let player_rect = state.player.rect();
    let mut collected = Vec::new();
    for power_up in &mut state.power_ups {
        if power_up.active && power_up.rect().overlaps(&player_rect) {
            power_up.active = false;
            collected.push(power_up.kind);
        }
    }
    state.power_ups.retain(|power_up| power_up.active);

    for kind in collected {
        apply_power_up(state, kind);
        log::info!("Collected {:?} power-up", kind);
        state.emit(GameEvent::PowerUpCollected { kind });
    }
}

/// Full resolver pass: bullets, cull, hazards, power-ups
pub fn resolve(state: &mut GameState) {
    resolve_bullets(state);
    cull_dead(state);
    detonate_hazards(state);
    collect_power_ups(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{EnemyKind, Grenade, RingOfFire};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(5, Vec2::new(2000.0, 2000.0), Tuning::default())
    }

    fn bullet_at(center: Vec2) -> Bullet {
        // Zero speed keeps the bullet exactly where it was placed
        Bullet::new(center, Vec2::X, 0.0)
    }

    #[test]
    fn test_bullet_damages_exactly_one_enemy() {
        let mut s = state();
        let a = s.spawn_enemy(EnemyKind::Arachnid, Vec2::new(100.0, 100.0));
        let b = s.spawn_enemy(EnemyKind::Arachnid, Vec2::new(100.0, 100.0));
        let center = s.enemies[0].hitbox().center();
        s.bullets.push(bullet_at(center));

        resolve(&mut s);

        assert_eq!(s.enemies[0].health, 15);
        assert_eq!(s.enemies[1].health, 20);
        assert!(s.bullets.is_empty());
        assert_eq!(s.events(), &[GameEvent::EnemyHit { id: a, damage: 5 }]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_two_bullets_same_tick_both_land() {
        let mut s = state();
        s.spawn_enemy(EnemyKind::Ripper, Vec2::new(100.0, 100.0));
        s.spawn_enemy(EnemyKind::Ripper, Vec2::new(300.0, 100.0));
        for i in 0..2 {
            let center = s.enemies[i].hitbox().center();
            s.bullets.push(bullet_at(center));
        }
        resolve_bullets(&mut s);
        assert!(s.enemies.iter().all(|e| e.health == 5));
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_dead_enemy_is_culled_and_not_hit_again() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Ripper, Vec2::new(100.0, 100.0));
        let center = s.enemies[0].hitbox().center();
        s.bullets.push(bullet_at(center));
        s.bullets.push(bullet_at(center));
        s.bullets.push(bullet_at(center));

        resolve(&mut s);

        assert!(s.enemies.is_empty());
        // The third bullet found no live enemy and keeps flying
        assert_eq!(s.bullets.len(), 1);
        assert!(s.events().contains(&GameEvent::EnemyKilled { id, kind: EnemyKind::Ripper }));
    }

    #[test]
    fn test_enemy_killed_by_bullet_is_skipped_by_blast() {
        let mut s = state();
        let id = s.spawn_enemy(EnemyKind::Ripper, Vec2::new(100.0, 100.0));
        s.enemies[0].health = 5;
        let center = s.enemies[0].hitbox().center();
        s.bullets.push(bullet_at(center));
        s.grenades.push(Grenade {
            id: 99,
            world_pos: Vec2::new(90.0, 90.0),
            fuse_ticks: 1,
            blast_size: 128.0,
            damage: 10,
        });

        resolve(&mut s);

        assert!(s.enemies.is_empty());
        assert!(s.grenades.is_empty());
        let events = s.drain_events();
        assert_eq!(
            &events[..2],
            &[
                GameEvent::EnemyHit { id, damage: 5 },
                GameEvent::EnemyKilled { id, kind: EnemyKind::Ripper },
            ]
        );
        assert!(matches!(events[2], GameEvent::Explosion { .. }));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_bullet_lifetime_cap() {
        let mut s = state();
        s.tuning.bullet_max_ticks = Some(2);
        s.bullets.push(Bullet::new(Vec2::ZERO, Vec2::X, 10.0));
        resolve_bullets(&mut s);
        assert_eq!(s.bullets.len(), 1);
        resolve_bullets(&mut s);
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_grenade_detonates_once_after_fuse() {
        let mut s = state();
        s.spawn_enemy(EnemyKind::Rhino, Vec2::new(100.0, 100.0));
        s.grenades.push(Grenade {
            id: 99,
            world_pos: Vec2::new(90.0, 90.0),
            fuse_ticks: 3,
            blast_size: 128.0,
            damage: 10,
        });

        for _ in 0..2 {
            detonate_hazards(&mut s);
            assert_eq!(s.enemies[0].health, 40);
        }
        detonate_hazards(&mut s);
        assert_eq!(s.enemies[0].health, 30);
        assert!(s.grenades.is_empty());

        detonate_hazards(&mut s);
        assert_eq!(s.enemies[0].health, 30);
    }

    #[test]
    fn test_blast_uses_sprite_rect() {
        let mut s = state();
        // Rhino sprite 180 wide: its far right edge reaches the blast even
        // though the centered hitbox does not
        s.spawn_enemy(EnemyKind::Rhino, Vec2::new(0.0, 0.0));
        s.fires.push(RingOfFire {
            id: 1,
            world_center: Vec2::new(240.0, 32.0),
            fuse_ticks: 1,
            blast_size: 124.0,
            damage: 20,
        });
        assert!(!s.enemies[0].hitbox().overlaps(&s.fires[0].blast_rect()));
        detonate_hazards(&mut s);
        assert_eq!(s.enemies[0].health, 20);
    }

    #[test]
    fn test_fire_kills_and_culls() {
        let mut s = state();
        s.spawn_enemy(EnemyKind::Ripper, Vec2::new(0.0, 0.0));
        s.fires.push(RingOfFire {
            id: 1,
            world_center: Vec2::new(16.0, 16.0),
            fuse_ticks: 1,
            blast_size: 124.0,
            damage: 20,
        });
        detonate_hazards(&mut s);
        assert!(s.enemies.is_empty());
        assert!(s.fires.is_empty());
    }

    #[test]
    fn test_power_up_applies_once() {
        let mut s = state();
        let pos = s.player.world_pos;
        s.spawn_power_up(PowerUpKind::Grenade, pos);
        collect_power_ups(&mut s);
        collect_power_ups(&mut s);
        assert_eq!(s.player.grenade_charges, 1);
        assert!(s.power_ups.is_empty());
    }

    #[test]
    fn test_inactive_power_up_has_no_effect() {
        let mut s = state();
        let pos = s.player.world_pos;
        s.spawn_power_up(PowerUpKind::Grenade, pos);
        s.power_ups[0].active = false;
        collect_power_ups(&mut s);
        assert_eq!(s.player.grenade_charges, 0);
    }

    #[test]
    fn test_power_up_effects() {
        let mut s = state();
        apply_power_up(&mut s, PowerUpKind::ShootingSpeed);
        assert_eq!(s.player.shoot_interval_ticks, 15);
        assert_eq!(s.spawner.ripper_interval_ticks, 30);
        for _ in 0..10 {
            apply_power_up(&mut s, PowerUpKind::ShootingSpeed);
        }
        assert_eq!(s.player.shoot_interval_ticks, 1);

        apply_power_up(&mut s, PowerUpKind::Fire);
        assert!(s.player.ring_of_fire);
        assert_eq!(s.player.ring_of_fire_interval_ticks, 300);
        for _ in 0..10 {
            apply_power_up(&mut s, PowerUpKind::Fire);
        }
        assert_eq!(s.player.ring_of_fire_interval_ticks, 60);

        s.player.take_damage(80);
        apply_power_up(&mut s, PowerUpKind::Hp);
        assert_eq!(s.player.health, 70);
        apply_power_up(&mut s, PowerUpKind::Hp);
        assert_eq!(s.player.health, 100);
    }

    #[test]
    fn test_contact_damage_cooldown() {
        let mut s = state();
        let pos = s.player.world_pos;
        s.spawn_enemy(EnemyKind::Ripper, pos);
        let (enemy, player) = (&mut s.enemies[0], &mut s.player);

        // Fresh spawns wait out the cooldown
        assert_eq!(contact_damage(enemy, player), None);
        enemy.ticks_since_contact_hit = CONTACT_COOLDOWN_TICKS;
        assert_eq!(contact_damage(enemy, player), Some(5));
        assert_eq!(player.health, 95);
        assert_eq!(enemy.ticks_since_contact_hit, 0);
        assert_eq!(contact_damage(enemy, player), None);
    }

    #[test]
    fn test_select_target_nearest_visible() {
        let mut s = state();
        let origin = s.player.world_pos;
        s.spawn_enemy(EnemyKind::Ripper, origin + Vec2::new(200.0, 0.0));
        s.spawn_enemy(EnemyKind::Ripper, origin + Vec2::new(-100.0, 0.0));
        // Off screen
        s.spawn_enemy(EnemyKind::Ripper, s.camera.offset + Vec2::new(-5.0, 0.0));
        assert_eq!(select_target(&s.enemies, &s.camera, origin), Some(1));
    }

    #[test]
    fn test_select_target_ties_go_first() {
        let mut s = state();
        let origin = s.player.world_pos;
        s.spawn_enemy(EnemyKind::Ripper, origin + Vec2::new(50.0, 0.0));
        s.spawn_enemy(EnemyKind::Ripper, origin + Vec2::new(-50.0, 0.0));
        assert_eq!(select_target(&s.enemies, &s.camera, origin), Some(0));
    }

    #[test]
    fn test_autofire_without_targets() {
        let mut s = state();
        assert!(!autofire(&mut s));
        assert!(s.bullets.is_empty());
    }

    #[test]
    fn test_autofire_aims_at_hitbox_center() {
        let mut s = state();
        let origin = s.player.world_pos;
        let id = s.spawn_enemy(EnemyKind::Arachnid, origin + Vec2::new(150.0, 0.0));
        assert!(autofire(&mut s));
        let bullet = &s.bullets[0];
        assert_eq!(bullet.world_pos, s.player.center());
        let expected = (s.enemies[0].hitbox().center() - s.player.center()).normalize();
        assert!((bullet.direction - expected).length() < 1e-6);
        assert_eq!(s.events(), &[GameEvent::ShotFired { target: id }]);
    }
}
