//! Weapons: the player's rate-gated volley and the grunts' random potshots

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{BulletMotion, GameState};
use crate::audio::SoundCue;
use crate::consts::*;
use crate::ms_to_us;

/// One bullet of a volley: spawn point and vertical speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub speed: f32,
}

/// Bullets fired from `origin` at `power` level, centre shot first
pub fn volley(origin: Vec2, power: u8) -> Vec<Shot> {
    let muzzle_y = origin.y - PLAYER_SIZE / 2.0;
    let speed = -BULLET_SPEED_PLAYER;
    let mut shots = vec![Shot {
        pos: Vec2::new(origin.x, muzzle_y),
        speed,
    }];

    if power >= 2 {
        for dx in [-VOLLEY_INNER_OFFSET, VOLLEY_INNER_OFFSET] {
            shots.push(Shot {
                pos: Vec2::new(origin.x + dx, muzzle_y),
                speed,
            });
        }
    }

    if power >= 3 {
        // Wing shots leave from the hull, a little slower
        for dx in [-VOLLEY_OUTER_OFFSET, VOLLEY_OUTER_OFFSET] {
            shots.push(Shot {
                pos: Vec2::new(origin.x + dx, origin.y),
                speed: speed * VOLLEY_OUTER_SPEED_FACTOR,
            });
        }
    }

    shots
}

/// Whether the fire interval has elapsed since the last volley
pub fn ready_to_fire(last_shot_us: Option<u64>, now_us: u64) -> bool {
    match last_shot_us {
        Some(last) => now_us.saturating_sub(last) > ms_to_us(FIRE_INTERVAL_MS),
        None => true,
    }
}

/// Fire a player volley if the trigger is held and the gun has cooled down
pub fn fire_player(state: &mut GameState, firing: bool, events: &mut Vec<GameEvent>) -> bool {
    if !firing || !ready_to_fire(state.last_shot_us, state.time_us) {
        return false;
    }

    state.last_shot_us = Some(state.time_us);
    events.push(GameEvent::Sound(SoundCue::Shoot));

    for shot in volley(state.player.pos, state.ledger.power) {
        state.spawn_bullet(shot.pos, BulletMotion::Vertical { speed: shot.speed }, false);
    }
    true
}

/// Enemy bullet speed at `level`
pub fn hostile_speed(level: u32) -> f32 {
    BULLET_SPEED_ENEMY * (1.0 + (level.saturating_sub(1)) as f32 * 0.1)
}

/// Per-tick chance that one random enemy fires straight down
pub fn fire_enemies(state: &mut GameState) -> bool {
    if state.enemies.is_empty() || state.rng.random::<f32>() >= ENEMY_FIRE_CHANCE {
        return false;
    }

    let idx = state.rng.random_range(0..state.enemies.len());
    let muzzle = state.enemies[idx].pos + Vec2::new(0.0, ENEMY_SIZE / 2.0);
    let speed = hostile_speed(state.ledger.level);
    state.spawn_bullet(muzzle, BulletMotion::Vertical { speed }, true);
    true
}
