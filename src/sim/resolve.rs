//! Collision and damage resolution
//!
//! Runs once per tick after movement and firing. The pass order is fixed and decides
//! who wins when several things touch in the same frame:
//! 1. player bullets vs boss
//! 2. player bullets vs enemies
//! 3. enemy bullets vs player
//! 4. power-ups fall, then pickup
//! 5. graze scoring
//!
//! A bullet is consumed by its first hit. Once the player dies the remaining passes are
//! skipped so the final score stays exactly what it was at the fatal hit.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;

use super::boss::damage_boss;
use super::collision::{
    bullet_hits_boss, bullet_hits_enemy, bullet_hits_player, in_graze_band, pickup_reaches_player,
};
use super::events::{ExplosionSize, GameEvent};
use super::state::{GameState, PowerUpKind};
use crate::audio::SoundCue;
use crate::consts::*;

/// Run every collision pass in order
pub fn resolve_collisions(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    player_bullets_vs_boss(state, events);
    player_bullets_vs_enemies(state, events);
    if enemy_bullets_vs_player(state, events) {
        return;
    }
    collect_power_ups(state, dt, events);
    graze(state, events);
}

/// Each overlapping player bullet costs the boss one point of shield or health
pub fn player_bullets_vs_boss(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(boss_pos) = state.boss.as_ref().map(|b| b.pos) else {
        return;
    };

    let hits: Vec<u32> = state
        .bullets
        .iter()
        .filter(|b| !b.is_enemy && bullet_hits_boss(b.pos, boss_pos))
        .map(|b| b.id)
        .collect();

    let mut consumed = BTreeSet::new();
    for id in hits {
        consumed.insert(id);
        if damage_boss(state, 1.0, events) {
            // Bullets behind the killing shot fly on
            break;
        }
    }
    state.bullets.retain(|b| !consumed.contains(&b.id));
}

/// Every enemy scans every remaining player bullet; each hit takes one health
pub fn player_bullets_vs_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut consumed = BTreeSet::new();
    let mut killed = Vec::new();

    for enemy in state.enemies.iter_mut() {
        for bullet in state.bullets.iter().filter(|b| !b.is_enemy) {
            if enemy.health == 0 {
                break;
            }
            if consumed.contains(&bullet.id) || !bullet_hits_enemy(bullet.pos, enemy.pos) {
                continue;
            }
            consumed.insert(bullet.id);
            enemy.health -= 1;
        }
        if enemy.health == 0 {
            killed.push(enemy.pos);
        }
    }

    if consumed.is_empty() {
        return;
    }
    state.enemies.retain(|e| e.health > 0);
    state.bullets.retain(|b| !consumed.contains(&b.id));

    for pos in killed {
        enemy_destroyed(state, pos, events);
    }
}

/// Score, explosion and loot roll for an enemy shot down
fn enemy_destroyed(state: &mut GameState, pos: Vec2, events: &mut Vec<GameEvent>) {
    state.ledger.add_score(SCORE_ENEMY_KILL);
    state.ledger.register_kill(state.time_us);
    events.push(GameEvent::explosion(pos, ExplosionSize::Large));
    events.push(GameEvent::Sound(SoundCue::Explosion));

    if state.rng.random::<f32>() < ENEMY_DROP_CHANCE {
        let kind = if state.rng.random::<f32>() < ENEMY_DROP_POWER_SHARE {
            PowerUpKind::Power
        } else {
            PowerUpKind::Health
        };
        state.spawn_power_up(pos, kind);
    }
}

/// At most one enemy bullet lands per tick. Returns true if that hit ended the game.
pub fn enemy_bullets_vs_player(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let player = state.player.pos;
    let Some(idx) = state
        .bullets
        .iter()
        .position(|b| b.is_enemy && bullet_hits_player(b.pos, player))
    else {
        return false;
    };

    state.bullets.remove(idx);
    events.push(GameEvent::explosion(player, ExplosionSize::Small));
    events.push(GameEvent::Sound(SoundCue::Hit));

    if state.ledger.lose_life() > 0 {
        return false;
    }

    events.push(GameEvent::Sound(SoundCue::GameOver));
    events.push(GameEvent::explosion(player, ExplosionSize::Large));
    if let Some(signal) = state.end_game() {
        log::info!(
            "Game over: score {}, wave {}, level {}",
            state.ledger.score,
            state.ledger.wave,
            state.ledger.level
        );
        events.push(signal);
    }
    true
}

/// Drop power-ups, hand over the ones the player touches, lose the ones that fall off
pub fn collect_power_ups(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let player = state.player.pos;
    let mut collected = Vec::new();

    state.power_ups.retain_mut(|p| {
        p.pos.y += POWER_UP_FALL_SPEED * dt;
        if pickup_reaches_player(p.pos, player) {
            collected.push(p.kind);
            return false;
        }
        p.pos.y < GAME_HEIGHT
    });

    for kind in collected {
        state.ledger.apply_power_up(kind);
        events.push(GameEvent::Sound(SoundCue::PowerUp));
    }
}

/// Credit each enemy bullet passing close by, once per bullet
pub fn graze(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.pos;
    let fresh: Vec<u32> = state
        .bullets
        .iter()
        .filter(|b| b.is_enemy && in_graze_band(b.pos, player) && !state.grazed.contains(&b.id))
        .map(|b| b.id)
        .collect();

    for id in fresh {
        state.grazed.insert(id);
        state.ledger.record_graze();
        events.push(GameEvent::Sound(SoundCue::Graze));
    }

    // Ids are never reused, so despawned bullets can be forgotten
    if !state.grazed.is_empty() {
        let live: BTreeSet<u32> = state.bullets.iter().map(|b| b.id).collect();
        state.grazed.retain(|id| live.contains(id));
    }
}
