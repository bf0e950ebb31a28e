//! Bomb: clears enemy fire and hurts everything on screen at once

use glam::Vec2;
use rand::Rng;

use super::boss::remove_boss;
use super::events::{ExplosionSize, GameEvent};
use super::state::{GamePhase, GameState};
use super::timeline::Scheduled;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::ms_to_us;

/// Bombs left, not re-arming, and the game is running
pub fn can_activate(state: &GameState) -> bool {
    state.ledger.bombs > 0 && !state.bomb_active && state.phase == GamePhase::Playing
}

/// Set off a bomb if allowed. Returns whether it went off.
pub fn activate_bomb(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if !can_activate(state) {
        return false;
    }

    state.ledger.bombs -= 1;
    state.bomb_active = true;
    events.push(GameEvent::Sound(SoundCue::Bomb));

    let cleared = state.enemy_bullet_count();
    state.bullets.retain(|b| !b.is_enemy);

    let mut destroyed = Vec::new();
    for enemy in state.enemies.iter_mut() {
        enemy.health = enemy.health.saturating_sub(BOMB_ENEMY_DAMAGE);
        if enemy.health == 0 {
            destroyed.push(enemy.pos);
        }
    }
    state.enemies.retain(|e| e.health > 0);
    for pos in &destroyed {
        state.ledger.add_score(SCORE_BOMB_KILL);
        state.ledger.register_kill(state.time_us);
        events.push(GameEvent::explosion(*pos, ExplosionSize::Large));
    }

    if let Some(boss) = state.boss.as_mut() {
        let hit = boss.take_hit(BOMB_BOSS_DAMAGE);
        if hit.shield_broken {
            events.push(GameEvent::Sound(SoundCue::ShieldBreak));
        }
        if hit.defeated {
            // No loot or level change; the wave clears normally
            if let Some(boss) = remove_boss(state, events) {
                log::info!("Boss {} destroyed by bomb", boss.id);
            }
        }
    }

    for i in 0..BOMB_BURSTS {
        state.timeline.schedule(
            state.time_us + ms_to_us(i * BOMB_BURST_SPACING_MS),
            Scheduled::BombBurst,
        );
    }
    state
        .timeline
        .schedule(state.time_us + ms_to_us(BOMB_COOLDOWN_MS), Scheduled::BombReady);

    log::debug!(
        "Bomb: {} bullets cleared, {} enemies destroyed, {} bombs left",
        cleared,
        destroyed.len(),
        state.ledger.bombs
    );
    true
}

/// One cosmetic burst somewhere on the field
pub fn burst(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let pos = Vec2::new(
        state.rng.random::<f32>() * GAME_WIDTH,
        state.rng.random::<f32>() * GAME_HEIGHT,
    );
    events.push(GameEvent::explosion(pos, ExplosionSize::Small));
}
