//! Boss AI
//!
//! The boss sways side to side, flips between a rotating radial burst and an aimed fan
//! every few seconds, and fires on a flat per-tick chance. That chance is per tick, not
//! per second, so a lower frame rate means fewer boss volleys.
//!
//! Phase is not driven from here: it is derived from health inside `Boss::take_hit`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::events::{ExplosionSize, GameEvent};
use super::state::{Boss, BossPattern, BulletMotion, GameState, PowerUpKind};
use super::timeline::Scheduled;
use super::weapon::hostile_speed;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::{heading, ms_to_us};

/// Bullets per spiral volley
pub const SPIRAL_ARMS: usize = 3;
/// Bullets per spread volley
pub const SPREAD_COUNT: usize = 5;
/// Angle between neighbouring spread bullets (22.5 degrees)
pub const SPREAD_STEP: f32 = PI / 8.0;
/// Spread bullets outrun the base boss bullet speed
pub const SPREAD_SPEED_FACTOR: f32 = 1.5;

/// Base boss bullet speed at `level`
pub fn boss_bullet_speed(level: u32) -> f32 {
    hostile_speed(level) * 0.8
}

/// Sway x position after `elapsed` seconds
pub fn sway_x(elapsed: f32) -> f32 {
    GAME_WIDTH / 2.0 + (elapsed * BOSS_SWAY_RATE).sin() * BOSS_SWAY_AMPLITUDE
}

/// Spiral volley: three bullets radiating from a point that spins with time.
/// Returns (spawn position, velocity) pairs.
pub fn spiral_volley(boss: &Boss, speed: f32) -> Vec<(Vec2, Vec2)> {
    let rotation = boss.elapsed * BOSS_SWAY_RATE * 3.0;
    (0..SPIRAL_ARMS)
        .map(|i| {
            let angle = TAU / SPIRAL_ARMS as f32 * i as f32 + rotation;
            let dir = heading(angle);
            let pos = boss.pos + Vec2::new(0.0, 40.0) + dir * 10.0;
            (pos, dir * speed)
        })
        .collect()
}

/// Spread volley: a five-bullet fan centred on the bearing to `target`
pub fn spread_volley(boss: &Boss, target: Vec2, speed: f32) -> Vec<(Vec2, Vec2)> {
    let to_target = target - boss.pos;
    let bearing = to_target.y.atan2(to_target.x);
    let start = bearing - SPREAD_STEP * (SPREAD_COUNT - 1) as f32 / 2.0;
    let muzzle = boss.pos + Vec2::new(0.0, 20.0);
    (0..SPREAD_COUNT)
        .map(|i| {
            let angle = start + SPREAD_STEP * i as f32;
            (muzzle, heading(angle) * speed * SPREAD_SPEED_FACTOR)
        })
        .collect()
}

/// Advance the boss: sway, pattern clock, maybe fire. No-op without a boss.
pub fn update_boss(state: &mut GameState, dt: f32) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    boss.elapsed += dt;
    boss.pos.x = sway_x(boss.elapsed);

    boss.pattern_timer += dt;
    if boss.pattern_timer > BOSS_PATTERN_SECONDS {
        boss.pattern = boss.pattern.toggled();
        boss.pattern_timer = 0.0;
        log::debug!("Boss {} switched to {:?}", boss.id, boss.pattern);
    }

    if state.rng.random::<f32>() >= BOSS_FIRE_CHANCE {
        return;
    }

    let speed = boss_bullet_speed(state.ledger.level);
    let shots = match boss.pattern {
        BossPattern::Spiral => spiral_volley(boss, speed),
        BossPattern::Spread => spread_volley(boss, state.player.pos, speed),
    };
    for (pos, vel) in shots {
        state.spawn_bullet(pos, BulletMotion::Vector { vel }, true);
    }
}

/// Hit the boss for `amount`. Returns true if it died (already removed and scored).
pub fn damage_boss(state: &mut GameState, amount: f32, events: &mut Vec<GameEvent>) -> bool {
    let Some(boss) = state.boss.as_mut() else {
        return false;
    };

    let hit = boss.take_hit(amount);
    if hit.shield_broken {
        events.push(GameEvent::Sound(SoundCue::ShieldBreak));
    }
    if hit.defeated {
        defeat_boss(state, events);
    }
    hit.defeated
}

/// Take the boss off the field and score the kill. Progression is up to the caller.
pub fn remove_boss(state: &mut GameState, events: &mut Vec<GameEvent>) -> Option<Boss> {
    let boss = state.boss.take()?;
    state.ledger.add_score(SCORE_BOSS_KILL);
    state.ledger.register_kill(state.time_us);
    events.push(GameEvent::explosion(boss.pos, ExplosionSize::Large));
    events.push(GameEvent::Sound(SoundCue::Explosion));
    Some(boss)
}

/// Boss shot down: score, loot, level up, and wave 1 again after a short pause
pub fn defeat_boss(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(boss) = remove_boss(state, events) else {
        return;
    };

    for _ in 0..BOSS_LOOT_DROPS {
        let jitter = Vec2::new(
            state.rng.random::<f32>() - 0.5,
            state.rng.random::<f32>() - 0.5,
        ) * BOSS_LOOT_SCATTER;
        let kind = if state.rng.random::<f32>() < BOSS_DROP_POWER_SHARE {
            PowerUpKind::Power
        } else {
            PowerUpKind::Health
        };
        state.spawn_power_up(boss.pos + jitter, kind);
    }

    state.ledger.wave = 1;
    state.ledger.level += 1;
    log::info!(
        "Boss {} defeated, level {} begins",
        boss.id,
        state.ledger.level
    );
    state.timeline.schedule(
        state.time_us + ms_to_us(BOSS_RESPAWN_DELAY_MS),
        Scheduled::SpawnWave(1),
    );
}
