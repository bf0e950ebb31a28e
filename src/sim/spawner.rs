//! Wave and boss spawning
//!
//! Every fifth wave is a boss encounter; the rest are enemy grids that grow with the
//! wave number and toughen with the level.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{Boss, Enemy, GameState};
use super::timeline::Scheduled;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::ms_to_us;

/// Is `wave` a boss wave
pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

/// Enemies in a regular wave
pub fn enemy_count(wave: u32) -> usize {
    (5 + wave as usize).min(MAX_WAVE_ENEMIES)
}

/// Starting health of each enemy in `wave` at `level`
pub fn enemy_health(wave: u32, level: u32) -> u32 {
    let base = if wave > 3 { 2.0 } else { 1.0 };
    let multiplier = 1.0 + (level.saturating_sub(1)) as f32 * 0.2;
    (base * multiplier).ceil() as u32
}

/// Grid slot for the `index`-th enemy of a wave
pub fn grid_position(index: usize) -> Vec2 {
    let col = index % ENEMY_GRID_COLUMNS;
    let row = index / ENEMY_GRID_COLUMNS;
    Vec2::new(col as f32 * 60.0 + 40.0, row as f32 * 50.0 + 30.0)
}

/// (max health, max shield) of the boss for `wave` at `level`
pub fn boss_stats(wave: u32, level: u32) -> (f32, f32) {
    let base = (50.0 + wave as f32 * 10.0) * 5.0;
    let max_health = base * (1.0 + (level.saturating_sub(1)) as f32 * 0.5);
    (max_health, max_health * 0.5)
}

/// Spawn wave `wave`: a boss warning (boss follows shortly) or a grid of enemies
pub fn spawn_wave(state: &mut GameState, wave: u32, events: &mut Vec<GameEvent>) {
    if is_boss_wave(wave) {
        log::info!("Wave {}: boss incoming", wave);
        state.boss_warning = true;
        events.push(GameEvent::BossWarning(true));
        events.push(GameEvent::Sound(SoundCue::BossWarning));
        state
            .timeline
            .schedule(state.time_us + ms_to_us(BOSS_WARNING_MS), Scheduled::SpawnBoss);
        return;
    }

    let count = enemy_count(wave);
    let health = enemy_health(wave, state.ledger.level);
    log::info!(
        "Wave {} (level {}): {} enemies, {} hp each",
        wave,
        state.ledger.level,
        count,
        health
    );

    for i in 0..count {
        let kind = state.rng.random_range(0..3u8);
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos: grid_position(i),
            kind,
            health,
        });
    }
}

/// Lift the warning and bring in the boss for the current wave
pub fn spawn_boss(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.boss_warning = false;
    events.push(GameEvent::BossWarning(false));

    let id = state.next_entity_id();
    let boss = Boss::new(id, state.ledger.wave, state.ledger.level);
    log::info!(
        "Boss {} spawned: {} hp, {} shield",
        id,
        boss.max_health,
        boss.max_shield
    );
    state.boss = Some(boss);
}

/// Queue the next wave once the field is clear and nothing is already on its way
pub fn check_wave_clear(state: &mut GameState) {
    if !state.enemies.is_empty()
        || state.boss.is_some()
        || state.boss_warning
        || state.timeline.spawn_pending()
    {
        return;
    }

    let next = state.ledger.wave + 1;
    log::debug!("Wave {} cleared, wave {} queued", state.ledger.wave, next);
    state.timeline.schedule(
        state.time_us + ms_to_us(WAVE_ADVANCE_DELAY_MS),
        Scheduled::SpawnWave(next),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_count_caps_at_twelve() {
        assert_eq!(enemy_count(1), 6);
        assert_eq!(enemy_count(4), 9);
        assert_eq!(enemy_count(7), 12);
        assert_eq!(enemy_count(40), 12);
    }

    #[test]
    fn test_enemy_health_scaling() {
        assert_eq!(enemy_health(1, 1), 1);
        assert_eq!(enemy_health(3, 1), 1);
        assert_eq!(enemy_health(4, 1), 2);
        // ceil(1 * 1.2)
        assert_eq!(enemy_health(1, 2), 2);
        // ceil(2 * 1.4)
        assert_eq!(enemy_health(6, 3), 3);
    }

    #[test]
    fn test_grid_layout() {
        assert_eq!(grid_position(0), Vec2::new(40.0, 30.0));
        assert_eq!(grid_position(5), Vec2::new(340.0, 30.0));
        assert_eq!(grid_position(6), Vec2::new(40.0, 80.0));
    }

    #[test]
    fn test_boss_stats() {
        assert_eq!(boss_stats(5, 1), (500.0, 250.0));
        assert_eq!(boss_stats(5, 2), (750.0, 375.0));
        assert_eq!(boss_stats(5, 3), (1000.0, 500.0));
    }

    #[test]
    fn test_boss_wave_warns_instead_of_spawning() {
        let mut state = GameState::new(3);
        state.enemies.clear();
        state.ledger.wave = 5;
        let mut events = Vec::new();
        spawn_wave(&mut state, 5, &mut events);

        assert!(state.enemies.is_empty());
        assert!(state.boss.is_none());
        assert!(state.boss_warning);
        assert!(events.contains(&GameEvent::BossWarning(true)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::BossWarning)));
        assert!(state.timeline.spawn_pending());
    }

    #[test]
    fn test_wave_clear_queues_once() {
        let mut state = GameState::new(3);
        state.enemies.clear();
        check_wave_clear(&mut state);
        check_wave_clear(&mut state);
        assert_eq!(state.timeline.len(), 1);
        assert_eq!(
            state.timeline.drain_due(ms_to_us(WAVE_ADVANCE_DELAY_MS)),
            vec![Scheduled::SpawnWave(2)]
        );
    }

    #[test]
    fn test_no_advance_while_boss_alive() {
        let mut state = GameState::new(3);
        state.enemies.clear();
        state.boss = Some(Boss::new(99, 5, 1));
        check_wave_clear(&mut state);
        assert!(state.timeline.is_empty());
    }
}
