//! Pixel Shooter - A top-down bullet-hell arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, weapons, boss AI, collisions, scoring)
//! - `game`: Session wrapper driving the sim from host frames
//! - `platform`: Frame clock and host storage backends
//! - `persistence`: Save data and the save-store collaborator
//! - `audio`: Sound cue sink (Web Audio on wasm32)

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{AudioSink, SoundCue};
pub use game::Game;
pub use highscores::HighScores;
pub use persistence::{SaveData, SaveError, SaveStore};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 600.0;
    /// Bullets further than this outside the field are despawned
    pub const OFFSCREEN_MARGIN: f32 = 10.0;

    /// Entity sprite sizes
    pub const PLAYER_SIZE: f32 = 48.0;
    pub const PLAYER_HITBOX_SIZE: f32 = 16.0; // Much smaller than the sprite
    pub const ENEMY_SIZE: f32 = 32.0;
    pub const BULLET_SIZE: f32 = 8.0;
    /// Half-extent of the boss hurt box (sprite is 96x96)
    pub const BOSS_HALF_SIZE: f32 = 48.0;
    /// Extra reach added to the player sprite for power-up pickup
    pub const PICKUP_REACH: f32 = 12.0;
    /// Graze band reaches this far beyond the player sprite
    pub const GRAZE_DISTANCE: f32 = 32.0;

    /// Base speeds (units per second)
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const BULLET_SPEED_PLAYER: f32 = 400.0;
    pub const BULLET_SPEED_ENEMY: f32 = 150.0;
    pub const POWER_UP_FALL_SPEED: f32 = 100.0;

    /// Frame driver: largest dt handed to the sim (tab suspension guard)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player weapon
    pub const FIRE_INTERVAL_MS: u64 = 150;
    pub const VOLLEY_INNER_OFFSET: f32 = 10.0;
    pub const VOLLEY_OUTER_OFFSET: f32 = 15.0;
    pub const VOLLEY_OUTER_SPEED_FACTOR: f32 = 0.9;

    /// Ledger limits
    pub const START_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 5;
    pub const MIN_POWER: u8 = 1;
    pub const MAX_POWER: u8 = 3;
    pub const MAX_SHIELD: u8 = 3;
    pub const START_BOMBS: u8 = 3;
    pub const MAX_BOMBS: u8 = 3;

    /// Scoring
    pub const SCORE_ENEMY_KILL: u64 = 100;
    pub const SCORE_BOMB_KILL: u64 = 50;
    pub const SCORE_BOSS_KILL: u64 = 1000;
    pub const SCORE_GRAZE: u64 = 10;
    pub const COMBO_IDLE_MS: u64 = 3000;

    /// Waves
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    pub const ENEMY_GRID_COLUMNS: usize = 6;
    pub const MAX_WAVE_ENEMIES: usize = 12;
    pub const WAVE_ADVANCE_DELAY_MS: u64 = 1000;
    pub const BOSS_WARNING_MS: u64 = 500;
    pub const BOSS_RESPAWN_DELAY_MS: u64 = 1500;

    /// Hostile fire (per-tick probabilities)
    pub const ENEMY_FIRE_CHANCE: f32 = 0.03;
    pub const BOSS_FIRE_CHANCE: f32 = 0.05;

    /// Boss behaviour
    pub const BOSS_SPAWN_Y: f32 = 80.0;
    pub const BOSS_SWAY_AMPLITUDE: f32 = 120.0;
    pub const BOSS_SWAY_RATE: f32 = 2.0;
    pub const BOSS_PATTERN_SECONDS: f32 = 5.0;
    pub const BOSS_LOOT_DROPS: usize = 3;
    pub const BOSS_LOOT_SCATTER: f32 = 60.0;

    /// Loot rolls
    pub const ENEMY_DROP_CHANCE: f32 = 0.15;
    pub const ENEMY_DROP_POWER_SHARE: f32 = 0.7;
    pub const BOSS_DROP_POWER_SHARE: f32 = 0.5;

    /// Bomb
    pub const BOMB_ENEMY_DAMAGE: u32 = 3;
    pub const BOMB_BOSS_DAMAGE: f32 = 10.0;
    pub const BOMB_COOLDOWN_MS: u64 = 500;
    pub const BOMB_BURSTS: u64 = 30;
    pub const BOMB_BURST_SPACING_MS: u64 = 30;
}

/// Axis-aligned overlap test: both axis distances strictly inside the half extents
#[inline]
pub fn box_overlap(a: Vec2, b: Vec2, half_extent: Vec2) -> bool {
    let d = (a - b).abs();
    d.x < half_extent.x && d.y < half_extent.y
}

/// Convert a duration in milliseconds to the sim's microsecond clock
#[inline]
pub const fn ms_to_us(ms: u64) -> u64 {
    ms * 1000
}

/// Unit vector pointing at `angle` radians (screen space, +y down)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
