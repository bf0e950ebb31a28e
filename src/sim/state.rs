//! Game state and core simulation types
//!
//! Every entity store and the score ledger live here. The sim owns all of it;
//! outside code only ever gets `&GameState`.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::spawner;
use super::timeline::Timeline;
use crate::consts::*;
use crate::ms_to_us;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused, nothing advances
    Paused,
    /// Run ended (terminal until reset)
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - 60.0),
        }
    }
}

impl Player {
    /// Move along `dir` (unnormalized, so diagonals are faster) and clamp to the field
    pub fn step(&mut self, dir: Vec2, dt: f32) {
        self.pos += dir * PLAYER_SPEED * dt;
        self.clamp_to_field();
    }

    pub fn clamp_to_field(&mut self) {
        let half = PLAYER_SIZE / 2.0;
        self.pos.x = self.pos.x.clamp(half, GAME_WIDTH - half);
        self.pos.y = self.pos.y.clamp(half, GAME_HEIGHT - half);
    }
}

/// How a bullet moves; a vector velocity fully replaces the scalar speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletMotion {
    /// Straight up or down (negative is up)
    Vertical { speed: f32 },
    /// Free velocity for radial and aimed patterns
    Vector { vel: Vec2 },
}

impl BulletMotion {
    pub fn velocity(&self) -> Vec2 {
        match *self {
            BulletMotion::Vertical { speed } => Vec2::new(0.0, speed),
            BulletMotion::Vector { vel } => vel,
        }
    }
}

/// A bullet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub motion: BulletMotion,
    pub is_enemy: bool,
}

impl Bullet {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.motion.velocity() * dt;
    }

    /// Still inside the field plus the despawn margin
    pub fn in_bounds(&self) -> bool {
        let m = OFFSCREEN_MARGIN;
        self.pos.x > -m && self.pos.x < GAME_WIDTH + m && self.pos.y > -m && self.pos.y < GAME_HEIGHT + m
    }
}

/// A regular enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Sprite variant 0..=2, no gameplay effect
    pub kind: u8,
    pub health: u32,
}

/// Boss firing pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossPattern {
    #[default]
    Spiral,
    Spread,
}

impl BossPattern {
    pub fn toggled(self) -> Self {
        match self {
            BossPattern::Spiral => BossPattern::Spread,
            BossPattern::Spread => BossPattern::Spiral,
        }
    }
}

/// Boss difficulty tier from remaining health. Exact thresholds, no hysteresis.
pub fn boss_phase(health: f32, max_health: f32) -> u8 {
    if health <= max_health * 0.33 {
        3
    } else if health <= max_health * 0.66 {
        2
    } else {
        1
    }
}

/// What a single hit did to the boss
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BossHit {
    /// Shield went from positive to empty on this hit
    pub shield_broken: bool,
    pub defeated: bool,
}

/// The boss (at most one alive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub phase: u8,
    pub pattern: BossPattern,
    /// Seconds since the last pattern switch
    pub pattern_timer: f32,
    /// Seconds this boss has been active (drives sway and spiral rotation)
    pub elapsed: f32,
}

impl Boss {
    /// Build the boss for `wave` at `level`
    pub fn new(id: u32, wave: u32, level: u32) -> Self {
        let (max_health, max_shield) = spawner::boss_stats(wave, level);
        Self {
            id,
            pos: Vec2::new(GAME_WIDTH / 2.0, BOSS_SPAWN_Y),
            health: max_health,
            max_health,
            shield: max_shield,
            max_shield,
            phase: 1,
            pattern: BossPattern::Spiral,
            pattern_timer: 0.0,
            elapsed: 0.0,
        }
    }

    /// Apply `amount` damage, shield first. Phase is recomputed every time.
    pub fn take_hit(&mut self, amount: f32) -> BossHit {
        let mut hit = BossHit::default();
        if self.shield > 0.0 {
            self.shield = (self.shield - amount).max(0.0);
            hit.shield_broken = self.shield <= 0.0;
        } else {
            self.health = (self.health - amount).max(0.0);
        }
        self.phase = boss_phase(self.health, self.max_health);
        hit.defeated = self.health <= 0.0;
        hit
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Power,
    Shield,
    Bomb,
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// Score, resources and progression counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub score: u64,
    /// Best score seen, seeded from the save store
    pub high_score: u64,
    pub lives: u8,
    pub power: u8,
    pub shield: u8,
    pub bombs: u8,
    pub wave: u32,
    /// Increments only on boss kills
    pub level: u32,
    pub combo: u32,
    pub max_combo: u32,
    /// Combo falls back to 0 once the clock passes this
    pub combo_expires_us: Option<u64>,
    pub graze_count: u32,
    /// Grazes across every game of the session (survives reset)
    pub total_grazes: u32,
    pub kills: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            score: 0,
            high_score: 0,
            lives: START_LIVES,
            power: MIN_POWER,
            shield: 0,
            bombs: START_BOMBS,
            wave: 1,
            level: 1,
            combo: 0,
            max_combo: 0,
            combo_expires_us: None,
            graze_count: 0,
            total_grazes: 0,
            kills: 0,
        }
    }
}

impl Ledger {
    /// Fresh ledger for a new game, keeping session-wide records
    pub fn fresh_game(&self) -> Self {
        Self {
            high_score: self.high_score,
            total_grazes: self.total_grazes,
            ..Self::default()
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Take one life, never below zero. Returns lives left.
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Health => self.lives = (self.lives + 1).min(MAX_LIVES),
            PowerUpKind::Power => self.power = (self.power + 1).min(MAX_POWER),
            PowerUpKind::Shield => self.shield = (self.shield + 1).min(MAX_SHIELD),
            PowerUpKind::Bomb => self.bombs = (self.bombs + 1).min(MAX_BOMBS),
        }
    }

    /// Count a kill and extend the combo window
    pub fn register_kill(&mut self, now_us: u64) {
        self.kills += 1;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo_expires_us = Some(now_us + ms_to_us(COMBO_IDLE_MS));
    }

    /// Drop the combo once its idle window has run out
    pub fn expire_combo(&mut self, now_us: u64) {
        if let Some(deadline) = self.combo_expires_us {
            if self.combo > 0 && now_us >= deadline {
                self.combo = 0;
                self.combo_expires_us = None;
            }
        }
    }

    pub fn record_graze(&mut self) {
        self.add_score(SCORE_GRAZE);
        self.graze_count += 1;
        self.total_grazes += 1;
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG, reseeded from `seed` on reset
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Sim clock in microseconds
    pub time_us: u64,
    /// Sim time of the last player volley
    pub last_shot_us: Option<u64>,
    pub player: Player,
    /// Active bullets (sorted by id for determinism)
    pub bullets: Vec<Bullet>,
    /// Active enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// Active power-ups (sorted by id for determinism)
    pub power_ups: Vec<PowerUp>,
    pub ledger: Ledger,
    /// Enemy bullet ids already credited for a graze
    pub grazed: BTreeSet<u32>,
    pub boss_warning: bool,
    /// Bomb fired recently and not yet re-armed
    pub bomb_active: bool,
    /// The final-score signal already went out for this game
    pub game_over_signaled: bool,
    /// Deferred actions
    pub timeline: Timeline,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed; wave 1 is already on the field
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_us: 0,
            last_shot_us: None,
            player: Player::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            power_ups: Vec::new(),
            ledger: Ledger::default(),
            grazed: BTreeSet::new(),
            boss_warning: false,
            bomb_active: false,
            game_over_signaled: false,
            timeline: Timeline::new(),
            next_id: 1,
        };

        let mut events = Vec::new();
        spawner::spawn_wave(&mut state, 1, &mut events);

        state
    }

    /// Put the game back to its starting point (stores, counters, timers, graze set)
    pub fn reset(&mut self) {
        let ledger = self.ledger.fresh_game();
        *self = Self::new(self.seed);
        self.ledger = ledger;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_bullet(&mut self, pos: Vec2, motion: BulletMotion, is_enemy: bool) -> u32 {
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos,
            motion,
            is_enemy,
        });
        id
    }

    pub fn spawn_power_up(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp { id, pos, kind });
        id
    }

    /// Seconds of sim time elapsed
    pub fn seconds(&self) -> f64 {
        self.time_us as f64 / 1_000_000.0
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Flip between playing and paused. Game over stays game over.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }

    pub fn enemy_bullet_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.is_enemy).count()
    }

    /// Enter the terminal state, returning the one-shot signal if it hasn't fired yet
    pub fn end_game(&mut self) -> Option<GameEvent> {
        self.phase = GamePhase::GameOver;
        if self.game_over_signaled {
            return None;
        }
        self.game_over_signaled = true;
        Some(GameEvent::GameOver {
            final_score: self.ledger.score,
        })
    }

    /// Ensure stores are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bullets.sort_by_key(|b| b.id);
        self.enemies.sort_by_key(|e| e.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
