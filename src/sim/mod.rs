//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Integer sim clock, timers on the sim clock
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod bomb;
pub mod boss;
pub mod collision;
pub mod events;
pub mod resolve;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timeline;
pub mod weapon;

pub use events::{ExplosionSize, GameEvent};
pub use state::{
    Boss, BossPattern, Bullet, BulletMotion, Enemy, GamePhase, GameState, Ledger, Player,
    PowerUp, PowerUpKind, boss_phase,
};
pub use tick::{TickInput, tick};
pub use timeline::{Scheduled, Timeline};
