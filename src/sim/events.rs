//! Discrete events emitted by a tick
//!
//! Renderers, audio and persistence consume these; none of them feed back into the sim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundCue;

/// Explosion scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionSize {
    Small,
    Large,
}

impl ExplosionSize {
    /// Particles the cosmetic layer should burst
    pub fn particle_count(&self) -> u32 {
        match self {
            ExplosionSize::Small => 8,
            ExplosionSize::Large => 20,
        }
    }

    /// Screen shake intensity in pixels
    pub fn shake(&self) -> f32 {
        match self {
            ExplosionSize::Small => 4.0,
            ExplosionSize::Large => 8.0,
        }
    }
}

/// Something the outside world should know about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `particles` and `shake` are presentation hints for the cosmetic layer
    Explosion {
        pos: Vec2,
        size: ExplosionSize,
        particles: u32,
        shake: f32,
    },
    ScoreChanged(u64),
    HighScoreChanged(u64),
    /// Fired exactly once per game
    GameOver { final_score: u64 },
    BossWarning(bool),
    Sound(SoundCue),
}

impl GameEvent {
    pub fn explosion(pos: Vec2, size: ExplosionSize) -> Self {
        GameEvent::Explosion {
            pos,
            size,
            particles: size.particle_count(),
            shake: size.shake(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explosion_carries_hints() {
        let small = GameEvent::explosion(Vec2::new(10.0, 20.0), ExplosionSize::Small);
        let json = serde_json::to_value(&small).unwrap();
        let body = &json["Explosion"];
        assert_eq!(body["size"], "Small");
        assert_eq!(body["particles"], 8);
        assert_eq!(body["shake"], 4.0);

        match GameEvent::explosion(Vec2::ZERO, ExplosionSize::Large) {
            GameEvent::Explosion {
                particles, shake, ..
            } => {
                assert_eq!(particles, 20);
                assert_eq!(shake, 8.0);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
