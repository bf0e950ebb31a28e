//! Delayed actions on the sim clock
//!
//! Everything the game used to hang off wall-clock timeouts (wave advance, boss warning,
//! bomb re-arm, staggered bomb bursts) is queued here instead, so pausing the sim
//! freezes them and a reset drops them.

use serde::{Deserialize, Serialize};

/// A deferred action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheduled {
    /// Set the wave counter and spawn that wave
    SpawnWave(u32),
    /// End the boss warning and bring the boss in
    SpawnBoss,
    /// Bomb may be used again
    BombReady,
    /// One cosmetic explosion of a bomb's burst sequence
    BombBurst,
}

impl Scheduled {
    /// True for actions that will put new hostiles on the field
    pub fn is_spawn(&self) -> bool {
        matches!(self, Scheduled::SpawnWave(_) | Scheduled::SpawnBoss)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    at_us: u64,
    action: Scheduled,
}

/// Pending actions, kept in firing order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    timers: Vec<Timer>,
}

impl Timeline {
    pub fn new() -> Self {
        Self { timers: Vec::new() }
    }

    /// Queue `action` to fire once the clock reaches `at_us`
    pub fn schedule(&mut self, at_us: u64, action: Scheduled) {
        // Insert after every timer due at or before `at_us` so equal deadlines keep FIFO order
        let idx = self.timers.partition_point(|t| t.at_us <= at_us);
        self.timers.insert(idx, Timer { at_us, action });
    }

    /// Remove and return every action due at `now_us`, earliest first
    pub fn drain_due(&mut self, now_us: u64) -> Vec<Scheduled> {
        let due = self.timers.partition_point(|t| t.at_us <= now_us);
        self.timers.drain(..due).map(|t| t.action).collect()
    }

    /// Whether a wave or boss spawn is already on its way
    pub fn spawn_pending(&self) -> bool {
        self.timers.iter().any(|t| t.action.is_spawn())
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
