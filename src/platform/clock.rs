//! Frame timing
//!
//! The host calls back once per display frame with a millisecond timestamp. `FrameClock`
//! turns those into capped deltas; `FrameLoop` hands out tokens so a callback scheduled
//! before a pause, game over or teardown does nothing when it finally fires.

use crate::consts::MAX_FRAME_DT;

/// Converts host timestamps into sim deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Seconds since the previous frame, capped so a suspended tab can't fling
    /// everything across the field. The first frame after a reset is zero.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp (after a pause or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Proof that a frame callback belongs to the current loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// Arms and revokes the frame loop
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    generation: u64,
    armed: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new loop. Tokens from any earlier loop stop working.
    pub fn arm(&mut self) -> FrameToken {
        self.generation += 1;
        self.armed = true;
        FrameToken(self.generation)
    }

    /// Revoke the current loop
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether a callback carrying `token` should run
    pub fn accepts(&self, token: FrameToken) -> bool {
        self.armed && token.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1234.0), 0.0);
        assert!((clock.delta(1250.0) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_delta_capped() {
        let mut clock = FrameClock::new();
        clock.delta(0.0);
        assert_eq!(clock.delta(5000.0), MAX_FRAME_DT);
        // Clock going backwards never yields a negative step
        assert_eq!(clock.delta(4000.0), 0.0);
        clock.reset();
        assert_eq!(clock.delta(9000.0), 0.0);
    }

    #[test]
    fn test_stale_tokens_rejected() {
        let mut frames = FrameLoop::new();
        let first = frames.arm();
        assert!(frames.accepts(first));

        let second = frames.arm();
        assert!(!frames.accepts(first));
        assert!(frames.accepts(second));

        frames.cancel();
        assert!(!frames.accepts(second));
        assert!(!frames.is_armed());
    }
}
