//! Game session
//!
//! Wraps the pure sim with everything it must not own: the frame clock, held input,
//! the audio sink and the save store. Hosts call `frame` from their per-frame callback
//! with the token they got from `start`.

use crate::audio::AudioSink;
use crate::persistence::{SaveData, SaveStore};
use crate::platform::{FrameClock, FrameLoop, FrameToken};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Held controls, already mapped from whatever the host's input device is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Control {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Control::Up),
            "down" => Some(Control::Down),
            "left" => Some(Control::Left),
            "right" => Some(Control::Right),
            "fire" | "shoot" => Some(Control::Fire),
            _ => None,
        }
    }
}

/// One play session: a running game plus its collaborators
pub struct Game<A: AudioSink, S: SaveStore> {
    state: GameState,
    clock: FrameClock,
    frames: FrameLoop,
    held: TickInput,
    bomb_queued: bool,
    audio: A,
    store: S,
    save: SaveData,
}

impl<A: AudioSink, S: SaveStore> Game<A, S> {
    /// Load the save (falling back to defaults) and put wave 1 on the field
    pub fn new(seed: u64, mut audio: A, store: S) -> Self {
        let mut save = store.load().unwrap_or_else(|e| {
            log::warn!("Could not load save, using defaults: {}", e);
            SaveData::default()
        });
        save.settings = save.settings.clamped();
        audio.apply_settings(&save.settings);

        let mut state = GameState::new(seed);
        state.ledger.high_score = save.best_score();
        log::info!(
            "New session (seed {}, high score {})",
            seed,
            state.ledger.high_score
        );

        Self {
            state,
            clock: FrameClock::new(),
            frames: FrameLoop::new(),
            held: TickInput::default(),
            bomb_queued: false,
            audio,
            store,
            save,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn save_data(&self) -> &SaveData {
        &self.save
    }

    pub fn settings(&self) -> &Settings {
        &self.save.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Arm the frame loop. Earlier tokens go stale.
    pub fn start(&mut self) -> FrameToken {
        self.clock.reset();
        self.frames.arm()
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_armed()
    }

    /// Run one frame. A stale token, a paused game or a finished game does nothing.
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> Vec<GameEvent> {
        if !self.frames.accepts(token) || self.state.phase != GamePhase::Playing {
            return Vec::new();
        }

        let dt = self.clock.delta(now_ms);
        let input = TickInput {
            bomb: std::mem::take(&mut self.bomb_queued),
            ..self.held
        };
        let events = tick(&mut self.state, &input, dt);
        self.dispatch(&events);
        events
    }

    pub fn set_held(&mut self, control: Control, down: bool) {
        let slot = match control {
            Control::Up => &mut self.held.move_up,
            Control::Down => &mut self.held.move_down,
            Control::Left => &mut self.held.move_left,
            Control::Right => &mut self.held.move_right,
            Control::Fire => &mut self.held.firing,
        };
        *slot = down;
    }

    /// Queue a bomb for the next frame
    pub fn press_bomb(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.bomb_queued = true;
        }
    }

    /// Toggle pause. Pausing revokes the frame loop; resuming re-arms it and returns
    /// the new token.
    pub fn press_pause(&mut self) -> Option<FrameToken> {
        match self.state.phase {
            GamePhase::Playing => {
                self.state.toggle_pause();
                self.frames.cancel();
                self.bomb_queued = false;
                log::info!("Paused at {:.1}s", self.state.seconds());
                None
            }
            GamePhase::Paused => {
                self.state.toggle_pause();
                log::info!("Resumed");
                Some(self.start())
            }
            GamePhase::GameOver => None,
        }
    }

    /// Start over from wave 1, keeping the high score
    pub fn reset(&mut self) -> FrameToken {
        self.audio.stop_all();
        self.held = TickInput::default();
        self.bomb_queued = false;
        self.state.reset();
        log::info!("Game reset");
        self.start()
    }

    /// Stop the loop for good (host is tearing down)
    pub fn shutdown(&mut self) {
        self.frames.cancel();
        self.audio.stop_all();
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        let settings = Settings {
            sound_enabled: enabled,
            ..self.save.settings.clone()
        };
        self.update_settings(settings);
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        let mut settings = self.save.settings.clone();
        settings.set_master_volume(vol);
        self.update_settings(settings);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        let mut settings = self.save.settings.clone();
        settings.set_sfx_volume(vol);
        self.update_settings(settings);
    }

    /// Replace the preferences, push them to the audio sink and persist them
    pub fn update_settings(&mut self, settings: Settings) {
        self.save.settings = settings.clamped();
        self.audio.apply_settings(&self.save.settings);
        if !self.save.settings.sound_enabled {
            self.audio.stop_all();
        }
        self.persist();
    }

    /// Route tick output to the collaborators
    fn dispatch(&mut self, events: &[GameEvent]) {
        let final_score = events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        });

        // Cut the battle noise first so the game over jingle plays out
        if final_score.is_some() {
            self.audio.stop_all();
        }

        let mut dirty = false;
        for event in events {
            match event {
                GameEvent::Sound(cue) if self.save.settings.sound_enabled => {
                    self.audio.play(*cue);
                }
                GameEvent::HighScoreChanged(score) => {
                    self.save.high_score = self.save.high_score.max(*score);
                    dirty = true;
                }
                _ => {}
            }
        }

        if let Some(score) = final_score {
            self.held = TickInput::default();
            self.bomb_queued = false;
            self.frames.cancel();

            let ledger = &self.state.ledger;
            match self.save.record_run(score, ledger.wave, ledger.level) {
                Some(rank) => log::info!("Run placed #{} on the leaderboard", rank),
                None => log::info!("Run did not place on the leaderboard"),
            }
            dirty = true;
        }

        if dirty {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.save) {
            log::warn!("Failed to write save: {}", e);
        }
    }
}
