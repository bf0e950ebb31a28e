//! Sound cues and the audio sink
//!
//! The sim only names cues; an `AudioSink` turns them into sound. Every cue is a short
//! list of procedurally generated tones, so no sample files are needed. On wasm32 the
//! tones go out through the Web Audio API; elsewhere cues are dropped or recorded.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound cue kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player volley
    Shoot,
    /// Enemy or boss destroyed
    Explosion,
    /// Player took a hit
    Hit,
    /// Enemy bullet brushed past
    Graze,
    /// Boss incoming
    BossWarning,
    /// Boss shield depleted
    ShieldBreak,
    GameOver,
    Bomb,
    /// Power-up collected
    PowerUp,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One oscillator blip: fixed or swept pitch, decaying to near silence over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start offset from the cue in seconds
    pub delay: f64,
    pub freq: f32,
    /// Exponential sweep target, if the pitch moves
    pub sweep_to: Option<f32>,
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain before the master volume
    pub volume: f32,
}

const fn tone(delay: f64, freq: f32, duration: f64, waveform: Waveform, volume: f32) -> Tone {
    Tone {
        delay,
        freq,
        sweep_to: None,
        duration,
        waveform,
        volume,
    }
}

use Waveform::{Sawtooth, Sine, Square};

const SHOOT: &[Tone] = &[tone(0.0, 800.0, 0.1, Square, 0.05)];

const EXPLOSION: &[Tone] = &[
    tone(0.0, 100.0, 0.3, Sawtooth, 0.1),
    tone(0.05, 50.0, 0.2, Sawtooth, 0.08),
];

const HIT: &[Tone] = &[Tone {
    sweep_to: Some(200.0),
    ..tone(0.0, 600.0, 0.15, Sawtooth, 0.1)
}];

const GRAZE: &[Tone] = &[tone(0.0, 1200.0, 0.05, Sine, 0.03)];

const BOSS_WARNING: &[Tone] = &[
    tone(0.0, 150.0, 0.5, Sawtooth, 0.15),
    tone(0.2, 180.0, 0.5, Sawtooth, 0.15),
];

const SHIELD_BREAK: &[Tone] = &[
    tone(0.0, 800.0, 0.1, Sawtooth, 0.1),
    tone(0.05, 600.0, 0.1, Square, 0.1),
    tone(0.1, 400.0, 0.2, Sawtooth, 0.1),
];

const GAME_OVER: &[Tone] = &[
    tone(0.0, 400.0, 0.3, Sine, 0.1),
    tone(0.3, 350.0, 0.3, Sine, 0.1),
    tone(0.6, 300.0, 0.3, Sine, 0.1),
    tone(0.9, 250.0, 0.5, Sine, 0.1),
];

const BOMB: &[Tone] = &[
    tone(0.0, 80.0, 0.5, Sawtooth, 0.15),
    tone(0.1, 60.0, 0.4, Sawtooth, 0.12),
    tone(0.2, 40.0, 0.3, Sawtooth, 0.08),
];

const POWER_UP: &[Tone] = &[Tone {
    sweep_to: Some(1200.0),
    ..tone(0.0, 400.0, 0.2, Sine, 0.08)
}];

impl SoundCue {
    /// Tones making up this cue
    pub fn recipe(self) -> &'static [Tone] {
        match self {
            SoundCue::Shoot => SHOOT,
            SoundCue::Explosion => EXPLOSION,
            SoundCue::Hit => HIT,
            SoundCue::Graze => GRAZE,
            SoundCue::BossWarning => BOSS_WARNING,
            SoundCue::ShieldBreak => SHIELD_BREAK,
            SoundCue::GameOver => GAME_OVER,
            SoundCue::Bomb => BOMB,
            SoundCue::PowerUp => POWER_UP,
        }
    }

    /// Seconds until the last tone of the cue has finished
    pub fn length(self) -> f64 {
        self.recipe()
            .iter()
            .map(|t| t.delay + t.duration)
            .fold(0.0, f64::max)
    }
}

/// Something that can play cues. Owned by the session, never by the sim.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Silence everything, including tones scheduled but not yet started
    fn stop_all(&mut self);

    /// Pick up volume and mute changes
    fn apply_settings(&mut self, _settings: &Settings) {}
}

/// Sink that discards every cue (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue) {}
    fn stop_all(&mut self) {}
}

/// Sink that remembers what it was asked to play
#[derive(Debug, Default, Clone)]
pub struct CueRecorder {
    pub played: Vec<SoundCue>,
    pub stops: usize,
    pub muted: bool,
}

impl CueRecorder {
    pub fn count(&self, cue: SoundCue) -> usize {
        self.played.iter().filter(|c| **c == cue).count()
    }
}

impl AudioSink for CueRecorder {
    fn play(&mut self, cue: SoundCue) {
        if !self.muted {
            self.played.push(cue);
        }
    }

    fn stop_all(&mut self) {
        self.stops += 1;
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.muted = settings.effective_volume() <= 0.0;
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorType};

    use super::{AudioSink, SoundCue, Tone, Waveform};
    use crate::settings::Settings;

    /// Web Audio backed sink. All tones route through one master gain node so
    /// `stop_all` can cut them off by swapping that node out.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            let mut audio = Self {
                ctx,
                master: None,
                volume: settings.effective_volume(),
            };
            audio.master = audio.build_master();
            audio
        }

        /// Resume audio context (required after a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn build_master(&self) -> Option<GainNode> {
            let ctx = self.ctx.as_ref()?;
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(self.volume);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        }

        fn schedule(&self, ctx: &AudioContext, master: &GainNode, tone: &Tone) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;
            osc.frequency().set_value_at_time(tone.freq, t).ok()?;
            if let Some(target) = tone.sweep_to {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, end)
                    .ok()?;
            }
            gain.gain().set_value_at_time(tone.volume, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, end)
                .ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, cue: SoundCue) {
            if self.volume <= 0.0 {
                return;
            }
            let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
                return;
            };

            // Resume context if suspended (browsers require a user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in cue.recipe() {
                if self.schedule(ctx, master, tone).is_none() {
                    log::debug!("Dropped tone for {:?}", cue);
                }
            }
        }

        fn stop_all(&mut self) {
            if let Some(master) = self.master.take() {
                let _ = master.disconnect();
            }
            self.master = self.build_master();
        }

        fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
            if let Some(master) = &self.master {
                master.gain().set_value(self.volume);
            }
        }
    }
}
