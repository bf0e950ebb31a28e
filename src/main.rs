//! Pixel Shooter entry point
//!
//! The browser build is driven from JavaScript through `pixel_shooter::web`. Natively this
//! runs a headless session with a simple autopilot and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::env;
    use std::time::{SystemTime, UNIX_EPOCH};

    use pixel_shooter::audio::NullAudio;
    use pixel_shooter::consts::*;
    use pixel_shooter::game::{Control, Game};
    use pixel_shooter::platform::JsonFileStore;
    use pixel_shooter::sim::{GameEvent, GameState};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Enemy bullets closer than this get dodged
    const DANGER_RADIUS: f32 = 70.0;
    /// Bomb when this many enemy bullets are inside the danger radius
    const PANIC_BULLETS: usize = 4;

    /// Runner configuration from the environment
    struct Config {
        save_path: String,
        seconds: f64,
        seed: u64,
    }

    impl Config {
        fn from_env() -> Self {
            let save_path = env::var("PIXEL_SHOOTER_SAVE")
                .unwrap_or_else(|_| "pixel_shooter_save.json".to_string());
            let seconds = env::var("PIXEL_SHOOTER_SECONDS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|s| *s > 0.0)
                .unwrap_or(120.0);
            let seed = env::var("PIXEL_SHOOTER_SEED")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or_else(|| {
                    SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_millis() as u64)
                        .unwrap_or(0)
                });
            Self {
                save_path,
                seconds,
                seed,
            }
        }
    }

    /// What the autopilot wants held this frame
    struct Intent {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
        bomb: bool,
    }

    fn autopilot(state: &GameState) -> Intent {
        let player = state.player.pos;
        let threats: Vec<_> = state
            .bullets
            .iter()
            .filter(|b| b.is_enemy && b.pos.distance(player) < DANGER_RADIUS)
            .collect();

        let mut intent = Intent {
            left: false,
            right: false,
            up: false,
            down: false,
            bomb: threats.len() >= PANIC_BULLETS,
        };

        if let Some(closest) = threats
            .iter()
            .min_by(|a, b| a.pos.distance(player).total_cmp(&b.pos.distance(player)))
        {
            // Sidestep away from the nearest bullet, back off if it is above us
            intent.left = closest.pos.x >= player.x;
            intent.right = !intent.left;
            intent.down = closest.pos.y < player.y;
            return intent;
        }

        // Line up under the boss or the nearest grunt
        let target = state.boss.as_ref().map(|b| b.pos.x).or_else(|| {
            state
                .enemies
                .iter()
                .map(|e| e.pos.x)
                .min_by(|a, b| (a - player.x).abs().total_cmp(&(b - player.x).abs()))
        });
        if let Some(x) = target {
            intent.left = x < player.x - 4.0;
            intent.right = x > player.x + 4.0;
        }

        // Drift back to the home row; power-ups fall to us
        intent.down = player.y < GAME_HEIGHT - 60.0;
        intent.up = player.y > GAME_HEIGHT - 50.0;
        intent
    }

    pub fn run() {
        let env = env_logger::Env::default().default_filter_or("info");
        let _ = env_logger::Builder::from_env(env).try_init();

        let config = Config::from_env();
        let store = JsonFileStore::new(&config.save_path);
        log::info!(
            "Pixel Shooter (native) starting: seed {}, {}s, save '{}'",
            config.seed,
            config.seconds,
            store.path().display()
        );

        let mut game = Game::new(config.seed, NullAudio, store);
        let token = game.start();
        game.set_held(Control::Fire, true);

        let total_frames = (config.seconds * 1000.0 / FRAME_MS).ceil() as u64;
        let mut explosions = 0u32;
        for frame in 0..total_frames {
            let intent = autopilot(game.state());
            game.set_held(Control::Left, intent.left);
            game.set_held(Control::Right, intent.right);
            game.set_held(Control::Up, intent.up);
            game.set_held(Control::Down, intent.down);
            if intent.bomb {
                game.press_bomb();
            }

            for event in game.frame(token, frame as f64 * FRAME_MS) {
                match event {
                    GameEvent::Explosion { .. } => explosions += 1,
                    GameEvent::BossWarning(true) => log::info!("Warning: boss approaching"),
                    GameEvent::GameOver { final_score } => {
                        log::info!("Game over with {} points", final_score);
                    }
                    _ => {}
                }
            }

            if game.state().is_over() {
                break;
            }
        }
        game.shutdown();

        let ledger = &game.state().ledger;
        log::info!(
            "Finished after {:.1}s: score {}, wave {}, level {}, lives {}",
            game.state().seconds(),
            ledger.score,
            ledger.wave,
            ledger.level,
            ledger.lives
        );
        log::info!(
            "Kills {}, max combo {}, grazes {}, explosions {}",
            ledger.kills,
            ledger.max_combo,
            ledger.graze_count,
            explosions
        );
        for (i, entry) in game.save_data().leaderboard.entries.iter().enumerate() {
            log::info!(
                "#{:>2} {:>8}  wave {:>2}  level {}",
                i + 1,
                entry.score,
                entry.wave,
                entry.level
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is pixel_shooter::web::init, this is just to satisfy the compiler
}
