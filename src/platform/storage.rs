//! Save store backends
//!
//! Natively the save is a JSON file; in the browser it is one LocalStorage entry.

#[cfg(not(target_arch = "wasm32"))]
pub use native::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use crate::persistence::{SaveData, SaveError, SaveStore};

    /// Save data in a JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SaveStore for JsonFileStore {
        fn load(&self) -> Result<SaveData, SaveError> {
            let json = match fs::read_to_string(&self.path) {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::info!("No save at {}, starting fresh", self.path.display());
                    return Ok(SaveData::default());
                }
                Err(e) => return Err(e.into()),
            };
            let data: SaveData = serde_json::from_str(&json)?;
            log::info!(
                "Loaded save from {} (high score {})",
                self.path.display(),
                data.high_score
            );
            Ok(data)
        }

        fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
            let json = serde_json::to_string_pretty(data)?;
            // Write beside the target and rename so a crash never leaves half a file
            let tmp = self.path.with_extension("json.tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)?;
            log::debug!("Saved to {}", self.path.display());
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn scratch(name: &str) -> PathBuf {
            std::env::temp_dir().join(format!(
                "pixel_shooter_{}_{}.json",
                name,
                std::process::id()
            ))
        }

        #[test]
        fn test_missing_file_is_fresh_save() {
            let store = JsonFileStore::new(scratch("missing"));
            assert_eq!(store.load().unwrap(), SaveData::default());
        }

        #[test]
        fn test_save_then_load() {
            let path = scratch("roundtrip");
            let mut store = JsonFileStore::new(&path);
            assert_eq!(store.path(), path.as_path());
            let mut data = SaveData::default();
            data.record_run(2500, 6, 2);
            data.settings.sound_enabled = false;

            store.save(&data).unwrap();
            assert_eq!(store.load().unwrap(), data);
            let _ = fs::remove_file(&path);
        }

        #[test]
        fn test_corrupt_file_is_json_error() {
            let path = scratch("corrupt");
            fs::write(&path, "{ not json").unwrap();
            let store = JsonFileStore::new(&path);
            assert!(matches!(store.load(), Err(SaveError::Json(_))));
            let _ = fs::remove_file(&path);
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::Storage;

    use crate::persistence::{SaveData, SaveError, SaveStore};

    /// LocalStorage key for the save blob
    const STORAGE_KEY: &str = "pixel_shooter_save";
    /// Bare high score written by earlier builds
    const LEGACY_HIGH_SCORE_KEY: &str = "spaceExplorer_highScore";

    /// Save data in the browser's LocalStorage
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<Storage, SaveError> {
            web_sys::window()
                .ok_or_else(|| SaveError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| SaveError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| SaveError::Unavailable("LocalStorage disabled".into()))
        }
    }

    impl SaveStore for LocalStorageStore {
        fn load(&self) -> Result<SaveData, SaveError> {
            let storage = Self::storage()?;
            let read = |key: &str| {
                storage
                    .get_item(key)
                    .map_err(|e| SaveError::Unavailable(format!("{e:?}")))
            };

            if let Some(json) = read(STORAGE_KEY)? {
                let data: SaveData = serde_json::from_str(&json)?;
                log::info!("Loaded save (high score {})", data.high_score);
                return Ok(data);
            }

            let high_score = read(LEGACY_HIGH_SCORE_KEY)?
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            if high_score > 0 {
                log::info!("Migrated legacy high score {}", high_score);
            }
            Ok(SaveData {
                high_score,
                ..Default::default()
            })
        }

        fn save(&mut self, data: &SaveData) -> Result<(), SaveError> {
            let json = serde_json::to_string(data)?;
            Self::storage()?
                .set_item(STORAGE_KEY, &json)
                .map_err(|e| SaveError::Unavailable(format!("{e:?}")))
        }
    }
}
