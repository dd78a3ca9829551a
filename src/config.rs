use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GAME_DURATION_SECS: u64 = 30;
pub const BASE_INTERVAL_MS: u64 = 750;
pub const SPEED_MIN_MS: u64 = 260;
pub const SPEED_STEP_MS: u64 = 35;
pub const COMBO_TIMEOUT_MS: u64 = 1200;
pub const MAX_COMBO: u8 = 6;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub duration_secs: u64,
    pub base_interval_ms: u64,
    pub speed_min_ms: u64,
    pub speed_step_ms: u64,
    pub combo_timeout_ms: u64,
    pub max_combo: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            duration_secs: GAME_DURATION_SECS,
            base_interval_ms: BASE_INTERVAL_MS,
            speed_min_ms: SPEED_MIN_MS,
            speed_step_ms: SPEED_STEP_MS,
            combo_timeout_ms: COMBO_TIMEOUT_MS,
            max_combo: MAX_COMBO,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "shadow-rush") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("shadow_rush_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> GameConfig {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<GameConfig>(&bytes) {
                return cfg;
            }
        }
        GameConfig::default()
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
