use crate::error::ConfigurationError;
use crate::util;
use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_UNDO_WINDOW_MS: u64 = 6000;

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(
        env::var("PORTAL_SNAPSHOT_PATH").unwrap_or_else(|_| "./data/portal.json".to_string()),
    )
}

fn default_undo_window_ms() -> u64 {
    env::var("PORTAL_UNDO_WINDOW_MS")
        .ok()
        .and_then(|it| it.trim().parse().ok())
        .unwrap_or(DEFAULT_UNDO_WINDOW_MS)
}

fn default_seed_demo_data() -> bool {
    env::var("PORTAL_SEED_DEMO")
        .map(|it| !matches!(it.trim(), "0" | "false" | "no"))
        .unwrap_or(true)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip)]
    pub(crate) file_path: PathBuf,

    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// How long a deleted assignment can still be restored.
    #[serde(default = "default_undo_window_ms")]
    pub undo_window_ms: u64,

    /// Seed demo users, courses and assignments when no snapshot is stored.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            file_path: config_dir().join("settings.yml"),
            snapshot_path: default_snapshot_path(),
            undo_window_ms: default_undo_window_ms(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

#[inline]
fn config_dir() -> PathBuf {
    PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "./config".to_string()))
}

impl Config {
    pub fn load() -> Result<Config, ConfigurationError> {
        let config_file = util::find_first_subpath(
            config_dir(),
            &["settings.yml", "settings.yaml"],
            Path::exists,
        )
        .ok_or_else(|| ConfigurationError::NotFound(config_dir()))?;

        let file = File::open(&config_file)?;
        let mut config: Config = serde_yaml::from_reader(BufReader::new(file))?;
        config.file_path = config_file;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigurationError> {
        if let Some(dir) = self.file_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = File::create(&self.file_path)?;
        let mut out = BufWriter::new(file);
        serde_yaml::to_writer(&mut out, self)?;
        out.flush()?;
        Ok(())
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }
}
