use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where the voting backend lives and how to talk to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as `x-api-key` when present. Never compiled in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Which side owns the favorites collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesSource {
    /// `GET /favourites` is authoritative; records carry `created_at`.
    #[default]
    Server,
    /// Favorited URLs are kept client-side and mirrored to `storage_file`.
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    #[serde(default)]
    pub source: FavoritesSource,
    /// Key-value JSON file used by the local variant.
    #[serde(default = "default_storage_file")]
    pub storage_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_autoplay_delay_ms")]
    pub autoplay_delay_ms: u64,
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Nominal width of a favorites tile.
    #[serde(default = "default_tile_width")]
    pub tile_width: u16,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            source: FavoritesSource::default(),
            storage_file: default_storage_file(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_delay_ms: default_autoplay_delay_ms(),
            pause_on_hover: default_true(),
        }
    }
}

impl CarouselConfig {
    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tile_width: default_tile_width(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_storage_file() -> PathBuf {
    platform::data_dir().join("storage.json")
}

fn default_autoplay_delay_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_tile_width() -> u16 {
    200
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
