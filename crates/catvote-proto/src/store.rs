//! Durable key-value storage backed by a single JSON file.
//!
//! Each `set` rewrites the file before returning, so a value written by an
//! action survives a crash immediately after it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::protocol::Favorite;

/// Key the favorites collection is stored under.
pub const FAVORITES_KEY: &str = "catFavorites";

pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, serde_json::Value>,
}

impl LocalStore {
    /// Open the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("store: ignoring malformed value for {}: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> anyhow::Result<()> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    pub fn load_favorites(&self) -> Vec<Favorite> {
        self.get(FAVORITES_KEY).unwrap_or_default()
    }

    pub fn save_favorites(&mut self, favorites: &[Favorite]) -> anyhow::Result<()> {
        self.set(FAVORITES_KEY, &favorites)
    }

    fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    fn load_entries(path: &Path) -> BTreeMap<String, serde_json::Value> {
        let Ok(content) = std::fs::read_to_string(path) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("store: {} is not a JSON object, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }
        }
    }
}
