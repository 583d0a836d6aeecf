//! Per-file content-hash cache.
//!
//! Stores a SHA-256 hash per processed file so unchanged files can be
//! skipped on subsequent runs. The cache is a TOML document; a missing or
//! unreadable cache is treated as empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct HashCache {
    #[serde(default)]
    files: BTreeMap<String, String>,

    #[serde(skip)]
    modified: bool,
}

impl HashCache {
    pub(crate) fn load(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&text).unwrap_or_default()
    }

    pub(crate) fn store(&self, path: &Path) -> anyhow::Result<()> {
        if !self.modified {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }

    /// Whether `path` was last seen with exactly these content bytes.
    pub(crate) fn is_unchanged(&self, path: &Path, content: &[u8]) -> bool {
        self.files.get(&key(path)).is_some_and(|h| *h == hash(content))
    }

    pub(crate) fn update(&mut self, path: &Path, content: &[u8]) {
        self.files.insert(key(path), hash(content));
        self.modified = true;
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn hash(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}
