// SPDX-FileCopyrightText: 2026 Tessera contributors
// SPDX-License-Identifier: MIT

//! Session-scoped key-value store.
//!
//! One JSON object per session directory, loaded once at startup and written
//! back on every mutation. A missing or unreadable file reads as an empty
//! store; only the write path can fail.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STORE_FILENAME: &str = "tessera-session.json";

/// Key whose presence (with a non-empty value) marks an authenticated session.
pub const SESSION_MARKER_KEY: &str = "user";
/// Identifier the user signed in with.
pub const IDENTIFIER_KEY: &str = "email";
/// Admin flag persisted on login; nothing consumes it.
pub const ADMIN_FLAG_KEY: &str = "admin";

#[derive(Debug)]
pub struct SessionStore {
    dir: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Serialize { source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "session store write failed ({}): {source}", path.display())
            }
            Self::Serialize { source } => write!(f, "session store serialize failed: {source}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize { source } => Some(source),
        }
    }
}

impl SessionStore {
    /// Opens the store rooted at `dir`, loading any existing entries.
    ///
    /// A missing or corrupt store file is identical to an empty store.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let entries = load_entries(&dir.join(STORE_FILENAME));
        Self { dir: Some(dir), entries }
    }

    /// A store that never touches disk. Backs demo mode and tests.
    pub fn ephemeral() -> Self {
        Self { dir: None, entries: BTreeMap::new() }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True when the session marker is present with a non-empty value.
    pub fn has_session_marker(&self) -> bool {
        self.get(SESSION_MARKER_KEY).is_some_and(|value| !value.is_empty())
    }

    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.entries.insert(key.into(), value.into());
        self.persist()
    }

    /// Removes every entry, this application's keys and anyone else's alike.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.persist()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|source| StoreError::Serialize { source })?;
        fs::create_dir_all(dir).map_err(|source| StoreError::Io { path: dir.clone(), source })?;
        let path = dir.join(STORE_FILENAME);
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(contents) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    serde_json::from_str(&contents).unwrap_or_default()
}
