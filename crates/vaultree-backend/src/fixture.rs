//! JSON fixtures describing a populated in-memory world.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vaultree_core::{BackendError, Profile, StoreAddress, StoreInfo};

use crate::directory::MemoryDirectory;
use crate::memory::MemoryBackend;

/// Errors that can occur while loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid fixture.
    #[error("Invalid fixture {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The fixture does not define the current profile.
    #[error("Current profile {0} is not listed in profiles")]
    MissingCurrentProfile(StoreAddress),

    /// Populating the backend failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// One store and its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureStore {
    /// Directory metadata for the store.
    pub info: StoreInfo,

    /// Empty directories to create.
    #[serde(default)]
    pub directories: Vec<String>,

    /// Replicated files, path to content.
    #[serde(default)]
    pub files: BTreeMap<String, String>,

    /// Files known to the store but not replicated locally.
    #[serde(default)]
    pub unreplicated: BTreeMap<String, String>,
}

/// A complete world: profiles, the session identity, and stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    /// Address of the session's own profile.
    pub current: StoreAddress,

    /// Every known profile, including the current one.
    pub profiles: Vec<Profile>,

    /// Every known store.
    #[serde(default)]
    pub stores: Vec<FixtureStore>,
}

impl Fixture {
    /// Parse a fixture from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load a fixture from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| FixtureError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the in-memory collaborators described by this fixture.
    pub fn build(self) -> Result<(MemoryBackend, MemoryDirectory), FixtureError> {
        let current = self
            .profiles
            .iter()
            .find(|p| p.address == self.current)
            .cloned()
            .ok_or_else(|| FixtureError::MissingCurrentProfile(self.current.clone()))?;

        let directory = MemoryDirectory::new(current);
        for profile in self.profiles {
            if profile.address != self.current {
                directory.add_profile(profile);
            }
        }

        let backend = MemoryBackend::new();
        for store in self.stores {
            let address = store.info.address.clone();
            backend.add_store(address.clone());
            for dir in &store.directories {
                backend.create_dir_all(&address, dir)?;
            }
            for (path, content) in store.files {
                backend.write_file(&address, &path, content)?;
            }
            for (path, content) in store.unreplicated {
                backend.write_unreplicated(&address, &path, content)?;
            }
            directory.add_store(store.info);
        }

        tracing::debug!("fixture loaded for {}", self.current);
        Ok((backend, directory))
    }
}
