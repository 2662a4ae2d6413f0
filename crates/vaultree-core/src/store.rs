//! Store, profile, and listing descriptors returned by collaborators.

use serde::{Deserialize, Serialize};

use crate::identity::StoreAddress;

/// Content types a store can advertise that get their own label.
pub const STANDARD_STORE_TYPES: &[&str] = &[
    "application",
    "module",
    "dataset",
    "documents",
    "music",
    "photos",
    "user-profile",
    "videos",
    "website",
];

/// Metadata about a backend store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Store address.
    pub address: StoreAddress,

    /// Human-readable title.
    #[serde(default)]
    pub title: Option<String>,

    /// Advertised content types.
    #[serde(default)]
    pub types: Vec<String>,

    /// Total size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Last modification time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub modified: u64,

    /// Whether the current identity owns this store.
    #[serde(default)]
    pub is_owner: bool,

    /// Whether the store is saved locally (unsaved stores show up in trash).
    #[serde(default)]
    pub is_saved: bool,

    /// Identity that published this store.
    #[serde(default)]
    pub author: Option<StoreAddress>,
}

impl StoreInfo {
    /// Create store info with only an address.
    pub fn new(address: impl Into<StoreAddress>) -> Self {
        Self {
            address: address.into(),
            title: None,
            types: Vec::new(),
            size: 0,
            modified: 0,
            is_owner: false,
            is_saved: false,
            author: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set ownership.
    pub fn owned(mut self, is_owner: bool) -> Self {
        self.is_owner = is_owner;
        self
    }

    /// Set the saved flag.
    pub fn saved(mut self, is_saved: bool) -> Self {
        self.is_saved = is_saved;
        self
    }

    /// First standard content type, or `"vault"`.
    pub fn type_label(&self) -> &str {
        self.types
            .iter()
            .map(String::as_str)
            .find(|t| STANDARD_STORE_TYPES.contains(t))
            .unwrap_or("vault")
    }
}

/// A user profile known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Address of the profile's own store.
    pub address: StoreAddress,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Addresses of followed profiles.
    #[serde(default)]
    pub follows: Vec<StoreAddress>,

    /// Set when this is the session's own identity.
    #[serde(default)]
    pub is_current: bool,
}

impl Profile {
    /// Create a profile.
    pub fn new(address: impl Into<StoreAddress>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: Some(name.into()),
            follows: Vec::new(),
            is_current: false,
        }
    }

    /// Followed profiles, excluding self-follows.
    pub fn followed(&self) -> impl Iterator<Item = &StoreAddress> {
        self.follows.iter().filter(move |a| **a != self.address)
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryInfo {
    /// Entry name (not full path).
    pub name: String,
    /// Whether the entry is a directory.
    pub is_container: bool,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Last modification time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub modified: u64,
}

impl EntryInfo {
    /// Create a file entry.
    pub fn file(name: impl Into<String>, size: u64, modified: u64) -> Self {
        Self {
            name: name.into(),
            is_container: false,
            size,
            modified,
        }
    }

    /// Create a directory entry.
    pub fn directory(name: impl Into<String>, modified: u64) -> Self {
        Self {
            name: name.into(),
            is_container: true,
            size: 0,
            modified,
        }
    }
}
