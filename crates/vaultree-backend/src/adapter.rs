//! Store backend and directory traits.

use std::future::Future;
use std::pin::Pin;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use vaultree_core::{BackendResult, EntryInfo, Profile, StoreAddress, StoreInfo};

/// Type alias for boxed futures returned by collaborator methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a resource should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceEncoding {
    /// Decode as UTF-8 text.
    #[default]
    Utf8,
    /// Raw bytes.
    Binary,
}

/// Content returned by [`StoreBackend::read_resource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceData {
    Text(String),
    Bytes(Vec<u8>),
}

impl ResourceData {
    /// Convert into text, replacing invalid UTF-8.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// A cross-store transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Store holding the source content.
    pub source_store: StoreAddress,
    /// Source path (empty for the whole store).
    pub source_path: CompactString,
    /// Store receiving the content.
    pub destination_store: StoreAddress,
    /// Destination path in the receiving store.
    pub destination_path: CompactString,
    /// Skip entries that are not yet replicated locally instead of failing.
    pub skip_unreplicated: bool,
}

/// Outcome of an export.
///
/// Skipped entries are an accepted result of a best-effort export, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Number of files written to the destination.
    pub copied: usize,
    /// Source paths that were not exported because they were not replicated.
    pub skipped: Vec<CompactString>,
}

impl ExportReport {
    /// Check if every source entry made it to the destination.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Operations a backend store must support.
///
/// Paths are store-relative, start with `/`, and the store root is `""`.
pub trait StoreBackend: Send + Sync {
    /// List the direct children of a directory.
    fn list<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<Vec<EntryInfo>>>;

    /// Read a file.
    fn read_resource<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
        encoding: ResourceEncoding,
    ) -> BoxFuture<'a, BackendResult<ResourceData>>;

    /// Rename a file or directory within a store.
    fn rename<'a>(
        &'a self,
        store: &'a StoreAddress,
        old_path: &'a str,
        new_path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>>;

    /// Copy a file or directory within a store.
    fn copy<'a>(
        &'a self,
        store: &'a StoreAddress,
        source: &'a str,
        destination: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>>;

    /// Remove a single file.
    fn remove_resource<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>>;

    /// Remove a directory, optionally with everything below it.
    fn remove_container<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
        recursive: bool,
    ) -> BoxFuture<'a, BackendResult<()>>;

    /// Create a directory.
    fn create_container<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>>;

    /// Copy content from one store into another.
    fn export_across_stores(
        &self,
        request: ExportRequest,
    ) -> BoxFuture<'_, BackendResult<ExportReport>>;

    /// Remove an entire store.
    fn remove_store<'a>(&'a self, store: &'a StoreAddress) -> BoxFuture<'a, BackendResult<()>>;
}

/// Filter for [`Directory::list_stores`]. `None` matches either value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreFilter {
    pub is_saved: Option<bool>,
    pub is_owner: Option<bool>,
}

impl StoreFilter {
    /// Stores saved locally and owned by the current identity.
    pub fn owned() -> Self {
        Self {
            is_saved: Some(true),
            is_owner: Some(true),
        }
    }

    /// Stores saved locally but owned by someone else.
    pub fn network() -> Self {
        Self {
            is_saved: Some(true),
            is_owner: Some(false),
        }
    }

    /// Stores known but not saved.
    pub fn trash() -> Self {
        Self {
            is_saved: Some(false),
            is_owner: None,
        }
    }

    /// Check a store against the filter.
    pub fn matches(&self, info: &StoreInfo) -> bool {
        self.is_saved.is_none_or(|s| s == info.is_saved)
            && self.is_owner.is_none_or(|o| o == info.is_owner)
    }
}

/// Profile and store directory.
pub trait Directory: Send + Sync {
    /// The session's own profile.
    fn current_profile(&self) -> BoxFuture<'_, BackendResult<Profile>>;

    /// Look up another profile.
    fn profile<'a>(&'a self, address: &'a StoreAddress) -> BoxFuture<'a, BackendResult<Profile>>;

    /// Stores known locally, filtered.
    fn list_stores(&self, filter: StoreFilter) -> BoxFuture<'_, BackendResult<Vec<StoreInfo>>>;

    /// Stores published by a profile.
    fn list_published_stores<'a>(
        &'a self,
        author: &'a StoreAddress,
    ) -> BoxFuture<'a, BackendResult<Vec<StoreInfo>>>;

    /// Metadata for one store.
    fn store_info<'a>(
        &'a self,
        address: &'a StoreAddress,
    ) -> BoxFuture<'a, BackendResult<StoreInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_filter() {
        let owned = StoreInfo::new("dweb://a").owned(true).saved(true);
        let other = StoreInfo::new("dweb://b").saved(true);
        let unsaved = StoreInfo::new("dweb://c").owned(true);

        assert!(StoreFilter::owned().matches(&owned));
        assert!(!StoreFilter::owned().matches(&other));
        assert!(StoreFilter::network().matches(&other));
        assert!(StoreFilter::trash().matches(&unsaved));
        assert!(!StoreFilter::trash().matches(&owned));
        assert!(StoreFilter::default().matches(&unsaved));
    }

    #[test]
    fn test_resource_data_into_text() {
        assert_eq!(ResourceData::Text("hi".into()).into_text(), "hi");
        assert_eq!(ResourceData::Bytes(b"yo".to_vec()).into_text(), "yo");
    }
}
