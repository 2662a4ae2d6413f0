//! In-memory store backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::{CompactString, format_compact};
use dashmap::{DashMap, DashSet};
use vaultree_core::{BackendError, BackendResult, EntryInfo, StoreAddress};

use crate::adapter::{
    BoxFuture, ExportReport, ExportRequest, ResourceData, ResourceEncoding, StoreBackend,
};

/// A single entry in an in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryEntry {
    /// A directory.
    Directory { modified: u64 },
    /// A file. Unreplicated files are known but their content is not local.
    File {
        content: String,
        modified: u64,
        replicated: bool,
    },
}

impl MemoryEntry {
    fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    fn info(&self, name: &str) -> EntryInfo {
        match self {
            Self::Directory { modified } => EntryInfo::directory(name, *modified),
            Self::File {
                content, modified, ..
            } => EntryInfo::file(name, content.len() as u64, *modified),
        }
    }
}

/// Entries of one store keyed by absolute path. The root (`""`) is implicit.
#[derive(Debug, Default)]
struct StoreTree {
    entries: BTreeMap<CompactString, MemoryEntry>,
}

impl StoreTree {
    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.entries.get(path).is_some_and(MemoryEntry::is_dir)
    }

    fn exists(&self, path: &str) -> bool {
        path.is_empty() || self.entries.contains_key(path)
    }

    fn children(&self, path: &str) -> Vec<EntryInfo> {
        let prefix = format_compact!("{path}/");
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                let rest = key.strip_prefix(prefix.as_str())?;
                (!rest.contains('/')).then(|| entry.info(rest))
            })
            .collect()
    }

    /// The entry at `path` and everything below it, keyed by the suffix after `path`.
    fn subtree(&self, path: &str) -> Vec<(CompactString, MemoryEntry)> {
        let prefix = format_compact!("{path}/");
        self.entries
            .iter()
            .filter_map(|(key, entry)| {
                if key.as_str() == path {
                    Some((CompactString::default(), entry.clone()))
                } else if path.is_empty() || key.starts_with(prefix.as_str()) {
                    Some((CompactString::from(&key[path.len()..]), entry.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    fn remove_subtree(&mut self, path: &str) {
        let prefix = format_compact!("{path}/");
        self.entries
            .retain(|key, _| key.as_str() != path && !key.starts_with(prefix.as_str()));
    }

    fn ensure_dir(&mut self, path: &str, modified: u64) {
        let mut current = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current.push('/');
            current.push_str(segment);
            self.entries
                .entry(CompactString::from(current.as_str()))
                .or_insert(MemoryEntry::Directory { modified });
        }
    }
}

fn parent_of(path: &str) -> &str {
    path.rfind('/').map_or("", |idx| &path[..idx])
}

fn normalize(path: &str) -> &str {
    path.trim_end_matches('/')
}

fn check_not_nested(store: &StoreAddress, source: &str, target: &str) -> BackendResult<()> {
    let nested = target
        .strip_prefix(source)
        .is_some_and(|rest| rest.starts_with('/'));
    if nested {
        return Err(BackendError::IntoOwnSubtree {
            store: store.clone(),
            source_path: source.into(),
            target: target.into(),
        });
    }
    Ok(())
}

/// Store backend holding every store in memory.
///
/// Individual stores can be marked offline to simulate an unreachable
/// backend, and files can be marked unreplicated to exercise best-effort
/// exports.
#[derive(Debug)]
pub struct MemoryBackend {
    stores: DashMap<StoreAddress, StoreTree>,
    offline: DashSet<StoreAddress>,
    clock: AtomicU64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self {
            stores: DashMap::new(),
            offline: DashSet::new(),
            clock: AtomicU64::new(1),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    /// Add an empty store. Existing stores are left untouched.
    pub fn add_store(&self, store: impl Into<StoreAddress>) {
        self.stores.entry(store.into()).or_default();
    }

    /// Check if a store exists.
    pub fn has_store(&self, store: &StoreAddress) -> bool {
        self.stores.contains_key(store)
    }

    /// Mark a store reachable or unreachable.
    pub fn set_offline(&self, store: &StoreAddress, offline: bool) {
        if offline {
            self.offline.insert(store.clone());
        } else {
            self.offline.remove(store);
        }
    }

    /// Create a directory and any missing parents.
    pub fn create_dir_all(&self, store: &StoreAddress, path: &str) -> BackendResult<()> {
        let modified = self.tick();
        self.with_store(store, |tree| {
            tree.ensure_dir(normalize(path), modified);
            Ok(())
        })
    }

    /// Write a replicated file, creating parent directories.
    pub fn write_file(
        &self,
        store: &StoreAddress,
        path: &str,
        content: impl Into<String>,
    ) -> BackendResult<()> {
        self.put_file(store, path, content.into(), true)
    }

    /// Write a file whose content is not yet replicated locally.
    pub fn write_unreplicated(
        &self,
        store: &StoreAddress,
        path: &str,
        content: impl Into<String>,
    ) -> BackendResult<()> {
        self.put_file(store, path, content.into(), false)
    }

    /// Check if a path exists in a store.
    pub fn contains(&self, store: &StoreAddress, path: &str) -> bool {
        self.stores
            .get(store)
            .is_some_and(|tree| tree.exists(normalize(path)))
    }

    /// Content of a file, if present.
    pub fn file_content(&self, store: &StoreAddress, path: &str) -> Option<String> {
        let tree = self.stores.get(store)?;
        match tree.entries.get(normalize(path))? {
            MemoryEntry::File { content, .. } => Some(content.clone()),
            MemoryEntry::Directory { .. } => None,
        }
    }

    fn put_file(
        &self,
        store: &StoreAddress,
        path: &str,
        content: String,
        replicated: bool,
    ) -> BackendResult<()> {
        let modified = self.tick();
        self.with_store(store, |tree| {
            let path = normalize(path);
            tree.ensure_dir(parent_of(path), modified);
            tree.entries.insert(
                CompactString::from(path),
                MemoryEntry::File {
                    content,
                    modified,
                    replicated,
                },
            );
            Ok(())
        })
    }

    fn with_store<T>(
        &self,
        store: &StoreAddress,
        f: impl FnOnce(&mut StoreTree) -> BackendResult<T>,
    ) -> BackendResult<T> {
        if self.offline.contains(store) {
            return Err(BackendError::unavailable(store.clone(), "store is offline"));
        }
        let mut tree = self
            .stores
            .get_mut(store)
            .ok_or_else(|| BackendError::not_found(store.clone(), ""))?;
        f(&mut tree)
    }

    fn list_now(&self, store: &StoreAddress, path: &str) -> BackendResult<Vec<EntryInfo>> {
        self.with_store(store, |tree| {
            let path = normalize(path);
            if !tree.is_dir(path) {
                return Err(BackendError::not_found(store.clone(), path));
            }
            Ok(tree.children(path))
        })
    }

    fn read_now(
        &self,
        store: &StoreAddress,
        path: &str,
        encoding: ResourceEncoding,
    ) -> BackendResult<ResourceData> {
        self.with_store(store, |tree| {
            let path = normalize(path);
            match tree.entries.get(path) {
                Some(MemoryEntry::File {
                    replicated: false, ..
                }) => Err(BackendError::unavailable(
                    store.clone(),
                    format!("{path} is not replicated locally"),
                )),
                Some(MemoryEntry::File { content, .. }) => Ok(match encoding {
                    ResourceEncoding::Utf8 => ResourceData::Text(content.clone()),
                    ResourceEncoding::Binary => ResourceData::Bytes(content.clone().into_bytes()),
                }),
                _ => Err(BackendError::not_found(store.clone(), path)),
            }
        })
    }

    fn rename_now(
        &self,
        store: &StoreAddress,
        old_path: &str,
        new_path: &str,
    ) -> BackendResult<()> {
        self.with_store(store, |tree| {
            let (old_path, new_path) = (normalize(old_path), normalize(new_path));
            if old_path.is_empty() || !tree.exists(old_path) {
                return Err(BackendError::not_found(store.clone(), old_path));
            }
            if old_path == new_path {
                return Ok(());
            }
            check_not_nested(store, old_path, new_path)?;
            if tree.exists(new_path) {
                return Err(BackendError::AlreadyExists {
                    store: store.clone(),
                    path: new_path.into(),
                });
            }
            if !tree.is_dir(parent_of(new_path)) {
                return Err(BackendError::not_found(store.clone(), parent_of(new_path)));
            }
            let moved = tree.subtree(old_path);
            tree.remove_subtree(old_path);
            for (suffix, entry) in moved {
                tree.entries
                    .insert(format_compact!("{new_path}{suffix}"), entry);
            }
            Ok(())
        })
    }

    fn copy_now(
        &self,
        store: &StoreAddress,
        source: &str,
        destination: &str,
    ) -> BackendResult<()> {
        let modified = self.tick();
        self.with_store(store, |tree| {
            let (source, destination) = (normalize(source), normalize(destination));
            if !tree.exists(source) {
                return Err(BackendError::not_found(store.clone(), source));
            }
            if tree.exists(destination) {
                return Err(BackendError::AlreadyExists {
                    store: store.clone(),
                    path: destination.into(),
                });
            }
            if !tree.is_dir(parent_of(destination)) {
                return Err(BackendError::not_found(store.clone(), parent_of(destination)));
            }
            // A store root copy snapshots "/" first, so it may land inside itself.
            if !source.is_empty() && tree.is_dir(source) {
                check_not_nested(store, source, destination)?;
            }
            let copied = tree.subtree(source);
            if source.is_empty() {
                tree.ensure_dir(destination, modified);
            }
            for (suffix, entry) in copied {
                tree.entries
                    .insert(format_compact!("{destination}{suffix}"), entry);
            }
            Ok(())
        })
    }

    fn remove_resource_now(&self, store: &StoreAddress, path: &str) -> BackendResult<()> {
        self.with_store(store, |tree| {
            let path = normalize(path);
            if !matches!(tree.entries.get(path), Some(MemoryEntry::File { .. })) {
                return Err(BackendError::not_found(store.clone(), path));
            }
            tree.entries.remove(path);
            Ok(())
        })
    }

    fn remove_container_now(
        &self,
        store: &StoreAddress,
        path: &str,
        recursive: bool,
    ) -> BackendResult<()> {
        self.with_store(store, |tree| {
            let path = normalize(path);
            if path.is_empty() || !tree.is_dir(path) {
                return Err(BackendError::not_found(store.clone(), path));
            }
            if !recursive && !tree.children(path).is_empty() {
                return Err(BackendError::unavailable(
                    store.clone(),
                    format!("{path} is not empty"),
                ));
            }
            tree.remove_subtree(path);
            Ok(())
        })
    }

    fn create_container_now(&self, store: &StoreAddress, path: &str) -> BackendResult<()> {
        let modified = self.tick();
        self.with_store(store, |tree| {
            let path = normalize(path);
            if tree.exists(path) {
                return Err(BackendError::AlreadyExists {
                    store: store.clone(),
                    path: path.into(),
                });
            }
            if !tree.is_dir(parent_of(path)) {
                return Err(BackendError::not_found(store.clone(), parent_of(path)));
            }
            tree.entries
                .insert(CompactString::from(path), MemoryEntry::Directory { modified });
            Ok(())
        })
    }

    fn export_now(&self, request: &ExportRequest) -> BackendResult<ExportReport> {
        let source_path = normalize(&request.source_path);
        let destination_path = normalize(&request.destination_path);

        let (entries, source_is_dir) = self.with_store(&request.source_store, |tree| {
            if !tree.exists(source_path) {
                return Err(BackendError::not_found(
                    request.source_store.clone(),
                    source_path,
                ));
            }
            Ok((tree.subtree(source_path), tree.is_dir(source_path)))
        })?;

        let mut report = ExportReport::default();
        let mut writes = Vec::with_capacity(entries.len());
        for (suffix, entry) in entries {
            match entry {
                MemoryEntry::File {
                    replicated: false, ..
                } => {
                    if !request.skip_unreplicated {
                        return Err(BackendError::unavailable(
                            request.source_store.clone(),
                            format!("{source_path}{suffix} is not replicated locally"),
                        ));
                    }
                    report.skipped.push(format_compact!("{source_path}{suffix}"));
                }
                entry => writes.push((format_compact!("{destination_path}{suffix}"), entry)),
            }
        }

        let modified = self.tick();
        self.with_store(&request.destination_store, |tree| {
            if source_is_dir {
                tree.ensure_dir(destination_path, modified);
            } else {
                tree.ensure_dir(parent_of(destination_path), modified);
            }
            for (path, entry) in writes {
                if entry.is_dir() {
                    tree.ensure_dir(&path, modified);
                } else {
                    tree.ensure_dir(parent_of(&path), modified);
                    tree.entries.insert(path, entry);
                    report.copied += 1;
                }
            }
            Ok(())
        })?;

        tracing::debug!(
            copied = report.copied,
            skipped = report.skipped.len(),
            "export {}{} -> {}{}",
            request.source_store,
            source_path,
            request.destination_store,
            destination_path
        );
        Ok(report)
    }

    fn remove_store_now(&self, store: &StoreAddress) -> BackendResult<()> {
        if self.offline.contains(store) {
            return Err(BackendError::unavailable(store.clone(), "store is offline"));
        }
        self.stores
            .remove(store)
            .map(|_| ())
            .ok_or_else(|| BackendError::not_found(store.clone(), ""))
    }
}

impl StoreBackend for MemoryBackend {
    fn list<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<Vec<EntryInfo>>> {
        Box::pin(async move { self.list_now(store, path) })
    }

    fn read_resource<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
        encoding: ResourceEncoding,
    ) -> BoxFuture<'a, BackendResult<ResourceData>> {
        Box::pin(async move { self.read_now(store, path, encoding) })
    }

    fn rename<'a>(
        &'a self,
        store: &'a StoreAddress,
        old_path: &'a str,
        new_path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.rename_now(store, old_path, new_path) })
    }

    fn copy<'a>(
        &'a self,
        store: &'a StoreAddress,
        source: &'a str,
        destination: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.copy_now(store, source, destination) })
    }

    fn remove_resource<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.remove_resource_now(store, path) })
    }

    fn remove_container<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
        recursive: bool,
    ) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.remove_container_now(store, path, recursive) })
    }

    fn create_container<'a>(
        &'a self,
        store: &'a StoreAddress,
        path: &'a str,
    ) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.create_container_now(store, path) })
    }

    fn export_across_stores(
        &self,
        request: ExportRequest,
    ) -> BoxFuture<'_, BackendResult<ExportReport>> {
        Box::pin(async move { self.export_now(&request) })
    }

    fn remove_store<'a>(&'a self, store: &'a StoreAddress) -> BoxFuture<'a, BackendResult<()>> {
        Box::pin(async move { self.remove_store_now(store) })
    }
}
