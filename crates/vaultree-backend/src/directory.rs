//! In-memory profile and store directory.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use vaultree_core::{BackendError, BackendResult, Profile, StoreAddress, StoreInfo};

use crate::adapter::{BoxFuture, Directory, StoreFilter};

/// Directory backed by in-memory maps.
///
/// Store listings are returned in address order so tree assembly is
/// deterministic.
#[derive(Debug)]
pub struct MemoryDirectory {
    current: StoreAddress,
    profiles: DashMap<StoreAddress, Profile>,
    stores: DashMap<StoreAddress, StoreInfo>,
    offline: AtomicBool,
}

impl MemoryDirectory {
    /// Create a directory whose session identity is `current`.
    pub fn new(current: Profile) -> Self {
        let address = current.address.clone();
        let profiles = DashMap::new();
        profiles.insert(address.clone(), current);
        Self {
            current: address,
            profiles,
            stores: DashMap::new(),
            offline: AtomicBool::new(false),
        }
    }

    /// Register or replace a profile.
    pub fn add_profile(&self, profile: Profile) {
        self.profiles.insert(profile.address.clone(), profile);
    }

    /// Register or replace a store.
    pub fn add_store(&self, info: StoreInfo) {
        self.stores.insert(info.address.clone(), info);
    }

    /// Forget a store.
    pub fn remove_store(&self, address: &StoreAddress) -> Option<StoreInfo> {
        self.stores.remove(address).map(|(_, info)| info)
    }

    /// Make every call fail as unavailable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(BackendError::unavailable(
                self.current.clone(),
                "directory is offline",
            ));
        }
        Ok(())
    }

    fn profile_now(&self, address: &StoreAddress) -> BackendResult<Profile> {
        self.check_online()?;
        self.profiles
            .get(address)
            .map(|p| p.clone())
            .ok_or_else(|| BackendError::not_found(address.clone(), ""))
    }

    fn collect_stores(
        &self,
        predicate: impl Fn(&StoreInfo) -> bool,
    ) -> BackendResult<Vec<StoreInfo>> {
        self.check_online()?;
        let mut stores: Vec<StoreInfo> = self
            .stores
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        stores.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(stores)
    }
}

impl Directory for MemoryDirectory {
    fn current_profile(&self) -> BoxFuture<'_, BackendResult<Profile>> {
        Box::pin(async move {
            let mut profile = self.profile_now(&self.current)?;
            profile.is_current = true;
            Ok(profile)
        })
    }

    fn profile<'a>(&'a self, address: &'a StoreAddress) -> BoxFuture<'a, BackendResult<Profile>> {
        Box::pin(async move { self.profile_now(address) })
    }

    fn list_stores(&self, filter: StoreFilter) -> BoxFuture<'_, BackendResult<Vec<StoreInfo>>> {
        Box::pin(async move { self.collect_stores(|info| filter.matches(info)) })
    }

    fn list_published_stores<'a>(
        &'a self,
        author: &'a StoreAddress,
    ) -> BoxFuture<'a, BackendResult<Vec<StoreInfo>>> {
        Box::pin(async move { self.collect_stores(|info| info.author.as_ref() == Some(author)) })
    }

    fn store_info<'a>(
        &'a self,
        address: &'a StoreAddress,
    ) -> BoxFuture<'a, BackendResult<StoreInfo>> {
        Box::pin(async move {
            self.check_online()?;
            self.stores
                .get(address)
                .map(|info| info.clone())
                .ok_or_else(|| BackendError::not_found(address.clone(), ""))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> MemoryDirectory {
        let directory = MemoryDirectory::new(Profile::new("dweb://me", "Me"));
        directory.add_store(StoreInfo::new("dweb://b-mine").owned(true).saved(true));
        directory.add_store(StoreInfo::new("dweb://a-mine").owned(true).saved(true));
        directory.add_store(StoreInfo::new("dweb://theirs").saved(true));
        directory.add_store(StoreInfo::new("dweb://gone").owned(true));
        directory
    }

    #[tokio::test]
    async fn test_current_profile_is_flagged() {
        let directory = directory();
        let profile = directory.current_profile().await.unwrap();
        assert!(profile.is_current);
        assert_eq!(profile.address.as_str(), "dweb://me");
    }

    #[tokio::test]
    async fn test_list_stores_sorted_and_filtered() {
        let directory = directory();
        let owned = directory.list_stores(StoreFilter::owned()).await.unwrap();
        let addresses: Vec<_> = owned.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(addresses, vec!["dweb://a-mine", "dweb://b-mine"]);

        let trash = directory.list_stores(StoreFilter::trash()).await.unwrap();
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].address.as_str(), "dweb://gone");
    }

    #[tokio::test]
    async fn test_offline_directory() {
        let directory = directory();
        directory.set_offline(true);
        assert!(directory.current_profile().await.is_err());
    }
}
