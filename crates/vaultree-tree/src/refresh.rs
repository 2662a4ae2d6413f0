//! Fetching children from collaborators and reconciling them.

use std::sync::Arc;

use futures::future::try_join_all;
use vaultree_backend::{BoxFuture, StoreFilter};
use vaultree_core::{Identity, NodeId, NodeKind, Profile, StoreInfo, TreeError, TreeResult};

use crate::context::TreeContext;
use crate::node::{Node, NodeDescriptor, PendingFolder, Stat, VirtualFolder, VirtualRole};
use crate::reconcile::reconcile;

/// List a store directory and describe each entry.
async fn store_listing(
    ctx: &TreeContext,
    store: &Arc<StoreInfo>,
    path: &str,
    own: &Identity,
) -> TreeResult<Vec<NodeDescriptor>> {
    let entries = ctx.backend().list(&store.address, path).await?;
    Ok(entries
        .into_iter()
        .map(|entry| {
            NodeDescriptor::entry(
                Some(own.clone()),
                Arc::clone(store),
                path,
                &entry.name,
                entry.is_container,
                Stat::new(entry.size, entry.modified),
            )
        })
        .collect())
}

fn store_descriptors(own: &Identity, stores: Vec<StoreInfo>) -> Vec<NodeDescriptor> {
    stores
        .into_iter()
        .map(|info| NodeDescriptor::Store {
            parent: Some(own.clone()),
            info: Arc::new(info),
        })
        .collect()
}

impl VirtualFolder {
    async fn fetch(&self, ctx: &TreeContext, own: &Identity) -> TreeResult<Vec<NodeDescriptor>> {
        let directory = ctx.directory();
        let stores = match &self.role {
            VirtualRole::Root => return root_listing(ctx, own).await,
            VirtualRole::User(profile) if profile.is_current => {
                directory.list_stores(StoreFilter::owned()).await?
            }
            VirtualRole::User(profile) => {
                // The profile's own store goes first, fetched directly.
                let mut stores: Vec<StoreInfo> = directory
                    .list_published_stores(&profile.address)
                    .await?
                    .into_iter()
                    .filter(|info| info.address != profile.address)
                    .collect();
                let profile_store = directory.store_info(&profile.address).await?;
                stores.insert(0, profile_store);
                stores
            }
            VirtualRole::Network => directory.list_stores(StoreFilter::network()).await?,
            VirtualRole::Trash => directory.list_stores(StoreFilter::trash()).await?,
        };
        Ok(store_descriptors(own, stores))
    }

    /// Insert a store discovered outside a refresh.
    ///
    /// Only the network folder accepts this. Returns `false` when a child
    /// with the same identity already exists. Does not sort.
    pub fn add_store(&mut self, info: StoreInfo) -> TreeResult<bool> {
        if self.role != VirtualRole::Network {
            return Err(TreeError::unsupported("add a store to", NodeKind::VirtualFolder));
        }
        let identity = Identity::store_root(info.address.clone());
        if self.children.iter().any(|child| child.identity() == identity) {
            return Ok(false);
        }
        let own = self.role.identity();
        self.children.push(Node::from_descriptor(NodeDescriptor::Store {
            parent: Some(own),
            info: Arc::new(info),
        }));
        Ok(true)
    }
}

/// Own folder, network, one folder per followed identity, trash.
async fn root_listing(ctx: &TreeContext, own: &Identity) -> TreeResult<Vec<NodeDescriptor>> {
    let directory = ctx.directory();
    let mut current = directory.current_profile().await?;
    current.is_current = true;

    let followed =
        try_join_all(current.followed().map(|address| directory.profile(address))).await?;

    let parent = Some(own.clone());
    let user = |mut profile: Profile, is_current: bool| {
        profile.is_current = is_current;
        NodeDescriptor::Virtual {
            parent: parent.clone(),
            role: VirtualRole::User(profile),
        }
    };

    let mut children = Vec::with_capacity(followed.len() + 3);
    children.push(user(current, true));
    children.push(NodeDescriptor::Virtual {
        parent: parent.clone(),
        role: VirtualRole::Network,
    });
    children.extend(followed.into_iter().map(|profile| user(profile, false)));
    children.push(NodeDescriptor::Virtual {
        parent: parent.clone(),
        role: VirtualRole::Trash,
    });
    Ok(children)
}

impl Node {
    /// Fetch this container's children and reconcile them in place.
    ///
    /// On failure the previous children are left untouched. Pending
    /// folders have nothing to fetch; files are not containers.
    pub async fn refresh_children(&mut self, ctx: &TreeContext) -> TreeResult<()> {
        let own = self.identity();
        let (fresh, children) = match self {
            Node::Virtual(folder) => (folder.fetch(ctx, &own).await?, &mut folder.children),
            Node::Store(root) => (
                store_listing(ctx, &root.info, "", &own).await?,
                &mut root.children,
            ),
            Node::Folder(folder) => (
                store_listing(ctx, &folder.store, &folder.path, &own).await?,
                &mut folder.children,
            ),
            Node::Pending(_) => return Ok(()),
            Node::File(_) => {
                return Err(TreeError::unsupported("list children of", NodeKind::StoreFile));
            }
        };

        tracing::debug!("refreshing {own} with {} entries", fresh.len());
        let old = std::mem::take(children);
        *children = reconcile(old, fresh);
        Ok(())
    }

    /// Load whatever this node shows: children for containers, a preview for files.
    pub async fn read_data(&mut self, ctx: &TreeContext) -> TreeResult<()> {
        match self {
            Node::File(file) => {
                file.load_preview(ctx, ctx.config().max_preview_length).await;
                Ok(())
            }
            _ => self.refresh_children(ctx).await,
        }
    }

    /// Refresh this container and its descendants down to `depth` levels.
    ///
    /// With `previews` set, files within reach also load their preview.
    pub fn refresh_to_depth<'a>(
        &'a mut self,
        ctx: &'a TreeContext,
        depth: usize,
        previews: bool,
    ) -> BoxFuture<'a, TreeResult<()>> {
        Box::pin(async move {
            if depth == 0 || !self.is_container() {
                return Ok(());
            }
            self.refresh_children(ctx).await?;
            if let Some(children) = self.children_mut() {
                for child in children.iter_mut() {
                    match child {
                        Node::File(file) if previews => {
                            file.load_preview(ctx, ctx.config().max_preview_length).await;
                        }
                        other => other.refresh_to_depth(ctx, depth - 1, previews).await?,
                    }
                }
            }
            Ok(())
        })
    }

    /// Add a placeholder for a folder to be created in this store container.
    ///
    /// Returns the placeholder's id. An existing placeholder is reused.
    pub fn begin_new_folder(&mut self) -> TreeResult<NodeId> {
        let own = self.identity();
        let (store, parent_path, children) = match self {
            Node::Store(root) => (Arc::clone(&root.info), Default::default(), &mut root.children),
            Node::Folder(folder) => (
                Arc::clone(&folder.store),
                folder.path.clone(),
                &mut folder.children,
            ),
            other => return Err(TreeError::unsupported("create a folder in", other.kind())),
        };

        let identity = Identity::pending(store.address.clone(), parent_path.clone());
        if let Some(existing) = children.iter().find(|child| child.identity() == identity) {
            return Ok(existing.id());
        }

        let pending = Node::Pending(PendingFolder {
            id: NodeId::next(),
            parent: Some(own),
            store,
            parent_path,
        });
        let id = pending.id();
        children.push(pending);
        Ok(id)
    }
}
