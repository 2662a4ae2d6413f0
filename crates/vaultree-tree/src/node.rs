//! Node kinds and the descriptor used to build or update them.

use std::sync::Arc;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use vaultree_core::{Identity, NodeId, NodeKind, Profile, StoreInfo, join_path};

/// Size and modification time of a store entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    /// Size in bytes.
    pub size: u64,
    /// Milliseconds since the Unix epoch.
    pub modified: u64,
}

impl Stat {
    /// Create a stat.
    pub fn new(size: u64, modified: u64) -> Self {
        Self { size, modified }
    }
}

/// What a virtual folder stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VirtualRole {
    /// The tree root.
    Root,
    /// An identity's folder of stores.
    User(Profile),
    /// Stores saved locally but owned by others.
    Network,
    /// Stores known but not saved.
    Trash,
}

impl VirtualRole {
    pub(crate) fn identity(&self) -> Identity {
        match self {
            Self::Root => Identity::virtual_folder("root"),
            Self::User(profile) => {
                Identity::virtual_folder(format_compact!("user-{}", profile.address))
            }
            Self::Network => Identity::virtual_folder("network"),
            Self::Trash => Identity::virtual_folder("trash"),
        }
    }
}

/// A locally assembled folder with no backend.
#[derive(Debug, Clone)]
pub struct VirtualFolder {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Identity>,
    pub(crate) role: VirtualRole,
    pub(crate) children: Vec<Node>,
}

impl VirtualFolder {
    /// The folder's role.
    pub fn role(&self) -> &VirtualRole {
        &self.role
    }

    /// Child nodes in last reconciled order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// The root of a backend store.
#[derive(Debug, Clone)]
pub struct StoreRoot {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Identity>,
    pub(crate) info: Arc<StoreInfo>,
    pub(crate) children: Vec<Node>,
}

impl StoreRoot {
    /// Store metadata.
    pub fn info(&self) -> &StoreInfo {
        &self.info
    }
}

/// A directory inside a store.
#[derive(Debug, Clone)]
pub struct StoreFolder {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Identity>,
    pub(crate) store: Arc<StoreInfo>,
    pub(crate) name: CompactString,
    pub(crate) path: CompactString,
    pub(crate) stat: Stat,
    pub(crate) children: Vec<Node>,
}

/// A file inside a store, with a lazily loaded preview.
#[derive(Debug, Clone)]
pub struct StoreFile {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Identity>,
    pub(crate) store: Arc<StoreInfo>,
    pub(crate) name: CompactString,
    pub(crate) path: CompactString,
    pub(crate) stat: Stat,
    pub(crate) preview: Option<String>,
}

impl StoreFile {
    /// Trimmed name, or "Untitled" when blank.
    pub fn display_name(&self) -> &str {
        name_or(&self.name, UNTITLED)
    }

    /// Cached preview text, if loaded.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}

/// Placeholder for a folder that has not been created yet.
#[derive(Debug, Clone)]
pub struct PendingFolder {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Identity>,
    pub(crate) store: Arc<StoreInfo>,
    pub(crate) parent_path: CompactString,
}

impl PendingFolder {
    /// Path the folder will be created under.
    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }
}

/// A node in the tree.
#[derive(Debug, Clone)]
pub enum Node {
    Virtual(VirtualFolder),
    Store(StoreRoot),
    Folder(StoreFolder),
    File(StoreFile),
    Pending(PendingFolder),
}

/// Everything needed to build a node, or to refresh an existing one in place.
#[derive(Debug, Clone)]
pub enum NodeDescriptor {
    Virtual {
        parent: Option<Identity>,
        role: VirtualRole,
    },
    Store {
        parent: Option<Identity>,
        info: Arc<StoreInfo>,
    },
    Folder {
        parent: Option<Identity>,
        store: Arc<StoreInfo>,
        name: CompactString,
        path: CompactString,
        stat: Stat,
    },
    File {
        parent: Option<Identity>,
        store: Arc<StoreInfo>,
        name: CompactString,
        path: CompactString,
        stat: Stat,
        /// Replacement preview. `None` keeps whatever the node already cached.
        preview: Option<String>,
    },
    Pending {
        parent: Option<Identity>,
        store: Arc<StoreInfo>,
        parent_path: CompactString,
    },
}

impl NodeDescriptor {
    /// Descriptor for a directory entry at `parent_path/name`.
    pub fn entry(
        parent: Option<Identity>,
        store: Arc<StoreInfo>,
        parent_path: &str,
        name: &str,
        is_container: bool,
        stat: Stat,
    ) -> Self {
        let path = join_path(parent_path, name);
        let name = CompactString::from(name);
        if is_container {
            Self::Folder {
                parent,
                store,
                name,
                path,
                stat,
            }
        } else {
            Self::File {
                parent,
                store,
                name,
                path,
                stat,
                preview: None,
            }
        }
    }

    /// The identity the described node will have.
    pub fn identity(&self) -> Identity {
        match self {
            Self::Virtual { role, .. } => role.identity(),
            Self::Store { info, .. } => Identity::store_root(info.address.clone()),
            Self::Folder { store, path, .. } | Self::File { store, path, .. } => {
                Identity::entry(store.address.clone(), path.clone())
            }
            Self::Pending {
                store, parent_path, ..
            } => Identity::pending(store.address.clone(), parent_path.clone()),
        }
    }

    /// The kind of the described node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Virtual { .. } => NodeKind::VirtualFolder,
            Self::Store { .. } => NodeKind::StoreRoot,
            Self::Folder { .. } => NodeKind::StoreFolder,
            Self::File { .. } => NodeKind::StoreFile,
            Self::Pending { .. } => NodeKind::PendingFolder,
        }
    }
}

const UNTITLED: &str = "Untitled";
const NEW_FOLDER: &str = "New folder";
const ANONYMOUS: &str = "Anonymous";

fn name_or<'a>(name: &'a str, fallback: &'static str) -> &'a str {
    match name.trim() {
        "" => fallback,
        trimmed => trimmed,
    }
}

impl Node {
    /// Build a new node instance with a fresh id.
    pub fn from_descriptor(descriptor: NodeDescriptor) -> Self {
        let id = NodeId::next();
        match descriptor {
            NodeDescriptor::Virtual { parent, role } => Self::Virtual(VirtualFolder {
                id,
                parent,
                role,
                children: Vec::new(),
            }),
            NodeDescriptor::Store { parent, info } => Self::Store(StoreRoot {
                id,
                parent,
                info,
                children: Vec::new(),
            }),
            NodeDescriptor::Folder {
                parent,
                store,
                name,
                path,
                stat,
            } => Self::Folder(StoreFolder {
                id,
                parent,
                store,
                name,
                path,
                stat,
                children: Vec::new(),
            }),
            NodeDescriptor::File {
                parent,
                store,
                name,
                path,
                stat,
                preview,
            } => Self::File(StoreFile {
                id,
                parent,
                store,
                name,
                path,
                stat,
                preview,
            }),
            NodeDescriptor::Pending {
                parent,
                store,
                parent_path,
            } => Self::Pending(PendingFolder {
                id,
                parent,
                store,
                parent_path,
            }),
        }
    }

    /// Overwrite backend-derived fields from a descriptor of the same kind.
    ///
    /// The instance id, children, and a cached preview survive. A descriptor
    /// of a different kind is handed back untouched.
    pub(crate) fn apply_descriptor(
        &mut self,
        descriptor: NodeDescriptor,
    ) -> Result<(), NodeDescriptor> {
        match (self, descriptor) {
            (Self::Virtual(node), NodeDescriptor::Virtual { parent, role }) => {
                node.parent = parent;
                node.role = role;
            }
            (Self::Store(node), NodeDescriptor::Store { parent, info }) => {
                node.parent = parent;
                node.info = info;
            }
            (
                Self::Folder(node),
                NodeDescriptor::Folder {
                    parent,
                    store,
                    name,
                    path,
                    stat,
                },
            ) => {
                node.parent = parent;
                node.store = store;
                node.name = name;
                node.path = path;
                node.stat = stat;
            }
            (
                Self::File(node),
                NodeDescriptor::File {
                    parent,
                    store,
                    name,
                    path,
                    stat,
                    preview,
                },
            ) => {
                node.parent = parent;
                node.store = store;
                node.name = name;
                node.path = path;
                node.stat = stat;
                if preview.is_some() {
                    node.preview = preview;
                }
            }
            (
                Self::Pending(node),
                NodeDescriptor::Pending {
                    parent,
                    store,
                    parent_path,
                },
            ) => {
                node.parent = parent;
                node.store = store;
                node.parent_path = parent_path;
            }
            (_, descriptor) => return Err(descriptor),
        }
        Ok(())
    }

    /// Instance id, stable across reconciliation.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Virtual(n) => n.id,
            Self::Store(n) => n.id,
            Self::Folder(n) => n.id,
            Self::File(n) => n.id,
            Self::Pending(n) => n.id,
        }
    }

    /// Backend-qualified identity.
    pub fn identity(&self) -> Identity {
        match self {
            Self::Virtual(n) => n.role.identity(),
            Self::Store(n) => Identity::store_root(n.info.address.clone()),
            Self::Folder(StoreFolder { store, path, .. })
            | Self::File(StoreFile { store, path, .. }) => {
                Identity::entry(store.address.clone(), path.clone())
            }
            Self::Pending(n) => Identity::pending(n.store.address.clone(), n.parent_path.clone()),
        }
    }

    /// Display form of the identity.
    pub fn url(&self) -> String {
        self.identity().to_string()
    }

    /// Node kind.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Virtual(_) => NodeKind::VirtualFolder,
            Self::Store(_) => NodeKind::StoreRoot,
            Self::Folder(_) => NodeKind::StoreFolder,
            Self::File(_) => NodeKind::StoreFile,
            Self::Pending(_) => NodeKind::PendingFolder,
        }
    }

    /// Trimmed name, or a placeholder when empty.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Virtual(n) => match &n.role {
                VirtualRole::Root => "Root",
                VirtualRole::User(profile) => {
                    name_or(profile.name.as_deref().unwrap_or(""), ANONYMOUS)
                }
                VirtualRole::Network => "Network",
                VirtualRole::Trash => "Trash",
            },
            Self::Store(n) => name_or(n.info.title.as_deref().unwrap_or(""), UNTITLED),
            Self::Folder(n) => name_or(&n.name, UNTITLED),
            Self::File(n) => n.display_name(),
            Self::Pending(_) => NEW_FOLDER,
        }
    }

    /// Short type label for listings.
    pub fn type_label(&self) -> &str {
        match self {
            Self::Virtual(VirtualFolder {
                role: VirtualRole::Root,
                ..
            }) => "root folder",
            Self::Virtual(_) | Self::Folder(_) | Self::Pending(_) => "folder",
            Self::Store(n) => n.info.type_label(),
            Self::File(_) => "file",
        }
    }

    /// Size in bytes (zero for virtual and pending nodes).
    pub fn size(&self) -> u64 {
        match self {
            Self::Store(n) => n.info.size,
            Self::Folder(n) => n.stat.size,
            Self::File(n) => n.stat.size,
            Self::Virtual(_) | Self::Pending(_) => 0,
        }
    }

    /// Modification time in ms since the epoch (zero when unknown).
    pub fn modified(&self) -> u64 {
        match self {
            Self::Store(n) => n.info.modified,
            Self::Folder(n) => n.stat.modified,
            Self::File(n) => n.stat.modified,
            Self::Virtual(_) | Self::Pending(_) => 0,
        }
    }

    /// Whether the current identity may modify this node.
    pub fn is_editable(&self) -> bool {
        match self {
            Self::Virtual(_) => false,
            Self::Store(StoreRoot { info: store, .. })
            | Self::Folder(StoreFolder { store, .. })
            | Self::File(StoreFile { store, .. }) => store.is_owner,
            Self::Pending(_) => true,
        }
    }

    /// Whether this node has children.
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Whether this node carries a preview.
    pub fn has_preview(&self) -> bool {
        self.kind().has_preview()
    }

    /// Identity of the enclosing container.
    pub fn parent(&self) -> Option<&Identity> {
        match self {
            Self::Virtual(n) => n.parent.as_ref(),
            Self::Store(n) => n.parent.as_ref(),
            Self::Folder(n) => n.parent.as_ref(),
            Self::File(n) => n.parent.as_ref(),
            Self::Pending(n) => n.parent.as_ref(),
        }
    }

    /// Backing store, if any.
    pub fn store(&self) -> Option<&StoreInfo> {
        match self {
            Self::Virtual(_) => None,
            Self::Store(StoreRoot { info: store, .. })
            | Self::Folder(StoreFolder { store, .. })
            | Self::File(StoreFile { store, .. })
            | Self::Pending(PendingFolder { store, .. }) => Some(store.as_ref()),
        }
    }

    /// Path inside the store (`""` for the store root).
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Store(_) => Some(""),
            Self::Folder(n) => Some(n.path.as_str()),
            Self::File(n) => Some(n.path.as_str()),
            Self::Virtual(_) | Self::Pending(_) => None,
        }
    }

    /// Children in last reconciled order (empty for leaves and pending folders).
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Virtual(n) => n.children.as_slice(),
            Self::Store(n) => n.children.as_slice(),
            Self::Folder(n) => n.children.as_slice(),
            Self::File(_) | Self::Pending(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Virtual(n) => Some(&mut n.children),
            Self::Store(n) => Some(&mut n.children),
            Self::Folder(n) => Some(&mut n.children),
            Self::File(_) | Self::Pending(_) => None,
        }
    }

    /// Check if a container has no children.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Cached preview of a file.
    pub fn preview(&self) -> Option<&str> {
        match self {
            Self::File(n) => n.preview(),
            _ => None,
        }
    }

    /// Borrow as a virtual folder.
    pub fn as_virtual(&self) -> Option<&VirtualFolder> {
        match self {
            Self::Virtual(n) => Some(n),
            _ => None,
        }
    }

    /// Mutably borrow as a virtual folder.
    pub fn as_virtual_mut(&mut self) -> Option<&mut VirtualFolder> {
        match self {
            Self::Virtual(n) => Some(n),
            _ => None,
        }
    }

    /// Mutably borrow as a file.
    pub fn as_file_mut(&mut self) -> Option<&mut StoreFile> {
        match self {
            Self::File(n) => Some(n),
            _ => None,
        }
    }

    /// Find a node by identity in this subtree (depth first, self included).
    ///
    /// A store can sit under more than one virtual folder, so this returns
    /// the first match only. Use [`Node::find_in`] or [`Node::ids_of`] to
    /// reach the others.
    pub fn find(&self, identity: &Identity) -> Option<&Node> {
        if self.identity() == *identity {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(identity))
    }

    /// Mutable variant of [`Node::find`].
    pub fn find_mut(&mut self, identity: &Identity) -> Option<&mut Node> {
        if self.identity() == *identity {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(identity))
    }

    /// Find `identity` below the first container identified by `container`.
    pub fn find_in(&self, container: &Identity, identity: &Identity) -> Option<&Node> {
        self.find(container)?.find(identity)
    }

    /// Instance ids of every node in this subtree with `identity`.
    pub fn ids_of(&self, identity: &Identity) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.collect_ids(identity, &mut ids);
        ids
    }

    fn collect_ids(&self, identity: &Identity, ids: &mut Vec<NodeId>) {
        if self.identity() == *identity {
            ids.push(self.id());
        }
        for child in self.children() {
            child.collect_ids(identity, ids);
        }
    }

    /// Find a node by instance id in this subtree.
    pub fn find_by_id(&self, id: NodeId) -> Option<&Node> {
        if self.id() == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_id(id))
    }

    /// Mutable variant of [`Node::find_by_id`].
    pub fn find_by_id_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id() == id {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
    }

    /// Total number of nodes in this subtree, self included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(address: &str) -> Arc<StoreInfo> {
        Arc::new(StoreInfo::new(address).owned(true).saved(true))
    }

    fn file(name: &str) -> NodeDescriptor {
        NodeDescriptor::entry(None, store("dweb://s"), "", name, false, Stat::new(3, 7))
    }

    #[test]
    fn test_name_fallback() {
        let node = Node::from_descriptor(file("   "));
        assert_eq!(node.display_name(), UNTITLED);

        let node = Node::from_descriptor(file("  notes.md "));
        assert_eq!(node.display_name(), "notes.md");

        let pending = Node::from_descriptor(NodeDescriptor::Pending {
            parent: None,
            store: store("dweb://s"),
            parent_path: "".into(),
        });
        assert_eq!(pending.display_name(), NEW_FOLDER);
        assert!(pending.is_empty());
        assert!(pending.is_editable());

        let mut untitled = StoreInfo::new("dweb://t");
        untitled.title = Some(" ".into());
        let store_root = Node::from_descriptor(NodeDescriptor::Store {
            parent: None,
            info: Arc::new(untitled),
        });
        assert_eq!(store_root.display_name(), UNTITLED);

        let user = Node::from_descriptor(NodeDescriptor::Virtual {
            parent: None,
            role: VirtualRole::User(Profile {
                address: "dweb://p".into(),
                name: None,
                follows: Vec::new(),
                is_current: false,
            }),
        });
        assert_eq!(user.display_name(), ANONYMOUS);
    }

    #[test]
    fn test_entry_descriptor_paths() {
        let desc = NodeDescriptor::entry(
            None,
            store("dweb://s"),
            "/docs",
            "a.txt",
            false,
            Stat::default(),
        );
        assert_eq!(desc.identity(), Identity::entry("dweb://s".into(), "/docs/a.txt"));
        assert_eq!(desc.kind(), NodeKind::StoreFile);

        let node = Node::from_descriptor(desc);
        assert_eq!(node.path(), Some("/docs/a.txt"));
        assert_eq!(node.url(), "dweb://s/docs/a.txt");
    }

    #[test]
    fn test_metadata_for_virtual_and_pending() {
        let root = Node::from_descriptor(NodeDescriptor::Virtual {
            parent: None,
            role: VirtualRole::Root,
        });
        assert_eq!(root.size(), 0);
        assert_eq!(root.modified(), 0);
        assert!(!root.is_editable());
        assert_eq!(root.type_label(), "root folder");
        assert_eq!(root.url(), "virtual://root");
    }

    #[test]
    fn test_apply_descriptor_keeps_preview() {
        let mut node = Node::from_descriptor(file("a.txt"));
        let id = node.id();
        if let Node::File(f) = &mut node {
            f.preview = Some("cached".into());
        }

        node.apply_descriptor(NodeDescriptor::entry(
            None,
            store("dweb://s"),
            "",
            "a.txt",
            false,
            Stat::new(99, 100),
        ))
        .unwrap();

        assert_eq!(node.id(), id);
        assert_eq!(node.size(), 99);
        assert_eq!(node.preview(), Some("cached"));
    }

    #[test]
    fn test_apply_descriptor_replaces_preview_when_supplied() {
        let mut node = Node::from_descriptor(file("a.txt"));
        if let Node::File(f) = &mut node {
            f.preview = Some("old".into());
        }
        let replacement = NodeDescriptor::File {
            parent: None,
            store: store("dweb://s"),
            name: "a.txt".into(),
            path: "/a.txt".into(),
            stat: Stat::default(),
            preview: Some("new".into()),
        };
        node.apply_descriptor(replacement).unwrap();
        assert_eq!(node.preview(), Some("new"));
    }

    #[test]
    fn test_apply_descriptor_rejects_kind_change() {
        let mut node = Node::from_descriptor(file("thing"));
        let folder =
            NodeDescriptor::entry(None, store("dweb://s"), "", "thing", true, Stat::default());
        assert!(node.apply_descriptor(folder).is_err());
        assert_eq!(node.kind(), NodeKind::StoreFile);
    }
}
