//! Node identities and store addresses.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a node instance.
///
/// Two node values with the same `NodeId` are the same logical instance:
/// reconciliation carries the id along when it reuses a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Address of a backend store (its URL).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreAddress(CompactString);

impl StoreAddress {
    /// Create a store address.
    pub fn new(address: impl Into<CompactString>) -> Self {
        Self(address.into())
    }

    /// Get the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Stable, backend-qualified address of a node.
///
/// This is the reconciliation key: it is never reused for a different
/// logical resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// A folder assembled locally with no backend (`virtual://<name>`).
    Virtual(CompactString),
    /// A path inside a store. The store root has an empty path.
    Store {
        store: StoreAddress,
        path: CompactString,
    },
    /// A folder that has not been created yet, keyed by its future parent.
    Pending {
        store: StoreAddress,
        parent_path: CompactString,
    },
}

impl Identity {
    /// Identity of a virtual folder.
    pub fn virtual_folder(name: impl Into<CompactString>) -> Self {
        Self::Virtual(name.into())
    }

    /// Identity of a store's root.
    pub fn store_root(store: StoreAddress) -> Self {
        Self::Store {
            store,
            path: CompactString::default(),
        }
    }

    /// Identity of a path inside a store.
    pub fn entry(store: StoreAddress, path: impl Into<CompactString>) -> Self {
        Self::Store {
            store,
            path: path.into(),
        }
    }

    /// Identity of a pending folder under `parent_path`.
    pub fn pending(store: StoreAddress, parent_path: impl Into<CompactString>) -> Self {
        Self::Pending {
            store,
            parent_path: parent_path.into(),
        }
    }

    /// The backing store, if any.
    pub fn store(&self) -> Option<&StoreAddress> {
        match self {
            Self::Virtual(_) => None,
            Self::Store { store, .. } | Self::Pending { store, .. } => Some(store),
        }
    }

    /// Check if this identity names something inside a store.
    pub fn is_backed(&self) -> bool {
        !matches!(self, Self::Virtual(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Virtual(name) => write!(f, "virtual://{name}"),
            Self::Store { store, path } => write!(f, "{store}{path}"),
            Self::Pending { store, parent_path } => write!(f, "{store}{parent_path}#new-folder"),
        }
    }
}

/// Join a child name onto a store path.
///
/// Store paths start with `/`; the store root is the empty path.
pub fn join_path(parent: &str, name: &str) -> CompactString {
    format_compact!("{parent}/{name}")
}

/// Replace the final segment of `path` with `new_name`.
pub fn sibling_path(path: &str, new_name: &str) -> CompactString {
    let parent = match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    };
    join_path(parent, new_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_next_is_unique() {
        let a = NodeId::next();
        let b = NodeId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_display() {
        let store = StoreAddress::new("dweb://abc");
        assert_eq!(Identity::virtual_folder("root").to_string(), "virtual://root");
        assert_eq!(Identity::store_root(store.clone()).to_string(), "dweb://abc");
        assert_eq!(
            Identity::entry(store.clone(), "/docs/a.txt").to_string(),
            "dweb://abc/docs/a.txt"
        );
        assert_ne!(
            Identity::pending(store.clone(), "/docs"),
            Identity::entry(store, "/docs")
        );
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(sibling_path("/docs/a.txt", "b.txt"), "/docs/b.txt");
        assert_eq!(sibling_path("/a.txt", "b.txt"), "/b.txt");
        assert_eq!(join_path("", "docs"), "/docs");
    }
}
