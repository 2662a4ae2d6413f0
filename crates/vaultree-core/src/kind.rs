//! Node kinds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKind {
    /// Locally assembled folder with no backend (root, network, trash, per-identity).
    VirtualFolder,
    /// The root of a backend store.
    StoreRoot,
    /// A directory inside a store.
    StoreFolder,
    /// A file inside a store.
    StoreFile,
    /// A folder the user intends to create that does not exist yet.
    PendingFolder,
}

impl NodeKind {
    /// Check if nodes of this kind have children.
    pub fn is_container(self) -> bool {
        !matches!(self, Self::StoreFile)
    }

    /// Check if nodes of this kind live inside a backend store.
    pub fn is_backed(self) -> bool {
        !matches!(self, Self::VirtualFolder)
    }

    /// Check if nodes of this kind carry a text preview.
    pub fn has_preview(self) -> bool {
        matches!(self, Self::StoreFile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_files_are_leaves() {
        let leaves: Vec<_> = NodeKind::iter().filter(|k| !k.is_container()).collect();
        assert_eq!(leaves, vec![NodeKind::StoreFile]);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeKind::PendingFolder.to_string(), "pending-folder");
        assert_eq!(NodeKind::StoreRoot.to_string(), "store-root");
    }
}
