//! Serializable view of a subtree.

use serde::{Deserialize, Serialize};
use vaultree_core::{NodeId, NodeKind};

use crate::node::Node;

/// Plain-data copy of a node and its loaded descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub url: String,
    pub name: String,
    pub kind: NodeKind,
    pub type_label: String,
    pub size: u64,
    pub modified: u64,
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id(),
            url: node.url(),
            name: node.display_name().to_string(),
            kind: node.kind(),
            type_label: node.type_label().to_string(),
            size: node.size(),
            modified: node.modified(),
            editable: node.is_editable(),
            preview: node.preview().map(str::to_string),
            children: node.children().iter().map(NodeSnapshot::from).collect(),
        }
    }
}

impl NodeSnapshot {
    /// Number of nodes in this snapshot, self included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(NodeSnapshot::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use vaultree_core::Identity;

    use super::*;
    use crate::node::{NodeDescriptor, VirtualRole};

    #[test]
    fn test_snapshot_serializes() {
        let root = Node::from_descriptor(NodeDescriptor::Virtual {
            parent: None,
            role: VirtualRole::Root,
        });
        let snapshot = NodeSnapshot::from(&root);
        assert_eq!(snapshot.node_count(), 1);
        assert_eq!(snapshot.url, Identity::virtual_folder("root").to_string());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["kind"], "virtual-folder");
        assert_eq!(json["type_label"], "root folder");
        assert!(json.get("children").is_none());
        assert!(json.get("preview").is_none());
    }
}
