//! The session's tree, rooted at a virtual folder.

use vaultree_core::{
    Identity, NodeId, NodeKind, SortColumn, SortDirection, StoreInfo, TreeError, TreeResult,
};

use crate::context::TreeContext;
use crate::node::{Node, NodeDescriptor, VirtualFolder, VirtualRole};
use crate::snapshot::NodeSnapshot;

/// Owns the root node and the collaborators every operation needs.
#[derive(Debug)]
pub struct Vfs {
    root: Node,
    ctx: TreeContext,
}

impl Vfs {
    /// Create an unpopulated tree. Call [`Vfs::refresh_root`] to assemble it.
    pub fn new(ctx: TreeContext) -> Self {
        let root = Node::from_descriptor(NodeDescriptor::Virtual {
            parent: None,
            role: VirtualRole::Root,
        });
        Self { root, ctx }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn context(&self) -> &TreeContext {
        &self.ctx
    }

    /// Rebuild the root's children from the directory.
    pub async fn refresh_root(&mut self) -> TreeResult<()> {
        self.root.refresh_children(&self.ctx).await
    }

    /// Refresh the children of every node with `identity`.
    ///
    /// A store shown under both Network and its author's folder is refreshed
    /// in both places. Returns how many nodes were refreshed, zero when the
    /// identity is not in the tree. Stops at the first failure.
    pub async fn refresh(&mut self, identity: &Identity) -> TreeResult<usize> {
        let ids = self.root.ids_of(identity);
        let mut refreshed = 0;
        for id in ids {
            if self.refresh_node(id).await? {
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }

    /// Refresh the children of one node instance.
    ///
    /// Returns `false` when the instance is no longer in the tree.
    pub async fn refresh_node(&mut self, id: NodeId) -> TreeResult<bool> {
        let Some(node) = self.root.find_by_id_mut(id) else {
            return Ok(false);
        };
        node.refresh_children(&self.ctx).await?;
        Ok(true)
    }

    /// Refresh from the root down to `depth` levels.
    pub async fn refresh_to_depth(&mut self, depth: usize, previews: bool) -> TreeResult<()> {
        self.root.refresh_to_depth(&self.ctx, depth, previews).await
    }

    /// First node with `identity`, depth first. See [`Node::find`].
    pub fn find(&self, identity: &Identity) -> Option<&Node> {
        self.root.find(identity)
    }

    /// Node with `identity` below the container identified by `container`.
    pub fn find_in(&self, container: &Identity, identity: &Identity) -> Option<&Node> {
        self.root.find_in(container, identity)
    }

    pub fn find_mut(&mut self, identity: &Identity) -> Option<&mut Node> {
        self.root.find_mut(identity)
    }

    /// Look up a node instance by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.root.find_by_id(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.root.find_by_id_mut(id)
    }

    /// The network folder, once the root has been assembled.
    pub fn network_mut(&mut self) -> Option<&mut VirtualFolder> {
        self.root
            .find_mut(&Identity::virtual_folder("network"))
            .and_then(Node::as_virtual_mut)
    }

    /// Insert a newly discovered store into the network folder.
    pub fn add_network_store(&mut self, info: StoreInfo) -> TreeResult<bool> {
        let network = self
            .network_mut()
            .ok_or_else(|| TreeError::unsupported("add a store to", NodeKind::VirtualFolder))?;
        network.add_store(info)
    }

    /// Sort the whole tree.
    pub fn sort(&mut self, column: SortColumn, direction: SortDirection) {
        self.root.sort(column, direction);
    }

    /// Sort by the configured column and direction.
    pub fn sort_default(&mut self) {
        let (column, direction) = (self.ctx.config().sort_column, self.ctx.config().sort_direction);
        self.root.sort(column, direction);
    }

    /// Serializable view of the whole tree.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::from(&self.root)
    }
}
