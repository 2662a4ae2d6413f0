//! Reconciled node tree for vaultree.
//!
//! Containers refresh by fetching a fresh listing and reconciling it
//! against their current children: any node whose identity survives keeps
//! its instance, so ids, cached previews, and loaded subtrees stay put
//! across refreshes. Sorting and lifecycle operations build on that tree.

mod context;
mod lifecycle;
mod node;
mod reconcile;
mod refresh;
mod snapshot;
mod sort;
mod vfs;

pub use context::TreeContext;
pub use lifecycle::{Transfer, truncate_preview};
pub use node::{
    Node, NodeDescriptor, PendingFolder, Stat, StoreFile, StoreFolder, StoreRoot, VirtualFolder,
    VirtualRole,
};
pub use reconcile::reconcile;
pub use snapshot::NodeSnapshot;
pub use sort::{SortPolicy, compare};
pub use vfs::Vfs;
