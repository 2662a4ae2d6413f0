//! Merging a fresh listing into an existing child sequence.

use std::collections::HashMap;

use vaultree_core::Identity;

use crate::node::{Node, NodeDescriptor};

/// Reconcile `old` children against freshly fetched descriptors.
///
/// The result follows descriptor order. A node whose identity and kind
/// still appear is moved into the result and updated in place, so its
/// [`NodeId`](vaultree_core::NodeId) and cached preview survive. Nodes whose
/// identity is gone are dropped. When the listing repeats an identity, only
/// its last descriptor is kept, so the result never holds two nodes with the
/// same identity.
pub fn reconcile(old: Vec<Node>, fresh: Vec<NodeDescriptor>) -> Vec<Node> {
    let fresh = keep_last_of_each(fresh);
    let mut existing: HashMap<Identity, Node> = old
        .into_iter()
        .map(|node| (node.identity(), node))
        .collect();

    let mut reused = 0usize;
    let merged: Vec<Node> = fresh
        .into_iter()
        .map(|descriptor| match existing.remove(&descriptor.identity()) {
            Some(mut node) => match node.apply_descriptor(descriptor) {
                Ok(()) => {
                    reused += 1;
                    node
                }
                Err(descriptor) => Node::from_descriptor(descriptor),
            },
            None => Node::from_descriptor(descriptor),
        })
        .collect();

    tracing::debug!(
        reused,
        created = merged.len() - reused,
        dropped = existing.len(),
        "reconciled children"
    );
    merged
}

fn keep_last_of_each(fresh: Vec<NodeDescriptor>) -> Vec<NodeDescriptor> {
    let last: HashMap<Identity, usize> = fresh
        .iter()
        .enumerate()
        .map(|(index, descriptor)| (descriptor.identity(), index))
        .collect();
    if last.len() == fresh.len() {
        return fresh;
    }

    tracing::warn!(
        repeated = fresh.len() - last.len(),
        "listing repeats identities, keeping the last of each"
    );
    fresh
        .into_iter()
        .enumerate()
        .filter(|(index, descriptor)| last.get(&descriptor.identity()) == Some(index))
        .map(|(_, descriptor)| descriptor)
        .collect()
}
