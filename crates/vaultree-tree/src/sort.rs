//! Ordering nodes for display.

use std::cmp::Ordering;

use vaultree_core::{SortColumn, SortDirection};

use crate::node::Node;

/// Compare two nodes by a column in a direction.
pub fn compare(a: &Node, b: &Node, column: SortColumn, direction: SortDirection) -> Ordering {
    let ordering = match column {
        SortColumn::Name => compare_names(a.display_name(), b.display_name()),
        SortColumn::Size => a.size().cmp(&b.size()),
        SortColumn::Modified => a.modified().cmp(&b.modified()),
        SortColumn::Type => a.type_label().cmp(b.type_label()),
    };
    direction.apply(ordering)
}

/// Case-insensitive, ties broken by the raw name.
fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Containers before leaves, regardless of column or direction.
fn containers_first(a: &Node, b: &Node) -> Ordering {
    b.is_container().cmp(&a.is_container())
}

/// How a container orders its own children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Keep fetch/assembly order.
    Preserve,
    /// Sort by column with containers grouped above leaves.
    ContainersFirst,
}

impl Node {
    /// How this node orders its direct children.
    pub fn sort_policy(&self) -> SortPolicy {
        match self {
            Node::Store(_) | Node::Folder(_) => SortPolicy::ContainersFirst,
            Node::Virtual(_) | Node::File(_) | Node::Pending(_) => SortPolicy::Preserve,
        }
    }

    /// Sort this subtree: every child container first, then the direct children.
    ///
    /// Virtual folders keep their own order but still sort below.
    pub fn sort(&mut self, column: SortColumn, direction: SortDirection) {
        let policy = self.sort_policy();
        let Some(children) = self.children_mut() else {
            return;
        };
        for child in children.iter_mut() {
            child.sort(column, direction);
        }
        if policy == SortPolicy::ContainersFirst {
            children.sort_by(|a, b| {
                containers_first(a, b).then_with(|| compare(a, b, column, direction))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vaultree_core::StoreInfo;

    use super::*;
    use crate::node::{NodeDescriptor, Stat};

    fn node(name: &str, is_container: bool, size: u64, modified: u64) -> Node {
        let store = Arc::new(StoreInfo::new("dweb://s"));
        Node::from_descriptor(NodeDescriptor::entry(
            None,
            store,
            "",
            name,
            is_container,
            Stat::new(size, modified),
        ))
    }

    #[test]
    fn test_compare_name_case_insensitive() {
        let a = node("apple", false, 0, 0);
        let b = node("Banana", false, 0, 0);
        assert_eq!(compare(&a, &b, SortColumn::Name, SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&a, &b, SortColumn::Name, SortDirection::Desc), Ordering::Greater);
    }

    #[test]
    fn test_compare_size_and_modified() {
        let small = node("a", false, 1, 20);
        let big = node("b", false, 10, 10);
        assert_eq!(compare(&small, &big, SortColumn::Size, SortDirection::Asc), Ordering::Less);
        assert_eq!(
            compare(&small, &big, SortColumn::Modified, SortDirection::Asc),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sort_groups_containers_first() {
        let store = Arc::new(StoreInfo::new("dweb://s"));
        let mut root = Node::from_descriptor(NodeDescriptor::Store { parent: None, info: store });
        if let Some(children) = root.children_mut() {
            children.push(node("b.txt", false, 5, 0));
            children.push(node("zeta", true, 0, 0));
            children.push(node("a.txt", false, 50, 0));
            children.push(node("alpha", true, 0, 0));
        }

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            for column in [SortColumn::Name, SortColumn::Size, SortColumn::Type] {
                root.sort(column, direction);
                let kinds: Vec<bool> = root.children().iter().map(Node::is_container).collect();
                assert_eq!(kinds, vec![true, true, false, false], "{column} {direction}");
            }
        }

        root.sort(SortColumn::Name, SortDirection::Desc);
        let names: Vec<_> = root.children().iter().map(Node::display_name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "b.txt", "a.txt"]);
    }
}
