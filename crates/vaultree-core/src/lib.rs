//! Core types and traits for vaultree.
//!
//! This crate provides the fundamental data structures shared by the
//! vaultree crates: identities, store and profile descriptors, node kinds,
//! sort keys, configuration, errors, and the textual-extension classifier.

mod config;
mod error;
mod identity;
mod kind;
mod name;
mod sort;
mod store;
mod textual;

pub use config::{CrossStoreMovePolicy, TreeConfig, TreeConfigBuilder};
pub use error::{BackendError, BackendResult, TreeError, TreeResult};
pub use identity::{Identity, NodeId, StoreAddress, join_path, sibling_path};
pub use kind::NodeKind;
pub use name::validate_name;
pub use sort::{SortColumn, SortDirection};
pub use store::{EntryInfo, Profile, STANDARD_STORE_TYPES, StoreInfo};
pub use textual::{STORE_IGNORE_EXTENSION, TextualExtensions};
