//! Collaborator interfaces for vaultree.
//!
//! The tree never talks to a store or a profile directory directly: it goes
//! through the [`StoreBackend`] and [`Directory`] traits defined here. Both
//! traits return boxed `Send` futures so they stay object safe and can be
//! shared as `Arc<dyn ...>`.
//!
//! An in-memory implementation ([`MemoryBackend`], [`MemoryDirectory`]) is
//! included for tests and for the CLI, and can be populated from a JSON
//! [`Fixture`].

mod adapter;
mod directory;
mod fixture;
mod memory;

pub use adapter::{
    BoxFuture, Directory, ExportReport, ExportRequest, ResourceData, ResourceEncoding,
    StoreBackend, StoreFilter,
};
pub use directory::MemoryDirectory;
pub use fixture::{Fixture, FixtureError, FixtureStore};
pub use memory::{MemoryBackend, MemoryEntry};
