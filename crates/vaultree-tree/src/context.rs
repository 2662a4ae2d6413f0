//! Collaborators and settings shared by every node operation.

use std::sync::Arc;

use vaultree_backend::{Directory, StoreBackend};
use vaultree_core::{TextualExtensions, TreeConfig};

/// Injected collaborators plus configuration.
///
/// Cloning is cheap: collaborators and the extension set are shared.
#[derive(Clone)]
pub struct TreeContext {
    backend: Arc<dyn StoreBackend>,
    directory: Arc<dyn Directory>,
    textual: Arc<TextualExtensions>,
    config: TreeConfig,
}

impl TreeContext {
    /// Create a context with the default configuration.
    pub fn new(backend: Arc<dyn StoreBackend>, directory: Arc<dyn Directory>) -> Self {
        Self::with_config(backend, directory, TreeConfig::default())
    }

    /// Create a context with a specific configuration.
    pub fn with_config(
        backend: Arc<dyn StoreBackend>,
        directory: Arc<dyn Directory>,
        config: TreeConfig,
    ) -> Self {
        let textual = Arc::new(TextualExtensions::with_extra(
            &config.extra_textual_extensions,
        ));
        Self {
            backend,
            directory,
            textual,
            config,
        }
    }

    /// The store backend.
    pub fn backend(&self) -> &dyn StoreBackend {
        self.backend.as_ref()
    }

    /// The profile and store directory.
    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    /// Extensions whose files get a text preview.
    pub fn textual(&self) -> &TextualExtensions {
        &self.textual
    }

    /// Active configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }
}

impl std::fmt::Debug for TreeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
