//! Lifecycle operations that delegate to the store backend.
//!
//! None of these touch a container's children: refresh the affected
//! container afterwards to pick up the change.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use vaultree_backend::{ExportReport, ExportRequest, ResourceEncoding};
use vaultree_core::{
    CrossStoreMovePolicy, StoreAddress, TreeError, TreeResult, join_path, sibling_path,
    validate_name,
};

use crate::context::TreeContext;
use crate::node::{Node, StoreFile};

const ELLIPSIS: &str = "...";

/// Outcome of a copy or move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transfer {
    /// Source and destination share a store.
    InStore,
    /// Content was exported to another store.
    Exported(ExportReport),
}

impl Transfer {
    /// Source paths left behind because they were not replicated.
    pub fn skipped(&self) -> &[CompactString] {
        match self {
            Self::InStore => &[],
            Self::Exported(report) => &report.skipped,
        }
    }
}

/// Bound a preview to `max_length` characters, ending in an ellipsis when cut.
///
/// A bound too small to hold the ellipsis cuts the text without one. The
/// result never exceeds `max_length` characters.
pub fn truncate_preview(text: String, max_length: Option<usize>) -> String {
    match max_length {
        Some(max) if text.chars().count() > max => {
            if max <= ELLIPSIS.len() {
                return text.chars().take(max).collect();
            }
            let mut preview: String = text.chars().take(max - ELLIPSIS.len()).collect();
            preview.push_str(ELLIPSIS);
            preview
        }
        _ => text,
    }
}

impl StoreFile {
    /// Load and cache a text preview.
    ///
    /// Does nothing once a preview is cached or when the extension is not
    /// textual. Read failures are logged and leave the preview unset, so a
    /// later call retries.
    pub async fn load_preview(&mut self, ctx: &TreeContext, max_length: Option<usize>) {
        if self.preview.is_some() || !ctx.textual().should_preview(self.display_name()) {
            return;
        }

        let result = ctx
            .backend()
            .read_resource(&self.store.address, &self.path, ResourceEncoding::Utf8)
            .await;
        match result {
            Ok(data) => self.preview = Some(truncate_preview(data.into_text(), max_length)),
            Err(err) => {
                tracing::warn!(
                    store = %self.store.address,
                    path = %self.path,
                    "Failed to load preview: {err}"
                );
            }
        }
    }
}

fn check_name(name: &str) -> TreeResult<()> {
    validate_name(name).map_err(|reason| TreeError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

fn export_request(
    source_store: &StoreAddress,
    source_path: &str,
    destination_store: &StoreAddress,
    destination_path: &str,
) -> ExportRequest {
    ExportRequest {
        source_store: source_store.clone(),
        source_path: source_path.into(),
        destination_store: destination_store.clone(),
        destination_path: destination_path.into(),
        skip_unreplicated: true,
    }
}

impl Node {
    /// Rename in place, keeping the parent path.
    ///
    /// For a pending folder this creates the folder under the given name.
    pub async fn rename(&self, ctx: &TreeContext, new_name: &str) -> TreeResult<()> {
        let (store, path) = match self {
            Node::Folder(n) => (&n.store, &n.path),
            Node::File(n) => (&n.store, &n.path),
            Node::Pending(n) => {
                check_name(new_name)?;
                let path = join_path(&n.parent_path, new_name);
                tracing::debug!("creating folder {}{path}", n.store.address);
                ctx.backend().create_container(&n.store.address, &path).await?;
                return Ok(());
            }
            other => return Err(TreeError::unsupported("rename", other.kind())),
        };

        check_name(new_name)?;
        let new_path = sibling_path(path, new_name);
        tracing::debug!("renaming {}{path} -> {new_path}", store.address);
        ctx.backend()
            .rename(&store.address, path, &new_path)
            .await?;
        Ok(())
    }

    /// Copy to `destination_path` in `destination_store`.
    ///
    /// Across stores this is a best-effort export: unreplicated entries are
    /// skipped and reported, not treated as failure.
    pub async fn copy(
        &self,
        ctx: &TreeContext,
        destination_path: &str,
        destination_store: &StoreAddress,
    ) -> TreeResult<Transfer> {
        let (store, path) = match self {
            Node::Store(n) => (&n.info, ""),
            Node::Folder(n) => (&n.store, n.path.as_str()),
            Node::File(n) => (&n.store, n.path.as_str()),
            other => return Err(TreeError::unsupported("copy", other.kind())),
        };

        if store.address == *destination_store {
            let source = if path.is_empty() { "/" } else { path };
            ctx.backend()
                .copy(&store.address, source, destination_path)
                .await?;
            return Ok(Transfer::InStore);
        }

        let request = export_request(&store.address, path, destination_store, destination_path);
        let report = ctx.backend().export_across_stores(request).await?;
        Ok(Transfer::Exported(report))
    }

    /// Move to `destination_path` in `destination_store`.
    ///
    /// Within a store this is a rename. Across stores the content is
    /// exported and the source deleted; what happens when the export skipped
    /// entries is governed by [`CrossStoreMovePolicy`].
    pub async fn move_to(
        &self,
        ctx: &TreeContext,
        destination_path: &str,
        destination_store: &StoreAddress,
    ) -> TreeResult<Transfer> {
        let (store, path) = match self {
            Node::Folder(n) => (&n.store, n.path.as_str()),
            Node::File(n) => (&n.store, n.path.as_str()),
            other => return Err(TreeError::unsupported("move", other.kind())),
        };

        if store.address == *destination_store {
            ctx.backend()
                .rename(&store.address, path, destination_path)
                .await?;
            return Ok(Transfer::InStore);
        }

        let request = export_request(&store.address, path, destination_store, destination_path);
        let report = ctx.backend().export_across_stores(request).await?;

        if !report.is_complete() {
            match ctx.config().cross_store_move {
                CrossStoreMovePolicy::KeepSourceOnSkip => {
                    return Err(TreeError::IncompleteTransfer {
                        identity: self.identity(),
                        skipped: report.skipped.len(),
                    });
                }
                CrossStoreMovePolicy::BestEffort => {
                    tracing::warn!(
                        skipped = report.skipped.len(),
                        "Deleting {} after partial export",
                        self.identity()
                    );
                }
            }
        }

        self.delete(ctx).await?;
        Ok(Transfer::Exported(report))
    }

    /// Remove from the backend.
    ///
    /// Folders are removed recursively; a store root removes the whole store.
    pub async fn delete(&self, ctx: &TreeContext) -> TreeResult<()> {
        let backend = ctx.backend();
        match self {
            Node::Store(n) => backend.remove_store(&n.info.address).await?,
            Node::Folder(n) => {
                backend
                    .remove_container(&n.store.address, &n.path, true)
                    .await?
            }
            Node::File(n) => backend.remove_resource(&n.store.address, &n.path).await?,
            other => return Err(TreeError::unsupported("delete", other.kind())),
        }
        tracing::debug!("deleted {}", self.identity());
        Ok(())
    }
}
