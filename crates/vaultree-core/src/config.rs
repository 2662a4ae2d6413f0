//! Tree configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::sort::{SortColumn, SortDirection};

/// What a cross-store move does when the export skipped unreplicated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CrossStoreMovePolicy {
    /// Leave the source in place and report the skipped entries.
    #[default]
    KeepSourceOnSkip,
    /// Delete the whole source even if some entries were not exported.
    BestEffort,
}

/// Configuration for tree refresh and node operations.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TreeConfig {
    /// Maximum preview length in characters (None = unbounded).
    #[builder(default = "Some(500)")]
    #[serde(default = "default_max_preview_length")]
    pub max_preview_length: Option<usize>,

    /// Default sort column.
    #[builder(default)]
    #[serde(default)]
    pub sort_column: SortColumn,

    /// Default sort direction.
    #[builder(default)]
    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Policy for cross-store moves that only partially exported.
    #[builder(default)]
    #[serde(default)]
    pub cross_store_move: CrossStoreMovePolicy,

    /// Extensions treated as textual in addition to the built-in set.
    #[builder(default)]
    #[serde(default)]
    pub extra_textual_extensions: Vec<String>,
}

fn default_max_preview_length() -> Option<usize> {
    Some(500)
}

/// Below this a truncated preview would be nothing but the ellipsis.
const MIN_PREVIEW_LENGTH: usize = 4;

impl TreeConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(Some(len)) = self.max_preview_length {
            if len < MIN_PREVIEW_LENGTH {
                return Err(format!(
                    "max_preview_length must be at least {MIN_PREVIEW_LENGTH}"
                ));
            }
        }
        Ok(())
    }
}

impl TreeConfig {
    /// Create a new config builder.
    pub fn builder() -> TreeConfigBuilder {
        TreeConfigBuilder::default()
    }

    /// Check a deserialized config against the builder's rules.
    pub fn validate(&self) -> Result<(), String> {
        match self.max_preview_length {
            Some(len) if len < MIN_PREVIEW_LENGTH => Err(format!(
                "max_preview_length must be at least {MIN_PREVIEW_LENGTH}"
            )),
            _ => Ok(()),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_preview_length: default_max_preview_length(),
            sort_column: SortColumn::default(),
            sort_direction: SortDirection::default(),
            cross_store_move: CrossStoreMovePolicy::default(),
            extra_textual_extensions: Vec::new(),
        }
    }
}
