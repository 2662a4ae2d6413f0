//! vaultree - browse a reconciled tree of vault stores.
//!
//! Usage:
//!   vaultree tree            Print the tree
//!   vaultree json            Print the tree as a JSON snapshot
//!   vaultree --help          Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use itertools::Itertools;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use vaultree_backend::Fixture;
use vaultree_core::{NodeKind, SortColumn, SortDirection, TreeConfig};
use vaultree_tree::{Node, TreeContext, Vfs};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "VAULTREE_LOG";

#[derive(Parser)]
#[command(
    name = "vaultree",
    version,
    about = "A stable, reconciled tree over vault stores",
    long_about = "vaultree assembles your own, followed, network, and trashed stores \
                  into a single tree.\n\n\
                  Stores are loaded from a JSON fixture into an in-memory backend."
)]
struct Cli {
    /// JSON fixture describing profiles and stores
    #[arg(short, long, global = true, default_value = "demos/fixture.json")]
    fixture: PathBuf,

    /// TOML tree configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree
    Tree {
        #[command(flatten)]
        view: ViewArgs,

        /// Show loaded previews under each file
        #[arg(short, long)]
        show_previews: bool,
    },

    /// Print the tree as a JSON snapshot
    Json {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Levels to refresh below the root
    #[arg(short, long, default_value = "4")]
    depth: usize,

    #[arg(long, help = sort_help())]
    sort: Option<SortColumn>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Load previews for files within reach
    #[arg(short, long)]
    previews: bool,
}

fn sort_help() -> String {
    format!(
        "Sort column, one of: {} (defaults to the configured one)",
        SortColumn::iter().join(", ")
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Tree {
            view,
            show_previews,
        } => {
            let vfs = build_tree(&cli.fixture, config, &view).await?;
            run_tree(&vfs, show_previews);
        }
        Command::Json { view, output } => {
            let vfs = build_tree(&cli.fixture, config, &view).await?;
            run_json(&vfs, output)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read and validate a TOML config, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<TreeConfig> {
    let Some(path) = path else {
        return Ok(TreeConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: TreeConfig =
        toml::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .map_err(|reason| eyre!("Invalid config {}: {reason}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

/// Load the fixture, assemble the tree, refresh and sort it.
async fn build_tree(fixture: &Path, config: TreeConfig, view: &ViewArgs) -> Result<Vfs> {
    let (backend, directory) = Fixture::load(fixture)
        .context("Failed to load fixture")?
        .build()
        .context("Failed to populate stores")?;

    let column = view.sort.unwrap_or(config.sort_column);
    let direction = if view.desc {
        SortDirection::Desc
    } else {
        config.sort_direction
    };

    let ctx = TreeContext::with_config(Arc::new(backend), Arc::new(directory), config);
    let mut vfs = Vfs::new(ctx);
    vfs.refresh_to_depth(view.depth, view.previews)
        .await
        .context("Refresh failed")?;
    vfs.sort(column, direction);
    tracing::debug!(
        nodes = vfs.root().subtree_len(),
        "tree ready, sorted by {column} {direction}"
    );
    Ok(vfs)
}

/// Print the tree with a per-kind summary.
fn run_tree(vfs: &Vfs, show_previews: bool) {
    print_node(vfs.root(), 0, show_previews);

    let mut kinds = Vec::new();
    collect_kinds(vfs.root(), &mut kinds);
    let summary = kinds
        .into_iter()
        .counts()
        .into_iter()
        .sorted_by_key(|(kind, _)| kind.to_string())
        .map(|(kind, count)| format!("{count} {kind}"))
        .join(", ");

    println!();
    println!("{}", "─".repeat(60));
    println!(" {} nodes: {summary}", vfs.root().subtree_len());
}

/// Write the JSON snapshot.
fn run_json(vfs: &Vfs, output: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(&vfs.snapshot())?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

fn collect_kinds(node: &Node, kinds: &mut Vec<NodeKind>) {
    kinds.push(node.kind());
    for child in node.children() {
        collect_kinds(child, kinds);
    }
}

/// Print a node and its loaded children.
fn print_node(node: &Node, depth: usize, show_previews: bool) {
    let indent = "  ".repeat(depth);
    let marker = if node.is_container() { "▼ " } else { "  " };
    let size = match node.kind() {
        NodeKind::StoreRoot | NodeKind::StoreFolder | NodeKind::StoreFile => {
            format_size(node.size())
        }
        _ => String::new(),
    };
    let editable = if node.is_editable() { "" } else { " (read-only)" };

    println!(
        "{}{}{:<40} {:>10}  {}{}",
        indent,
        marker,
        truncate(node.display_name(), 40),
        size,
        node.type_label(),
        editable
    );

    if show_previews {
        if let Some(preview) = node.preview() {
            for line in preview.lines().take(3) {
                println!("{indent}    │ {line}");
            }
        }
    }

    for child in node.children() {
        print_node(child, depth + 1, show_previews);
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
