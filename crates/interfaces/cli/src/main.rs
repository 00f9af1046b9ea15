mod watch;
mod wizard;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use notekeeper_config::{AppConfig, default_config_path};
use notekeeper_runtime::{LocalFiles, Templates, render_tree};
use notekeeper_store::{BaseFile, RecordStore};
use notekeeper_tree::{TreeItem, TreeOptions, build_tree};

#[derive(Debug, Parser)]
#[command(
    name = "notekeeper",
    version,
    about = "Plain-text notes driven from a single interface file"
)]
struct Cli {
    /// Config file to use instead of `$NOTEKEEPER_HOME/config.json`.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the interface, open the editor and react to every save.
    Run {
        /// Do not launch the editor.
        #[arg(long)]
        no_editor: bool,
    },
    /// Create or rewrite the config file.
    Init {
        /// Keep every default instead of asking.
        #[arg(long)]
        yes: bool,
    },
    /// Print the tree of the base.
    Tree {
        #[arg(value_name = "ROOT")]
        root: Option<String>,
    },
    /// Compile the templates and parse the base.
    Check,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(default_config_path);

    match cli.command.unwrap_or(Commands::Run { no_editor: false }) {
        Commands::Init { yes } => {
            wizard::init_config(&config_path, yes)?;
            println!("config written to {}", config_path.display());
        }
        Commands::Run { no_editor } => {
            let (config, _guard) = prepare(&config_path)?;
            watch::run(config, !no_editor)?;
        }
        Commands::Tree { root } => {
            let (config, _guard) = prepare(&config_path)?;
            print_tree(&config, root.as_deref())?;
        }
        Commands::Check => {
            let (config, _guard) = prepare(&config_path)?;
            check(&config)?;
        }
    }
    Ok(())
}

fn prepare(config_path: &Path) -> Result<(AppConfig, Option<WorkerGuard>)> {
    let config = wizard::load_or_create(config_path)?;
    let guard = init_tracing(&config)?;
    tracing::debug!(config = %config_path.display(), "config loaded");
    Ok((config, guard))
}

/// `RUST_LOG` wins over `telemetry.log_level`.  With `telemetry.log_file`
/// set, output goes to that file so the terminal stays clean.
fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));

    let Some(log_file) = config.telemetry.log_file.as_deref() else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = config.resolve(log_file);
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn load_base(config: &AppConfig) -> Result<(Templates, RecordStore)> {
    let templates = Templates::load(&LocalFiles, config)?;
    let text = BaseFile::new(config.base_path()).read_or_create()?;
    let store = RecordStore::load(templates.base.clone(), &text);
    Ok((templates, store))
}

fn tree_items(store: &RecordStore) -> Vec<TreeItem<'_>> {
    if store.is_placeholder() {
        return Vec::new();
    }
    store
        .records()
        .iter()
        .map(|note| TreeItem {
            name: &note.name,
            tags: &note.tags,
            text: &note.text,
        })
        .collect()
}

fn print_tree(config: &AppConfig, root: Option<&str>) -> Result<()> {
    let (templates, store) = load_base(config)?;
    let options = TreeOptions {
        skip_empty_text: config.tree.skip_empty_text,
    };
    let nodes = build_tree(&tree_items(&store), root, &options)?;
    print!("{}", render_tree(&nodes, &templates.tree, &config.tree.indent));
    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    let (_, store) = load_base(config)?;
    println!("notekeeper check");
    println!("- templates: ok");
    println!("- base: {}", config.base_path().display());
    if store.is_placeholder() {
        println!("- records: 0 (empty base)");
    } else {
        println!("- records: {}", store.len());
    }

    let tags = store.used_tags();
    if tags.is_empty() {
        println!("- tags: none");
    } else {
        println!("- tags: {}", tags.join(", "));
    }

    let options = TreeOptions {
        skip_empty_text: config.tree.skip_empty_text,
    };
    match build_tree(&tree_items(&store), None, &options) {
        Ok(nodes) => println!("- tree: {} rows", nodes.len()),
        Err(err) => bail!("tree check failed: {err}"),
    }
    Ok(())
}
