//! src/main.rs
//! Command-line front end for the vault store: one command per invocation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use bytesize::ByteSize;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use vault_core::{
    AppError, Logger,
    config::Config,
    model::{EntityId, FOLDER_GLYPH, ViewMode, VirtualPath},
    store::{EntityStore, FileBackend, ListedItem, UploadSource, validate_entry_name},
    util::humanize::format_file_size,
};

const GRID_COLUMNS: usize = 4;

#[derive(Debug, Parser)]
#[command(name = "vault", version, about = "Browse and manage a virtual file vault")]
struct Cli {
    /// Directory holding files.json / folders.json
    #[arg(long, env = "VAULT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Alternate config file
    #[arg(long, env = "VAULT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log at debug level and mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List a directory, or search every directory
    Ls {
        #[arg(default_value = "/")]
        path: VirtualPath,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        view: Option<ViewMode>,
    },

    /// Upload a local file
    Upload {
        file: PathBuf,

        #[arg(long, default_value = "/")]
        to: VirtualPath,
    },

    /// Create a folder
    Mkdir {
        name: String,

        #[arg(long = "in", default_value = "/")]
        parent: VirtualPath,
    },

    /// Move a file to the trash
    Rm { id: EntityId },

    /// Bring a file back from the trash
    Restore { id: EntityId },

    /// Delete a folder (its contents are left in place)
    Rmdir { id: EntityId },

    /// Rename a file or folder
    Rename { id: EntityId, new_name: String },

    /// Star or unstar a file
    Star { id: EntityId },

    /// Show trashed files
    Trash,

    /// Show starred files
    Starred,

    /// Show storage usage by category
    Stats,

    /// Print the breadcrumb trail for a path
    Breadcrumbs { path: VirtualPath },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
        config.logging.stderr = true;
    }

    let data_dir = config.data_dir()?;
    let _guard = Logger::init(&config.logging, &data_dir).context("Failed to initialize logging")?;
    match cli.config.as_deref() {
        Some(path) => info!("Using config file {}", path.display()),
        None => info!("Using config file {}", Config::config_path()?.display()),
    }
    info!("Using data directory {}", data_dir.display());

    let backend = FileBackend::open(&data_dir)
        .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
    let mut store = EntityStore::open(backend).with_view_mode(config.default_view);

    run(&mut store, cli.command, config.storage_limit).await?;

    debug!("Command finished");
    Ok(())
}

async fn run(
    store: &mut EntityStore<FileBackend>,
    command: Command,
    storage_limit: ByteSize,
) -> Result<()> {
    match command {
        Command::Ls { path, search, view } => {
            store.navigate_to(path);
            if let Some(query) = search {
                store.set_search_query(query);
            }
            if let Some(mode) = view {
                store.set_view_mode(mode);
            }
            print_breadcrumbs(store);
            print_items(&store.current_items(), store.ui().view_mode);
        }

        Command::Upload { file, to } => {
            let source = read_upload(&file).await?;
            let record = store.upload_file(source, to)?;
            println!(
                "{} {} ({}) -> {}",
                record.kind().glyph(),
                record.name,
                format_file_size(record.size),
                record.id
            );
        }

        Command::Mkdir { name, parent } => {
            let name = validate_entry_name(&name)?;
            let record = store.create_folder(name, parent)?;
            println!("{FOLDER_GLYPH} {} -> {}", record.full_path(), record.id);
        }

        Command::Rm { id } => require(store.delete_file(id)?, "file", id)?,

        Command::Restore { id } => require(store.restore_file(id)?, "file", id)?,

        Command::Rmdir { id } => require(store.delete_folder(id)?, "folder", id)?,

        Command::Rename { id, new_name } => {
            let new_name = validate_entry_name(&new_name)?;
            let renamed = store.rename_file(id, new_name)? || store.rename_folder(id, new_name)?;
            require(renamed, "file or folder", id)?;
        }

        Command::Star { id } => {
            require(store.toggle_starred(id)?, "file", id)?;
            if let Some(file) = store.file(id) {
                let state = if file.starred { "starred" } else { "unstarred" };
                println!("{} {state}", file.name);
            }
        }

        Command::Trash => {
            for file in store.trashed_files() {
                println!("{} {}  {}  {}", file.kind().glyph(), file.name, file.path, file.id);
            }
        }

        Command::Starred => {
            for file in store.starred_files() {
                println!("⭐ {}  {}  {}", file.name, file.path, file.id);
            }
        }

        Command::Stats => {
            let stats = store.storage_stats(storage_limit);
            println!("{}", stats.summary());
            if stats.is_over_limit() {
                warn!(used = stats.used, limit = stats.limit, "Storage quota exceeded");
                println!("Over quota by {}", format_file_size(stats.used - stats.limit));
            }
            for (category, usage) in &stats.by_category {
                println!(
                    "  {category:<10} {:>5} files  {}",
                    usage.count,
                    format_file_size(usage.bytes)
                );
            }
        }

        Command::Breadcrumbs { path } => {
            store.navigate_to(path);
            for crumb in store.breadcrumbs() {
                println!("{}\t{}", crumb.name, crumb.path);
            }
        }
    }

    Ok(())
}

async fn read_upload(file: &Path) -> Result<UploadSource> {
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::invalid_input("file", "path has no usable file name"))?
        .to_string();

    let content = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    Ok(UploadSource::from_bytes(name, Bytes::from(content)))
}

fn require(found: bool, what: &str, id: EntityId) -> Result<()> {
    if found {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("{what} {id}")).into())
    }
}

fn print_breadcrumbs<B: vault_core::store::KeyValueBackend>(store: &EntityStore<B>) {
    if store.ui().is_searching() {
        println!("Search: \"{}\"", store.ui().search_query);
        return;
    }

    let crumbs = store.breadcrumbs();
    let trail: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
    println!("{}", trail.join(" › "));
}

fn print_items(items: &[ListedItem<'_>], mode: ViewMode) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    match mode {
        ViewMode::List => {
            for item in items {
                match item {
                    ListedItem::Folder(f) => {
                        println!("{FOLDER_GLYPH} {:<32} {:>12}  {}", f.name, "-", f.id);
                    }
                    ListedItem::File(f) => {
                        let star = if f.starred { "⭐" } else { "" };
                        println!(
                            "{} {:<32} {:>12}  {} {star}",
                            f.kind().glyph(),
                            f.name,
                            format_file_size(f.size),
                            f.id
                        );
                    }
                }
            }
        }
        ViewMode::Grid => {
            for row in items.chunks(GRID_COLUMNS) {
                let cells: Vec<String> = row
                    .iter()
                    .map(|item| match item {
                        ListedItem::Folder(f) => format!("{FOLDER_GLYPH} {}", f.name),
                        ListedItem::File(f) => format!("{} {}", f.kind().glyph(), f.name),
                    })
                    .collect();
                println!("{}", cells.join("    "));
            }
        }
    }
}
