use anyhow::Context;
use athledb::auth::AdminAuth;
use athledb::config::AppConfig;
use athledb::storage::{FileBackend, MockStore};
use athledb::web::{AppState, router};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "athledb", version, about = "Athleland Conditioning Club back-office service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides ATHLEDB_BIND)
        #[arg(long)]
        bind: Option<String>,
        /// Store file path (overrides ATHLEDB_STORE)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Wipe the persisted store back to the default empty schema.
    /// Destructive; previews unless --execute is given.
    Reset {
        /// Store file path (overrides ATHLEDB_STORE)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Actually perform the wipe
        #[arg(long)]
        execute: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { bind, store } => serve(bind, store).await,
        Command::Reset { store, execute } => reset(store, execute),
    }
}

async fn serve(bind: Option<String>, store_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(bind) = bind {
        config = config.bind_addr(&bind);
    }
    if let Some(path) = store_path {
        config = config.store_path(path);
    }
    config.validate()?;

    let store = MockStore::open(FileBackend::new(&config.store_path));
    let auth = AdminAuth::new(&config.admin_password)?;
    let app = router(AppState::new(store, auth));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, store = %config.store_path.display(), "athledb listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn reset(store_path: Option<PathBuf>, execute: bool) -> anyhow::Result<()> {
    let path = store_path.unwrap_or_else(AppConfig::store_path_from_env);
    let mut store = MockStore::open(FileBackend::new(&path));

    println!("Store: {}", path.display());
    let tables: Vec<String> = store.table_names().iter().map(|t| t.to_string()).collect();
    for table in &tables {
        println!("  {:<24} {} row(s)", table, store.row_count(table));
    }

    if execute {
        store.reset()?;
        println!("Store reset to the default empty schema.");
    } else {
        println!("Preview only — nothing changed. Re-run with --execute to wipe.");
    }
    Ok(())
}
