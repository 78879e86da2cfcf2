//! doc_audit server and user administration.
//!
//! Usage:
//!   doc_audit serve --port 8080 --storage-dir ./.doc_audit
//!   doc_audit user add alice alice@example.com
//!   doc_audit user list

use anyhow::Context;
use clap::{Parser, Subcommand};
use da_server::{AppState, Config, logging, router};
use da_storage::{CreateUserRequest, SqliteStore};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "doc_audit")]
#[command(about = "Document store with access grants, history and rollback")]
#[command(version)]
struct Args {
    /// Directory holding the database (overrides DOC_AUDIT_STORAGE_DIR)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides DOC_AUDIT_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind to (overrides DOC_AUDIT_BIND)
        #[arg(long)]
        bind: Option<IpAddr>,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Register a user
    Add { username: String, email: String },
    /// Print all users
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(storage_dir) = args.storage_dir {
        config.storage_dir = storage_dir;
    }
    logging::init(config.log_format);

    let mut store = SqliteStore::open(&config.storage_dir)
        .with_context(|| format!("failed to open store in {}", config.storage_dir.display()))?;

    match args.command {
        Command::Serve { port, bind } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve(&config, store).await
        }
        Command::User {
            command: UserCommand::Add { username, email },
        } => {
            let user = store
                .user_create(CreateUserRequest { username, email })
                .context("failed to create user")?;
            println!("{}\t{}\t{}", user.id, user.username, user.email);
            Ok(())
        }
        Command::User {
            command: UserCommand::List,
        } => {
            for user in store.user_list().context("failed to list users")? {
                println!("{}\t{}\t{}", user.id, user.username, user.email);
            }
            Ok(())
        }
    }
}

async fn serve(config: &Config, store: SqliteStore) -> anyhow::Result<()> {
    let app = router(AppState::new(store));
    let addr = SocketAddr::new(config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        storage_dir = %config.storage_dir.display(),
        "doc_audit listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("error running server")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
