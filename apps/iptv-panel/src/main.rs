use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iptv_db::Store;
use iptv_panel::{AppState, build_router, cli, config::PanelConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "iptv-panel")]
#[command(about = "IPTV subscription and catalog admin panel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Account tools
    User {
        #[command(subcommand)]
        subcommand: UserCommands,
    },
    /// Reseller tools
    Reseller {
        #[command(subcommand)]
        subcommand: ResellerCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Set a user's password, creating the user if needed
    SetPassword {
        user_id: String,
        password: String,
        #[arg(long, default_value = "admin")]
        role: String,
    },
}

#[derive(Subcommand)]
enum ResellerCommands {
    /// Create a reseller account
    Create {
        reseller_id: String,
        #[arg(long, default_value_t = 0.0)]
        credit: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: no .env loaded ({})", e);
    }

    let cli = Cli::parse();
    let config = PanelConfig::from_env()?;

    let file_appender = tracing_appender::rolling::never(&config.log_dir, "server.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "iptv_panel=debug,iptv_db=info,tower_http=info,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    let store = Store::open(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(store, config).await?,
        Commands::User { subcommand } => match subcommand {
            UserCommands::SetPassword { user_id, password, role } => {
                cli::set_password(&store, &user_id, &password, &role, config.bcrypt_cost).await?;
            }
        },
        Commands::Reseller { subcommand } => match subcommand {
            ResellerCommands::Create { reseller_id, credit } => {
                cli::create_reseller(&store, &reseller_id, credit).await?;
            }
        },
    }

    Ok(())
}

async fn run_server(store: Store, config: PanelConfig) -> Result<()> {
    tracing::debug!(?config, "Loaded configuration");
    let state = AppState::from_config(store, &config)?;
    let app = build_router(state, &config.public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
