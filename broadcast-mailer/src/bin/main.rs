//! broadcast-mailer server

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use broadcast_mailer::{config::MailerConfig, handlers, observability, state::AppState};

#[derive(Parser)]
#[command(name = "broadcast-mailer")]
#[command(version)]
#[command(about = "Admin page for broadcasting email to users or event participants", long_about = None)]
struct Cli {
    /// Configuration file, merged over the standard locations
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MailerConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    observability::init(&config.logging)?;

    let addr = config.server.addr();
    let state = AppState::from_config(config)?;
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, path = handlers::SEND_MAIL_PATH, "Broadcast mailer listening");

    axum::serve(listener, app).await?;
    Ok(())
}
