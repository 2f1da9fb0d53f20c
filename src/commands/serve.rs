use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::server::{build_router, AppState};
use crate::{msg_info, msg_warning};
use anyhow::Result;
use clap::Args;
use tokio::net::TcpListener;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind, overrides the configured host
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn cmd(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if config.admin.is_none() {
        msg_warning!(Message::AdminNotConfigured);
    }

    // Schema changes happen once here, never per request
    Db::init(&config.database_path()?)?;

    let app = build_router(AppState::from_config(&config)?);
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("{}", Message::ServerListening(address));

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    msg_info!(Message::ServerShuttingDown);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
