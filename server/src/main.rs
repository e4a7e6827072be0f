use anyhow::Result;
use axum::Router;
use clap::Parser;
use mdl_server::{build_app, AppConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// HTML-escape field values in display strings
    #[arg(long, default_value_t = false)]
    escape_html: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let app: Router = build_app(AppConfig::from_env(args.escape_html));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, escape_html = args.escape_html, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
