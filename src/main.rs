use clap::Parser;
use mirage::cli::Cli;
use mirage::config::Settings;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting Mirage mock server on {}:{}", host, port);
    info!(
        "Chaos mode {} (failure rate {})",
        if settings.chaos.enabled { "enabled" } else { "disabled" },
        settings.chaos.failure_rate
    );

    let state = mirage::build_state_for_gemini(&settings)?;
    let app = mirage::create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
