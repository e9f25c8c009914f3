use clap::Parser;
use mirage::adapters::fixture::create_fixture_app;
use mirage::cli::FixtureCli;
use mirage::config::Settings;
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = FixtureCli::parse();
    let settings = Settings::new_with_fixture_cli(&cli)?;
    let fixture = settings.fixture;

    info!(
        "Starting inventory fixture on {}:{} (failure rate {})",
        fixture.host, fixture.port, fixture.failure_rate
    );

    let app = create_fixture_app(&fixture);

    let addr: SocketAddr = format!("{}:{}", fixture.host, fixture.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
