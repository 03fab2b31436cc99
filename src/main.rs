#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use anyhow::Result;
use tokio::net::TcpListener;

use daybook::graceful_shutdown;
use daybook::setup_address;
use daybook::setup_app;
use daybook::setup_environment;
use daybook::setup_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await;

    let address = setup_address()?;
    let listener = TcpListener::bind(address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}
