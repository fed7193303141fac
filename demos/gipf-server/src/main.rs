//! Standalone GIPF server.
//!
//! Run with: `cargo run -p gipf-server -- [host:port]`
//!
//! Listens on `localhost:2222` by default. Set `RUST_LOG=debug` to see
//! every message.

use gipf::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = ServerConfig::default();
    if let Some(addr) = std::env::args().nth(1) {
        config.bind_addr = addr;
    }
    tracing::info!(addr = %config.bind_addr, "starting GIPF server");

    let server = GipfServerBuilder::from(config).build().await?;
    server.run().await?;
    Ok(())
}
