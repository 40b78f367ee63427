//! Runnable Flipmatch server with default settings.
//!
//! ```sh
//! RUST_LOG=info cargo run -p flipmatch-server
//! ```

use flipmatch::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = FlipmatchServerBuilder::new()
        .bind("0.0.0.0:8080")
        .game_config(GameConfig::default())
        .build()
        .await?;

    tracing::info!(addr = %server.local_addr()?, "flipmatch server listening");
    server.run().await?;
    Ok(())
}
