//! Lists configs and volumes of the engine named by `dockr.toml` or
//! `DOCKR_BASE_URL`.
//!
//! ```text
//! DOCKR_BASE_URL=http://127.0.0.1:2375 RUST_LOG=debug cargo run --example list_configs
//! ```

use dockr_core::{ConfigFilters, Docker, VolumeListFilters};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let docker = Docker::with_defaults()?;

    match docker.config().list(&ConfigFilters::default()).await {
        Ok(configs) => {
            for config in configs {
                println!(
                    "config {} {}",
                    config.id.as_deref().unwrap_or("-"),
                    config.name().unwrap_or("-")
                );
            }
        }
        Err(err) => println!("configs unavailable: {err}"),
    }

    for volume in docker.volume().list(&VolumeListFilters::default()).await? {
        println!("volume {} ({})", volume.name, volume.driver);
    }
    Ok(())
}
