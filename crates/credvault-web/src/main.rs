//! CredVault Server — application entry point.

use tracing_subscriber::EnvFilter;

use credvault_web::WebConfig;

#[tokio::main]
async fn main() {
    // Load a .env file if present; ignore when absent.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("credvault=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting CredVault server...");

    let config = match WebConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!(%message, "configuration error");
            std::process::exit(1);
        }
    };

    if let Err(e) = credvault_web::server::run(config).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
