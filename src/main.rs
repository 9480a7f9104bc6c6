use dotenv::dotenv;
use estimate_backend::app::app::App;
use estimate_backend::util::logger::Logger;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG / FILE_LOG_LEVEL from it apply
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("🚀 Starting estimate backend");
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.start().await {
        error!("Server stopped with error: {}", e);
        std::process::exit(1);
    }
}
