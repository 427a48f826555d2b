use std::error::Error;

use tracing::{Level, debug};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file; a missing file is fine.
    let dotenv = dotenvy::dotenv().ok();

    ai_llm_service::telemetry::init("info", Level::INFO);
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    api::start().await?;

    Ok(())
}
