//! Serve command - run the HTTP server

use crate::commands::SeedInput;
use crate::config::Settings;
use crate::error::Result;
use crate::server;

pub async fn run(settings: &Settings, input: &SeedInput) -> Result<()> {
    let service = settings.build_service().await?;

    // Registration only; chart data is fetched on first request
    input.apply(&service).await?;

    server::serve(settings, service).await
}
