//! Serve command implementation.

use crate::agents::wellness_registry;
use crate::config::Settings;
use crate::server::TaskServer;
use anyhow::Result;
use std::sync::Arc;

/// Run the A2A task dispatch server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let registry = Arc::new(wellness_registry(&settings));
    let server = TaskServer::from_settings(settings, registry)?;
    server.run().await?;

    Ok(())
}
