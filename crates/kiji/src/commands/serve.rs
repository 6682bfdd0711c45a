//! Publishing server command.

use std::path::PathBuf;

use anyhow::Result;
use kiji_publish::SlugPolicy;
use kiji_server::PublishServer;

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(
    config: &ConfigFile,
    root: Option<PathBuf>,
    port: Option<u16>,
    host: Option<String>,
    open: bool,
) -> Result<()> {
    let publisher = config.publisher(root, SlugPolicy::Unicode);
    if !publisher.root.exists() {
        anyhow::bail!(
            "Site root not found: {}. Run 'kiji init' first.",
            publisher.root.display()
        );
    }

    let mut server = config.server();
    if let Some(port) = port {
        server.port = port;
    }
    if let Some(host) = host {
        server.host = host;
    }
    server.open = open;

    PublishServer::new(server, publisher).start().await?;

    Ok(())
}
