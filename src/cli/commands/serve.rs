//! Serve command implementation

use crate::config::ScrubberConfig;
use clap::Args;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind host, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port, overrides `server.port`
    #[arg(long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, mut config: ScrubberConfig) -> anyhow::Result<i32> {
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        if config.server.api_key.is_none() {
            eprintln!("❌ server.api_key is not configured (set SCRUB_API_KEY)");
            return Ok(2);
        }

        crate::server::serve(&config).await?;
        Ok(0)
    }
}
