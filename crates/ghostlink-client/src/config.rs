use std::path::PathBuf;

use clap::Parser;

use crate::error::ClientError;
use crate::registry::UnroutedPolicy;

/// Command-line configuration for the sync client.
#[derive(Parser, Debug, Clone)]
#[command(name = "ghostlink")]
pub struct Config {
    /// Server address to connect to, e.g. 192.168.1.10:5555
    #[arg(long)]
    pub server_addr: Option<String>,

    /// Path to the persistent companion key file
    #[arg(long, default_value = "companion_guids.txt")]
    pub key_file: PathBuf,

    /// Drop updates from unknown senders instead of degrading onto slot 0
    #[arg(long, default_value_t = false)]
    pub strict_routing: bool,
}

/// Fully-resolved configuration, ready to start a client with.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub server_addr: String,
    pub key_file: PathBuf,
    pub unrouted_policy: UnroutedPolicy,
}

impl Config {
    /// Resolve into a runnable configuration.
    ///
    /// A missing server address is not prompted for here: the caller gets a
    /// distinct needs-input error and decides how to obtain the value.
    pub fn resolve(self) -> Result<ResolvedConfig, ClientError> {
        let server_addr = self
            .server_addr
            .ok_or(ClientError::NeedsInput("server address"))?;
        Ok(ResolvedConfig {
            server_addr,
            key_file: self.key_file,
            unrouted_policy: if self.strict_routing {
                UnroutedPolicy::ReportOnly
            } else {
                UnroutedPolicy::ApplyToSlotZero
            },
        })
    }
}
