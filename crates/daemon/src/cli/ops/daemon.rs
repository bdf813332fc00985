use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;

use whisper_daemon::state::{AppState, StateError};
use whisper_daemon::{spawn_service, ProcessError, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Override the log level (default from config)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("daemon failed: {0}")]
    Failed(#[from] ProcessError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let port = self.port.unwrap_or(state.config.port);
        let log_level = match &self.log_level {
            Some(level) => tracing::Level::from_str(level)
                .map_err(|_| DaemonError::InvalidLogLevel(level.clone()))?,
            None => state.config.log_level()?,
        };

        let config = ServiceConfig {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            genesis_hash: state.config.genesis()?.map(|hash| hash.to_string()),
            log_level,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
