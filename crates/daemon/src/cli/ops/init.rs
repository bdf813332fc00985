use clap::Args;

use common::crypto::Passcode;
use whisper_daemon::state::{AppConfig, AppState, StateError, DEFAULT_PORT};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Passcode the board starts with; only its hash is written to disk
    #[arg(long, conflicts_with = "generate")]
    pub passcode: Option<String>,

    /// Generate a random first passcode and print it once
    #[arg(long)]
    pub generate: bool,

    /// Port the board is served on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Default log level for the daemon
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let passcode = match (&self.passcode, self.generate) {
            (Some(passcode), _) => Some(Passcode::from(passcode.as_str())),
            (None, true) => Some(Passcode::generate()),
            (None, false) => None,
        };

        let config = AppConfig {
            port: self.port,
            genesis_hash: passcode.as_ref().map(|p| p.hash().to_string()),
            log_level: self.log_level.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), config)?;

        let genesis = match (&passcode, self.generate) {
            (Some(passcode), true) => format!("generated, first passcode is {}", passcode),
            (Some(_), false) => "set from --passcode".to_string(),
            (None, _) => "none, the first post must use the recovery passcode".to_string(),
        };

        Ok(format!(
            "Initialized whisper directory at: {}\n\
             - Config: {}\n\
             - Port: {}\n\
             - Log level: {}\n\
             - Genesis: {}",
            state.whisper_dir.display(),
            state.config_path.display(),
            state.config.port,
            state.config.log_level,
            genesis
        ))
    }
}
