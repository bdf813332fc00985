use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Address the board is served on (JSON, HTML fragments and health)
    pub listen_addr: SocketAddr,

    // board configuration
    /// Hex SHA-256 of the first passcode. If not set the board starts
    ///  unseeded and only the recovery passcode can post.
    pub genesis_hash: Option<String>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], crate::state::DEFAULT_PORT)),
            genesis_hash: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
