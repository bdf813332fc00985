use std::net::SocketAddr;

use crate::ServiceConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
}

impl Config {
    pub fn new(listen_addr: SocketAddr) -> Self {
        tracing::debug!(%listen_addr, "creating HTTP server config");
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
        }
    }

    pub fn with_log_level(mut self, log_level: tracing::Level) -> Self {
        self.log_level = log_level;
        self
    }
}

impl From<&ServiceConfig> for Config {
    fn from(service_config: &ServiceConfig) -> Self {
        Config::new(service_config.listen_addr).with_log_level(service_config.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_info() {
        let config = Config::new(SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(config.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_from_service_config_carries_log_level() {
        let service_config = ServiceConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9090)),
            log_level: tracing::Level::DEBUG,
            ..Default::default()
        };

        let config = Config::from(&service_config);
        assert_eq!(config.listen_addr, service_config.listen_addr);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
    }
}
