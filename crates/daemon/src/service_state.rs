use common::board::Board;
use common::crypto::{CredentialError, CredentialHash};

use super::service_config::Config;

/// Main service state, cheap to clone into every handler
#[derive(Clone, Debug)]
pub struct State {
    board: Board,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let genesis = config
            .genesis_hash
            .as_deref()
            .map(CredentialHash::parse)
            .transpose()?;

        match &genesis {
            Some(hash) => tracing::info!(genesis = hash.short(), "board seeded"),
            None => tracing::warn!("no genesis hash configured, board is waiting for a recovery post"),
        }

        Ok(Self {
            board: Board::new(genesis),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl AsRef<Board> for State {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid genesis hash: {0}")]
    InvalidGenesis(#[from] CredentialError),
}
