use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use common::board::Board;

use crate::ServiceState;

/// How long readiness waits on the board lock before giving up
const BOARD_LOCK_WAIT: Duration = Duration::from_secs(2);

#[async_trait]
pub trait DataSource {
    /// Perform various checks on the system to ensure its healthy and ready to accept requests.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("one or more dependent services aren't available")]
    DependencyFailure,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Ready once the board lock can be taken
struct BoardSource {
    board: Board,
}

#[async_trait]
impl DataSource for BoardSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        let board = self.board.clone();
        let responsive = tokio::task::spawn_blocking(move || board.is_responsive(BOARD_LOCK_WAIT))
            .await
            .map_err(|_| DataSourceError::DependencyFailure)?;

        if responsive {
            Ok(())
        } else {
            Err(DataSourceError::DependencyFailure)
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StateDataSource
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ();

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);
        Ok(StateDataSource(Arc::new(BoardSource {
            board: state.board().clone(),
        })))
    }
}
