use thiserror::Error as ThisError;

use crate::square::{
    core::RestoreError, daily::DailyError, game::SessionClosed, storage::StorageError, LoadError,
};

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] crate::framework::config::Error),

    #[error("problem loading words: {0}")]
    Words(#[from] LoadError),

    #[error("problem generating puzzle: {0}")]
    Daily(#[from] DailyError),

    #[error("problem with saved data: {0}")]
    Storage(#[from] StorageError),

    #[error("saved game is corrupt: {0}")]
    Restore(#[from] RestoreError),

    #[error(transparent)]
    Session(#[from] SessionClosed),

    #[error("game session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("couldn't serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T = (), E = Error> = std::result::Result<T, E>;
