//! Command dispatch to the destination store.

mod redis;

pub use redis::RedisExecutor;

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::resp::Reply;

/// Failure of a single dispatch or of the startup probe.
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed by destination")]
    ConnectionClosed,
    #[error("unexpected reply: {0:?}")]
    UnexpectedReply(Reply),
    #[error("{0}")]
    Command(String),
}

/// Forwards one command to the destination store.
///
/// The sink holds this as a trait object so tests can substitute a mock
/// backend without touching the pipeline.
#[async_trait]
pub trait Executor: Send {
    async fn execute(&mut self, name: &str, args: &[Vec<u8>]) -> Result<(), ExecuteError>;
}
