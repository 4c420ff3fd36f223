use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::executor::Executor;
use crate::protocol::Command;

/// Consumer half of the pipeline.
///
/// Forwards each command to the destination executor, strictly one call
/// in flight at a time.
pub struct ReplicationSink {
    executor: Box<dyn Executor>,
    log_commands: bool,
}

impl ReplicationSink {
    pub fn new(executor: Box<dyn Executor>, log_commands: bool) -> Self {
        Self {
            executor,
            log_commands,
        }
    }

    /// Drain the channel until it is closed. A rejected command is
    /// logged and skipped; it never stops the stream.
    pub async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            if self.log_commands {
                info!("{}", cmd.raw);
            }

            if let Err(e) = self.executor.execute(&cmd.name, &cmd.args).await {
                warn!("error while executing command {}: {}", cmd.raw, e);
            }
        }
    }
}
