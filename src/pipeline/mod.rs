//! Producer/consumer wiring between the monitor feed and the
//! destination executor.

mod sink;
mod source;

pub use sink::ReplicationSink;
pub use source::CommandSource;

use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;

use crate::executor::Executor;

/// Commands buffered between source and sink. A slow destination fills
/// the channel and stalls the reader instead of growing memory.
pub const CHANNEL_CAPACITY: usize = 100;

/// Run the replication pipeline until the input stream is exhausted and
/// every buffered command has been forwarded.
pub async fn run<R>(input: R, executor: Box<dyn Executor>, log_commands: bool)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    let producer = tokio::spawn(CommandSource::new(input).run(tx));
    ReplicationSink::new(executor, log_commands).run(rx).await;

    // The sink only returns once the producer dropped its sender.
    let _ = producer.await;
}
