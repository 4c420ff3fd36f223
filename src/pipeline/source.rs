use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::error;

use crate::protocol::{Command, monitor};

/// Producer half of the pipeline.
///
/// Reads monitor lines from the input, strips the timestamp/client
/// metadata prefix and feeds decoded commands into the channel in the
/// order the lines were read.
pub struct CommandSource<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> CommandSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Run until the input stream ends. Dropping the sender on return
    /// closes the channel, which is how the sink learns the feed is
    /// done — a normal termination, not an error.
    pub async fn run(self, tx: mpsc::Sender<Command>) {
        let mut lines = self.reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    // Lines without the metadata delimiter are noise.
                    let Some(rest) = strip_prefix(&line) else {
                        continue;
                    };

                    let cmd = monitor::parse(rest);
                    if !cmd.is_valid() {
                        continue;
                    }

                    // A full channel parks us here until the sink
                    // catches up.
                    if tx.send(cmd).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("error reading monitor input: {}", e);
                    break;
                }
            }
        }
    }
}

/// The command proper starts after the first ']' plus the separator
/// following it.
///
/// 1592134898.858273 [0 192.168.23.10:33072] "HSET" "wh:713..." "207108"
fn strip_prefix(line: &str) -> Option<&str> {
    let i = line.find(']')?;
    line.get(i + 2..)
}
