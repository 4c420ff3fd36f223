use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::info;

use super::{ExecuteError, Executor};
use crate::config::Config;
use crate::protocol::resp::{Reply, encode_command};

/// RESP client for the destination server.
///
/// One connection, one request in flight at a time. The pipeline never
/// issues concurrent calls, so there is no pooling and no pipelining.
pub struct RedisExecutor {
    stream: TcpStream,
    pending: Vec<u8>, // buffer for incomplete replies
}

impl RedisExecutor {
    /// Connect to the destination, select the configured database and
    /// verify the link with PING. Any failure here is fatal to startup.
    pub async fn connect(config: &Config) -> Result<Self, ExecuteError> {
        let stream = TcpStream::connect(config.addr()).await?;
        let mut executor = Self {
            stream,
            pending: Vec::new(),
        };

        if config.db != 0 {
            let db = config.db.to_string().into_bytes();
            match executor.call("SELECT", &[db]).await? {
                Reply::Simple(_) => {}
                Reply::Error(e) => return Err(ExecuteError::Command(e)),
                other => return Err(ExecuteError::UnexpectedReply(other)),
            }
        }

        executor.ping().await?;
        info!("connected to destination at {}", config.addr());
        Ok(executor)
    }

    /// Round-trip a PING, expecting +PONG.
    async fn ping(&mut self) -> Result<(), ExecuteError> {
        match self.call("PING", &[]).await? {
            Reply::Simple(s) if s == "PONG" => Ok(()),
            Reply::Error(e) => Err(ExecuteError::Command(e)),
            other => Err(ExecuteError::UnexpectedReply(other)),
        }
    }

    async fn call(&mut self, name: &str, args: &[Vec<u8>]) -> Result<Reply, ExecuteError> {
        let request = encode_command(name, args);
        self.stream.write_all(&request).await?;
        self.read_reply().await
    }

    /// Read one complete reply, buffering partial frames.
    async fn read_reply(&mut self) -> Result<Reply, ExecuteError> {
        let mut buffer = vec![0u8; 8192];

        loop {
            if let Some((reply, consumed)) = Reply::parse(&self.pending) {
                self.pending = self.pending.split_off(consumed);
                return Ok(reply);
            }

            let n = self.stream.read(&mut buffer).await?;
            if n == 0 {
                return Err(ExecuteError::ConnectionClosed);
            }
            self.pending.extend_from_slice(&buffer[..n]);
        }
    }
}

#[async_trait]
impl Executor for RedisExecutor {
    async fn execute(&mut self, name: &str, args: &[Vec<u8>]) -> Result<(), ExecuteError> {
        match self.call(name, args).await? {
            Reply::Error(e) => Err(ExecuteError::Command(e)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn config_for(addr: std::net::SocketAddr) -> Config {
        use clap::Parser;
        let host = addr.ip().to_string();
        let port = addr.port().to_string();
        Config::parse_from([
            "redis-replay",
            "--redis-host",
            host.as_str(),
            "--redis-port",
            port.as_str(),
        ])
    }

    /// Accept one connection and answer each request with the next
    /// canned reply, recording the request bytes.
    async fn serve_replies(
        listener: TcpListener,
        replies: Vec<&'static [u8]>,
    ) -> Vec<u8> {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buffer = vec![0u8; 8192];
        for reply in replies {
            let n = stream.read(&mut buffer).await.unwrap();
            received.extend_from_slice(&buffer[..n]);
            stream.write_all(reply).await.unwrap();
        }
        received
    }

    #[tokio::test]
    async fn test_connect_probes_with_ping() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_replies(listener, vec![b"+PONG\r\n"]));

        let executor = RedisExecutor::connect(&config_for(addr)).await;
        assert!(executor.is_ok());

        let received = server.await.unwrap();
        assert_eq!(received, b"*1\r\n$4\r\nPING\r\n");
    }

    #[tokio::test]
    async fn test_connect_fails_on_error_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_replies(
            listener,
            vec![b"-ERR protected mode\r\n"],
        ));

        let result = RedisExecutor::connect(&config_for(addr)).await;
        match result {
            Err(ExecuteError::Command(e)) => assert_eq!(e, "ERR protected mode"),
            other => panic!("expected command error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_connect_refused_is_fatal() {
        // Bind and drop so the port is very likely unused.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = RedisExecutor::connect(&config_for(addr)).await;
        assert!(matches!(result, Err(ExecuteError::Io(_))));
    }

    #[tokio::test]
    async fn test_execute_maps_error_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_replies(
            listener,
            vec![b"+PONG\r\n", b"+OK\r\n", b"-ERR wrong number of arguments\r\n"],
        ));

        let mut executor = RedisExecutor::connect(&config_for(addr)).await.unwrap();

        let ok = executor
            .execute("SET", &[b"k".to_vec(), b"v".to_vec()])
            .await;
        assert!(ok.is_ok());

        let err = executor.execute("SET", &[b"k".to_vec()]).await;
        match err {
            Err(ExecuteError::Command(e)) => {
                assert_eq!(e, "ERR wrong number of arguments")
            }
            other => panic!("expected command error, got {:?}", other.err()),
        }

        let received = server.await.unwrap();
        // PING, then the two SET requests, all on the same connection.
        assert!(received.starts_with(b"*1\r\n$4\r\nPING\r\n"));
    }
}
