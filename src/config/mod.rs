use clap::Parser;

/// Startup configuration for the replication pipeline.
///
/// Parsed once from the command line in `main` and immutable afterwards;
/// consumers receive it by reference, never through global state.
#[derive(Parser, Debug, Clone)]
#[command(
  name = "redis-replay",
  about = "Replay a redis MONITOR feed from stdin into a destination server"
)]
pub struct Config {
  /// Destination redis host
  #[arg(long = "redis-host", default_value = "localhost")]
  pub host: String,

  /// Destination redis port
  #[arg(long = "redis-port", default_value_t = 6379)]
  pub port: u16,

  /// Destination redis database number
  #[arg(long = "redis-db", default_value_t = 0)]
  pub db: i64,

  /// Log all replicated commands
  #[arg(long = "log")]
  pub log_commands: bool,
}

impl Config {
  /// Destination address in host:port form
  pub fn addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}
