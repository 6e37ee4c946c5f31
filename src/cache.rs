use anyhow::{Context, Result};
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use std::time::Duration;

use crate::config::Config;

/// Host used when `REDIS_HOST` is unset, same as the Redis client default
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";

/// Liveness probe against the Redis cache
///
/// Holds only the target address. Every call to [`CacheProbe::ping`] opens
/// its own connection and drops it afterwards; nothing is pooled between
/// requests.
#[derive(Debug, Clone)]
pub struct CacheProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl CacheProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        let host = host.into();
        let host = if host.trim().is_empty() {
            DEFAULT_REDIS_HOST.to_string()
        } else {
            host
        };

        Self { host, port, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.redis_host.clone(), config.redis_port, config.redis_timeout)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connect, send `PING` and return the server's reply
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established, the server
    /// answers with an error, or the round-trip exceeds the timeout.
    pub async fn ping(&self) -> Result<String> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo::default(),
        };
        let client = redis::Client::open(info).context("Invalid Redis connection info")?;

        let round_trip = async {
            let mut con = client
                .get_multiplexed_async_connection()
                .await
                .with_context(|| format!("Failed to connect to Redis at {}", self.address()))?;

            let reply: String = redis::cmd("PING")
                .query_async(&mut con)
                .await
                .context("Redis PING failed")?;

            Ok::<_, anyhow::Error>(reply)
        };

        let reply = tokio::time::timeout(self.timeout, round_trip)
            .await
            .with_context(|| {
                format!("Redis PING to {} timed out after {:?}", self.address(), self.timeout)
            })??;

        tracing::debug!("Redis at {} answered PING with {}", self.address(), reply);
        Ok(reply)
    }
}

/// Minimal RESP responder for exercising the probe without a real Redis
#[cfg(test)]
pub mod test_support {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    /// Start a listener that answers `PING` with `PONG` and anything else
    /// with `OK`. Returns the bound port.
    pub async fn spawn_fake_redis() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(serve_connection(socket));
            }
        });

        port
    }

    /// A port on which nothing is listening
    pub async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    /// A listener that accepts connections and never replies
    pub async fn spawn_silent_server() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        port
    }

    async fn serve_connection(socket: TcpStream) {
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();

        while let Ok(Some(header)) = lines.next_line().await {
            let Some(count) = header.strip_prefix('*').and_then(|n| n.parse::<usize>().ok())
            else {
                continue;
            };

            let mut args = Vec::with_capacity(count);
            for _ in 0..count {
                // bulk string length line, then the payload
                if !matches!(lines.next_line().await, Ok(Some(_))) {
                    return;
                }
                match lines.next_line().await {
                    Ok(Some(arg)) => args.push(arg),
                    _ => return,
                }
            }

            let reply = if args.first().is_some_and(|cmd| cmd.eq_ignore_ascii_case("PING")) {
                "+PONG\r\n"
            } else {
                "+OK\r\n"
            };

            if write.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
        }
    }
}
