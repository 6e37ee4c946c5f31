use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Result, anyhow};

/// What `GET /` does when the Redis probe fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingPolicy {
    /// Substitute `ERROR WHILE CONNECTING` and answer 200
    Guarded,
    /// Surface the failure as a 500
    Unguarded,
}

impl FromStr for PingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guarded" => Ok(PingPolicy::Guarded),
            "unguarded" => Ok(PingPolicy::Unguarded),
            other => Err(anyhow!("expected 'guarded' or 'unguarded', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub label: String,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_timeout: Duration,
    pub ping_policy: PingPolicy,
    pub mount_path: PathBuf,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// `LABEL`, `REDIS_HOST` and `MOUNT_PATH` fall back to empty values when
    /// absent. Numeric settings and the ping policy must parse if present.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let label = lookup("LABEL").unwrap_or_default();
        let redis_host = lookup("REDIS_HOST").unwrap_or_default();
        let mount_path = PathBuf::from(lookup("MOUNT_PATH").unwrap_or_default());

        let redis_port = lookup("REDIS_PORT")
            .unwrap_or_else(|| "6379".to_string())
            .parse::<u16>()
            .context("REDIS_PORT must be a valid port number (0-65535)")?;

        let redis_timeout = lookup("REDIS_TIMEOUT_MS")
            .unwrap_or_else(|| "2000".to_string())
            .parse::<u64>()
            .map(Duration::from_millis)
            .context("REDIS_TIMEOUT_MS must be a whole number of milliseconds")?;

        let ping_policy = lookup("REDIS_PING_POLICY")
            .unwrap_or_else(|| "guarded".to_string())
            .parse::<PingPolicy>()
            .context("REDIS_PING_POLICY is invalid")?;

        let service_port = lookup("PORT")
            .unwrap_or_else(|| "4567".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            label,
            redis_host,
            redis_port,
            redis_timeout,
            ping_policy,
            mount_path,
            service_port,
            service_host,
        })
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Label: {:?}", self.label);
        let redis_host = match self.redis_host.as_str() {
            "" => "<unset>",
            host => host,
        };
        tracing::info!(
            "  Redis: {}:{} (timeout {:?}, policy {:?})",
            redis_host,
            self.redis_port,
            self.redis_timeout,
            self.ping_policy
        );
        tracing::info!("  Mount path: {}", self.mount_path.display());
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}
