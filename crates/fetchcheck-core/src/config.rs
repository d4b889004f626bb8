use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Random delay applied by each worker before it fetches (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JitterConfig {
    /// Lower bound in milliseconds (inclusive).
    pub min_ms: u64,
    /// Upper bound in milliseconds (exclusive). Equal bounds mean a fixed delay of `min_ms`.
    pub max_ms: u64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            min_ms: 0,
            max_ms: 4000,
        }
    }
}

/// Deadlines applied to every fetch (direct and proxied).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Maximum time to establish the TCP connection.
    pub connect_secs: u64,
    /// Maximum time for the whole transfer.
    pub total_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            total_secs: 60,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn total(&self) -> Duration {
        Duration::from_secs(self.total_secs)
    }
}

/// Global configuration loaded from `~/.config/fetchcheck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchcheckConfig {
    /// Resource fetched directly (reference) and through the proxy (workers).
    pub target_url: String,
    /// Forward proxy, e.g. `localhost:8080` or `socks5h://127.0.0.1:1080`.
    pub proxy: String,
    /// Number of workers to launch.
    pub workers: usize,
    /// Upper bound on workers in flight at once (None = all at once).
    #[serde(default)]
    pub max_concurrent: Option<usize>,
    #[serde(default)]
    pub jitter: JitterConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

impl Default for FetchcheckConfig {
    fn default() -> Self {
        Self {
            target_url: "http://127.0.0.1:2020/un.jpg".to_string(),
            proxy: "localhost:8080".to_string(),
            workers: 50,
            max_concurrent: None,
            jitter: JitterConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl FetchcheckConfig {
    /// Checks only what a direct fetch of the target needs: the URL and a non-zero deadline.
    pub fn validate_target(&self) -> Result<()> {
        url::Url::parse(&self.target_url)
            .with_context(|| format!("invalid target_url {:?}", self.target_url))?;
        if self.timeouts.total_secs == 0 {
            anyhow::bail!("timeouts.total_secs must be at least 1");
        }
        Ok(())
    }

    /// Reject values that would make a run meaningless or hang.
    pub fn validate(&self) -> Result<()> {
        self.validate_target()?;
        if self.proxy.trim().is_empty() {
            anyhow::bail!("proxy must not be empty");
        }
        if self.jitter.min_ms > self.jitter.max_ms {
            anyhow::bail!(
                "jitter.min_ms ({}) exceeds jitter.max_ms ({})",
                self.jitter.min_ms,
                self.jitter.max_ms
            );
        }
        if self.max_concurrent == Some(0) {
            anyhow::bail!("max_concurrent must be at least 1");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchcheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchcheckConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchcheckConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit path. The file must exist.
pub fn load_from(path: &Path) -> Result<FetchcheckConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: FetchcheckConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
