use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::transport::ConnectionParams;

/// Probe configuration loaded from `~/.config/dlprobe/config.toml`.
///
/// Passed explicitly to [`crate::probe::Prober::new`]; nothing in the core
/// reads configuration from global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Connect timeout for every hop, in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a hop when no bytes arrive for this many seconds (0 = no read timeout).
    pub read_timeout_secs: u64,
    /// Maximum number of redirects followed before giving up.
    pub max_redirects: u32,
    /// Marker searched for inside `Content-Disposition` to locate the filename.
    pub disposition_file_key: String,
    /// Optional `User-Agent` sent with every request.
    pub user_agent: Option<String>,
    /// Optional proxy URL handed to libcurl (e.g. `http://proxy:3128`).
    pub proxy: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Extra request headers applied to every hop.
    pub headers: BTreeMap<String, String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            read_timeout_secs: 30,
            max_redirects: 5,
            disposition_file_key: "filename".to_string(),
            user_agent: None,
            proxy: None,
            insecure: false,
            headers: BTreeMap::new(),
        }
    }
}

impl ProbeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Connection parameters shared by every hop of a probe.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            connect_timeout: self.connect_timeout(),
            read_timeout: (self.read_timeout_secs > 0)
                .then(|| Duration::from_secs(self.read_timeout_secs)),
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
            insecure: self.insecure,
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dlprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProbeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProbeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ProbeConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
