//! Layered configuration: config file → environment → CLI flags.
//!
//! `config.toml` lives in the same per-user directory as the stash:
//!
//! ```toml
//! [service]
//! url = "https://org.example.com"
//!
//! [deploy]
//! rest = false
//!
//! [project]
//! source_dirs = ["src"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";

/// Wire transport used for deploy submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transport {
    Rest,
    #[default]
    Soap,
}

impl Transport {
    pub fn is_rest(&self) -> bool {
        matches!(self, Transport::Rest)
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Rest => write!(f, "REST"),
            Transport::Soap => write!(f, "SOAP"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// REST is opt-in; unset means the legacy SOAP transport.
    #[serde(default)]
    pub rest: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirliftConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub project: ProjectConfig,
}

impl AirliftConfig {
    /// Load from the per-user config file, defaulting when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
    }

    /// Service endpoint, environment first.
    pub fn service_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var("AIRLIFT_SERVICE_URL") {
            return Ok(url);
        }
        self.service.url.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No service URL configured. Set AIRLIFT_SERVICE_URL or add [service] url to {CONFIG_FILE}"
            )
        })
    }

    /// Resolve the deploy transport.
    ///
    /// The `--soap` flag wins outright; then the `AIRLIFT_REST_DEPLOY`
    /// environment value, then the `deploy.rest` setting; the default is
    /// SOAP.
    pub fn transport(&self, soap_flag: bool) -> Transport {
        if soap_flag {
            debug!("--soap flag set. Using SOAP");
            return Transport::Soap;
        }
        let env_rest = std::env::var("AIRLIFT_REST_DEPLOY")
            .ok()
            .and_then(|value| match value.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            });
        match env_rest.or(self.deploy.rest) {
            Some(true) => {
                debug!("rest deploy configured on. Using REST");
                Transport::Rest
            }
            Some(false) => {
                debug!("rest deploy configured off. Using SOAP");
                Transport::Soap
            }
            None => {
                debug!("--soap flag unset, rest deploy unset. Defaulting to SOAP");
                Transport::Soap
            }
        }
    }

    /// Source directories, CLI flags first, then the config file, then
    /// plain `src`.
    pub fn source_dirs(&self, cli: &[PathBuf]) -> Vec<PathBuf> {
        if !cli.is_empty() {
            return cli.to_vec();
        }
        if !self.project.source_dirs.is_empty() {
            return self.project.source_dirs.clone();
        }
        vec![PathBuf::from("src")]
    }
}

/// Per-user airlift directory holding the config file and the stash.
/// `AIRLIFT_CONFIG_DIR` overrides the location.
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var_os("AIRLIFT_CONFIG_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(dirs::config_dir()
            .context("Could not determine the user config directory")?
            .join("airlift")),
    }
}
