use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "launchpad.toml";

const COMMITMENT_LEVELS: [&str; 3] = ["processed", "confirmed", "finalized"];
const STORE_MODES: [&str; 3] = ["auto", "0", "1"];

/// Launchpad configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Solana JSON-RPC endpoint
    pub rpc_url: String,

    /// Commitment used for blockhashes, preflight and confirmation
    pub commitment: String,

    pub wallet: WalletConfig,

    pub uploadcare: UploadcareConfig,

    pub confirmation: ConfirmationConfig,
}

/// Local signing wallet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Solana CLI keypair file (JSON array of 64 bytes)
    pub keypair_path: String,
}

/// Uploadcare storage endpoints and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadcareConfig {
    /// Project public key sent as `UPLOADCARE_PUB_KEY`
    pub public_key: String,

    /// Direct upload endpoint
    pub upload_url: String,

    /// CDN prefix the returned URI is built on
    pub cdn_base: String,

    /// `UPLOADCARE_STORE` value: "auto", "0" or "1"
    pub store: String,
}

/// Transaction confirmation polling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Wait for each signature before the next step
    pub enabled: bool,

    pub poll_interval_ms: u64,

    pub timeout_secs: u64,
}

impl LaunchpadConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: LaunchpadConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `launchpad.toml` if it exists, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Write this configuration as pretty TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Like [`save`](Self::save), but fails if `path` already exists.
    pub fn save_new(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(io_error)?;
        file.write_all(content.as_bytes()).map_err(io_error)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("rpc_url", &self.rpc_url)?;

        if !COMMITMENT_LEVELS.contains(&self.commitment.as_str()) {
            return Err(ConfigError::Invalid {
                field: "commitment",
                reason: format!(
                    "{:?} is not one of {}",
                    self.commitment,
                    COMMITMENT_LEVELS.join(", ")
                ),
            });
        }

        if self.wallet.keypair_path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "wallet.keypair_path",
                reason: "must not be empty".into(),
            });
        }

        self.uploadcare.validate()?;
        self.confirmation.validate()
    }
}

impl UploadcareConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("uploadcare.upload_url", &self.upload_url)?;
        require_http_url("uploadcare.cdn_base", &self.cdn_base)?;

        if !STORE_MODES.contains(&self.store.as_str()) {
            return Err(ConfigError::Invalid {
                field: "uploadcare.store",
                reason: format!("{:?} is not one of {}", self.store, STORE_MODES.join(", ")),
            });
        }

        Ok(())
    }
}

impl ConfirmationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "confirmation.poll_interval_ms",
                reason: "must be greater than 0".into(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "confirmation.timeout_secs",
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

fn require_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must start with http:// or https://".into(),
        })
    }
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            wallet: WalletConfig::default(),
            uploadcare: UploadcareConfig::default(),
            confirmation: ConfirmationConfig::default(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: "~/.config/solana/id.json".to_string(),
        }
    }
}

impl Default for UploadcareConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            upload_url: "https://upload.uploadcare.com/base/".to_string(),
            cdn_base: "https://ucarecdn.com".to_string(),
            store: "auto".to_string(),
        }
    }
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 500,
            timeout_secs: 60,
        }
    }
}
