use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::auth::AdminList;
use crate::error::{Error, Result};

pub const DEFAULT_PAYPAL_API_BASE: &str = "https://api-m.paypal.com";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Emails that bypass token accounting.
    pub admin_emails: Vec<String>,
    /// Browser origins allowed to call the API with credentials.
    pub allowed_origins: Vec<String>,
    pub identity: IdentityConfig,
    pub paypal: PayPalConfig,
}

/// Connection details for the external users/session service.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: String,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base: String,
    pub currency: String,
}

impl Default for PayPalConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base: DEFAULT_PAYPAL_API_BASE.to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .finish()
    }
}

impl fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("api_base", &self.api_base)
            .field("currency", &self.currency)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("calcmeter.db")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[must_use]
    pub fn admin_list(&self) -> AdminList {
        AdminList::new(&self.admin_emails)
    }

    /// Checks that every secret needed to serve requests is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("identity.api_url", &self.identity.api_url),
            ("identity.api_key", &self.identity.api_key),
            ("paypal.client_id", &self.paypal.client_id),
            ("paypal.client_secret", &self.paypal.client_secret),
            ("paypal.api_base", &self.paypal.api_base),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            admin_emails: Vec::new(),
            allowed_origins: Vec::new(),
            identity: IdentityConfig::default(),
            paypal: PayPalConfig::default(),
        }
    }
}
