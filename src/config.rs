//! Connection settings for the OHA server
//!
//! Settings come from a JSON file in the user's home directory (`~/.oha`, or
//! the path given by `--config` / `OHA_CONFIG`). When that file is missing or
//! cannot be parsed, all five environment variables must be set instead:
//!
//! - `SERVER_URL` - host name of the server
//! - `SERVER_PORT` - TCP port
//! - `SERVER_API` - API route prefix, e.g. `/api`
//! - `CLIENT_USERNAME`
//! - `CLIENT_PASSWORD`
//!
//! Whichever source is used, the result is validated once and handed to the
//! command handlers as an immutable [`ConnectionConfig`].

use crate::constants::{
    CONFIG_FILE_NAME, ENV_CLIENT_PASSWORD, ENV_CLIENT_USERNAME, ENV_SERVER_API, ENV_SERVER_PORT,
    ENV_SERVER_URL, MIN_PASSWORD_LEN, MIN_USERNAME_LEN,
};
use crate::error::ConfigError;
use crate::models::Credentials;
use crate::validate;
use anyhow::Context;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::{env, fmt, fs, path::Path, path::PathBuf};
use tracing::debug;

/// On-disk shape of `~/.oha`
///
/// # Example
///
/// ```json
/// {
///   "server-url": "oha.example.com",
///   "server-port": "8443",
///   "server-api-route": "/api",
///   "client-username": "alice",
///   "client-password": "correct-horse-battery",
///   "insecure": false
/// }
/// ```
#[derive(Deserialize, Clone, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct FileConfig {
    pub server_url: String,
    pub server_port: String,
    pub server_api_route: String,
    pub client_username: String,
    pub client_password: String,
    /// Accept self-signed or otherwise invalid server certificates
    pub insecure: bool,
}

/// Validated connection descriptor, fixed for the life of the process
#[derive(Clone)]
pub struct ConnectionConfig {
    host: String,
    port: String,
    api_route: String,
    username: String,
    password: String,
    accept_invalid_certs: bool,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_route", &self.api_route)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

fn server_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^https?://[a-zA-Z0-9-]+\.[a-zA-Z0-9-]+").expect("valid server url regex")
    })
}

impl ConnectionConfig {
    /// Build and validate a connection descriptor
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when the composed URL, the port, the
    /// username or the password fails its check.
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        api_route: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let cfg = ConnectionConfig {
            host: host.into(),
            port: port.into(),
            api_route: api_route.into(),
            username: username.into(),
            password: password.into(),
            accept_invalid_certs: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !server_url_re().is_match(&self.base_url()) {
            return Err(ConfigError::Invalid("invalid server URL".into()));
        }
        if !validate::is_number(&self.port) {
            return Err(ConfigError::Invalid("invalid server port".into()));
        }
        let starts_alnum = self
            .username
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());
        if self.username.chars().count() < MIN_USERNAME_LEN || !starts_alnum {
            return Err(ConfigError::Invalid(format!(
                "Invalid username. Expected at least {MIN_USERNAME_LEN} characters starting with a letter or digit. Got: {}",
                self.username
            )));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ConfigError::Invalid(format!(
                "passwords must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        Ok(())
    }

    /// `https://{host}:{port}{api_route}`; request paths are appended verbatim
    pub fn base_url(&self) -> String {
        format!("https://{}:{}{}", self.host, self.port, self.api_route)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn api_route(&self) -> &str {
        &self.api_route
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn accept_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn credentials(&self) -> Credentials<'_> {
        Credentials {
            username: &self.username,
            password: &self.password,
        }
    }
}

impl TryFrom<FileConfig> for ConnectionConfig {
    type Error = ConfigError;

    fn try_from(raw: FileConfig) -> Result<Self, Self::Error> {
        Ok(ConnectionConfig::new(
            raw.server_url,
            raw.server_port,
            raw.server_api_route,
            raw.client_username,
            raw.client_password,
        )?
        .with_accept_invalid_certs(raw.insecure))
    }
}

/// `~/.oha`, or `./.oha` when no home directory can be determined
pub fn default_config_path() -> PathBuf {
    let mut p = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    p.push(CONFIG_FILE_NAME);
    p
}

pub fn read_config_file(path: &Path) -> anyhow::Result<FileConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let cfg: FileConfig = serde_json::from_str(&data)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(cfg)
}

/// Collect the five connection variables; empty values count as unset
pub fn config_from_env<F>(lookup: F) -> Result<FileConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let names = [
        ENV_SERVER_URL,
        ENV_SERVER_PORT,
        ENV_SERVER_API,
        ENV_CLIENT_USERNAME,
        ENV_CLIENT_PASSWORD,
    ];
    let missing: Vec<&str> = names.into_iter().filter(|&n| get(n).is_none()).collect();
    if !missing.is_empty() {
        return Err(ConfigError::NotConfigured {
            missing: missing.join(", "),
        });
    }
    Ok(FileConfig {
        server_url: get(ENV_SERVER_URL).unwrap_or_default(),
        server_port: get(ENV_SERVER_PORT).unwrap_or_default(),
        server_api_route: get(ENV_SERVER_API).unwrap_or_default(),
        client_username: get(ENV_CLIENT_USERNAME).unwrap_or_default(),
        client_password: get(ENV_CLIENT_PASSWORD).unwrap_or_default(),
        insecure: false,
    })
}

/// Resolve the connection settings from `path`, falling back to the process
/// environment
pub fn load(path: &Path) -> Result<ConnectionConfig, ConfigError> {
    load_with_env(path, |name| env::var(name).ok())
}

/// Same as [`load`] with an injectable environment lookup
pub fn load_with_env<F>(path: &Path, lookup: F) -> Result<ConnectionConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match read_config_file(path) {
        Ok(cfg) => {
            debug!(path = %path.display(), "loaded config file");
            cfg
        }
        Err(err) => {
            debug!(error = %format!("{err:#}"), "config file unusable, reading environment");
            config_from_env(lookup)?
        }
    };
    ConnectionConfig::try_from(raw)
}
