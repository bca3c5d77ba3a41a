use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "etc/configuration.toml";

const DEFAULT_SERVICE_USER: &str = "hdfs";
const DEFAULT_SERVICE_GROUP: &str = "hadoop";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub ldap: LdapConfig,
    pub hdfs: HdfsConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Connection and query parameters for the directory service
#[derive(Clone, Deserialize)]
pub struct LdapConfig {
    /// e.g. `ldap://ldap.example.com:389` or `ldaps://...`
    pub url: String,
    /// DN to simple-bind as
    pub bind_dn: String,
    pub password: String,
    /// Search filter selecting the users to provision
    pub filter: String,
    /// DN the subtree search is rooted at
    pub search_base: String,
}

impl fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapConfig")
            .field("url", &self.url)
            .field("bind_dn", &self.bind_dn)
            .field("password", &"<redacted>")
            .field("filter", &self.filter)
            .field("search_base", &self.search_base)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HdfsConfig {
    /// WebHDFS endpoint of the namenode, e.g. `http://namenode:9870`
    pub namenode: Url,
    /// Service principal the job runs as
    pub principal: String,
    /// Keytab backing `principal`. Ticket acquisition happens outside this
    /// process; the path is only reported.
    #[serde(default)]
    pub keytab: Option<PathBuf>,
    #[serde(default)]
    pub auth: HdfsAuth,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HdfsConfig {
    /// Short name of the principal: `hdfs/nn.example.com@EXAMPLE.COM` -> `hdfs`
    pub fn principal_short_name(&self) -> &str {
        self.principal
            .split(['/', '@'])
            .next()
            .unwrap_or(&self.principal)
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// How requests authenticate to WebHDFS.
#[derive(Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HdfsAuth {
    /// Pseudo authentication via `user.name`; defaults to the principal's
    /// short name
    #[default]
    Simple,
    /// Pseudo authentication as an explicit user
    SimpleAs { user: String },
    /// A delegation token obtained out of band (e.g. after `kinit -kt`)
    Delegation { token: String },
}

impl fmt::Debug for HdfsAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdfsAuth::Simple => f.write_str("Simple"),
            HdfsAuth::SimpleAs { user } => f.debug_struct("SimpleAs").field("user", user).finish(),
            HdfsAuth::Delegation { .. } => f.write_str("Delegation(<redacted>)"),
        }
    }
}

/// Identity owning the shared root and grouping every user resource
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_service_user")]
    pub service_user: String,
    #[serde(default = "default_service_group")]
    pub service_group: String,
}

fn default_service_user() -> String {
    DEFAULT_SERVICE_USER.to_string()
}

fn default_service_group() -> String {
    DEFAULT_SERVICE_GROUP.to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            service_user: default_service_user(),
            service_group: default_service_group(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default level, overridable through `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, also write a daily rolling log file here
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn level(&self) -> Result<tracing::Level, ConfigError> {
        tracing::Level::from_str(&self.level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.level)))
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl Config {
    /// Read, parse and validate the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        raw.parse()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("ldap.url", &self.ldap.url),
            ("ldap.bind_dn", &self.ldap.bind_dn),
            ("ldap.filter", &self.ldap.filter),
            ("ldap.search_base", &self.ldap.search_base),
            ("hdfs.principal", &self.hdfs.principal),
            ("identity.service_user", &self.identity.service_user),
            ("identity.service_group", &self.identity.service_group),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", key)));
            }
        }

        match self.hdfs.namenode.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "hdfs.namenode must be an http(s) URL, got scheme '{}'",
                    other
                )))
            }
        }

        if let HdfsAuth::Delegation { token } = &self.hdfs.auth {
            if token.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "hdfs.auth.token must not be empty".to_string(),
                ));
            }
        }

        self.log.level()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
