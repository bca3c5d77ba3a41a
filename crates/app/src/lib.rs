// Library exports shared by the `provision` binary and integration tests

pub mod config;
pub mod ldap;
pub mod process;
pub mod version;
pub mod webhdfs;

pub use config::{Config, ConfigError};
pub use ldap::LdapDirectory;
pub use version::BuildInfo;
pub use webhdfs::{WebHdfs, WebHdfsAuth, WebHdfsConnector, WebHdfsError};
