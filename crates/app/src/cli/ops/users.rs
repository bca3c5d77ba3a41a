use clap::Args;

use common::prelude::{DirectoryError, DirectorySource};
use dfs_provision::config::ConfigError;
use dfs_provision::ldap::LdapDirectory;
use dfs_provision::process::init_stderr_logging;

/// Print the user identifiers the directory would provision, without
/// touching the filesystem. Entries whose uid is unusable are reported on
/// stderr.
#[derive(Args, Debug, Clone)]
pub struct Users;

#[derive(Debug, thiserror::Error)]
pub enum UsersError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Users {
    type Error = UsersError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ctx.load_config()?;
        let _guard = init_stderr_logging(config.log.level()?);

        let directory = LdapDirectory::new(config.ldap);
        let users = directory.fetch_users().await?;
        tracing::info!(count = users.len(), "found users");

        let listing: Vec<&str> = users.iter().map(|user| user.as_str()).collect();
        Ok(listing.join("\n"))
    }
}
