use std::time::Instant;

use clap::Args;

use common::prelude::{run, ProvisionError, ReconcileReport, Reconciler};
use dfs_provision::config::ConfigError;
use dfs_provision::ldap::LdapDirectory;
use dfs_provision::process::init_logging;
use dfs_provision::webhdfs::{WebHdfsConnector, WebHdfsError};

/// Reconcile the filesystem with the directory once, then exit.
#[derive(Args, Debug, Clone)]
pub struct Run;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid filesystem endpoint: {0}")]
    WebHdfs(#[from] WebHdfsError),
    #[error("provisioning failed: {0}")]
    Provision(#[from] ProvisionError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Run {
    type Error = RunError;
    type Output = ReconcileReport;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = ctx.load_config()?;
        let level = config.log.level()?;
        let _guards = init_logging(&config.log, level);

        tracing::info!(
            config = %ctx.config_path.display(),
            principal = %config.hdfs.principal,
            keytab = ?config.hdfs.keytab,
            namenode = %config.hdfs.namenode,
            "running as service principal"
        );

        let started = Instant::now();
        let directory = LdapDirectory::new(config.ldap.clone());
        let connector = WebHdfsConnector::from_config(&config.hdfs)?;
        let reconciler = Reconciler::new(
            config.identity.service_user.clone(),
            config.identity.service_group.clone(),
        );

        match run(&directory, &connector, &reconciler).await {
            Ok(report) => {
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "{}",
                    report
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(phase = e.phase(), error = %e, "provisioning failed");
                Err(e.into())
            }
        }
    }
}
