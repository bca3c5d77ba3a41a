pub use clap::Parser;

use std::path::PathBuf;

use dfs_provision::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "provision")]
#[command(about = "Provision HDFS home directories and S3 credentials for directory users")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: crate::Command,
}
