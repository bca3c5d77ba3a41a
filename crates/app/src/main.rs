// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Run, Users, Version};

command_enum! {
    (Run, "run", Run),
    (Users, "users", Users),
    (Version, "version", Version),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    let ctx = cli::op::OpContext::new(args.config);

    match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use dfs_provision::config::ConfigError;

    use super::*;
    use crate::cli::ops::users::UsersError;

    #[test]
    fn test_subcommands_parse_under_their_names() {
        let args = Args::try_parse_from(["provision", "--config", "site.toml", "users"]).unwrap();
        assert_eq!(args.command.name(), "users");
        assert_eq!(args.config, PathBuf::from("site.toml"));

        let args = Args::try_parse_from(["provision", "run"]).unwrap();
        assert_eq!(args.command.name(), "run");
        assert_eq!(
            args.config,
            PathBuf::from(dfs_provision::config::DEFAULT_CONFIG_PATH)
        );
    }

    #[test]
    fn test_op_error_names_failing_command() {
        let err = OpError::Users(UsersError::Config(ConfigError::NotFound(PathBuf::from(
            "missing.toml",
        ))));
        assert_eq!(err.command(), "users");
        assert_eq!(
            err.to_string(),
            "users: configuration file not found: missing.toml"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn test_version_never_fails() {
        let ctx = cli::op::OpContext::new(PathBuf::from("unused.toml"));
        let output = Command::Version(Version).execute(&ctx).await.unwrap();
        assert!(output.to_string().starts_with("provision "));
    }
}
