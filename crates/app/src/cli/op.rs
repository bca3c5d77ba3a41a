use std::error::Error;
use std::path::PathBuf;

use dfs_provision::config::{Config, ConfigError};

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Configuration file every operation reads from
    pub config_path: PathBuf,
}

impl OpContext {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn load_config(&self) -> Result<Config, ConfigError> {
        Config::load(&self.config_path)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

/// Builds the clap `Command` enum plus its `OpOutput` and `OpError`
/// wrappers from `(Variant, "name", OpType)` triples. `OpError` names the
/// subcommand that failed so the top-level report reads `run: ...`.
#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $name:literal, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $(
                #[command(name = $name)]
                $variant($type),
            )*
        }

        impl Command {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Command::$variant(_) => $name,)*
                }
            }
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug)]
        pub enum OpError {
            $($variant(<$type as $crate::cli::op::Op>::Error),)*
        }

        impl OpError {
            /// Subcommand whose execution produced this error
            pub fn command(&self) -> &'static str {
                match self {
                    $(OpError::$variant(_) => $name,)*
                }
            }
        }

        impl std::fmt::Display for OpError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(OpError::$variant(err) => write!(f, "{}: {}", $name, err),)*
                }
            }
        }

        impl std::error::Error for OpError {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                match self {
                    $(OpError::$variant(err) => Some(err),)*
                }
            }
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                tracing::debug!(command = self.name(), "executing");
                match self {
                    $(
                        Command::$variant(op) => op
                            .execute(ctx)
                            .await
                            .map(OpOutput::$variant)
                            .map_err(OpError::$variant),
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(OpOutput::$variant(output) => write!(f, "{}", output),)*
                }
            }
        }
    };
}
