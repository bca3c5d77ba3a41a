use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LogConfig;
use crate::version::BuildInfo;

const LOG_FILE_NAME: &str = "provision.log";

/// Install the global subscriber: compact stdout, plus a daily rolling file
/// when `config.dir` is set. `RUST_LOG` overrides `level`.
///
/// The returned guards flush buffered output when dropped; hold them until
/// the process exits.
pub fn init_logging(config: &LogConfig, level: tracing::Level) -> Vec<WorkerGuard> {
    let mut guards = Vec::new();

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(env_filter(level));

    if let Some(log_dir) = &config.dir {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
        }

        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guards.push(file_guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_filter(env_filter(level));

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(stdout_layer).init();
    }

    register_panic_logger();
    report_build_info();

    guards
}

/// Install a compact stderr-only subscriber, for commands whose stdout is
/// data. Warnings (such as skipped directory entries) stay visible without
/// mixing into the listing.
pub fn init_stderr_logging(level: tracing::Level) -> WorkerGuard {
    let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(stderr_writer)
                .with_filter(env_filter(level)),
        )
        .init();

    register_panic_logger();
    stderr_guard
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Registers a panic hook that logs panics using the `tracing` crate
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}

pub fn report_build_info() {
    let build = BuildInfo::current();

    tracing::info!(
        version = build.version,
        build_profile = build.build_profile,
        target = build.target,
        "provisioning job starting"
    );
}
