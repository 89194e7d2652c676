//! ---
//! tmon_section: "01-core-functionality"
//! tmon_subsection: "module"
//! tmon_type: "source"
//! tmon_scope: "code"
//! tmon_description: "Shared primitives and utilities for the monitor runtime."
//! tmon_version: "v0.1.0"
//! tmon_owner: "tbd"
//! ---
use std::io::IsTerminal;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "TMON_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Keeps the background log writers alive. Dropping it flushes buffered lines,
/// so hold it until the process is about to exit.
#[must_use = "dropping the guard stops log output"]
#[derive(Debug)]
pub struct LoggingGuard {
    _console: WorkerGuard,
    _file: WorkerGuard,
}

/// Console rendering for the daemon. The rolling file is always JSON.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    StructuredJson,
    #[default]
    Pretty,
}

/// Install the global subscriber for `service_name`.
///
/// Console events go to stderr so stdout stays reserved for command output;
/// colour is only used when stderr is a terminal. Every event is also appended
/// as JSON to a daily file `<prefix>.log` under `config.directory`.
///
/// The filter comes from `TMON_LOG`, then `RUST_LOG`, then `info`. Calling this
/// twice keeps the first subscriber.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "unable to create log directory {}",
            config.directory.display()
        )
    })?;

    let (console, console_guard) = console_layer(config.format);
    let (file, file_guard) = file_layer(config, service_name);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console)
        .with(file)
        .try_init()
        .ok();

    info!(
        service = %service_name,
        log_file = %config.directory.join(log_file_name(config, service_name)).display(),
        format = ?config.format,
        "tracing initialised"
    );
    Ok(LoggingGuard {
        _console: console_guard,
        _file: file_guard,
    })
}

fn console_layer<S>(format: LogFormat) -> (BoxedLayer<S>, WorkerGuard)
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let stderr = std::io::stderr();
    let ansi = stderr.is_terminal();
    let (writer, guard) = tracing_appender::non_blocking(stderr);
    let layer = match format {
        LogFormat::StructuredJson => fmt::layer()
            .with_writer(writer)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(false)
            .with_ansi(false)
            .json()
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_ansi(ansi)
            .boxed(),
    };
    (layer, guard)
}

fn file_layer<S>(config: &LoggingConfig, service_name: &str) -> (BoxedLayer<S>, WorkerGuard)
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = daily(&config.directory, log_file_name(config, service_name));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_ansi(false)
        .json()
        .boxed();
    (layer, guard)
}

/// `<file_prefix>.log`, falling back to the service name.
pub fn log_file_name(config: &LoggingConfig, service_name: &str) -> String {
    let prefix = config.file_prefix.as_deref().unwrap_or(service_name);
    format!("{}.log", prefix)
}

fn env_filter() -> EnvFilter {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("ignoring {}={:?}: {}", LOG_ENV, directive, err);
        EnvFilter::new(DEFAULT_DIRECTIVE)
    })
}
