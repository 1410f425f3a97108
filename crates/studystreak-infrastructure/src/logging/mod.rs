//! Logging bootstrap.
//!
//! Records go to `<log_dir>/studystreak.log.<date>` as one-line JSON
//! (timestamp, level, target, thread id, source location, fields). A
//! readable console layer on stderr is added in debug builds or on request;
//! stdout is left to command output.
//!
//! The default filter is `info,studystreak=debug`; `RUST_LOG` wins.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "studystreak.log";
const DEFAULT_FILTER: &str = "info,studystreak=debug,studystreak_lib=debug";
const FILE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";
const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Install the global subscriber. Calling it again is a no-op.
pub fn init_logger(log_dir: &Path, console: bool) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));
    // dropping the guard would lose buffered records
    let _ = FILE_GUARD.set(guard);

    let console = console || cfg!(debug_assertions);
    let mut layers = vec![json_file_layer(writer)];
    if console {
        layers.push(console_layer());
    }
    let subscriber = Registry::default().with(layers);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;
    let _ = LOGGER_READY.set(());

    tracing::info!(
        target: "studystreak::logging",
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        console,
        "Logger initialized"
    );

    Ok(())
}

fn json_file_layer(writer: NonBlocking) -> BoxedLayer {
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(writer)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_timer(ChronoLocal::new(FILE_TIME_FORMAT.to_string()))
        .with_filter(filter())
        .boxed()
}

fn console_layer() -> BoxedLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_timer(ChronoLocal::new(CONSOLE_TIME_FORMAT.to_string()))
        .with_filter(filter())
        .boxed()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
