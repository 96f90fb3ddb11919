//! Logging bootstrap.
//!
//! # Responsibility
//! - Install the crate's `log` backend exactly once per module instance.
//! - Route records to the browser console on `wasm32` and to stderr
//!   elsewhere, so native tests and tools see the same event lines.
//!
//! # Invariants
//! - Initialization never panics.
//! - Calling `init_logging` again only changes the maximum level.
//! - Unknown level strings are rejected before anything is installed.

use log::{LevelFilter, Log, Metadata, Record};
use once_cell::sync::OnceCell;

use crate::error::{GraphError, GraphResult};

static LOGGER: ConsoleLogger = ConsoleLogger;
static INSTALLED: OnceCell<()> = OnceCell::new();

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.level(), record.args());
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: log::Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(line);
    match level {
        log::Level::Error => console::error_1(&value),
        log::Level::Warn => console::warn_1(&value),
        log::Level::Info => console::info_1(&value),
        log::Level::Debug | log::Level::Trace => console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: log::Level, line: &str) {
    eprintln!("{line}");
}

/// Parse a level name (`trace`..`error`, or `off`), case-insensitively.
///
/// # Errors
/// - Returns `UnknownLogLevel` for anything else.
pub fn parse_level(level: &str) -> GraphResult<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        _ => Err(GraphError::UnknownLogLevel(level.to_owned())),
    }
}

/// Install the console logger at `level`.
///
/// # Errors
/// - Returns `UnknownLogLevel` when `level` is unsupported.
pub fn init_logging(level: &str) -> GraphResult<()> {
    let filter = parse_level(level)?;

    INSTALLED.get_or_init(|| {
        // another backend may already own the facade (e.g. a host test
        // harness); records then go there and only the level applies
        let _ = log::set_logger(&LOGGER);
    });
    log::set_max_level(filter);

    log::info!(
        "event=logging_init module=logging status=ok level={} version={}",
        filter,
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
