//! Logger initialization.
//!
//! Everything logs through the `log` facade. Native builds use `env_logger`;
//! in the browser records go to the devtools console.

use std::sync::Once;

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax natively (e.g.
/// "dweet_embed=debug"). In the browser only a bare level ("debug",
/// "warn", ...) is understood.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

static INIT: Once = Once::new();

/// Installs the global logger once; later calls are ignored.
pub fn init(config: LoggingConfig) {
    INIT.call_once(|| {
        install(config);
        log::debug!("logging initialized");
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn install(config: LoggingConfig) {
    let mut builder = env_logger::Builder::new();
    if let Some(filter) = config.filter {
        builder.parse_filters(&filter);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    // A test harness may have installed a logger already.
    let _ = builder.try_init();
}

#[cfg(target_arch = "wasm32")]
fn install(config: LoggingConfig) {
    let level = config
        .filter
        .as_deref()
        .and_then(|f| f.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);
    if log::set_logger(&console::ConsoleLogger).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Metadata, Record};
    use wasm_bindgen::JsValue;

    pub struct ConsoleLogger;

    impl log::Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }
}
