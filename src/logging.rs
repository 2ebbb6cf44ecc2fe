//! Logger setup for native and browser builds.

use crate::config::LogLevel;

/// Install the global logger at `level`.
///
/// Native builds log through `env_logger`, which still honours `RUST_LOG`
/// on top of the configured level. Calling this twice keeps the first logger.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
    if let Err(e) = result {
        log::debug!("Logger already initialized: {}", e);
    }
}

/// Install the global logger at `level`.
///
/// Browser builds log to the devtools console and route panics there too.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(level: LogLevel) {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(level.to_level()) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", e).into());
    }
}
