//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; defaults to `info` when it is unset. Calling this more
/// than once is harmless.
pub fn init() {
    init_with_default("info");
}

/// Initialize logging with `filter` used when `RUST_LOG` is unset
pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .try_init();
}
