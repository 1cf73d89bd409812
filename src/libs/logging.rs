//! Tracing subscriber setup for the binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `JORNADA_DEBUG` switches the crate to
/// debug level and the default only shows warnings such as data anomalies.
pub fn init() {
    let default_directive = if std::env::var("JORNADA_DEBUG").is_ok() {
        "jornada=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded or under tests
    let _ = fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).try_init();
}
