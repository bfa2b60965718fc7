//! Log subscriber setup.
//!
//! Library code only emits `tracing` events. Binaries call [`init`] (directly
//! or through [`setup_app`](crate::setup_app)) to print them.

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::settings::LoggingSettings;

/// Installs a compact fmt subscriber. `RUST_LOG` overrides the configured
/// level. An already installed global subscriber is left in place.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(settings.ansi)
        .with_target(false)
        .compact()
        .try_init();
    if let Err(e) = installed {
        debug!("log subscriber not installed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(level: &str) -> LoggingSettings {
        LoggingSettings { level: level.to_owned(), ansi: false }
    }

    #[test]
    fn repeated_init_is_harmless() {
        init(&settings("debug"));
        init(&settings("info"));
        tracing::info!("still logging");
    }

    #[test]
    fn unparsable_level_falls_back() {
        init(&settings("not a [valid] directive"));
    }
}
