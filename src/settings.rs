//! Application settings and process setup.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`restish.toml` unless told otherwise)
//! 3. `RESTISH_*` environment variables, `__` separating sections
//!    (`RESTISH_SERVER__PORT=9000`)
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//! prefix = "/api"
//!
//! [logging]
//! level = "debug"
//! ```

use std::net::SocketAddr;

use serde::Deserialize;
use tracing::info;

use crate::error::Error;

pub const DEFAULT_FILE: &str = "restish.toml";
const ENV_PREFIX: &str = "RESTISH";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Path prefix the application is mounted under; empty for the root.
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub ansi: bool,
}

impl Settings {
    /// Loads [`DEFAULT_FILE`] (if present) plus environment overrides.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(DEFAULT_FILE)
    }

    /// Loads settings from `path`. A missing file is not an error; a malformed
    /// one is.
    pub fn load_from(path: &str) -> Result<Self, Error> {
        Self::load_layered(path, ::config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_layered(path: &str, env: ::config::Environment) -> Result<Self, Error> {
        let settings = ::config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.prefix", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.ansi", true)?
            .add_source(::config::File::with_name(path).required(false))
            .add_source(env.prefix_separator("_").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| Error::Address { addr, source })
    }
}

/// Prepares the process to serve: installs the log subscriber and records
/// the effective settings. Safe to call more than once.
pub fn setup_app(settings: &Settings) {
    crate::logging::init(&settings.logging);
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        prefix = %settings.server.prefix,
        "application settings loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("restish-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_file() {
        let settings = Settings::load_from("/nonexistent/restish-settings").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.prefix, "");
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn file_overrides_defaults() {
        let path = write_temp("override", "[server]\nport = 3000\nprefix = \"/api\"\n");
        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.prefix, "/api");
        assert_eq!(settings.server.host, "127.0.0.1");
    }

    fn environment(vars: &[(&str, &str)]) -> ::config::Environment {
        let vars = vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        ::config::Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let path = write_temp("env", "[server]\nport = 3000\n[logging]\nansi = true\n");
        let env = environment(&[
            ("RESTISH_SERVER__PORT", "9001"),
            ("RESTISH_LOGGING__ANSI", "false"),
            ("RESTISH_SERVER__PREFIX", "/v1"),
            ("OTHER_SERVER__PORT", "1"),
        ]);
        let settings = Settings::load_layered(path.to_str().unwrap(), env).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.server.port, 9001);
        assert!(!settings.logging.ansi);
        assert_eq!(settings.server.prefix, "/v1");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn unparsable_environment_value_is_an_error() {
        let env = environment(&[("RESTISH_SERVER__PORT", "eighty")]);
        let result = Settings::load_layered("/nonexistent/restish-settings", env);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = write_temp("malformed", "[server\nport = ");
        let result = Settings::load_from(path.to_str().unwrap());
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn bad_host_is_reported() {
        let mut settings = Settings::load_from("/nonexistent/restish-settings").unwrap();
        settings.server.host = "not a host".into();
        assert!(matches!(settings.socket_addr(), Err(Error::Address { .. })));
    }
}
