//! Environment configuration.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `APP_NAME` | `waypost` | Shown in startup and shutdown logs. |
//! | `APP_HOST` | `0.0.0.0` | Listen address. |
//! | `APP_PORT` | `3000` | Listen port. |
//! | `APP_DEBUG` | `off` | `on` lowers the default log level to `debug`. |
//! | `LOG_FORMAT` | `full` | `full`, `compact` or `json`. |
//!
//! `RUST_LOG`, when set, overrides the level derived from `APP_DEBUG`.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::error::Error;

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" | "default" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(Error::Config {
                key: "LOG_FORMAT",
                message: format!("expected full, compact or json, got `{other}`"),
            }),
        }
    }
}

/// Process configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub name: String,
    pub addr: SocketAddr,
    pub debug: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "waypost".to_owned(),
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            debug: false,
            log_format: LogFormat::Full,
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let name = lookup("APP_NAME").unwrap_or(defaults.name);

        let host = match lookup("APP_HOST") {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| Error::Config {
                key: "APP_HOST",
                message: format!("`{raw}`: {e}"),
            })?,
            None => defaults.addr.ip(),
        };

        let port = match lookup("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| Error::Config {
                key: "APP_PORT",
                message: format!("`{raw}`: {e}"),
            })?,
            None => defaults.addr.port(),
        };

        let debug = match lookup("APP_DEBUG").as_deref().map(str::to_ascii_lowercase) {
            None => defaults.debug,
            Some(flag) => match flag.as_str() {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" | "" => false,
                other => {
                    return Err(Error::Config {
                        key: "APP_DEBUG",
                        message: format!("expected on or off, got `{other}`"),
                    });
                }
            },
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            name,
            addr: SocketAddr::new(host, port),
            debug,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.name, "waypost");
        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert!(!config.debug);
        assert_eq!(config.log_format, LogFormat::Full);
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("APP_NAME", "shop"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8080"),
            ("APP_DEBUG", "on"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert!(config.debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("APP_PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "APP_PORT", .. }));

        let err = Config::from_lookup(lookup(&[("APP_DEBUG", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "APP_DEBUG", .. }));

        let err = Config::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "LOG_FORMAT", .. }));

        let err = Config::from_lookup(lookup(&[("APP_HOST", "localhost")])).unwrap_err();
        assert!(matches!(err, Error::Config { key: "APP_HOST", .. }));
    }
}
