use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://nihaoya.com/upload";
pub const DEFAULT_FIELD_NAME: &str = "photo";

/// Runtime configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Multipart POST target (default: the image host's `/upload`)
    pub endpoint: String,

    /// Form field carrying the file bytes (default: "photo")
    pub field_name: String,

    /// Bytes per streamed body chunk; one progress event per chunk (default: 64 KiB)
    pub chunk_size: usize,

    /// Per-request timeout; `None` keeps the HTTP client default
    pub timeout: Option<Duration>,

    /// How long a toast stays on screen (default: 3 s)
    pub toast_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            chunk_size: 64 * 1024,
            timeout: None,
            toast_duration: Duration::from_secs(3),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();

        let chunk_size = match lookup("UPLOAD_CHUNK_SIZE") {
            Some(value) => match parse::<usize>("UPLOAD_CHUNK_SIZE", &value)? {
                0 => {
                    return Err(ConfigError::InvalidValue {
                        key: "UPLOAD_CHUNK_SIZE",
                        value,
                    })
                }
                size => size,
            },
            None => default.chunk_size,
        };

        Ok(Self {
            endpoint: lookup("UPLOAD_ENDPOINT").unwrap_or(default.endpoint),
            field_name: lookup("UPLOAD_FIELD_NAME").unwrap_or(default.field_name),
            chunk_size,
            timeout: lookup("UPLOAD_TIMEOUT_SECS")
                .map(|v| parse::<u64>("UPLOAD_TIMEOUT_SECS", &v).map(Duration::from_secs))
                .transpose()?,
            toast_duration: lookup("TOAST_SECS")
                .map(|v| parse::<u64>("TOAST_SECS", &v).map(Duration::from_secs))
                .transpose()?
                .unwrap_or(default.toast_duration),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.field_name, "photo");
        assert_eq!(config.chunk_size, 64 * 1024);
        assert!(config.timeout.is_none());
        assert_eq!(config.toast_duration, Duration::from_secs(3));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("UPLOAD_ENDPOINT", "http://localhost:8080/upload"),
            ("UPLOAD_FIELD_NAME", "image"),
            ("UPLOAD_CHUNK_SIZE", "1024"),
            ("UPLOAD_TIMEOUT_SECS", " 30 "),
            ("TOAST_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/upload");
        assert_eq!(config.field_name, "image");
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.toast_duration, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("UPLOAD_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "UPLOAD_TIMEOUT_SECS", .. }
        ));

        let err = Config::from_lookup(lookup(&[("UPLOAD_CHUNK_SIZE", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "UPLOAD_CHUNK_SIZE", .. }
        ));
    }
}
