use std::{env, str::FromStr, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is set to {value:?}, which is not a valid value")]
    Invalid { name: &'static str, value: String },
    #[error("WINDOW_SIZE must be at least 1")]
    EmptyWindow,
}

/// Settings read once at startup. Nothing changes them afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub window_size: usize,
    /// The type code is appended to this to form the request URL.
    pub source_url: String,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            window_size: 10,
            source_url: "http://20.244.56.144/test/".to_string(),
            fetch_timeout: Duration::from_millis(500),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let config = Config {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            window_size: parse(&lookup, "WINDOW_SIZE")?.unwrap_or(defaults.window_size),
            source_url: lookup("NUMBER_SOURCE_URL").unwrap_or(defaults.source_url),
            fetch_timeout: parse(&lookup, "FETCH_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.fetch_timeout),
        };
        if config.window_size == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        Ok(config)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_match_the_reference_setup() {
        let config = load(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.window_size, 10);
        assert_eq!(config.fetch_timeout, Duration::from_millis(500));
        assert_eq!(config.source_url, "http://20.244.56.144/test/");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = load(&[
            ("PORT", "8080"),
            ("WINDOW_SIZE", "3"),
            ("FETCH_TIMEOUT_MS", "250"),
            ("NUMBER_SOURCE_URL", "http://localhost:9000/numbers/"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.window_size, 3);
        assert_eq!(config.fetch_timeout, Duration::from_millis(250));
        assert_eq!(config.source_url, "http://localhost:9000/numbers/");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            load(&[("PORT", "three thousand")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(matches!(
            load(&[("WINDOW_SIZE", "0")]),
            Err(ConfigError::EmptyWindow)
        ));
    }
}
