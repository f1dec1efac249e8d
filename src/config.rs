use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest count a single request may ask for.
    pub max_count: usize,
    /// Largest number of trials a single comparison may run.
    pub max_trials: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            max_count: 20_000,
            max_trials: 10,
        }
    }
}

impl ServerConfig {
    /// Reads the `CPRIMES_*` variables, falling back to the defaults for
    /// unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("CPRIMES_HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "CPRIMES_PORT")?.unwrap_or(defaults.port),
            max_count: parse(&lookup, "CPRIMES_MAX_COUNT")?.unwrap_or(defaults.max_count),
            max_trials: parse(&lookup, "CPRIMES_MAX_TRIALS")?.unwrap_or(defaults.max_trials),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {key}: {raw:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("CPRIMES_HOST", "127.0.0.1"),
            ("CPRIMES_PORT", "8081"),
            ("CPRIMES_MAX_COUNT", " 500 "),
            ("CPRIMES_MAX_TRIALS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8081");
        assert_eq!(config.max_count, 500);
        assert_eq!(config.max_trials, 3);
    }

    #[test]
    fn bad_port_names_the_variable() {
        let err = ServerConfig::from_lookup(lookup(&[("CPRIMES_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("CPRIMES_PORT"));
    }
}
