use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Config {
    /// Read settings from the environment. Call after `.env` is loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = get("LEADERBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match get("LEADERBOARD_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("LEADERBOARD_PORT must be a valid port, got '{}'", raw))?,
            None => 5000,
        };
        let db_path = get("LEADERBOARD_DB_PATH")
            .unwrap_or_else(|| "leaderboard.db".into())
            .into();

        Ok(Self { host, port, db_path })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
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
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("leaderboard.db"));
        assert_eq!(config.addr().unwrap().port(), 5000);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LEADERBOARD_HOST", "127.0.0.1"),
            ("LEADERBOARD_PORT", "8080"),
            ("LEADERBOARD_DB_PATH", "/tmp/scores.db"),
        ]))
        .unwrap();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(config.db_path, PathBuf::from("/tmp/scores.db"));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("LEADERBOARD_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LEADERBOARD_PORT", "70000")])).is_err());
    }
}
