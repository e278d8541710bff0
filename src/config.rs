//! Process configuration read from the environment (and an optional `.env`).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, ProofOfWork};
use crate::error::ConfigError;
use crate::ledger::{DEFAULT_PEER_CONCURRENCY, DEFAULT_PEER_TIMEOUT, LedgerConfig, new_node_id};

/// Highest meaningful difficulty: a SHA-256 digest has 64 hex characters.
const MAX_DIFFICULTY: u32 = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ledger: LedgerConfig,
}

impl Config {
    /// Read `HOST`, `PORT`, `NODE_ID`, `POW_DIFFICULTY`, `POW_MAX_ATTEMPTS`,
    /// `PEER_TIMEOUT_MS` and `PEER_CONCURRENCY`. Unset variables fall back to
    /// defaults; set but invalid ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_var(&lookup, "PORT")?.unwrap_or(5000);
        let node_id = match lookup("NODE_ID") {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => new_node_id(),
        };

        let difficulty = parse_var(&lookup, "POW_DIFFICULTY")?.unwrap_or(DEFAULT_DIFFICULTY);
        if difficulty > MAX_DIFFICULTY {
            return Err(invalid("POW_DIFFICULTY", difficulty, "must be at most 64"));
        }
        let max_attempts = parse_var(&lookup, "POW_MAX_ATTEMPTS")?;

        let peer_timeout = match parse_var::<u64, _>(&lookup, "PEER_TIMEOUT_MS")? {
            Some(0) => return Err(invalid("PEER_TIMEOUT_MS", 0, "must be positive")),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_PEER_TIMEOUT,
        };
        let peer_concurrency = match parse_var::<usize, _>(&lookup, "PEER_CONCURRENCY")? {
            Some(0) => return Err(invalid("PEER_CONCURRENCY", 0, "must be positive")),
            Some(n) => n,
            None => DEFAULT_PEER_CONCURRENCY,
        };

        Ok(Self {
            host,
            port,
            ledger: LedgerConfig {
                node_id,
                pow: ProofOfWork {
                    difficulty,
                    max_attempts,
                },
                peer_timeout,
                peer_concurrency,
            },
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::Invalid {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::ConfigError;
    use std::collections::HashMap;
    use std::time::Duration;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.ledger.pow.difficulty, 4);
        assert_eq!(cfg.ledger.pow.max_attempts, None);
        assert_eq!(cfg.ledger.peer_timeout, Duration::from_secs(3));
        assert_eq!(cfg.ledger.peer_concurrency, 8);
        assert_eq!(cfg.ledger.node_id.len(), 32);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5001"),
            ("NODE_ID", "node-a"),
            ("POW_DIFFICULTY", "2"),
            ("POW_MAX_ATTEMPTS", "1000"),
            ("PEER_TIMEOUT_MS", "250"),
            ("PEER_CONCURRENCY", "2"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5001);
        assert_eq!(cfg.ledger.node_id, "node-a");
        assert_eq!(cfg.ledger.pow.difficulty, 2);
        assert_eq!(cfg.ledger.pow.max_attempts, Some(1000));
        assert_eq!(cfg.ledger.peer_timeout, Duration::from_millis(250));
        assert_eq!(cfg.ledger.peer_concurrency, 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("PORT", "http")]).is_err());
        assert!(load(&[("POW_DIFFICULTY", "65")]).is_err());
        assert!(load(&[("PEER_TIMEOUT_MS", "0")]).is_err());
        assert!(load(&[("PEER_CONCURRENCY", "0")]).is_err());
        assert!(load(&[("POW_MAX_ATTEMPTS", "-1")]).is_err());
    }
}
