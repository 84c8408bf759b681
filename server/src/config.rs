use anyhow::{Context, Result, anyhow};
use engine::{GameResult, LogVerbosity, RuleSet};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::session::DEFAULT_SESSION_TTL;

#[derive(Clone, Debug)]
pub struct Config
{
    pub host: String,
    pub port: u16,
    /// Ruleset file. `None` plays with the ruleset bundled in the engine.
    pub ruleset: Option<PathBuf>,
    pub card_dir: PathBuf,
    pub verbosity: LogVerbosity,
    /// Idle time after which a game session is dropped.
    pub session_ttl: Duration,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ruleset: None,
            card_dir: PathBuf::from("web/cards"),
            verbosity: LogVerbosity::Normal,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

impl Config
{
    pub fn from_env() -> Result<Self>
    {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let port = match env::var("KINGS_CUP_PORT") {
            Ok(port) => port.parse::<u16>().with_context(|| format!("KINGS_CUP_PORT must be a number, got '{}'", port))?,
            Err(_) => defaults.port,
        };

        let verbosity = match env::var("KINGS_CUP_LOG") {
            Ok(level) => level.parse::<LogVerbosity>().map_err(|e: String| anyhow!("KINGS_CUP_LOG: {}", e))?,
            Err(_) => defaults.verbosity,
        };

        let session_ttl = match env::var("KINGS_CUP_SESSION_TTL_SECS") {
            Ok(secs) => Duration::from_secs(
                secs.parse::<u64>()
                    .with_context(|| format!("KINGS_CUP_SESSION_TTL_SECS must be a number, got '{}'", secs))?,
            ),
            Err(_) => defaults.session_ttl,
        };

        Ok(Self {
            host: env::var("KINGS_CUP_HOST").unwrap_or(defaults.host),
            port,
            ruleset: env::var("KINGS_CUP_RULESET").ok().filter(|p| !p.trim().is_empty()).map(PathBuf::from),
            card_dir: env::var("KINGS_CUP_CARD_DIR").map(PathBuf::from).unwrap_or(defaults.card_dir),
            verbosity,
            session_ttl,
        })
    }

    pub fn server_addr(&self) -> String
    {
        format!("{}:{}", self.host, self.port)
    }

    pub fn load_rules(&self) -> GameResult<RuleSet>
    {
        match &self.ruleset {
            Some(path) => RuleSet::load(path),
            None => RuleSet::builtin(),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn defaults()
    {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
        assert_eq!(config.load_rules().unwrap().len(), 13);
        assert_eq!(config.session_ttl, Duration::from_secs(86400));
    }

    #[test]
    fn missing_ruleset_file_fails_to_load()
    {
        let config = Config { ruleset: Some(PathBuf::from("/no/such/rules.txt")), ..Config::default() };
        assert!(config.load_rules().is_err());
    }
}
