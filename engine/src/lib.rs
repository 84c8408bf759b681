use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[repr(u8)]
#[derive(Debug, Copy, Eq, Ord, Clone, PartialEq, PartialOrd)]
pub enum LogVerbosity
{
    Error = 0,
    Warning = 1,
    Normal = 2,
    Verbose = 3,
    VeryVerbose = 4,
}

impl LogVerbosity
{
    pub fn level_filter(self) -> LevelFilter
    {
        match self
        {
            LogVerbosity::Error => LevelFilter::ERROR,
            LogVerbosity::Warning => LevelFilter::WARN,
            LogVerbosity::Normal => LevelFilter::INFO,
            LogVerbosity::Verbose => LevelFilter::DEBUG,
            LogVerbosity::VeryVerbose => LevelFilter::TRACE,
        }
    }
}

impl FromStr for LogVerbosity
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.trim().to_ascii_lowercase().as_str()
        {
            "error" => Ok(LogVerbosity::Error),
            "warning" | "warn" => Ok(LogVerbosity::Warning),
            "normal" | "info" => Ok(LogVerbosity::Normal),
            "verbose" | "debug" => Ok(LogVerbosity::Verbose),
            "very_verbose" | "veryverbose" | "trace" => Ok(LogVerbosity::VeryVerbose),
            other => Err(format!("unknown log verbosity '{}'", other)),
        }
    }
}

/// Installs the global fmt subscriber. `RUST_LOG`, when set, wins over `verbosity`.
pub fn init_logging(verbosity: LogVerbosity)
{
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod rules;
pub mod snapshot;
pub mod view;

pub use crate::card::*;
pub use crate::deck::*;
pub use crate::error::*;
pub use crate::game::*;
pub use crate::rules::*;
pub use crate::snapshot::{Snapshot, SnapshotStore};
pub use crate::view::*;
