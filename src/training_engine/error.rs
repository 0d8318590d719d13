use std::path::PathBuf;

use thiserror::Error;

/// Parsing failures for cards and hand notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown rank: {0:?}")]
    Rank(String),

    #[error("unknown suit: {0:?}")]
    Suit(String),

    #[error("malformed card: {0:?}")]
    Card(String),

    #[error("malformed hand notation: {0:?}")]
    Notation(String),
}

/// Why a scenario tier could not produce a scenario. Never leaves
/// [`ScenarioSource::fetch`](crate::ScenarioSource::fetch); the next tier is
/// tried instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("scenario collection unreachable: {0}")]
    Unreachable(String),

    #[error("scenario collection is empty")]
    Empty,

    #[error("no scenario row at offset {0}")]
    NoRow(u64),

    #[error("malformed scenario row: {0}")]
    Malformed(String),

    #[error("could not synthesise a {0} scenario")]
    Synthesis(&'static str),

    #[error("tier disabled")]
    Disabled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
