// error.rs - Error types for the automaton core

use thiserror::Error;

/// A rule string that does not follow the `B<digits>/S<digits>` form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("rule must contain exactly one '/', found {found}")]
    Separator { found: usize },

    #[error("rule section must start with '{expected}'")]
    MissingPrefix { expected: char },

    #[error("'{ch}' is not a decimal digit")]
    NotADigit { ch: char },

    #[error("neighbor count {count} is out of range 0..=8")]
    CountOutOfRange { count: u32 },
}

/// A rule name that is not present in the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown rule name: {0:?}")]
pub struct UnknownRuleName(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("rule {name:?}: {source}")]
    Malformed {
        name: String,
        #[source]
        source: RuleParseError,
    },

    #[error("rule {0:?} is already defined")]
    Duplicate(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Text that does not name a control command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized command: {0:?}")]
pub struct CommandParseError(pub String);

/// The engine side of a command channel has been dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("command channel closed")]
pub struct ChannelClosed;

#[derive(Error, Debug)]
pub enum AutomatonError {
    #[error(transparent)]
    Rule(#[from] RuleParseError),

    #[error(transparent)]
    UnknownRule(#[from] UnknownRuleName),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(#[from] CommandParseError),

    #[error(transparent)]
    Channel(#[from] ChannelClosed),

    #[error("unknown pattern: {0:?}")]
    UnknownPattern(String),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
