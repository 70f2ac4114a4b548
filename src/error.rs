use std::error::Error as StdError;
use std::fmt::{Display, Formatter};

/// Required string input that must carry a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key,
    Map,
    Separator,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key => write!(f, "key"),
            Self::Map => write!(f, "map"),
            Self::Separator => write!(f, "separator"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// A required input is empty (or, for `map`, parsed to zero entries
    /// without `allow_empty_map`).
    EmptyField(Field),
    /// A closed-set input carries a token outside its set.
    InvalidEnum {
        field: &'static str,
        token: String,
        expected: &'static str,
    },
    /// `allow_empty_map` carries an unrecognized boolean token.
    InvalidFlag(String),
    /// A table line did not split into exactly a pattern and a value.
    MalformedTableLine {
        line: u32,
        text: String,
        separator: String,
    },
    /// A table pattern failed to compile as a regular expression.
    InvalidPattern {
        pattern: String,
        line: u32,
        source: regex::Error,
    },
    /// The env sink is selected but no destination variable name was given.
    MissingEnvName,
    /// Strict mode combined with a permitted empty map.
    ConflictingConfig,
    /// Strict mode and no pattern matched the key.
    NoMatch { key: String },
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "input `{field}` must not be empty"),
            Self::InvalidEnum {
                field,
                token,
                expected,
            } => write!(
                f,
                "invalid {field}: \"{token}\". It must be one of: {expected}"
            ),
            Self::InvalidFlag(token) => write!(
                f,
                "invalid allow_empty_map: \"{token}\". It must be one of: true, false, yes, no, 1, 0"
            ),
            Self::MalformedTableLine {
                line,
                text,
                separator,
            } => write!(
                f,
                "key/value pair not found at line {line}: \"{text}\" (separator \"{separator}\")"
            ),
            Self::InvalidPattern {
                pattern,
                line,
                source,
            } => write!(f, "invalid pattern at line {line}: \"{pattern}\": {source}"),
            Self::MissingEnvName => write!(
                f,
                "export_to includes \"env\" but export_to_env_name is empty"
            ),
            Self::ConflictingConfig => {
                write!(f, "allow_empty_map cannot be combined with strict mode")
            }
            Self::NoMatch { key } => write!(f, "no suitable mapping found for key \"{key}\""),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidPattern { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
