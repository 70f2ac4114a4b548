use regex::Regex;

/// A raw `pattern SEP value` table line, before pattern compilation.
///
/// `line` is the 1-based line number in the original map text, kept so
/// later validation errors can cite their location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub pattern: String,
    pub value: String,
    pub line: u32,
}

/// A validated mapping rule with its compiled pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub value: String,
    pub line: u32,
}

/// Fallback behavior when no pattern matches the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Fail the run when nothing matches.
    #[default]
    Strict,
    /// An unmatched key resolves to itself.
    FallbackToOriginal,
    /// An unmatched key resolves to the configured default value.
    FallbackToDefault,
}

impl Mode {
    pub(crate) const EXPECTED: &'static str = "strict, fallback-to-original, fallback-to-default";

    pub(crate) fn parse(token: &str) -> Option<Self> {
        match token {
            "strict" => Some(Self::Strict),
            "fallback-to-original" => Some(Self::FallbackToOriginal),
            "fallback-to-default" => Some(Self::FallbackToDefault),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::FallbackToOriginal => "fallback-to-original",
            Self::FallbackToDefault => "fallback-to-default",
        }
    }
}

/// A named destination for the resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sink {
    /// Publish under the fixed output name for downstream steps.
    Output,
    /// Export as an environment-style variable.
    Env,
    /// Emit a human-readable informational line.
    Log,
}

impl Sink {
    pub(crate) const EXPECTED: &'static str = "output, env, log";

    pub(crate) fn parse(token: &str) -> Option<Self> {
        match token {
            "output" => Some(Self::Output),
            "env" => Some(Self::Env),
            "log" => Some(Self::Log),
            _ => None,
        }
    }
}

/// Non-exclusive set of delivery sinks. Inserting a sink twice is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SinkSet {
    output: bool,
    env: bool,
    log: bool,
}

impl SinkSet {
    pub fn insert(&mut self, sink: Sink) {
        match sink {
            Sink::Output => self.output = true,
            Sink::Env => self.env = true,
            Sink::Log => self.log = true,
        }
    }

    pub fn contains(&self, sink: Sink) -> bool {
        match sink {
            Sink::Output => self.output,
            Sink::Env => self.env,
            Sink::Log => self.log,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.output || self.env || self.log)
    }
}

/// The validated configuration for a single resolution run.
///
/// Built once by [`crate::RawConfig::validate`], consumed by
/// [`crate::resolve`], and discarded when the run completes.
#[derive(Debug, Clone)]
pub struct Config {
    pub key: String,
    pub table: Vec<Rule>,
    pub separator: String,
    pub mode: Mode,
    pub sinks: SinkSet,
    /// Destination variable for the env sink; `Some` iff [`Sink::Env`] is
    /// selected.
    pub env_name: Option<String>,
    pub default_value: String,
    pub allow_empty_map: bool,
}
