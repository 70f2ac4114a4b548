use regex::Regex;

use crate::error::{Error, Field};
use crate::model::{Config, Entry, Mode, Rule, Sink, SinkSet};
use crate::parser::parse_table;

/// Builder-style carrier for the raw string inputs of one resolution run.
///
/// Every input is an uninterpreted string exactly as the host supplies it.
/// [`RawConfig::validate`] is the single validation step: it either
/// produces an immutable [`Config`] or fails with the first violated rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    key: String,
    map: String,
    separator: String,
    mode: String,
    export_to: String,
    export_to_env_name: String,
    default_value: String,
    allow_empty_map: String,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Raw mapping-table text, one `pattern SEP value` per line.
    pub fn map(mut self, map: impl Into<String>) -> Self {
        self.map = map.into();
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Comma-separated subset of `output,env,log`.
    pub fn export_to(mut self, export_to: impl Into<String>) -> Self {
        self.export_to = export_to.into();
        self
    }

    pub fn export_to_env_name(mut self, name: impl Into<String>) -> Self {
        self.export_to_env_name = name.into();
        self
    }

    pub fn default_value(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn allow_empty_map(mut self, allow_empty_map: impl Into<String>) -> Self {
        self.allow_empty_map = allow_empty_map.into();
        self
    }

    /// Validate all inputs and produce the run configuration.
    ///
    /// Rules are checked in a fixed order so a given bad input always
    /// reports the same error: the `allow_empty_map` flag token, the
    /// required `separator` and `key`, the `mode` literal, table parsing,
    /// the empty-table and strict/empty-map rules, `export_to`, the env
    /// sink destination name, and finally pattern compilation.
    pub fn validate(self) -> Result<Config, Error> {
        let allow_empty_map = parse_flag(&self.allow_empty_map)?;

        if self.separator.is_empty() {
            return Err(Error::EmptyField(Field::Separator));
        }
        if self.key.is_empty() {
            return Err(Error::EmptyField(Field::Key));
        }

        let Some(mode) = Mode::parse(&self.mode) else {
            return Err(Error::InvalidEnum {
                field: "mode",
                token: self.mode,
                expected: Mode::EXPECTED,
            });
        };

        let entries = parse_table(&self.map, &self.separator)?;
        if !allow_empty_map && entries.is_empty() {
            return Err(Error::EmptyField(Field::Map));
        }
        if allow_empty_map && mode == Mode::Strict {
            return Err(Error::ConflictingConfig);
        }

        let sinks = parse_export_to(&self.export_to)?;
        let env_name = if sinks.contains(Sink::Env) {
            if self.export_to_env_name.is_empty() {
                return Err(Error::MissingEnvName);
            }
            Some(self.export_to_env_name)
        } else {
            None
        };

        Ok(Config {
            key: self.key,
            table: compile_rules(entries)?,
            separator: self.separator,
            mode,
            sinks,
            env_name,
            default_value: self.default_value,
            allow_empty_map,
        })
    }
}

/// Strict boolean-token parsing for `allow_empty_map`.
///
/// An empty string means the input was not supplied and reads as false.
/// Anything else must be a recognized token; arbitrary text is never
/// coerced to a boolean.
fn parse_flag(raw: &str) -> Result<bool, Error> {
    let token = raw.trim();
    if token.is_empty() {
        return Ok(false);
    }
    if token.eq_ignore_ascii_case("true") || token.eq_ignore_ascii_case("yes") || token == "1" {
        return Ok(true);
    }
    if token.eq_ignore_ascii_case("false") || token.eq_ignore_ascii_case("no") || token == "0" {
        return Ok(false);
    }
    Err(Error::InvalidFlag(token.to_owned()))
}

fn parse_export_to(raw: &str) -> Result<SinkSet, Error> {
    let mut sinks = SinkSet::default();
    for token in raw.split(',') {
        let token = token.trim();
        let Some(sink) = Sink::parse(token) else {
            return Err(Error::InvalidEnum {
                field: "export_to",
                token: token.to_owned(),
                expected: Sink::EXPECTED,
            });
        };
        sinks.insert(sink);
    }
    Ok(sinks)
}

fn compile_rules(entries: Vec<Entry>) -> Result<Vec<Rule>, Error> {
    entries
        .into_iter()
        .map(|entry| {
            let pattern = Regex::new(&entry.pattern).map_err(|source| Error::InvalidPattern {
                pattern: entry.pattern.clone(),
                line: entry.line,
                source,
            })?;
            Ok(Rule {
                pattern,
                value: entry.value,
                line: entry.line,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RawConfig {
        RawConfig::new()
            .key("k1")
            .map("k1=>v1\nk2=>v2\n")
            .separator("=>")
            .mode("strict")
            .export_to("output")
    }

    #[test]
    fn validates_a_complete_configuration() {
        let config = base().validate().expect("validate should succeed");

        assert_eq!(config.key, "k1");
        assert_eq!(config.table.len(), 2);
        assert_eq!(config.table[0].pattern.as_str(), "k1");
        assert_eq!(config.table[1].value, "v2");
        assert_eq!(config.mode, Mode::Strict);
        assert!(config.sinks.contains(Sink::Output));
        assert!(!config.sinks.contains(Sink::Env));
        assert_eq!(config.env_name, None);
        assert!(!config.allow_empty_map);
    }

    #[test]
    fn rejects_empty_separator_before_empty_key() {
        let err = RawConfig::new().validate().expect_err("expected error");
        assert!(matches!(err, Error::EmptyField(Field::Separator)));

        let err = base().separator("").validate().expect_err("expected error");
        assert!(matches!(err, Error::EmptyField(Field::Separator)));
    }

    #[test]
    fn rejects_empty_key() {
        let err = base().key("").validate().expect_err("expected error");
        assert!(matches!(err, Error::EmptyField(Field::Key)));
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = base().mode("lenient").validate().expect_err("expected error");
        match err {
            Error::InvalidEnum { field, token, .. } => {
                assert_eq!(field, "mode");
                assert_eq!(token, "lenient");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_table_without_allow_empty_map() {
        let err = base().map("").validate().expect_err("expected error");
        assert!(matches!(err, Error::EmptyField(Field::Map)));
    }

    #[test]
    fn allows_empty_table_with_flag_and_fallback_mode() {
        let config = base()
            .map("")
            .mode("fallback-to-original")
            .allow_empty_map("true")
            .validate()
            .expect("validate should succeed");

        assert!(config.table.is_empty());
        assert!(config.allow_empty_map);
    }

    #[test]
    fn rejects_strict_mode_with_allow_empty_map() {
        // Conflict is rejected regardless of table contents.
        let err = base()
            .allow_empty_map("true")
            .validate()
            .expect_err("expected error");
        assert!(matches!(err, Error::ConflictingConfig));

        let err = base()
            .map("")
            .allow_empty_map("true")
            .validate()
            .expect_err("expected error");
        assert!(matches!(err, Error::ConflictingConfig));
    }

    #[test]
    fn parses_flag_tokens_strictly() {
        for token in ["true", "TRUE", "yes", "1"] {
            let config = base()
                .mode("fallback-to-original")
                .allow_empty_map(token)
                .validate()
                .expect("validate should succeed");
            assert!(config.allow_empty_map, "token {token:?} should read true");
        }
        for token in ["false", "False", "no", "0", ""] {
            let config = base().allow_empty_map(token).validate().expect("should succeed");
            assert!(!config.allow_empty_map, "token {token:?} should read false");
        }

        let err = base()
            .allow_empty_map("enabled")
            .validate()
            .expect_err("expected error");
        match err {
            Error::InvalidFlag(token) => assert_eq!(token, "enabled"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parses_export_to_list_with_duplicates() {
        let config = base()
            .export_to("output, log ,output")
            .validate()
            .expect("validate should succeed");

        assert!(config.sinks.contains(Sink::Output));
        assert!(config.sinks.contains(Sink::Log));
        assert!(!config.sinks.contains(Sink::Env));
    }

    #[test]
    fn rejects_empty_and_unknown_export_tokens() {
        for raw in ["", "output,,log", "stdout"] {
            let err = base().export_to(raw).validate().expect_err("expected error");
            match err {
                Error::InvalidEnum { field, .. } => assert_eq!(field, "export_to"),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn env_sink_requires_destination_name() {
        let err = base()
            .export_to("output,env")
            .validate()
            .expect_err("expected error");
        assert!(matches!(err, Error::MissingEnvName));

        let config = base()
            .export_to("output,env")
            .export_to_env_name("MAPPED_VALUE")
            .validate()
            .expect("validate should succeed");
        assert_eq!(config.env_name.as_deref(), Some("MAPPED_VALUE"));
    }

    #[test]
    fn reports_first_invalid_pattern_with_its_line() {
        let err = base()
            .map("good=>v1\n[broken=>v2\n[also-broken=>v3\n")
            .validate()
            .expect_err("expected error");
        match err {
            Error::InvalidPattern { pattern, line, .. } => {
                assert_eq!(pattern, "[broken");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_line_reported_before_pattern_compilation() {
        let err = base()
            .map("[broken=>v1\nno-separator-here\n")
            .validate()
            .expect_err("expected error");
        assert!(matches!(err, Error::MalformedTableLine { line: 2, .. }));
    }
}
