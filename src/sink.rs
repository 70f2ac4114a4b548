//! Delivery of the resolved value to the selected sinks.
//!
//! The workflow target appends `name=value` commands to the files the
//! hosting runner advertises through `GITHUB_OUTPUT` and `GITHUB_ENV`,
//! falling back to stdout when those variables are absent. The memory
//! target buffers everything so tests never touch files or global state.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;
use crate::model::{Config, Sink};

/// Fixed name under which the output sink publishes the resolved value.
pub const OUTPUT_NAME: &str = "value";

/// Destination for sink delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sinks {
    kind: SinksKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SinksKind {
    Files {
        output_path: Option<PathBuf>,
        env_path: Option<PathBuf>,
    },
    Memory(MemorySinks),
}

/// In-memory capture of delivered values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemorySinks {
    /// `(name, value)` pairs delivered to the output sink.
    pub output: Vec<(String, String)>,
    /// `(name, value)` pairs delivered to the env sink.
    pub env: Vec<(String, String)>,
    /// Informational lines delivered to the log sink.
    pub log: Vec<String>,
}

impl Sinks {
    /// Target the hosting workflow's command files, read from the process
    /// environment once at construction.
    pub fn workflow() -> Self {
        Self::files(
            std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
            std::env::var_os("GITHUB_ENV").map(PathBuf::from),
        )
    }

    /// Target explicit command files. `None` falls back to stdout for that
    /// sink.
    pub fn files(output_path: Option<PathBuf>, env_path: Option<PathBuf>) -> Self {
        Self {
            kind: SinksKind::Files {
                output_path,
                env_path,
            },
        }
    }

    /// Buffer all deliveries in memory.
    pub fn memory() -> Self {
        Self {
            kind: SinksKind::Memory(MemorySinks::default()),
        }
    }

    pub fn as_memory(&self) -> Option<&MemorySinks> {
        match &self.kind {
            SinksKind::Memory(memory) => Some(memory),
            SinksKind::Files { .. } => None,
        }
    }

    /// Deliver `value` to every sink selected in `config`.
    ///
    /// Delivery must only run after successful resolution; it never alters
    /// the resolved value.
    pub fn deliver(&mut self, config: &Config, value: &str) -> Result<(), Error> {
        let env_name = if config.sinks.contains(Sink::Env) {
            Some(config.env_name.as_deref().ok_or(Error::MissingEnvName)?)
        } else {
            None
        };

        match &mut self.kind {
            SinksKind::Files {
                output_path,
                env_path,
            } => {
                if config.sinks.contains(Sink::Output) {
                    append_command(output_path.as_deref(), OUTPUT_NAME, value)?;
                }
                if let Some(name) = env_name {
                    append_command(env_path.as_deref(), name, value)?;
                }
                if config.sinks.contains(Sink::Log) {
                    println!("Mapped value: {value}");
                }
            }
            SinksKind::Memory(memory) => {
                if config.sinks.contains(Sink::Output) {
                    memory.output.push((OUTPUT_NAME.to_owned(), value.to_owned()));
                }
                if let Some(name) = env_name {
                    memory.env.push((name.to_owned(), value.to_owned()));
                }
                if config.sinks.contains(Sink::Log) {
                    memory.log.push(format!("Mapped value: {value}"));
                }
            }
        }

        Ok(())
    }
}

fn append_command(path: Option<&Path>, name: &str, value: &str) -> Result<(), Error> {
    let command = format_command(name, value);
    match path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(command.as_bytes())?;
        }
        None => print!("{command}"),
    }
    Ok(())
}

/// `name=value` for single-line values; the heredoc form the workflow
/// runner understands for values containing newlines.
fn format_command(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }
    let delimiter = unique_delimiter(value);
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn unique_delimiter(value: &str) -> String {
    let mut nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    loop {
        let candidate = format!("EOF_{nanos}");
        if !value.contains(&candidate) {
            return candidate;
        }
        nanos += 1;
    }
}
