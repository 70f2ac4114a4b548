//! Resolve a key against an ordered pattern/value mapping table.
//!
//! [`RawConfig`] gathers the raw string inputs for one run,
//! [`RawConfig::validate`] turns them into an immutable [`Config`], and
//! [`resolve`] scans the table in declared order with last-match-wins
//! semantics. [`Sinks`] delivers the resolved value to the selected
//! output/env/log sinks.

mod config;
mod engine;
mod error;
mod model;
mod parser;
mod sink;

pub use config::RawConfig;
pub use engine::resolve;
pub use error::{Error, Field};
pub use model::{Config, Entry, Mode, Rule, Sink, SinkSet};
pub use parser::parse_table;
pub use sink::{MemorySinks, OUTPUT_NAME, Sinks};
