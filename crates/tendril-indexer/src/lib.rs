//! Import parsing and concurrent dependency graph construction

pub mod coordinator;
pub mod callbacks;
pub mod config;
pub mod error;
pub mod files;
pub mod filter;
pub mod languages;
pub mod parser;


#[cfg(test)]
pub mod test_utils;

pub use coordinator::{GraphBuilder, BuildOptions, BuildOutput, ErrorPolicy, default_workers};
pub use callbacks::{BuildCallbacks, LogCallbacks, NoopCallbacks};
pub use config::{Config, CheckConfig, ConfigError};
pub use error::{BuildError, ParseFailure};
pub use filter::PatternFilter;
pub use languages::javascript::JavaScriptParser;
pub use parser::{NodeParser, Parsed};
