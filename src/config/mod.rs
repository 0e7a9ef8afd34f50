//! Configuration module for PageLens
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolves the runtime environment the rendered fetcher runs in.
//! Every key has a default, so running without a file is equivalent to
//! `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use pagelens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagelens.toml")).unwrap();
//! println!("HTTP deadline: {:?}", config.http.deadline());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserSettings, Config, HttpSettings, RuntimeEnvironment, SummarizerSettings,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, resolve_runtime, SERVERLESS_MARKERS};
pub use validation::validate;
