use crate::config::types::{Config, RuntimeEnvironment};
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variables set by managed function runtimes
pub const SERVERLESS_MARKERS: &[&str] = &[
    "AWS_LAMBDA_FUNCTION_NAME",
    "VERCEL",
    "NETLIFY",
    "K_SERVICE",
];

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagelens::config::load_config;
///
/// let config = load_config(Path::new("pagelens.toml")).unwrap();
/// println!("Browser attempts: {}", config.browser.max_attempts);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Decides the runtime environment once, at startup
///
/// An explicitly configured value wins. Otherwise any of
/// [`SERVERLESS_MARKERS`] being set (and non-empty) selects
/// [`RuntimeEnvironment::Serverless`].
///
/// # Arguments
///
/// * `configured` - The `browser.runtime` value from the configuration
/// * `lookup` - Reads an environment variable; injected so callers decide
///   where the environment comes from
pub fn resolve_runtime<F>(configured: Option<RuntimeEnvironment>, lookup: F) -> RuntimeEnvironment
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(runtime) = configured {
        return runtime;
    }

    let serverless = SERVERLESS_MARKERS
        .iter()
        .any(|marker| lookup(marker).map(|v| !v.is_empty()).unwrap_or(false));

    if serverless {
        RuntimeEnvironment::Serverless
    } else {
        RuntimeEnvironment::Local
    }
}
