use crate::config::types::{BrowserSettings, Config, HttpSettings, SummarizerSettings};
use crate::ConfigError;
use url::Url;

/// Upper bound on redirects the lightweight fetcher may follow
pub const MAX_REDIRECTS_LIMIT: usize = 20;

/// Upper bound on rendered capture attempts
pub const MAX_ATTEMPTS_LIMIT: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_settings(&config.http)?;
    validate_browser_settings(&config.browser)?;
    validate_summarizer_settings(&config.summarizer)?;
    Ok(())
}

/// Validates lightweight fetcher settings
fn validate_http_settings(settings: &HttpSettings) -> Result<(), ConfigError> {
    require_positive("http.timeout-secs", settings.timeout_secs)?;
    require_positive("http.deadline-secs", settings.deadline_secs)?;

    if settings.max_redirects > MAX_REDIRECTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "http.max-redirects must be at most {}, got {}",
            MAX_REDIRECTS_LIMIT, settings.max_redirects
        )));
    }

    if settings.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "http.user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rendered fetcher settings
fn validate_browser_settings(settings: &BrowserSettings) -> Result<(), ConfigError> {
    require_positive("browser.deadline-secs", settings.deadline_secs)?;
    require_positive(
        "browser.navigation-timeout-secs",
        settings.navigation_timeout_secs,
    )?;
    require_positive("browser.idle-window-ms", settings.idle_window_ms)?;

    if settings.max_attempts < 1 || settings.max_attempts > MAX_ATTEMPTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "browser.max-attempts must be between 1 and {}, got {}",
            MAX_ATTEMPTS_LIMIT, settings.max_attempts
        )));
    }

    if let Some(path) = &settings.executable_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "browser.executable-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates summarization collaborator settings
fn validate_summarizer_settings(settings: &SummarizerSettings) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&settings.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid summarizer endpoint '{}': {}",
            settings.endpoint, e
        ))
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Summarizer endpoint '{}' must use http or https",
            settings.endpoint
        )));
    }

    require_positive("summarizer.timeout-secs", settings.timeout_secs)?;

    if settings.digest_limit == 0 {
        return Err(ConfigError::Validation(
            "summarizer.digest-limit must be > 0".to_string(),
        ));
    }

    Ok(())
}

fn require_positive(key: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!("{} must be > 0", key)));
    }
    Ok(())
}
