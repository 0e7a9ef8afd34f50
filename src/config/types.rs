use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Desktop Chrome user agent sent by the lightweight fetcher
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure for PageLens
///
/// Every section and key is optional; missing values take the defaults
/// documented on each field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub browser: BrowserSettings,

    #[serde(default)]
    pub summarizer: SummarizerSettings,
}

/// Lightweight fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request network timeout in seconds (default 60)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Overall deadline the orchestrator gives the lightweight fetch (default 15)
    #[serde(rename = "deadline-secs")]
    pub deadline_secs: u64,

    /// Redirects followed before giving up (default 5)
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            deadline_secs: 15,
            max_redirects: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

/// Where the rendered fetcher runs, which decides how the browser
/// executable is found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Developer machine or regular server with a system browser
    Local,
    /// Managed function runtime with a bundled headless Chromium
    Serverless,
}

/// Rendered fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Overall deadline for one rendered fetch (default 25)
    #[serde(rename = "deadline-secs")]
    pub deadline_secs: u64,

    /// DOMContentLoaded gate (default 30)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,

    /// Best-effort wait for meaningful body text (default 8)
    #[serde(rename = "text-wait-secs")]
    pub text_wait_secs: u64,

    /// Body text length that ends the text wait early (default 300)
    #[serde(rename = "min-text-chars")]
    pub min_text_chars: usize,

    /// Capture attempts before giving up (default 6)
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Quiet period that counts as network idle (default 750)
    #[serde(rename = "idle-window-ms")]
    pub idle_window_ms: u64,

    /// Cap on each network idle wait (default 8)
    #[serde(rename = "idle-timeout-secs")]
    pub idle_timeout_secs: u64,

    /// Base delay between attempts (default 900)
    #[serde(rename = "attempt-delay-ms")]
    pub attempt_delay_ms: u64,

    /// Extra delay added per attempt index (default 200)
    #[serde(rename = "attempt-delay-step-ms")]
    pub attempt_delay_step_ms: u64,

    /// Explicit browser executable
    #[serde(rename = "executable-path")]
    pub executable_path: Option<PathBuf>,

    /// Overrides runtime detection when set
    pub runtime: Option<RuntimeEnvironment>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            deadline_secs: 25,
            navigation_timeout_secs: 30,
            text_wait_secs: 8,
            min_text_chars: 300,
            max_attempts: 6,
            idle_window_ms: 750,
            idle_timeout_secs: 8,
            attempt_delay_ms: 900,
            attempt_delay_step_ms: 200,
            executable_path: None,
            runtime: None,
        }
    }
}

impl BrowserSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn text_wait(&self) -> Duration {
        Duration::from_secs(self.text_wait_secs)
    }

    pub fn idle_window(&self) -> Duration {
        Duration::from_millis(self.idle_window_ms)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Delay after the attempt with the given zero-based index
    pub fn attempt_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(
            self.attempt_delay_ms + self.attempt_delay_step_ms * u64::from(attempt),
        )
    }
}

/// Summarization collaborator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    pub endpoint: String,

    pub model: String,

    /// Deadline for one summary request (default 30)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Characters of digest sent with the prompt (default 4500)
    #[serde(rename = "digest-limit")]
    pub digest_limit: usize,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://text.pollinations.ai/".to_string(),
            model: "openai".to_string(),
            timeout_secs: 30,
            digest_limit: 4500,
        }
    }
}

impl SummarizerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
