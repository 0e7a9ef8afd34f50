use crate::config::{BrowserSettings, RuntimeEnvironment};
use crate::fetch::FetchError;
use std::path::{Path, PathBuf};

/// Where serverless bundles usually unpack headless Chromium
pub const SERVERLESS_CANDIDATES: &[&str] = &["/opt/chromium", "/opt/bin/chromium", "/tmp/chromium"];

#[cfg(target_os = "linux")]
const LOCAL_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(target_os = "macos")]
const LOCAL_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "windows")]
const LOCAL_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
const LOCAL_CANDIDATES: &[&str] = &[];

/// Finds the browser executable for the given runtime
///
/// The configured `executable-path` is tried first in both runtimes, then
/// the runtime's well-known locations in order.
///
/// # Arguments
///
/// * `settings` - Browser settings carrying the optional explicit path
/// * `runtime` - Resolved runtime environment
/// * `exists` - Probe for a candidate path; tests pass a fake
///
/// # Returns
///
/// * `Ok(PathBuf)` - First candidate that exists
/// * `Err(FetchError::BrowserExecutableNotFound)` - Serverless, nothing found
/// * `Err(FetchError::LocalBrowserExecutableNotConfigured)` - Local, nothing found
pub fn resolve_executable<F>(
    settings: &BrowserSettings,
    runtime: RuntimeEnvironment,
    exists: F,
) -> Result<PathBuf, FetchError>
where
    F: Fn(&Path) -> bool,
{
    let defaults = match runtime {
        RuntimeEnvironment::Serverless => SERVERLESS_CANDIDATES,
        RuntimeEnvironment::Local => LOCAL_CANDIDATES,
    };

    let found = settings
        .executable_path
        .iter()
        .cloned()
        .chain(defaults.iter().map(PathBuf::from))
        .find(|candidate| exists(candidate));

    match (found, runtime) {
        (Some(path), _) => {
            tracing::debug!("Using browser executable {}", path.display());
            Ok(path)
        }
        (None, RuntimeEnvironment::Serverless) => Err(FetchError::BrowserExecutableNotFound),
        (None, RuntimeEnvironment::Local) => Err(FetchError::LocalBrowserExecutableNotConfigured),
    }
}
