//! Chromium driver for the rendered fetcher
//!
//! Each launch starts its own Chromium process over the DevTools protocol,
//! opens one blank page, installs the request filter through the Fetch
//! domain and starts tracking in-flight requests through the Network domain.
//! Every process gets a fresh profile directory that is removed after it
//! exits, so no cookies or cache survive from one request to the next.

use crate::config::{BrowserSettings, RuntimeEnvironment, DEFAULT_USER_AGENT};
use crate::fetch::browser::{
    resolve_executable, BrowserLauncher, BrowserSession, RequestFilter, ResourceKind, Verdict,
};
use crate::fetch::FetchError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, FailRequestParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    self, ErrorReason, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
    ResourceType,
};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

/// How often readiness and idle conditions are re-checked
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Time given to the process to exit after a close request
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// True once the navigated document has fired DOMContentLoaded
const DOM_READY_JS: &str = "location.href !== 'about:blank' && document.readyState !== 'loading'";
const TEXT_LENGTH_JS: &str = "document.body ? document.body.innerText.length : 0";
const SCROLL_JS: &str = "window.scrollTo(0, document.body ? document.body.scrollHeight : 0)";

/// Prefix of the per-launch profile directories
const PROFILE_PREFIX: &str = "pagelens-profile-";

/// Launches one Chromium process per session
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    settings: BrowserSettings,
    runtime: RuntimeEnvironment,
    filter: RequestFilter,
    user_agent: String,
}

impl ChromeLauncher {
    pub fn new(settings: BrowserSettings, runtime: RuntimeEnvironment, filter: RequestFilter) -> Self {
        Self {
            settings,
            runtime,
            filter,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sends `user_agent` from the browser instead of the default one
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-extensions".to_string(),
            "--no-first-run".to_string(),
            "--mute-audio".to_string(),
            format!("--user-agent={}", self.user_agent),
        ];
        if self.runtime == RuntimeEnvironment::Serverless {
            args.push("--single-process".to_string());
            args.push("--no-zygote".to_string());
        }
        args
    }

    /// Builds the launch configuration together with its private profile
    ///
    /// The returned directory must outlive the browser process.
    fn browser_config(&self) -> Result<(BrowserConfig, TempDir), FetchError> {
        let executable = resolve_executable(&self.settings, self.runtime, |path| path.is_file())?;

        let profile = tempfile::Builder::new()
            .prefix(PROFILE_PREFIX)
            .tempdir()
            .map_err(|e| FetchError::Browser(format!("Failed to create browser profile: {}", e)))?;

        let config = BrowserConfig::builder()
            .chrome_executable(executable)
            .user_data_dir(profile.path())
            .no_sandbox()
            .window_size(1366, 900)
            .args(self.launch_args())
            .build()
            .map_err(FetchError::Browser)?;

        Ok((config, profile))
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, FetchError> {
        let (config, profile) = self.browser_config()?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(driver_error)?;
        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let mut session = ChromeSession {
            browser: Some(browser),
            page: None,
            tasks: vec![handler_task],
            activity: Arc::new(Mutex::new(NetworkActivity::new(Instant::now()))),
            runtime: tokio::runtime::Handle::current(),
            profile: Some(profile),
        };

        // From here on a failure drops the session, which shuts the browser down
        session.open_page(&self.filter).await?;
        tracing::debug!("Browser launched");

        Ok(Box::new(session))
    }
}

/// In-flight request bookkeeping for the network idle wait
#[derive(Debug)]
pub struct NetworkActivity {
    in_flight: HashSet<String>,
    last_activity: Instant,
}

impl NetworkActivity {
    pub fn new(now: Instant) -> Self {
        Self {
            in_flight: HashSet::new(),
            last_activity: now,
        }
    }

    pub fn started(&mut self, request_id: &str, now: Instant) {
        self.in_flight.insert(request_id.to_string());
        self.last_activity = now;
    }

    pub fn finished(&mut self, request_id: &str, now: Instant) {
        if self.in_flight.remove(request_id) {
            self.last_activity = now;
        }
    }

    /// How long the network has been quiet, or `None` while requests are
    /// still in flight
    pub fn quiet_for(&self, now: Instant) -> Option<Duration> {
        if self.in_flight.is_empty() {
            Some(now.saturating_duration_since(self.last_activity))
        } else {
            None
        }
    }
}

/// A live Chromium process with one page
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    tasks: Vec<JoinHandle<()>>,
    activity: Arc<Mutex<NetworkActivity>>,
    runtime: tokio::runtime::Handle,
    profile: Option<TempDir>,
}

impl ChromeSession {
    async fn open_page(&mut self, filter: &RequestFilter) -> Result<(), FetchError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| FetchError::Browser("browser already closed".to_string()))?;
        let page = browser.new_page("about:blank").await.map_err(driver_error)?;

        let filter_task = install_request_filter(&page, filter.clone()).await?;
        self.tasks.push(filter_task);

        let tracking_task = track_network(&page, self.activity.clone()).await?;
        self.tasks.push(tracking_task);

        self.page = Some(page);
        Ok(())
    }

    /// Owned handle to the page, so no borrow of the session is held
    /// across an await
    fn page(&self) -> Result<Page, FetchError> {
        self.page
            .clone()
            .ok_or_else(|| FetchError::Browser("page is not open".to_string()))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), FetchError> {
        let page = self.page()?;
        let gate = async {
            let response = page
                .execute(NavigateParams::new(url.as_str()))
                .await
                .map_err(driver_error)?;

            if let Some(error_text) = &response.result.error_text {
                return Err(FetchError::Browser(format!("Navigation failed: {}", error_text)));
            }

            loop {
                // Evaluation can fail while the new document replaces the old one
                if let Ok(true) = evaluate_as::<bool>(&page, DOM_READY_JS).await {
                    return Ok(());
                }
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(timeout, gate).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Navigation to {} missed the DOM gate after {:?}", url, timeout);
                Err(FetchError::BrowserTimeout)
            }
        }
    }

    async fn wait_for_text(&mut self, min_chars: usize, timeout: Duration) -> bool {
        let page = match self.page() {
            Ok(page) => page,
            Err(_) => return false,
        };
        let started = Instant::now();
        while started.elapsed() < timeout {
            if let Ok(length) = evaluate_as::<u64>(&page, TEXT_LENGTH_JS).await {
                if length as usize > min_chars {
                    return true;
                }
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        false
    }

    async fn wait_for_network_idle(&mut self, idle_window: Duration, timeout: Duration) -> bool {
        let started = Instant::now();
        loop {
            let quiet = lock(&self.activity).quiet_for(Instant::now());
            if quiet.map(|q| q >= idle_window).unwrap_or(false) {
                return true;
            }
            if started.elapsed() >= timeout {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> Result<String, FetchError> {
        let page = self.page()?;
        page.content().await.map_err(driver_error)
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), FetchError> {
        let page = self.page()?;
        page.evaluate(SCROLL_JS).await.map_err(driver_error)?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        let mut session = self;
        if let Some(browser) = session.browser.take() {
            let tasks = std::mem::take(&mut session.tasks);
            shutdown(browser, tasks, session.profile.take()).await;
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(browser) = self.browser.take() {
            tracing::debug!("Browser session dropped without close; shutting down in background");
            let tasks = std::mem::take(&mut self.tasks);
            self.runtime.spawn(shutdown(browser, tasks, self.profile.take()));
        }
    }
}

/// Closes the browser, waits for the process, stops the helper tasks and
/// removes the profile directory
///
/// The helper tasks (including the CDP handler) stay alive until the close
/// command has been delivered.
async fn shutdown(mut browser: Browser, tasks: Vec<JoinHandle<()>>, profile: Option<TempDir>) {
    if let Err(e) = browser.close().await {
        tracing::debug!("Browser close command failed: {}", e);
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, browser.wait()).await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => tracing::debug!("Waiting for browser exit failed: {}", e),
        Err(_) => {
            tracing::warn!("Browser did not exit within {:?}; killing it", SHUTDOWN_GRACE);
            if let Some(Err(e)) = browser.kill().await {
                tracing::warn!("Failed to kill browser: {}", e);
            }
        }
    }

    for task in tasks {
        task.abort();
    }

    if let Some(profile) = profile {
        let path = profile.path().to_path_buf();
        if let Err(e) = profile.close() {
            tracing::debug!("Failed to remove browser profile {}: {}", path.display(), e);
        }
    }
}

/// Routes every request through the Fetch domain and answers it with the
/// filter's verdict
async fn install_request_filter(
    page: &Page,
    filter: RequestFilter,
) -> Result<JoinHandle<()>, FetchError> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .map_err(driver_error)?;
    page.execute(fetch::EnableParams::default())
        .await
        .map_err(driver_error)?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let kind = resource_kind(&event.resource_type);
            let reply = match filter.decide(kind) {
                Verdict::Abort => {
                    tracing::trace!("Blocking {:?} request {}", kind, event.request.url);
                    page.execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
                }
                Verdict::Allow => page
                    .execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ()),
            };
            if let Err(e) = reply {
                tracing::trace!("Interception reply failed: {}", e);
            }
        }
    }))
}

/// Feeds Network domain events into the shared activity record
async fn track_network(
    page: &Page,
    activity: Arc<Mutex<NetworkActivity>>,
) -> Result<JoinHandle<()>, FetchError> {
    let mut sent = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(driver_error)?;
    let mut finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .map_err(driver_error)?;
    let mut failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .map_err(driver_error)?;
    page.execute(network::EnableParams::default())
        .await
        .map_err(driver_error)?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(event) = sent.next() => {
                    lock(&activity).started(event.request_id.inner(), Instant::now());
                }
                Some(event) = finished.next() => {
                    lock(&activity).finished(event.request_id.inner(), Instant::now());
                }
                Some(event) = failed.next() => {
                    lock(&activity).finished(event.request_id.inner(), Instant::now());
                }
                else => break,
            }
        }
    }))
}

async fn evaluate_as<T: serde::de::DeserializeOwned>(
    page: &Page,
    expression: &str,
) -> Result<T, FetchError> {
    page.evaluate(expression)
        .await
        .map_err(driver_error)?
        .into_value::<T>()
        .map_err(|e| FetchError::Browser(e.to_string()))
}

fn resource_kind(resource_type: &ResourceType) -> ResourceKind {
    match resource_type {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Media => ResourceKind::Media,
        ResourceType::Font => ResourceKind::Font,
        ResourceType::Script => ResourceKind::Script,
        ResourceType::Xhr => ResourceKind::Xhr,
        ResourceType::Fetch => ResourceKind::Fetch,
        _ => ResourceKind::Other,
    }
}

fn lock(activity: &Mutex<NetworkActivity>) -> MutexGuard<'_, NetworkActivity> {
    match activity.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn driver_error(error: chromiumoxide::error::CdpError) -> FetchError {
    FetchError::Browser(error.to_string())
}
