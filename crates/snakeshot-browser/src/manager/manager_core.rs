//! BrowserManager core: Chrome discovery, launch, connection and teardown.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::{CdpClient, PageSession};

/// Startup polling for a freshly launched Chrome.
const LAUNCH_POLL_INTERVAL: Duration = Duration::from_millis(200);
const LAUNCH_MAX_ATTEMPTS: u32 = 30;

/// Manages one Chrome instance and the pages opened in it.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    pages: RwLock<Vec<Arc<PageSession>>>,
    /// Chrome process handle (if we launched it).
    chrome_process: Mutex<Option<Child>>,
}

impl BrowserManager {
    /// Create a new browser manager.
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            pages: RwLock::new(Vec::new()),
            chrome_process: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find Chrome executable path.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// The configured executable, or the first well-known one present.
    pub fn chrome_executable(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(BrowserError::LaunchFailed(format!(
                "{} does not exist",
                path.display()
            ))),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound),
        }
    }

    /// Check if Chrome is already running on the debug port.
    async fn is_chrome_running(&self) -> bool {
        reqwest::get(&format!("{}/json/version", self.config.endpoint()))
            .await
            .is_ok()
    }

    /// Launch Chrome with remote debugging enabled.
    ///
    /// The child is killed if its handle is dropped, so an aborted run never
    /// leaves a browser behind.
    async fn launch_chrome(&self) -> Result<Child, BrowserError> {
        let chrome_path = self.chrome_executable()?;
        let profile_dir = self.config.get_profile_dir();

        if let Err(e) = tokio::fs::create_dir_all(&profile_dir).await {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg(format!(
                "--window-size={},{}",
                self.config.viewport_width, self.config.viewport_height
            ))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-translate")
            .arg("--metrics-recording-only")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }

    /// Connect to the browser, launching it if necessary.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        if !self.is_chrome_running().await {
            info!("Chrome not running on port {}, launching...", self.config.debug_port);

            let child = self.launch_chrome().await?;
            *self.chrome_process.lock().await = Some(child);

            let mut attempts = 0;
            loop {
                tokio::time::sleep(LAUNCH_POLL_INTERVAL).await;
                if self.is_chrome_running().await {
                    break;
                }
                attempts += 1;
                if attempts >= LAUNCH_MAX_ATTEMPTS {
                    return Err(BrowserError::LaunchFailed(
                        "Chrome failed to start within timeout".to_string(),
                    ));
                }
            }
        } else {
            info!("Chrome already running on port {}", self.config.debug_port);
        }

        let client = CdpClient::connect(&self.config.endpoint()).await?;
        *self.client.write().await = Some(Arc::new(client));

        info!("Connected to Chrome at {}", self.config.endpoint());
        Ok(())
    }

    /// Get the CDP client.
    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open a tab sized to the configured viewport and load `url`.
    pub async fn open_page(&self, url: &str) -> Result<Arc<PageSession>, BrowserError> {
        let client = self.client().await?;
        let page = client.new_page(None).await?;
        page.set_viewport(
            self.config.viewport_width,
            self.config.viewport_height,
            self.config.device_scale_factor,
        )
        .await?;
        page.navigate(url).await?;

        let page = Arc::new(page);
        self.pages.write().await.push(page.clone());
        info!("Opened {}", url);
        Ok(page)
    }

    /// Number of pages opened through this manager and not yet closed.
    pub async fn page_count(&self) -> usize {
        self.pages.read().await.len()
    }

    /// Close pages and drop the browser connection.
    pub async fn close(&self) -> Result<(), BrowserError> {
        let pages = std::mem::take(&mut *self.pages.write().await);
        let client = self.client.write().await.take();

        if let Some(client) = client {
            for page in pages {
                if let Err(e) = client.close_page(page.target_id()).await {
                    warn!("Failed to close page {}: {}", page.target_id(), e);
                }
            }
        }
        info!("Browser connection closed");
        Ok(())
    }

    /// Close the connection and stop Chrome if we launched it.
    pub async fn shutdown(&self) -> Result<(), BrowserError> {
        self.close().await?;
        if let Some(mut child) = self.chrome_process.lock().await.take() {
            info!("Shutting down Chrome...");
            if let Err(e) = child.kill().await {
                warn!("Failed to stop Chrome: {}", e);
            }
        }
        Ok(())
    }

    /// Run `body`, keep the browser up for `grace`, then shut down.
    ///
    /// Shutdown happens whatever `body` returns; its output is passed through.
    pub async fn run_scoped<T>(&self, grace: Duration, body: impl Future<Output = T>) -> T {
        let output = body.await;

        if !grace.is_zero() {
            info!("Keeping browser open for {:?}", grace);
            tokio::time::sleep(grace).await;
        }
        if let Err(e) = self.shutdown().await {
            warn!("Browser shutdown failed: {}", e);
        }

        output
    }
}
