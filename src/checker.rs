use anyhow::anyhow;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::CheckerConfig;
use crate::markup::{self, SizeAvailability, SIZE_BUTTON_SELECTOR};
use crate::utils::error::{AppError, Result};

pub struct StockChecker {
    config: CheckerConfig,
}

impl StockChecker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Runs one stock check: launch a browser, load the page, wait for the
    /// size selector to render, classify the target size. Single pass, no
    /// retries. The browser closes when dropped, on every path out of here.
    pub async fn check(&self, url: &str, size: &str) -> Result<SizeAvailability> {
        info!("Launching headless browser");
        let browser = self.launch_browser()?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&self.config.user_agent, None, None)
            .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;

        info!("Navigating to product page: {}", url);
        tab.navigate_to(url)
            .map_err(|e| AppError::Browser(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::Browser(format!("Page load failed: {}", e)))?;

        // The size buttons are rendered client-side; poll for them instead
        // of sleeping a fixed interval.
        let deadline = Duration::from_secs(self.config.render_deadline_secs);
        info!(
            "Waiting up to {}s for the size selector to render",
            self.config.render_deadline_secs
        );
        let rendered = tab
            .wait_for_element_with_custom_timeout(SIZE_BUTTON_SELECTOR, deadline)
            .is_ok();

        if let Some(path) = &self.config.screenshot_path {
            if let Err(e) = self.take_screenshot(&tab, path) {
                warn!("Failed to write diagnostic screenshot: {}", e);
            }
        }

        if !rendered {
            warn!(
                "No size selector appeared within {}s",
                self.config.render_deadline_secs
            );
            return Ok(SizeAvailability::Unknown);
        }

        info!("Searching the rendered page for size '{}'", size);
        let html = tab
            .get_content()
            .map_err(|e| AppError::Browser(format!("Failed to get page content: {}", e)))?;

        Ok(markup::classify_size(&html, size))
    }

    fn launch_browser(&self) -> Result<Browser> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .window_size(Some((1920, 1080)))
            .args(vec![
                std::ffi::OsStr::new("--no-sandbox"),
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &self.config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))
    }

    // Debug aid only; the file is overwritten on each run and never feeds
    // the stock decision.
    fn take_screenshot(&self, tab: &Tab, path: &Path) -> anyhow::Result<()> {
        let screenshot_data = tab
            .capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            )
            .map_err(|e| anyhow!("Screenshot capture failed: {}", e))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| anyhow!("Failed to create screenshot directory: {}", e))?;
            }
        }

        std::fs::write(path, screenshot_data)
            .map_err(|e| anyhow!("Failed to write screenshot: {}", e))?;

        info!("Diagnostic screenshot written to {}", path.display());
        Ok(())
    }
}
