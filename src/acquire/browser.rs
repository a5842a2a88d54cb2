use crate::model::ScrapeError;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const VIEWPORT: (u32, u32) = (1920, 1080);

/// An open page. Dropping it releases the underlying browser.
pub trait PageSession {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError>;
    /// `Err` when nothing matching `selector` shows up within `timeout`.
    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError>;
    fn content(&mut self) -> Result<String, ScrapeError>;
}

pub trait PageRenderer: Send + Sync {
    fn open(&self, viewport: (u32, u32)) -> Result<Box<dyn PageSession>, ScrapeError>;
}

fn browser_error(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(e.to_string())
}

/// Launches a fresh headless Chrome per session.
pub struct ChromeRenderer;

impl ChromeRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRenderer for ChromeRenderer {
    fn open(&self, viewport: (u32, u32)) -> Result<Box<dyn PageSession>, ScrapeError> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some(viewport))
            .build()
            .map_err(browser_error)?;

        let browser = Browser::new(options).map_err(browser_error)?;
        let tab = browser.new_tab().map_err(browser_error)?;
        debug!("Chrome session opened");

        Ok(Box::new(ChromeSession {
            tab,
            _browser: browser,
        }))
    }
}

struct ChromeSession {
    tab: Arc<Tab>,
    // Dropped after the tab; ends the Chrome process.
    _browser: Browser,
}

impl PageSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.tab.navigate_to(url).map_err(browser_error)?;
        self.tab.wait_until_navigated().map_err(browser_error)?;
        Ok(())
    }

    fn wait_for_element(&mut self, selector: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ())
            .map_err(browser_error)
    }

    fn content(&mut self) -> Result<String, ScrapeError> {
        self.tab.get_content().map_err(browser_error)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            warn!("Failed to close browser tab: {}", e);
        }
        debug!("Chrome session released");
    }
}
