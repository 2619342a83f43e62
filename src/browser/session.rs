use crate::browser::config::LaunchOptions;
use crate::dom::DomTree;
use crate::error::{InspectorError, Result};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session used to capture the DOM of a live webmail page
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Webmail clients serve a degraded page to automated browsers
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the browser alive while the user navigates to the inbox
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let browser = Browser::new(launch_opts).map_err(|e| InspectorError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| InspectorError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser })
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| InspectorError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the tab the user is looking at, falling back to the first visible one
    pub fn tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        for check in [
            "document.visibilityState === 'visible' && document.hasFocus()",
            "document.visibilityState === 'visible'",
        ] {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => log::debug!("Failed to check tab status: {}", e),
                }
            }
        }

        tabs.into_iter()
            .next()
            .ok_or_else(|| InspectorError::TabOperationFailed("No tab available".to_string()))
    }

    /// Navigate the active tab and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| InspectorError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| InspectorError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        log::info!("Navigated to {}", url);
        Ok(())
    }

    /// Capture the active tab's DOM
    pub fn snapshot(&self) -> Result<DomTree> {
        let js_code = include_str!("snapshot_dom.js");

        let result = self
            .tab()?
            .evaluate(js_code, false)
            .map_err(|e| InspectorError::EvaluationFailed(format!("Failed to run DOM snapshot script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| InspectorError::DomParseFailed("No value returned from DOM snapshot".to_string()))?;

        // The script returns a JSON string, not an object
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| InspectorError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        let tree = DomTree::from_json(&json_str)?;
        log::debug!("Captured DOM snapshot with {} elements", tree.count_elements());
        Ok(tree)
    }

    /// Close every tab. The browser process exits when the session is dropped.
    pub fn close(&self) -> Result<()> {
        for tab in self.get_tabs()? {
            if let Err(e) = tab.close(false) {
                log::warn!("Failed to close tab: {}", e);
            }
        }
        Ok(())
    }
}
