//! Full-page navigation seam used by the stores.

use std::sync::Mutex;

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigates the browser window. Outside the browser build it only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            log::debug!("navigate to {path} (no browser window)");
        }
    }
}

/// Records every navigation instead of performing it.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(path.to_owned());
        }
    }
}
