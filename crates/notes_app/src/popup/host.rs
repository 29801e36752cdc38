use std::io::Write;
use std::sync::Mutex;

use notes_logging::notes_debug;

/// What the popup needs from the environment it runs in.
pub trait Host: Send + Sync {
    /// Address of the page the user is looking at.
    fn active_url(&self) -> Result<String, String>;

    fn copy_text(&self, text: &str) -> Result<(), String>;
}

/// Terminal host: the active page is whatever `open <url>` set last, and
/// copied text is printed between markers.
#[derive(Default)]
pub struct TerminalHost {
    active: Mutex<Option<String>>,
}

impl TerminalHost {
    pub fn set_active_url(&self, url: String) {
        notes_debug!("Active page set to {}", url);
        if let Ok(mut active) = self.active.lock() {
            *active = Some(url);
        }
    }
}

impl Host for TerminalHost {
    fn active_url(&self) -> Result<String, String> {
        let active = self
            .active
            .lock()
            .map_err(|_| "active page is unavailable".to_string())?;
        active
            .clone()
            .ok_or_else(|| "no active page, use `open <url>` first".to_string())
    }

    fn copy_text(&self, text: &str) -> Result<(), String> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "----- copied note -----\n{text}----- end -----")
            .and_then(|_| out.flush())
            .map_err(|err| err.to_string())
    }
}
