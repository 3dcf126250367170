//! Busy indicator shown while a submission waits on the server

use std::io::Write;

/// Something that can signal "request in progress" to the user
pub trait BusyIndicator {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// Shows the indicator on creation and hides it on drop
///
/// Every exit path of a submission, including early returns, leaves the
/// indicator hidden.
pub struct BusyGuard<'a, I: BusyIndicator + ?Sized> {
    indicator: &'a mut I,
}

impl<'a, I: BusyIndicator + ?Sized> BusyGuard<'a, I> {
    pub fn new(indicator: &'a mut I) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl<I: BusyIndicator + ?Sized> Drop for BusyGuard<'_, I> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

/// Status line on stderr
///
/// Writes nothing when stderr is redirected, so logs stay clean.
pub struct TerminalIndicator {
    visible: bool,
    enabled: bool,
}

const BUSY_TEXT: &str = "Elaborazione in corso...";

impl TerminalIndicator {
    pub fn new() -> Self {
        use std::io::IsTerminal;
        Self {
            visible: false,
            enabled: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator for TerminalIndicator {
    fn show(&mut self) {
        if self.visible {
            return;
        }
        self.visible = true;
        if self.enabled {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "{}", BUSY_TEXT);
            let _ = stderr.flush();
        }
    }

    fn hide(&mut self) {
        if !self.visible {
            return;
        }
        self.visible = false;
        if self.enabled {
            // Blank out the status line and return to column 0
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r{}\r", " ".repeat(BUSY_TEXT.len()));
            let _ = stderr.flush();
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
