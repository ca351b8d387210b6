//! Clipboard writes for the "copy" action.
//!
//! On X11 the selection is served by its owning process, so the default
//! backend is xclip, which forks and keeps serving after we exit. arboard
//! is the fallback and holds the selection for `hold_ms` before returning.

use std::io::Write;
use std::process::{Command, Stdio};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ClipboardConfig;
use crate::error::ClipboardError;

pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

pub struct SystemClipboard {
    backend: ClipboardBackend,
    hold: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardBackend {
    Xclip,
    Arboard,
}

impl SystemClipboard {
    pub fn new(config: &ClipboardConfig) -> Self {
        let backend = match config.backend.as_str() {
            "arboard" => ClipboardBackend::Arboard,
            "xclip" => ClipboardBackend::Xclip,
            other => {
                warn!("Unknown clipboard backend '{other}', using xclip");
                ClipboardBackend::Xclip
            }
        };

        info!("Clipboard initialized (backend: {backend:?})");

        Self {
            backend,
            hold: Duration::from_millis(config.hold_ms),
        }
    }

    fn set_with_arboard(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Open(e.to_string()))?;

        #[cfg(target_os = "linux")]
        {
            use arboard::SetExtLinux;

            if !self.hold.is_zero() {
                // Blocks until another client takes the selection or the deadline passes.
                clipboard
                    .set()
                    .wait_until(std::time::Instant::now() + self.hold)
                    .text(text.to_owned())
                    .map_err(|e| ClipboardError::Write(e.to_string()))?;
                debug!("Clipboard set via arboard (held {:?})", self.hold);
                return Ok(());
            }
        }

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        debug!("Clipboard set via arboard");
        Ok(())
    }

    fn set_with_xclip(text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new("xclip")
            .args(["-selection", "clipboard"])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| ClipboardError::Open(format!("failed to spawn xclip: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ClipboardError::Write(e.to_string()))?;
        }
        let status = child
            .wait()
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
        if !status.success() {
            return Err(ClipboardError::Write("xclip exited with non-zero status".into()));
        }

        debug!("Clipboard set via xclip");
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self.backend {
            ClipboardBackend::Xclip => Self::set_with_xclip(text).or_else(|e| {
                warn!("xclip failed: {e}, falling back to arboard");
                self.set_with_arboard(text)
            }),
            ClipboardBackend::Arboard => self.set_with_arboard(text),
        }
    }
}
