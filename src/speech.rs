//! Speech synthesis for the "speak" action.
//!
//! Playback is fire-and-forget: the caller never waits for or observes
//! completion. Overlapping requests are left to the synthesizer.

use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use tracing::{debug, info, warn};

use crate::config::SpeechConfig;

pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str, locale: &str);
}

/// Shells out to a system synthesizer on a background thread.
pub struct CommandSpeaker {
    backend: SpeechBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpeechBackend {
    EspeakNg,
    SpdSay,
}

impl CommandSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        let backend = if config.backend == "spd-say" {
            SpeechBackend::SpdSay
        } else {
            SpeechBackend::EspeakNg
        };
        info!("Speech initialized (backend: {}, locale: {})", config.backend, config.locale);
        Self { backend }
    }

    fn command(&self, text: &str, locale: &str) -> Command {
        match self.backend {
            SpeechBackend::EspeakNg => {
                let mut cmd = Command::new("espeak-ng");
                cmd.args(["-v", &locale.to_lowercase(), "--", text]);
                cmd
            }
            SpeechBackend::SpdSay => {
                let mut cmd = Command::new("spd-say");
                cmd.args(["-l", locale, "--", text]);
                cmd
            }
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, locale: &str) {
        if text.trim().is_empty() {
            warn!("Empty text, nothing to speak");
            return;
        }

        let mut cmd = self.command(text, locale);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        let chars = text.chars().count();

        // Spawn here so the synthesizer is running before we return; only
        // the wait happens off-thread.
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to run speech synthesizer: {e}");
                return;
            }
        };
        thread::spawn(move || match child.wait() {
            Ok(status) if status.success() => debug!("Spoke {chars} chars"),
            Ok(status) => warn!("Speech synthesizer exited with {status}"),
            Err(e) => warn!("Speech synthesizer failed: {e}"),
        });
    }
}

/// Used when speech is disabled in config.
pub struct MutedSpeaker;

impl Speaker for MutedSpeaker {
    fn speak(&self, text: &str, _locale: &str) {
        debug!("Speech disabled, not speaking {} chars", text.chars().count());
    }
}

pub fn from_config(config: &SpeechConfig) -> Arc<dyn Speaker> {
    if config.enabled {
        Arc::new(CommandSpeaker::new(config))
    } else {
        Arc::new(MutedSpeaker)
    }
}
