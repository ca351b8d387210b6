//! Social prompt list with offline fallback.
//!
//! Prompts come from `GET /scripts`. Any failure (network, status, bad
//! payload, empty list) swaps in the built-in emergency phrases, so the
//! board is never left empty.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ScriptRecord, SerenoClient};
use crate::clipboard::Clipboard;
use crate::error::PromptSourceUnavailable;
use crate::speech::Speaker;

/// Shown whenever the backend has nothing usable.
pub const FALLBACK_PROMPTS: [&str; 5] = [
    "Preciso de um minuto para processar isso.",
    "O ambiente está muito barulhento para mim.",
    "Poderia repetir mais devagar, por favor?",
    "Prefiro continuar essa conversa por texto.",
    "Não estou me sentindo bem, preciso sair.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<ScriptRecord> for Prompt {
    fn from(record: ScriptRecord) -> Self {
        Self::new(record.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSource {
    Remote,
    LocalFallback,
}

impl fmt::Display for PromptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "REMOTE"),
            Self::LocalFallback => write!(f, "LOCAL_FALLBACK"),
        }
    }
}

pub fn fallback_prompts() -> Vec<Prompt> {
    FALLBACK_PROMPTS.iter().map(|text| Prompt::new(*text)).collect()
}

pub type Action = Box<dyn Fn() + Send + Sync>;

/// One rendered prompt. The copy and speak handlers are bound to this
/// entry's own text when it is rendered.
pub struct PromptEntry {
    text: String,
    on_copy: Action,
    on_speak: Action,
}

impl PromptEntry {
    pub fn new(text: impl Into<String>, on_copy: Action, on_speak: Action) -> Self {
        Self {
            text: text.into(),
            on_copy,
            on_speak,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn copy(&self) {
        (self.on_copy)()
    }

    pub fn speak(&self) {
        (self.on_speak)()
    }
}

impl fmt::Debug for PromptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptEntry").field("text", &self.text).finish()
    }
}

/// Container that displays rendered prompt entries.
pub trait PromptBoard {
    fn clear(&mut self);
    fn append(&mut self, entry: PromptEntry);
}

/// In-memory board, in render order.
#[derive(Debug, Default)]
pub struct PromptList {
    entries: Vec<PromptEntry>,
}

impl PromptList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&PromptEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(PromptEntry::text).collect()
    }
}

impl PromptBoard for PromptList {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn append(&mut self, entry: PromptEntry) {
        self.entries.push(entry);
    }
}

/// Builds entries whose actions reach the clipboard and the speaker.
#[derive(Clone)]
pub struct EntryRenderer {
    clipboard: Arc<dyn Clipboard>,
    speaker: Arc<dyn Speaker>,
    locale: String,
}

impl EntryRenderer {
    pub fn new(clipboard: Arc<dyn Clipboard>, speaker: Arc<dyn Speaker>, locale: &str) -> Self {
        Self {
            clipboard,
            speaker,
            locale: locale.to_string(),
        }
    }

    pub fn render(&self, text: &str) -> PromptEntry {
        let on_copy: Action = {
            let clipboard = Arc::clone(&self.clipboard);
            let text = text.to_string();
            Box::new(move || match clipboard.set_text(&text) {
                Ok(()) => debug!("Copied prompt to clipboard"),
                Err(e) => warn!("Copy failed: {e}"),
            })
        };

        let on_speak: Action = {
            let speaker = Arc::clone(&self.speaker);
            let text = text.to_string();
            let locale = self.locale.clone();
            Box::new(move || speaker.speak(&text, &locale))
        };

        PromptEntry::new(text, on_copy, on_speak)
    }
}

pub struct PromptLoader {
    client: SerenoClient,
    renderer: EntryRenderer,
}

impl PromptLoader {
    pub fn new(client: SerenoClient, renderer: EntryRenderer) -> Self {
        Self { client, renderer }
    }

    /// Fetch the remote list, or the fallback list if it is unusable.
    /// Never fails and never mixes the two sources.
    pub async fn resolve(&self) -> (PromptSource, Vec<Prompt>) {
        match self.fetch_remote().await {
            Ok(prompts) => {
                info!("Loaded {} prompts from {}", prompts.len(), self.client.base_url());
                (PromptSource::Remote, prompts)
            }
            Err(e) => {
                warn!("{e}; using built-in emergency prompts");
                (PromptSource::LocalFallback, fallback_prompts())
            }
        }
    }

    async fn fetch_remote(&self) -> Result<Vec<Prompt>, PromptSourceUnavailable> {
        let records = self.client.fetch_scripts().await?;
        if records.is_empty() {
            return Err(PromptSourceUnavailable::Empty);
        }
        Ok(records.into_iter().map(Prompt::from).collect())
    }

    /// Resolve the prompt list and replace the board's contents with it.
    /// Clearing and rendering happen together after the request settles.
    pub async fn load_prompts<B>(&self, board: &mut B) -> PromptSource
    where
        B: PromptBoard + ?Sized,
    {
        let (source, prompts) = self.resolve().await;

        board.clear();
        for prompt in &prompts {
            board.append(self.renderer.render(prompt.text()));
        }

        debug!("Rendered {} prompts ({source})", prompts.len());
        source
    }
}
