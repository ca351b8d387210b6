//! Text + image chat with the Sereno assistant.
//!
//! The transcript always gets a placeholder reply while the request is in
//! flight; the placeholder is replaced by the answer or by an offline notice.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::api::{ChatRequest, SerenoClient};

pub const PENDING_REPLY: &str = "Processando...";
pub const OFFLINE_REPLY: &str = "Erro de conexão (Backend Offline). Tente novamente mais tarde.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub has_attachment: bool,
}

/// Image waiting to go out with the next message.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub base64: String,
}

pub struct ChatSession {
    client: SerenoClient,
    history: Vec<ChatMessage>,
    attachment: Option<Attachment>,
}

impl ChatSession {
    pub fn new(client: SerenoClient) -> Self {
        Self {
            client,
            history: Vec::new(),
            attachment: None,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Read an image file and hold it, base64-encoded, for the next send.
    pub fn attach(&mut self, path: &Path) -> std::io::Result<&Attachment> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Attached {file_name} ({} bytes)", bytes.len());

        let attachment = self.attachment.insert(Attachment {
            file_name,
            base64: STANDARD.encode(bytes),
        });
        Ok(&*attachment)
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = None;
    }

    /// Send a message. Returns `None` without touching the transcript when
    /// there is neither text nor an attachment.
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() && self.attachment.is_none() {
            return None;
        }

        let attachment = self.attachment.take();
        self.history.push(ChatMessage {
            role: Role::User,
            text: text.to_string(),
            has_attachment: attachment.is_some(),
        });

        let pending = self.history.len();
        self.history.push(ChatMessage {
            role: Role::Assistant,
            text: PENDING_REPLY.to_string(),
            has_attachment: false,
        });

        let request = ChatRequest {
            texto: text.to_string(),
            imagem: attachment.map(|a| a.base64),
        };

        let reply = match self.client.chat(&request).await {
            Ok(reply) => {
                debug!("Assistant replied with {} chars", reply.resposta.len());
                reply.resposta
            }
            Err(e) => {
                warn!("Chat request failed: {e}");
                OFFLINE_REPLY.to_string()
            }
        };

        self.history[pending].text = reply;
        Some(&self.history[pending])
    }
}
