//! Shared helpers: an in-process backend and recording capabilities.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use sereno::api::SerenoClient;
use sereno::clipboard::Clipboard;
use sereno::config::ApiConfig;
use sereno::error::ClipboardError;
use sereno::prompts::EntryRenderer;
use sereno::speech::Speaker;

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn client(base_url: &str) -> SerenoClient {
    SerenoClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        device_id: None,
    })
    .unwrap()
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub contents: Mutex<Option<String>>,
}

impl RecordingClipboard {
    pub fn current(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Mutex<Vec<(String, String)>>,
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str, locale: &str) {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), locale.to_string()));
    }
}

pub fn renderer() -> (EntryRenderer, Arc<RecordingClipboard>, Arc<RecordingSpeaker>) {
    let clipboard = Arc::new(RecordingClipboard::default());
    let speaker = Arc::new(RecordingSpeaker::default());
    let renderer = EntryRenderer::new(clipboard.clone(), speaker.clone(), "pt-BR");
    (renderer, clipboard, speaker)
}
