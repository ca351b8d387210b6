mod common;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use sereno::prompts::{PromptBoard, PromptEntry, PromptList, PromptLoader, PromptSource, FALLBACK_PROMPTS};

fn scripts_app(body: serde_json::Value) -> Router {
    Router::new().route(
        "/scripts",
        get(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    )
}

async fn load(base_url: &str) -> (PromptSource, PromptList) {
    let (renderer, _, _) = common::renderer();
    let loader = PromptLoader::new(common::client(base_url), renderer);
    let mut board = PromptList::new();
    let source = loader.load_prompts(&mut board).await;
    (source, board)
}

#[tokio::test]
async fn remote_prompts_in_server_order() {
    let url = common::serve(scripts_app(json!([
        {"id": 1, "title": "Pedir tempo", "message": "Preciso de um minuto, por favor.", "category": "Geral"},
        {"id": 2, "title": "Barulho incômodo", "message": "O barulho está me deixando desconfortável."},
        {"message": "Poderia me ajudar com isso?"}
    ])))
    .await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::Remote);
    assert_eq!(
        board.texts(),
        [
            "Preciso de um minuto, por favor.",
            "O barulho está me deixando desconfortável.",
            "Poderia me ajudar com isso?",
        ]
    );
}

#[tokio::test]
async fn extra_fields_of_any_type_are_ignored() {
    let url = common::serve(scripts_app(json!([
        {"id": "a1", "message": "Preciso de uma pausa."},
        {"id": 2, "message": "Pode falar mais baixo?", "category": 3, "title": null}
    ])))
    .await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::Remote);
    assert_eq!(board.texts(), ["Preciso de uma pausa.", "Pode falar mais baixo?"]);
}

#[tokio::test]
async fn empty_list_uses_fallback() {
    let url = common::serve(scripts_app(json!([]))).await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::LocalFallback);
    assert_eq!(board.texts(), FALLBACK_PROMPTS);
}

#[tokio::test]
async fn connection_refused_uses_fallback() {
    let url = common::dead_url().await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::LocalFallback);
    assert_eq!(board.texts(), FALLBACK_PROMPTS);
}

#[tokio::test]
async fn error_status_uses_fallback() {
    let app = Router::new().route(
        "/scripts",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!([{"message": "nope"}]))) }),
    );
    let url = common::serve(app).await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::LocalFallback);
    assert_eq!(board.texts(), FALLBACK_PROMPTS);
}

#[tokio::test]
async fn malformed_body_uses_fallback() {
    let app = Router::new().route("/scripts", get(|| async { "<html>offline</html>" }));
    let url = common::serve(app).await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::LocalFallback);
    assert_eq!(board.len(), 5);
}

#[tokio::test]
async fn record_without_message_uses_fallback() {
    let url = common::serve(scripts_app(json!([
        {"message": "Preciso de um minuto, por favor."},
        {"title": "sem mensagem"}
    ])))
    .await;

    let (source, board) = load(&url).await;

    assert_eq!(source, PromptSource::LocalFallback);
    assert_eq!(board.texts(), FALLBACK_PROMPTS);
}

#[tokio::test]
async fn reload_does_not_accumulate() {
    let url = common::serve(scripts_app(json!([
        {"message": "Um"},
        {"message": "Dois"}
    ])))
    .await;
    let (renderer, _, _) = common::renderer();
    let loader = PromptLoader::new(common::client(&url), renderer);
    let mut board = PromptList::new();

    loader.load_prompts(&mut board).await;
    let first: Vec<String> = board.texts().into_iter().map(String::from).collect();
    loader.load_prompts(&mut board).await;

    assert_eq!(board.texts(), first);
    assert_eq!(board.len(), 2);
}

#[tokio::test]
async fn fallback_replaces_stale_remote_entries() {
    let url = common::serve(scripts_app(json!([{"message": "Antigo"}]))).await;
    let (renderer, _, _) = common::renderer();
    let mut board = PromptList::new();

    let online = PromptLoader::new(common::client(&url), renderer.clone());
    online.load_prompts(&mut board).await;
    assert_eq!(board.texts(), ["Antigo"]);

    let offline = PromptLoader::new(common::client(&common::dead_url().await), renderer);
    offline.load_prompts(&mut board).await;
    assert_eq!(board.texts(), FALLBACK_PROMPTS);
}

#[tokio::test]
async fn copy_and_speak_follow_entry() {
    let url = common::serve(scripts_app(json!([
        {"message": "Primeiro"},
        {"message": "Segundo"},
        {"message": "Terceiro"}
    ])))
    .await;
    let (renderer, clipboard, speaker) = common::renderer();
    let loader = PromptLoader::new(common::client(&url), renderer);
    let mut board = PromptList::new();
    loader.load_prompts(&mut board).await;

    board.get(2).unwrap().copy();
    assert_eq!(clipboard.current().as_deref(), Some("Terceiro"));
    board.get(0).unwrap().copy();
    assert_eq!(clipboard.current().as_deref(), Some("Primeiro"));

    board.get(1).unwrap().speak();
    let spoken = speaker.spoken.lock().unwrap();
    assert_eq!(*spoken, [("Segundo".to_string(), "pt-BR".to_string())]);
}

/// Records every board operation, to check that clearing happens once and
/// before any entry is appended.
#[derive(Default)]
struct OpLog {
    ops: Vec<String>,
}

impl PromptBoard for OpLog {
    fn clear(&mut self) {
        self.ops.push("clear".into());
    }

    fn append(&mut self, entry: PromptEntry) {
        self.ops.push(format!("append:{}", entry.text()));
    }
}

#[tokio::test]
async fn clears_once_then_renders() {
    let (renderer, _, _) = common::renderer();
    let loader = PromptLoader::new(common::client(&common::dead_url().await), renderer);
    let mut log = OpLog::default();

    loader.load_prompts(&mut log).await;

    assert_eq!(log.ops.len(), 6);
    assert_eq!(log.ops[0], "clear");
    assert!(log.ops[1..].iter().all(|op| op.starts_with("append:")));
    assert_eq!(log.ops[1], format!("append:{}", FALLBACK_PROMPTS[0]));
}
