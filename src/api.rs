//! HTTP client for the Sereno backend.
//!
//! One `SerenoClient` is built at startup from `ApiConfig` and shared by the
//! prompt loader, the chat session and the sensor simulation.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// One record of `GET /scripts`. Only `message` is read; any other fields
/// the server sends (id, title, category, ...) are ignored whatever their type.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptRecord {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub texto: String,
    pub imagem: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub resposta: String,
}

/// Sensor event as accepted by `POST /events`.
#[derive(Debug, Clone, Serialize)]
pub struct SensorEvent {
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub timestamp: String,
}

impl SensorEvent {
    pub fn now(event_type: &str, value: Option<f64>, device_id: Option<String>) -> Self {
        Self {
            event_type: event_type.to_string(),
            value,
            device_id,
            // Naive UTC, matching the backend's own `datetime.utcnow()`.
            timestamp: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventAck {
    pub status: String,
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SensorCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SensorAdvice {
    #[serde(default)]
    pub sound_alert: bool,
    #[serde(default)]
    pub brightness_alert: bool,
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Serialize)]
struct SocialHelperRequest<'a> {
    situation: &'a str,
}

#[derive(Deserialize)]
struct SocialHelperReply {
    response: String,
}

#[derive(Clone)]
pub struct SerenoClient {
    base_url: String,
    client: Client,
}

impl SerenoClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /scripts`, in server order.
    pub async fn fetch_scripts(&self) -> Result<Vec<ScriptRecord>, ApiError> {
        let url = self.url("/scripts");
        debug!("GET {url}");
        let resp = self.client.get(&url).send().await?;
        decode(resp).await
    }

    /// `POST /api/ia`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.post_json("/api/ia", request).await
    }

    /// `POST /events`.
    pub async fn log_event(&self, event: &SensorEvent) -> Result<EventAck, ApiError> {
        self.post_json("/events", event).await
    }

    /// `POST /api/sensor-check`.
    pub async fn sensor_check(&self, check: &SensorCheck) -> Result<SensorAdvice, ApiError> {
        self.post_json("/api/sensor-check", check).await
    }

    /// `POST /api/social-helper`, returning the suggested strategy.
    pub async fn social_helper(&self, situation: &str) -> Result<String, ApiError> {
        let reply: SocialHelperReply = self
            .post_json("/api/social-helper", &SocialHelperRequest { situation })
            .await?;
        Ok(reply.response)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {url}");
        let resp = self.client.post(&url).json(body).send().await?;
        decode(resp).await
    }
}

/// Rejects non-2xx statuses, then parses the body with serde_json so a bad
/// payload surfaces as `ApiError::Decode` rather than a transport error.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/".into(),
            ..ApiConfig::default()
        };
        let client = SerenoClient::new(&config).unwrap();
        assert_eq!(client.url("/scripts"), "http://localhost:8000/scripts");
    }

    #[test]
    fn script_record_requires_message() {
        let ok: ScriptRecord =
            serde_json::from_str(r#"{"id": 1, "title": "Ajuda", "message": "Poderia me ajudar?"}"#)
                .unwrap();
        assert_eq!(ok.message, "Poderia me ajudar?");

        let odd_types: ScriptRecord =
            serde_json::from_str(r#"{"id": "a1", "title": null, "message": "Oi", "category": 3}"#)
                .unwrap();
        assert_eq!(odd_types.message, "Oi");

        let missing = serde_json::from_str::<ScriptRecord>(r#"{"id": 2, "title": "x"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn sensor_event_omits_empty_fields() {
        let event = SensorEvent::now("som_alto", None, None);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "som_alto");
        assert!(json.get("value").is_none());
        assert!(json.get("device_id").is_none());
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }
}
