//! Speech synthesis via the Google Cloud Text-to-Speech REST API.
//!
//! Sends `{input, voice, audioConfig}` to `text:synthesize` with an API key
//! and decodes the base64 `audioContent` of the response. Without a key the
//! client is still constructed but every call fails with `NotConfigured`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::TtsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceGender {
    Male,
    Female,
}

impl VoiceGender {
    /// `FEMALE` (any case) selects a female voice; anything else is male.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("female") => Self::Female,
            _ => Self::Male,
        }
    }

    pub fn as_ssml(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub language_code: String,
    pub gender: VoiceGender,
}

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech synthesis client is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error reported by the provider, with its canonical status name
    /// (`INVALID_ARGUMENT`, `RESOURCE_EXHAUSTED`, ...).
    #[error("provider error ({status}): {message}")]
    Provider { status: String, message: String },

    #[error("provider returned empty audio")]
    EmptyAudio,

    #[error("invalid audio payload: {0}")]
    Decode(String),
}

impl TtsError {
    /// HTTP status to report to API clients for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Provider { status, .. } => match status.as_str() {
                "INVALID_ARGUMENT" | "FAILED_PRECONDITION" => StatusCode::BAD_REQUEST,
                "RESOURCE_EXHAUSTED" => StatusCode::TOO_MANY_REQUESTS,
                "UNAVAILABLE" => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Synthesize `request` into encoded audio bytes.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError>;

    /// Content type of the produced audio.
    fn content_type(&self) -> &'static str {
        "audio/mp3"
    }
}

pub struct GoogleTts {
    endpoint: String,
    api_key: Option<String>,
    audio_encoding: String,
    client: Client,
}

impl GoogleTts {
    pub fn new(config: &TtsConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_none() {
            warn!("No Google TTS API key configured, /synthesize will fail");
        }

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            audio_encoding: config.audio_encoding.clone(),
            client,
        })
    }

    fn request_body(&self, request: &SpeechRequest) -> serde_json::Value {
        json!({
            "input": { "text": request.text },
            "voice": {
                "languageCode": request.language_code,
                "ssmlGender": request.gender.as_ssml(),
            },
            "audioConfig": { "audioEncoding": self.audio_encoding },
        })
    }
}

/// Turn a non-success response body into a `Provider` error.
fn provider_error(http_status: StatusCode, body: &serde_json::Value) -> TtsError {
    let status = body["error"]["status"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| match http_status {
            StatusCode::BAD_REQUEST => "INVALID_ARGUMENT".into(),
            StatusCode::TOO_MANY_REQUESTS => "RESOURCE_EXHAUSTED".into(),
            StatusCode::SERVICE_UNAVAILABLE => "UNAVAILABLE".into(),
            _ => "UNKNOWN".into(),
        });
    let message = body["error"]["message"]
        .as_str()
        .unwrap_or("unknown error")
        .to_string();
    TtsError::Provider { status, message }
}

/// Decode the `audioContent` field of a successful response.
fn decode_audio(body: &serde_json::Value) -> Result<Vec<u8>, TtsError> {
    let encoded = body["audioContent"].as_str().unwrap_or("");
    if encoded.is_empty() {
        return Err(TtsError::EmptyAudio);
    }
    let audio = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| TtsError::Decode(e.to_string()))?;
    if audio.is_empty() {
        return Err(TtsError::EmptyAudio);
    }
    Ok(audio)
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, TtsError> {
        let api_key = self.api_key.as_deref().ok_or(TtsError::NotConfigured)?;
        let t_start = Instant::now();

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&self.request_body(request))
            .send()
            .await?;

        // Error bodies are not always JSON (proxies, gateways)
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
            return Err(provider_error(status, &body));
        }

        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| TtsError::Decode(e.to_string()))?;

        let audio = decode_audio(&body)?;
        info!(
            "Received {} bytes of audio ({:.0}ms)",
            audio.len(),
            t_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(audio)
    }
}
