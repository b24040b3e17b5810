//! HTTP API.
//!
//! Routes:
//! - `POST /synthesize`: save text to history, return synthesized speech
//! - `GET /history/{user_id}`: raw history log as plain text
//! - `GET /download-texts/{user_id}`: history log as a file attachment
//! - `GET /mindmap/{user_id}?theme=`: deterministic mindmap tree as JSON
//! - `POST /generate-mermaid-map`: LLM-generated Mermaid diagram

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::diagram::{self, DiagramGenerator};
use crate::history::{sanitize_user_id, HistoryStore};
use crate::mindmap::{Mindmap, MindmapTree};
use crate::tts::{SpeechRequest, SpeechSynthesizer, TtsError, VoiceGender};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<HistoryStore>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub diagrams: Arc<dyn DiagramGenerator>,
    pub mindmap: Arc<Mindmap>,
    pub language_code: String,
}

// --- Errors ---

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Tts(TtsError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Tts(e) => (e.status_code(), format!("Erro ao gerar áudio: {e}")),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// --- Request types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest {
    text: Option<String>,
    theme: Option<String>,
    gender: Option<String>,
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MindmapQuery {
    theme: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MermaidRequest {
    user_id: Option<String>,
}

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

const PLAIN_TEXT: [(header::HeaderName, &str); 1] = [(header::CONTENT_TYPE, "text/plain; charset=utf-8")];

/// Treat missing and blank strings alike.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the axum router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/synthesize", post(handle_synthesize))
        .route("/history/{user_id}", get(handle_history))
        .route("/download-texts/{user_id}", get(handle_download))
        .route("/mindmap/{user_id}", get(handle_mindmap))
        .route("/generate-mermaid-map", post(handle_mermaid))
        .with_state(state)
}

/// Serve the API until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP API listening on {addr}");
    axum::serve(listener, router(state)).await
}

// --- Handlers ---

async fn handle_synthesize(
    State(state): State<AppState>,
    Json(req): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    let text = non_blank(req.text).ok_or_else(|| ApiError::BadRequest("Texto é obrigatório".into()))?;
    let user_id =
        non_blank(req.user_id).ok_or_else(|| ApiError::BadRequest("ID do usuário é obrigatório".into()))?;
    let theme = non_blank(req.theme);

    let preview: String = text.chars().take(50).collect();
    info!(
        "HTTP /synthesize [{user_id}]: \"{}{}\" ({} chars)",
        preview.replace('\n', " "),
        if text.chars().count() > 50 { "..." } else { "" },
        text.len(),
    );

    // History is best effort: a failed write must not block the audio.
    match state.store.append_entry(&user_id, &text, theme.as_deref()).await {
        Ok(path) => info!("Saved text for {user_id} to {}", path.display()),
        Err(e) => error!("Failed to save text for {user_id}: {e}"),
    }

    let request = SpeechRequest {
        text,
        language_code: state.language_code.clone(),
        gender: VoiceGender::parse(req.gender.as_deref()),
    };
    let audio = state.tts.synthesize(&request).await.map_err(|e| {
        warn!("Speech synthesis failed: {e}");
        ApiError::Tts(e)
    })?;

    Ok(([(header::CONTENT_TYPE, state.tts.content_type())], audio).into_response())
}

async fn handle_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    let content = state.store.read_log(&user_id).map_err(|e| {
        error!("Failed to read history for {user_id}: {e}");
        ApiError::Internal("Erro interno ao ler histórico".into())
    })?;

    Ok((PLAIN_TEXT, content).into_response())
}

async fn handle_download(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    if !state.store.exists(&user_id) {
        info!("Download requested for missing history: {user_id}");
        return Err(ApiError::NotFound(
            "Arquivo de histórico não encontrado para este usuário.".into(),
        ));
    }

    let content = state.store.read_log(&user_id).map_err(|e| {
        error!("Failed to read history for download ({user_id}): {e}");
        ApiError::Internal("Erro interno ao processar o download do arquivo.".into())
    })?;

    let disposition = format!("attachment; filename=\"textos_{}.txt\"", sanitize_user_id(&user_id));
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"textos.txt\""));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response())
}

async fn handle_mindmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<MindmapQuery>,
) -> Json<MindmapTree> {
    let raw_log = state.store.read_log(&user_id).unwrap_or_else(|e| {
        warn!("Failed to read history for {user_id}, using empty log: {e}");
        String::new()
    });

    let theme = non_blank(query.theme);
    let tree = state.mindmap.build(&raw_log, theme.as_deref());
    info!("Mindmap for {user_id}: '{}' with {} entries", tree.name, tree.children.len());
    Json(tree)
}

async fn handle_mermaid(
    State(state): State<AppState>,
    Json(req): Json<MermaidRequest>,
) -> Response {
    let Some(user_id) = non_blank(req.user_id) else {
        return (
            StatusCode::BAD_REQUEST,
            NO_CACHE,
            Json(json!({ "error": "ID do usuário é obrigatório" })),
        )
            .into_response();
    };

    let history = match state.store.read_log(&user_id) {
        Ok(history) => history,
        Err(e) => {
            warn!("Failed to read history for {user_id}, using empty log: {e}");
            String::new()
        }
    };

    if history.trim().is_empty() {
        info!("Empty history for {user_id}, returning empty Mermaid map");
        return (NO_CACHE, PLAIN_TEXT, diagram::empty_history_graph()).into_response();
    }

    info!("Generating Mermaid map for {user_id}...");
    match diagram::generate_mermaid(state.diagrams.as_ref(), &history).await {
        Ok(code) => (NO_CACHE, PLAIN_TEXT, code).into_response(),
        Err(e) => {
            error!("Failed to generate Mermaid map for {user_id}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                NO_CACHE,
                PLAIN_TEXT,
                diagram::error_graph(&e.to_string()),
            )
                .into_response()
        }
    }
}
