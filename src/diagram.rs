//! LLM-generated Mermaid mindmaps.
//!
//! An alternative to the deterministic `mindmap` tree: the whole history is
//! sent to an OpenAI chat model, which is asked for a `graph TD` diagram.
//! The reply is stripped of code fences and rejected unless it starts with
//! `graph`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;

const PROMPT_TEMPLATE: &str = r#"
Crie um mapa mental conciso e hierárquico baseado no conteúdo do histórico de textos abaixo.
Use a sintaxe Mermaid (graph TD).
Identifique um tema central ou o tópico mais recorrente como nó raiz (use um ID simples como 'root').
Crie subtópicos ramificados para as principais ideias ou entradas do histórico.
**IMPORTANTE: Defina cada nó usando a sintaxe `nodeId["Texto do Nó"]`.**
**Os `nodeId` devem ser identificadores curtos e únicos, sem espaços ou caracteres especiais (ex: entry1, topic2, idea3).**
**O "Texto do Nó" (dentro das aspas e colchetes) deve ser o rótulo visível, curto e significativo.**
Exemplo de link válido: `root["Tema Principal"] --> entry1["Primeira Ideia"]`
Mantenha os nomes dos nós (rótulos) curtos e significativos.
Não inclua explicações fora do código Mermaid. Apenas o código Mermaid puro.

Conteúdo do Histórico:
---
{history}
---"#;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM client is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("LLM returned an empty response")]
    Empty,

    #[error("invalid diagram returned by the LLM")]
    InvalidDiagram,
}

#[async_trait]
pub trait DiagramGenerator: Send + Sync + 'static {
    /// Send `prompt` to the model and return its raw text reply.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Prompt asking for a Mermaid mindmap of `history`.
pub fn build_prompt(history: &str) -> String {
    PROMPT_TEMPLATE.replace("{history}", history)
}

/// Strip Markdown fences from a model reply and check it is a Mermaid graph.
pub fn clean_mermaid(reply: &str) -> Result<String, LlmError> {
    let mut code = reply.trim();
    if let Some(rest) = code.strip_prefix("```mermaid") {
        code = rest.trim_start();
    }
    if let Some(rest) = code.strip_suffix("```") {
        code = rest;
    }
    let code = code.trim();

    if !code.starts_with("graph") {
        return Err(LlmError::InvalidDiagram);
    }
    Ok(code.to_string())
}

/// Diagram returned for a user with no history.
pub fn empty_history_graph() -> String {
    "graph TD\n    A[\"Histórico Vazio\"];".to_string()
}

/// Single-node diagram describing a failure; quotes are removed so the
/// message cannot break the node label.
pub fn error_graph(message: &str) -> String {
    format!(
        "graph TD\n    Error[\"Erro ao gerar mapa: {}\"];",
        message.replace('"', "")
    )
}

/// Build the prompt, query the model and validate its reply.
pub async fn generate_mermaid(generator: &dyn DiagramGenerator, history: &str) -> Result<String, LlmError> {
    let reply = generator.generate(&build_prompt(history)).await?;
    match clean_mermaid(&reply) {
        Ok(code) => Ok(code),
        Err(e) => {
            warn!("LLM reply is not Mermaid code: {}", reply.chars().take(80).collect::<String>());
            Err(e)
        }
    }
}

pub struct OpenAiDiagramGenerator {
    host: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

impl OpenAiDiagramGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_none() {
            warn!("No OpenAI API key configured, /generate-mermaid-map will fail");
        }

        Ok(Self {
            host: config.host.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl DiagramGenerator for OpenAiDiagramGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let t_start = Instant::now();

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let url = format!("{}/v1/chat/completions", self.host);
        debug!("Sending {} char prompt to model '{}'", prompt.len(), self.model);

        let resp = self.client.post(&url).bearer_auth(api_key).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let data = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
            let message = data["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(LlmError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let data: serde_json::Value = serde_json::from_str(&text)?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .trim()
            .to_string();
        if content.is_empty() {
            return Err(LlmError::Empty);
        }

        info!(
            "Diagram received: {} chars ({:.0}ms)",
            content.len(),
            t_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::serve_once;

    struct Canned(&'static str);

    #[async_trait]
    impl DiagramGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_build_prompt_embeds_history() {
        let prompt = build_prompt("[ts] texto");
        assert!(prompt.contains("graph TD"));
        assert!(prompt.contains("---\n[ts] texto\n---"));
    }

    #[test]
    fn test_clean_mermaid_strips_fences() {
        let reply = "```mermaid\ngraph TD\n    root[\"Tema\"] --> a[\"Ideia\"]\n```";
        assert_eq!(
            clean_mermaid(reply).unwrap(),
            "graph TD\n    root[\"Tema\"] --> a[\"Ideia\"]"
        );
        assert_eq!(clean_mermaid("  graph LR\n a-->b  ").unwrap(), "graph LR\n a-->b");
    }

    #[test]
    fn test_clean_mermaid_rejects_prose() {
        assert!(matches!(
            clean_mermaid("Aqui está o seu mapa:\ngraph TD"),
            Err(LlmError::InvalidDiagram)
        ));
        assert!(matches!(clean_mermaid(""), Err(LlmError::InvalidDiagram)));
    }

    #[test]
    fn test_fixed_graphs() {
        assert_eq!(empty_history_graph(), "graph TD\n    A[\"Histórico Vazio\"];");
        assert_eq!(
            error_graph("chave \"inválida\""),
            "graph TD\n    Error[\"Erro ao gerar mapa: chave inválida\"];"
        );
    }

    #[tokio::test]
    async fn test_generate_mermaid() {
        let code = generate_mermaid(&Canned("```mermaid\ngraph TD\n A-->B\n```"), "h")
            .await
            .unwrap();
        assert_eq!(code, "graph TD\n A-->B");

        let err = generate_mermaid(&Canned("desculpe"), "h").await;
        assert!(matches!(err, Err(LlmError::InvalidDiagram)));
    }

    fn stub_config(addr: std::net::SocketAddr) -> LlmConfig {
        LlmConfig {
            host: format!("http://{addr}"),
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generate_reads_first_choice() {
        let addr = serve_once(
            "200 OK",
            "application/json",
            r#"{"choices":[{"message":{"content":"  graph TD\n A-->B  "}}]}"#,
        )
        .await;
        let generator = OpenAiDiagramGenerator::new(&stub_config(addr)).unwrap();
        assert_eq!(generator.generate("p").await.unwrap(), "graph TD\n A-->B");
    }

    #[tokio::test]
    async fn test_non_json_error_keeps_http_status() {
        let addr = serve_once("502 Bad Gateway", "text/html", "<h1>Bad Gateway</h1>").await;
        let generator = OpenAiDiagramGenerator::new(&stub_config(addr)).unwrap();

        match generator.generate("p").await {
            Err(LlmError::Provider { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "unknown error");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let generator = OpenAiDiagramGenerator::new(&LlmConfig::default()).unwrap();
        assert!(matches!(generator.generate("p").await, Err(LlmError::NotConfigured)));
    }
}
