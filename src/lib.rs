//! tavola: text-to-speech journal service with history mindmaps.
//!
//! - `mindmap`: pure text-history → topic tree pipeline
//! - `history`: append-only per-user text logs
//! - `tts`: Google Cloud speech synthesis client
//! - `diagram`: OpenAI-generated Mermaid diagrams
//! - `api`: axum HTTP surface tying them together
//! - `config`: YAML + environment configuration

pub mod api;
pub mod config;
pub mod diagram;
pub mod history;
pub mod mindmap;
pub mod tts;

#[cfg(test)]
mod test_util;
