//! Per-user text history.
//!
//! Stores each user's submitted texts as one append-only plain-text file in
//! the configured texts directory. Entries are written as
//! `[dd/mm/yyyy HH:MM:SS] [Tema: <theme>] <text>` followed by a blank line,
//! which is the format `mindmap::parse_log` reads back.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::sync::Mutex;
use tracing::debug;

/// User id used when the caller supplies an empty one.
const DEFAULT_USER: &str = "default_user";

/// Timestamp format written in front of every entry.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Reduce a caller-supplied id to a bare file stem (no directories).
pub fn sanitize_user_id(user_id: &str) -> String {
    let base = Path::new(user_id.trim())
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    if base.is_empty() {
        DEFAULT_USER.to_string()
    } else {
        base
    }
}

/// Format one log entry, including its trailing blank line.
pub fn format_entry(timestamp: &str, text: &str, theme: Option<&str>) -> String {
    let theme_part = match theme.map(str::trim).filter(|t| !t.is_empty()) {
        Some(theme) => format!("[Tema: {theme}] "),
        None => String::new(),
    };
    format!("[{timestamp}] {theme_part}{text}\n\n")
}

pub struct HistoryStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the history file for `user_id`.
    pub fn log_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", sanitize_user_id(user_id)))
    }

    pub fn exists(&self, user_id: &str) -> bool {
        self.log_path(user_id).exists()
    }

    /// Append an entry stamped with the current local time.
    pub async fn append_entry(&self, user_id: &str, text: &str, theme: Option<&str>) -> io::Result<PathBuf> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.append_raw(user_id, &format_entry(&timestamp, text, theme)).await
    }

    async fn append_raw(&self, user_id: &str, entry: &str) -> io::Result<PathBuf> {
        let _guard = self.write_lock.lock().await;

        fs::create_dir_all(&self.dir)?;
        let path = self.log_path(user_id);
        let mut file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(entry.as_bytes())?;

        debug!("Appended {} bytes to {}", entry.len(), path.display());
        Ok(path)
    }

    /// Full log for `user_id`; empty when nothing was saved yet.
    pub fn read_log(&self, user_id: &str) -> io::Result<String> {
        match fs::read_to_string(self.log_path(user_id)) {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}
