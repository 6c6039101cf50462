use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::Config;
use crate::display::{self, Rendered};
use crate::error::SessedError;
use crate::range::LineRange;

pub const STATE_FILE: &str = "state.json";
pub const STATE_VERSION: u32 = 1;

/// On-disk shape of the session, rewritten in full at the end of every
/// command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    pub version: u32,
    pub path: Option<String>,
    pub last_displayed: Option<Vec<i64>>,
    pub selection: Option<(i64, i64)>,
    pub trials: u32,
    pub max_trials: u32,
    pub content_hash: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            path: None,
            last_displayed: None,
            selection: None,
            trials: 0,
            max_trials: Config::default().max_trials,
            content_hash: None,
            updated_at: None,
        }
    }
}

/// The live session: the persisted record plus the open file's lines, which
/// are never persisted and always reloaded from disk.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub path: Option<PathBuf>,
    pub lines: Vec<String>,
    pub last_displayed: Option<Vec<i64>>,
    pub selection: Option<LineRange>,
    pub trials: u32,
    pub max_trials: u32,
}

impl Session {
    pub fn new(max_trials: u32) -> Self {
        Self {
            max_trials,
            ..Self::default()
        }
    }

    pub fn path(&self) -> Result<&Path, SessedError> {
        self.path.as_deref().ok_or(SessedError::NoFileLoaded)
    }

    /// Loads `path` as the open file. A file that cannot be read leaves the
    /// session in the no-file state.
    pub async fn open(&mut self, path: &Path) -> Result<(), SessedError> {
        match read_lines(path).await {
            Ok(lines) => {
                self.selection = None;
                self.path = Some(path.to_path_buf());
                self.lines = lines;
                self.last_displayed = None;
                Ok(())
            }
            Err(e) => {
                log::debug!("open {} failed: {}", path.display(), e);
                self.close();
                let path = path.display().to_string();
                match e.kind() {
                    std::io::ErrorKind::InvalidData => Err(SessedError::NotUtf8 { path }),
                    _ => Err(SessedError::file_not_found(path)),
                }
            }
        }
    }

    /// Re-reads the open file after it was written, keeping the selection
    /// untouched.
    pub async fn reload(&mut self) -> Result<()> {
        let path = self.path()?.to_path_buf();
        self.lines = read_lines(&path)
            .await
            .with_context(|| format!("Failed to reload {}", path.display()))?;
        self.last_displayed = None;
        Ok(())
    }

    pub fn close(&mut self) {
        self.path = None;
        self.lines.clear();
        self.last_displayed = None;
        self.selection = None;
    }

    /// Renders `indices` and records them for scrolling. The full requested
    /// list is recorded even when `max_lines` truncates the output.
    pub fn display<W: Write>(
        &mut self,
        out: &mut W,
        indices: Vec<i64>,
        starred: &HashSet<i64>,
        max_lines: Option<usize>,
    ) -> std::io::Result<Rendered> {
        if indices.is_empty() {
            self.last_displayed = None;
            return Ok(Rendered::default());
        }

        let rendered = display::render(out, &self.lines, &indices, starred, max_lines)?;
        self.last_displayed = Some(indices);
        Ok(rendered)
    }

    pub fn content_hash(&self) -> Option<String> {
        self.path.as_ref()?;
        let mut hasher = blake3::Hasher::new();
        for line in &self.lines {
            hasher.update(line.as_bytes());
        }
        Some(hasher.finalize().to_hex().to_string())
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            version: STATE_VERSION,
            path: self.path.as_ref().map(|p| p.to_string_lossy().into_owned()),
            last_displayed: self.last_displayed.clone(),
            selection: self.selection.map(|r| (r.begin, r.end)),
            trials: self.trials,
            max_trials: self.max_trials,
            content_hash: self.content_hash(),
            updated_at: Some(Utc::now()),
        }
    }

    /// Rebuilds a live session from its record, reloading the file. A stored
    /// path that no longer resolves yields the no-file state.
    pub async fn from_record(record: SessionRecord) -> Self {
        let mut session = Session {
            trials: record.trials,
            max_trials: record.max_trials,
            ..Session::default()
        };

        let Some(path) = record.path else {
            return session;
        };
        let path = PathBuf::from(path);

        match read_lines(&path).await {
            Ok(lines) => session.lines = lines,
            Err(e) => {
                log::warn!("open file {} is no longer readable: {}", path.display(), e);
                return session;
            }
        }
        session.path = Some(path);
        session.selection = record.selection.map(|(b, e)| LineRange::new(b, e));
        session.last_displayed = record.last_displayed;

        if record.content_hash.is_some() && record.content_hash != session.content_hash() {
            log::warn!("open file changed on disk since the last command; scroll position dropped");
            session.last_displayed = None;
        }

        session
    }

    /// Status lines printed after every command.
    pub fn write_footer<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return writeln!(out, "no file loaded");
        };

        writeln!(out, "current file: {}", path.display())?;
        writeln!(out, "total lines: {}", self.lines.len())?;

        if let Some(selection) = self.selection {
            return writeln!(out, "selection for rewrite: {}", selection);
        }

        let status = match self.last_displayed.as_deref() {
            None => "cannot scroll",
            Some(shown) => {
                let first = shown.iter().copied().min().unwrap_or(0);
                let last = shown.iter().copied().max().unwrap_or(0);
                let end = self.lines.len() as i64 - 1;
                match (first <= 0, last >= end) {
                    (true, true) => "cannot scroll",
                    (true, false) => "can scroll down",
                    (false, true) => "can scroll up",
                    (false, false) => "can scroll",
                }
            }
        };
        writeln!(out, "{}", status)
    }
}

/// Reads a file into lines that keep their terminators. Content that is not
/// valid UTF-8 fails with `InvalidData`: the buffer is written back whole on
/// commit, so it has to round-trip byte for byte.
pub async fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let bytes = fs::read(path).await?;
    let content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(split_lines(&content))
}

pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// Loads and saves the session artifact inside the state directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state_dir: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            state_dir: state_dir.to_path_buf(),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE)
    }

    pub async fn load_record(&self) -> Result<Option<SessionRecord>> {
        let path = self.state_path();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        match serde_json::from_str::<SessionRecord>(&content) {
            Ok(record) if record.version == STATE_VERSION => Ok(Some(record)),
            Ok(record) => {
                log::warn!(
                    "discarding session artifact with version {} (expected {})",
                    record.version,
                    STATE_VERSION
                );
                Ok(None)
            }
            Err(e) => {
                log::warn!("discarding unreadable session artifact: {}", e);
                Ok(None)
            }
        }
    }

    /// Acquires the session for one command.
    pub async fn acquire(&self, config: &Config) -> Result<Session> {
        log::debug!("loading session from {}", self.state_path().display());
        match self.load_record().await? {
            Some(record) => Ok(Session::from_record(record).await),
            None => Ok(Session::new(config.max_trials)),
        }
    }

    /// Persists the session. Called on every exit path of a command.
    pub async fn release(&self, session: &Session) -> Result<()> {
        let path = self.state_path();
        let content = serde_json::to_string_pretty(&session.to_record())?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("saved session to {}", path.display());
        Ok(())
    }
}
