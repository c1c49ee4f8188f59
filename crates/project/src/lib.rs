use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use timeline::{Sequence, TimelineError};
use tracing::warn;
use uuid::Uuid;

mod document;
pub use document::*;
mod metadata;
pub use metadata::*;
pub mod presets;

/// Environment variable that overrides [`app_data_dir`].
pub const DATA_DIR_ENV: &str = "SCENE_COMPOSER_DATA_DIR";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("invalid timeline: {0}")]
    InvalidTimeline(#[from] TimelineError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
    base.join("scene_composer")
}

pub fn default_db_path() -> PathBuf {
    app_data_dir().join("prompts.db")
}

/// A prompt kept in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPrompt {
    pub id: String,
    pub name: String,
    pub metadata: MetadataFields,
    pub sequences: Vec<Sequence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedPrompt {
    pub fn document(&self) -> PromptDocument {
        PromptDocument {
            metadata: self.metadata.clone(),
            sequences: self.sequences.clone(),
        }
    }
}

pub struct PromptDb {
    conn: Connection,
    path: PathBuf,
}

struct PromptRow {
    id: String,
    name: String,
    metadata_json: String,
    sequences_json: String,
    created_at: String,
    updated_at: String,
}

impl PromptRow {
    fn decode(self) -> Result<SavedPrompt> {
        let sequences: Vec<Sequence> = serde_json::from_str(&self.sequences_json)
            .with_context(|| format!("prompt {} sequences", self.id))?;
        timeline::validate(&sequences)
            .map_err(ProjectError::from)
            .with_context(|| format!("prompt {} timeline", self.id))?;
        Ok(SavedPrompt {
            metadata: serde_json::from_str(&self.metadata_json)
                .with_context(|| format!("prompt {} metadata", self.id))?,
            sequences,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&self.updated_at)?.with_timezone(&Utc),
            id: self.id,
            name: self.name,
        })
    }
}

const SELECT_PROMPT: &str =
    "SELECT id, name, metadata_json, sequences_json, created_at, updated_at FROM prompts";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PromptRow> {
    Ok(PromptRow {
        id: row.get(0)?,
        name: row.get(1)?,
        metadata_json: row.get(2)?,
        sequences_json: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl PromptDb {
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening prompt store {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        apply_migrations(&conn)?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prompts", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Store a new prompt. The name falls back to the prompt's own name,
    /// then to `Prompt N`.
    pub fn save(&self, doc: &PromptDocument, name: Option<&str>) -> Result<SavedPrompt> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None if !doc.metadata.prompt_name.trim().is_empty() => doc.metadata.prompt_name.clone(),
            None => format!("Prompt {}", self.count()? + 1),
        };
        let now = Utc::now();
        let saved = SavedPrompt {
            id: Uuid::new_v4().to_string(),
            name,
            metadata: doc.metadata.clone(),
            sequences: doc.sequences.clone(),
            created_at: now,
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO prompts(id, name, metadata_json, sequences_json, created_at, updated_at) VALUES(?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                saved.id,
                saved.name,
                serde_json::to_string(&saved.metadata)?,
                serde_json::to_string(&saved.sequences)?,
                now.to_rfc3339(),
            ],
        )?;
        Ok(saved)
    }

    /// All stored prompts, newest first. Rows that no longer decode or
    /// hold a broken timeline are skipped.
    pub fn list(&self) -> Result<Vec<SavedPrompt>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_PROMPT} ORDER BY rowid DESC"))?;
        let rows = stmt.query_map([], read_row)?;
        let mut out = Vec::new();
        for row in rows {
            match row?.decode() {
                Ok(prompt) => out.push(prompt),
                Err(e) => warn!("skipping unreadable saved prompt: {e:#}"),
            }
        }
        Ok(out)
    }

    pub fn get(&self, id: &str) -> Result<Option<SavedPrompt>> {
        let row = self
            .conn
            .query_row(&format!("{SELECT_PROMPT} WHERE id = ?1"), params![id], read_row)
            .optional()?;
        row.map(PromptRow::decode).transpose()
    }

    /// Replace a prompt's content, keeping its name and creation time.
    pub fn update(&self, id: &str, doc: &PromptDocument) -> Result<Option<SavedPrompt>> {
        let changed = self.conn.execute(
            "UPDATE prompts SET metadata_json = ?2, sequences_json = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                id,
                serde_json::to_string(&doc.metadata)?,
                serde_json::to_string(&doc.sequences)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get(id)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

fn apply_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("../migrations/V0001__init.sql"))?;
    conn.execute(
        "INSERT OR IGNORE INTO migrations(name, applied_at) VALUES(?1, strftime('%s','now'))",
        params!["V0001__init"],
    )?;
    Ok(())
}
