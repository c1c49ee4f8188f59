use anyhow::Result;
use chrono::{DateTime, Utc};
use project::{MetadataFields, PromptDocument};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use timeline::Sequence;

pub mod yaml;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Yaml,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub output_path: Option<PathBuf>,
}

/// One timeline row as it appears in an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub sequence: u32,
    pub timestamp: String,
    pub action: String,
    pub audio: String,
}

impl From<&Sequence> for TimelineEntry {
    fn from(seq: &Sequence) -> Self {
        Self {
            sequence: seq.index,
            timestamp: seq.label().to_string(),
            action: seq.action.clone(),
            audio: seq.audio.clone(),
        }
    }
}

pub fn timeline_entries(sequences: &[Sequence]) -> Vec<TimelineEntry> {
    sequences.iter().map(TimelineEntry::from).collect()
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .cloned()
        .collect()
}

/// Copy of the metadata with blank list entries dropped. Categories stay
/// even when emptied; the YAML writer skips empty ones.
pub fn filtered_metadata(metadata: &MetadataFields) -> MetadataFields {
    MetadataFields {
        key_elements: non_blank(&metadata.key_elements),
        element_categories: metadata
            .element_categories
            .iter()
            .map(|(name, items)| (name.clone(), non_blank(items)))
            .collect(),
        negative_prompts: non_blank(&metadata.negative_prompts),
        ..metadata.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExportData {
    metadata: MetadataFields,
    timeline: Vec<TimelineEntry>,
    exported_at: DateTime<Utc>,
    exporter_version: String,
}

/// Main exporter struct
pub struct Exporter {
    config: ExportConfig,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, doc: &PromptDocument) -> Result<String> {
        match self.config.format {
            ExportFormat::Yaml => Ok(yaml::render_yaml(doc)),
            ExportFormat::Json => self.render_json(doc),
        }
    }

    /// Render and write to the configured path, or return the text when
    /// no path is set.
    pub fn export(&self, doc: &PromptDocument) -> Result<Option<String>> {
        let content = self.render(doc)?;
        match &self.config.output_path {
            Some(path) => {
                std::fs::write(path, content).map_err(ExportError::from)?;
                Ok(None)
            }
            None => Ok(Some(content)),
        }
    }

    fn render_json(&self, doc: &PromptDocument) -> Result<String> {
        let export_data = ExportData {
            metadata: filtered_metadata(&doc.metadata),
            timeline: timeline_entries(&doc.sequences),
            exported_at: Utc::now(),
            exporter_version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let json = serde_json::to_string_pretty(&export_data).map_err(ExportError::from)?;
        Ok(json)
    }
}
