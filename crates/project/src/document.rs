use serde::{Deserialize, Serialize};
use timeline::{adjustments, apply_command, initial_sequences, Adjustment, Sequence, TimelineCommand};

use crate::{MetadataFields, ProjectError};

/// Everything that makes up one prompt: scene metadata plus its timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptDocument {
    #[serde(default)]
    pub metadata: MetadataFields,
    pub sequences: Vec<Sequence>,
}

impl Default for PromptDocument {
    fn default() -> Self {
        Self {
            metadata: MetadataFields::default(),
            sequences: initial_sequences(),
        }
    }
}

impl PromptDocument {
    pub fn new(metadata: MetadataFields, sequences: Vec<Sequence>) -> Result<Self, ProjectError> {
        timeline::validate(&sequences)?;
        Ok(Self {
            metadata,
            sequences,
        })
    }

    /// Run a timeline edit, replacing the whole sequence list with the
    /// result. Returns how the outcome differs from the request.
    pub fn apply(&mut self, command: &TimelineCommand) -> Vec<Adjustment> {
        let next = apply_command(&self.sequences, command);
        let report = adjustments(&self.sequences, command, &next);
        self.sequences = next;
        report
    }

    pub fn from_json(json: &str) -> Result<Self, ProjectError> {
        let doc: PromptDocument = serde_json::from_str(json)?;
        timeline::validate(&doc.sequences)?;
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
