use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::presets::{self, PresetKind};

pub const DEFAULT_BASE_STYLE: &str = "cinematic, photorealistic, 4K";
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Scene-level fields of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFields {
    #[serde(default)]
    pub prompt_name: String,
    #[serde(default = "default_base_style")]
    pub base_style: String,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default)]
    pub room_description: String,
    #[serde(default)]
    pub camera_setup: String,
    #[serde(default)]
    pub key_elements: Vec<String>,
    /// Named element groups, kept in the order they were created.
    #[serde(default)]
    pub element_categories: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub negative_prompts: Vec<String>,
}

fn default_base_style() -> String {
    DEFAULT_BASE_STYLE.to_string()
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

impl Default for MetadataFields {
    fn default() -> Self {
        Self {
            prompt_name: String::new(),
            base_style: default_base_style(),
            aspect_ratio: default_aspect_ratio(),
            room_description: String::new(),
            camera_setup: String::new(),
            key_elements: Vec::new(),
            element_categories: IndexMap::new(),
            negative_prompts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    KeyElements,
    NegativePrompts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    PromptName,
    BaseStyle,
    AspectRatio,
    RoomDescription,
    CameraSetup,
}

/// Lowercase, strip punctuation, and join words with underscores so the
/// name can be used as a YAML key.
pub fn sanitize_category_name(raw: &str) -> String {
    let kept: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

impl MetadataFields {
    pub fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::PromptName => &mut self.prompt_name,
            ScalarField::BaseStyle => &mut self.base_style,
            ScalarField::AspectRatio => &mut self.aspect_ratio,
            ScalarField::RoomDescription => &mut self.room_description,
            ScalarField::CameraSetup => &mut self.camera_setup,
        }
    }

    pub fn set_scalar(&mut self, field: ScalarField, value: impl Into<String>) {
        *self.scalar_mut(field) = value.into();
    }

    /// Fill a field from a named quick option. Returns false when no
    /// preset of that kind has the name.
    pub fn apply_preset(&mut self, kind: PresetKind, name: &str) -> bool {
        let Some(value) = presets::find(kind, name) else {
            return false;
        };
        let field = match kind {
            PresetKind::BaseStyle => ScalarField::BaseStyle,
            PresetKind::Environment => ScalarField::RoomDescription,
            PresetKind::Camera => ScalarField::CameraSetup,
            PresetKind::AspectRatio => ScalarField::AspectRatio,
        };
        self.set_scalar(field, value);
        true
    }

    pub fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::KeyElements => &mut self.key_elements,
            ListField::NegativePrompts => &mut self.negative_prompts,
        }
    }

    /// Append an empty entry for the user to fill in.
    pub fn push_item(&mut self, field: ListField) {
        self.list_mut(field).push(String::new());
    }

    pub fn set_item(&mut self, field: ListField, index: usize, value: impl Into<String>) -> bool {
        match self.list_mut(field).get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, field: ListField, index: usize) -> bool {
        let list = self.list_mut(field);
        if index < list.len() {
            list.remove(index);
            true
        } else {
            false
        }
    }

    /// Create an empty category from a user-typed name. Returns the
    /// sanitized key, or `None` when it is empty or already taken.
    pub fn add_category(&mut self, raw: &str) -> Option<String> {
        let name = sanitize_category_name(raw);
        if name.is_empty() || self.element_categories.contains_key(&name) {
            return None;
        }
        self.element_categories.insert(name.clone(), Vec::new());
        Some(name)
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        self.element_categories.shift_remove(name).is_some()
    }

    /// Append an empty entry, creating the category if needed.
    pub fn push_category_item(&mut self, name: &str) {
        self.element_categories
            .entry(name.to_string())
            .or_default()
            .push(String::new());
    }

    pub fn set_category_item(&mut self, name: &str, index: usize, value: impl Into<String>) -> bool {
        match self
            .element_categories
            .get_mut(name)
            .and_then(|items| items.get_mut(index))
        {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_category_item(&mut self, name: &str, index: usize) -> bool {
        match self.element_categories.get_mut(name) {
            Some(items) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        }
    }
}
