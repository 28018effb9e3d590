//! Canvas data model.
//!
//! Every operation takes `&self` and returns a new value, so a canvas can be
//! shared behind `&` or `Arc` while it is rendered for several channels.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A clickable control attached to a section.
///
/// An action with neither `url` nor `action` is inert and renderers skip it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasAction {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl CanvasAction {
    /// An action that opens `url`.
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: Some(url.into()),
            action: None,
        }
    }

    /// An action identified by a command name, with no URL.
    pub fn command(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: None,
            action: Some(action.into()),
        }
    }

    /// The URL to open, if this action has a non-empty one.
    #[must_use]
    pub fn link_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSection {
    pub title: String,
    /// May be empty; renderers substitute a placeholder.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub actions: Vec<CanvasAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl CanvasSection {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            actions: Vec::new(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: CanvasAction) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// The root message unit: a title, optional description and ordered sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub sections: Vec<CanvasSection>,
    /// Opaque to every renderer; carried through unchanged.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Canvas {
    /// A canvas with no sections.
    pub fn create(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            sections: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn new(title: impl Into<String>) -> Self {
        Self::create(title, None)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns a copy of this canvas with `section` appended.
    #[must_use]
    pub fn add_section(&self, section: CanvasSection) -> Self {
        let mut next = self.clone();
        next.sections.push(section);
        next
    }

    /// Returns a copy of this canvas with `action` appended to the section at
    /// `section_index`.
    pub fn add_action(&self, section_index: usize, action: CanvasAction) -> Result<Self> {
        if section_index >= self.sections.len() {
            return Err(Error::IndexOutOfRange {
                index: section_index,
                len: self.sections.len(),
            });
        }
        let mut next = self.clone();
        next.sections[section_index].actions.push(action);
        Ok(next)
    }
}
