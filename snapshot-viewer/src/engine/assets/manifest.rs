use bevy::prelude::*;
use constants::path::{MAX_PATTERN_COUNT, PATTERN_INDEX_PLACEHOLDER};
use serde::Deserialize;
use std::path::Path;

/// One snapshot file listed in the manifest, with optional display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl ManifestEntry {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            display_name: None,
        }
    }

    /// Filename without directories or extension.
    pub fn file_stem(&self) -> String {
        Path::new(&self.file)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }

    /// Human-readable label: the display name when present, else the filename stem.
    pub fn label(&self) -> String {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.file_stem(),
        }
    }
}

/// The two accepted manifest shapes.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum ManifestDocument {
    Files(Vec<String>),
    Entries(Vec<ManifestEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest lists no snapshots")]
    Empty,
    #[error("manifest entry {index} has a blank file name")]
    BlankFile { index: usize },
    #[error("file template '{template}' has no {placeholder} placeholder")]
    TemplateWithoutPlaceholder {
        template: String,
        placeholder: &'static str,
    },
    #[error("file template asks for {count} files, more than the limit of {max}")]
    PatternTooLarge { count: usize, max: usize },
    #[error("file template indices {start}+{count} overflow")]
    PatternOverflow { start: usize, count: usize },
}

/// How manifest order maps onto slider indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestOrdering {
    /// Ascending by file name.
    #[default]
    Sorted,
    /// Document order, untouched.
    Listed,
}

/// Ordered list of snapshots, loaded from JSON as an asset and kept as a resource
/// once the viewer has committed to it.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ManifestDocument")]
pub struct SnapshotManifest {
    entries: Vec<ManifestEntry>,
}

impl TryFrom<ManifestDocument> for SnapshotManifest {
    type Error = ManifestError;

    fn try_from(document: ManifestDocument) -> Result<Self, Self::Error> {
        let entries = match document {
            ManifestDocument::Files(files) => files.into_iter().map(ManifestEntry::new).collect(),
            ManifestDocument::Entries(entries) => entries,
        };
        Self::from_entries(entries)
    }
}

impl SnapshotManifest {
    pub fn from_entries(entries: Vec<ManifestEntry>) -> Result<Self, ManifestError> {
        if entries.is_empty() {
            return Err(ManifestError::Empty);
        }
        if let Some(index) = entries.iter().position(|entry| entry.file.trim().is_empty()) {
            return Err(ManifestError::BlankFile { index });
        }
        Ok(Self { entries })
    }

    /// Implicit manifest: `count` files named by substituting `start..start+count`
    /// into the template's `{index}` placeholder.
    pub fn from_pattern(template: &str, start: usize, count: usize) -> Result<Self, ManifestError> {
        if !template.contains(PATTERN_INDEX_PLACEHOLDER) {
            return Err(ManifestError::TemplateWithoutPlaceholder {
                template: template.to_string(),
                placeholder: PATTERN_INDEX_PLACEHOLDER,
            });
        }
        if count > MAX_PATTERN_COUNT {
            return Err(ManifestError::PatternTooLarge {
                count,
                max: MAX_PATTERN_COUNT,
            });
        }
        let end = start
            .checked_add(count)
            .ok_or(ManifestError::PatternOverflow { start, count })?;
        let entries = (start..end)
            .map(|index| {
                ManifestEntry::new(template.replace(PATTERN_INDEX_PLACEHOLDER, &index.to_string()))
            })
            .collect();
        Self::from_entries(entries)
    }

    pub fn ordered(mut self, ordering: ManifestOrdering) -> Self {
        if ordering == ManifestOrdering::Sorted {
            self.entries.sort_by(|a, b| a.file.cmp(&b.file));
        }
        self
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, index: usize) -> Option<&ManifestEntry> {
        self.entries.get(index)
    }

    pub fn label(&self, index: usize) -> Option<String> {
        self.entry(index).map(ManifestEntry::label)
    }

    /// Asset path of every entry under the model directory, in manifest order.
    pub fn asset_paths(&self, model_directory: &str) -> Vec<String> {
        let prefix = model_directory.trim_end_matches('/');
        self.entries
            .iter()
            .map(|entry| {
                if prefix.is_empty() {
                    entry.file.clone()
                } else {
                    format!("{}/{}", prefix, entry.file)
                }
            })
            .collect()
    }
}
