use bevy::prelude::*;
use constants::ui_text::LOADING_TEXT;

/// Text shown next to the slider: loading message, current snapshot label, or failure.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct StatusLabel {
    text: String,
}

impl StatusLabel {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for StatusLabel {
    fn default() -> Self {
        Self::new(LOADING_TEXT)
    }
}
