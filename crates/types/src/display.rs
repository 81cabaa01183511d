//! Display metadata attached to resolved positions.

use serde::{Deserialize, Serialize};

/// Human-readable display metadata for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProps {
    /// Position title (e.g. "CELO / cUSD pool").
    pub title: String,
    /// Short description of what the position is.
    pub description: String,
    /// Optional icon/image URL.
    pub image_url: Option<String>,
}

impl DisplayProps {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image_url: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}
