use serde::{Deserialize, Serialize};

/// Broad classification of a payload's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Text,
    Binary,
    Empty,
}

impl MediaKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Text => "text",
            MediaKind::Binary => "binary",
            MediaKind::Empty => "empty",
        }
    }
}

/// Heavy per-item data fetched lazily once an item becomes visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub kind: MediaKind,
    /// Size of the underlying content in bytes, when known.
    pub size: Option<u64>,
    /// Pixel dimensions for images whose header could be parsed.
    pub dimensions: Option<(u32, u32)>,
    /// Preview lines shown in a detail view.
    pub preview: Vec<String>,
    /// Free-form note such as "file too large".
    pub note: Option<String>,
}

impl Payload {
    /// A payload carrying only preview text.
    pub fn text<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: MediaKind::Text,
            size: None,
            dimensions: None,
            preview: lines.into_iter().map(Into::into).collect(),
            note: None,
        }
    }

    /// An image payload with known dimensions.
    #[must_use]
    pub fn image(width: u32, height: u32) -> Self {
        Self {
            kind: MediaKind::Image,
            size: None,
            dimensions: Some((width, height)),
            preview: Vec::new(),
            note: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// One-line description used in result tables.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![self.kind.as_str().to_string()];
        if let Some((width, height)) = self.dimensions {
            parts.push(format!("{width}×{height}"));
        }
        if let Some(size) = self.size {
            parts.push(format_size(size));
        }
        if let Some(note) = &self.note {
            parts.push(note.clone());
        }
        parts.join(" · ")
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
