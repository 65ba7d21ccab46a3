// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// Represents a single document loaded from disk together with
// its known author. This is a plain data struct with no
// behaviour — the training label and the raw text.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A raw document loaded from the corpus.
/// By the time a Document is created, the text has already
/// been read from its file; no format parsing remains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The author this document is attributed to in the corpus —
    /// the directory name it was loaded from
    pub author: String,

    /// The filename — kept for traceability so we know
    /// which file a training segment came from
    pub source: String,

    /// The full text content of the document
    /// before any cleaning or tokenisation
    pub text: String,
}

impl Document {
    /// Create a new Document.
    /// Uses impl Into<String> so callers can pass &str or String —
    /// this is idiomatic Rust for flexible string arguments.
    pub fn new(
        author: impl Into<String>,
        source: impl Into<String>,
        text:   impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            source: source.into(),
            text:   text.into(),
        }
    }
}
