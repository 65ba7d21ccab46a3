// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - TextLoader implements DocumentSource
//   - A future EpubLoader could also implement DocumentSource
//   - The application layer only sees DocumentSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::document::Document;

// ─── DocumentSource ───────────────────────────────────────────────────────────
/// Any component that can load an author-labelled corpus.
///
/// Implementations:
///   - TextLoader → loads per-author directories of .txt files
///   - (future) EpubLoader → loads from ebook archives
pub trait DocumentSource {
    /// Load all available documents from this source.
    /// Returns a Vec of Documents or an error.
    fn load_all(&self) -> Result<Vec<Document>>;
}

// ─── Attributor ───────────────────────────────────────────────────────────────
/// Any component that can name the likely author of a text.
///
/// Implementations:
///   - AttributeUseCase → uses the convolutional model
///   - (future) FrequencyBaseline → uses word-frequency tables
pub trait Attributor {
    /// Given a disputed text, return the most likely author name.
    fn attribute(&self, text: &str) -> Result<String>;
}
