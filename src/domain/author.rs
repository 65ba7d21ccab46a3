// ============================================================
// Layer 3 — Author Registry
// ============================================================
// Maps between class ids (what the model outputs) and author
// names (what the user understands). The registry is built
// from the corpus directory names at training time, saved
// next to the checkpoint, and reloaded for inference so the
// same ids mean the same authors across runs.
//
// An id the registry does not know is an ERROR, not a
// placeholder label: it can only happen when a checkpoint and
// a registry from different runs are mixed, and silently
// labelling such predictions would hide real corruption.
//
// Reference: Rust Book §8 (HashMaps), §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Bidirectional id ↔ author-name mapping.
/// Ids are dense: 0..len(), assigned in sorted-name order
/// so the mapping is deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorRegistry {
    /// Author names indexed by class id
    names: Vec<String>,

    /// Reverse lookup: author name → class id
    ids: HashMap<String, usize>,
}

impl AuthorRegistry {
    /// Build a registry from the author names found in the corpus.
    /// Duplicates are collapsed; names are sorted for determinism.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut unique: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().to_string())
            .collect();
        unique.sort();
        unique.dedup();

        let ids = unique
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();

        Self { names: unique, ids }
    }

    /// Number of known authors — the model's output class count
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Class id for an author name, if known
    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Author name for a class id.
    /// Unknown ids are an explicit error — see the module header.
    pub fn label_of(&self, id: usize) -> Result<&str> {
        self.names
            .get(id)
            .map(|s| s.as_str())
            .with_context(|| format!(
                "Unknown class id {} (registry knows {} authors). \
                 Checkpoint and author registry are out of sync.",
                id,
                self.names.len()
            ))
    }

    /// Save the registry as JSON next to the checkpoint
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json).with_context(|| {
            format!("Cannot write author registry to '{}'", path.as_ref().display())
        })?;
        Ok(())
    }

    /// Load a registry previously saved with save()
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Cannot read author registry from '{}'. \
                 Make sure you have run 'train' before 'attribute'.",
                path.as_ref().display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_sorted() {
        let reg = AuthorRegistry::from_names(&["woolf", "austen", "dickens"]);
        assert_eq!(reg.len(), 3);
        // Sorted order: austen=0, dickens=1, woolf=2
        assert_eq!(reg.id_of("austen"), Some(0));
        assert_eq!(reg.id_of("woolf"), Some(2));
        assert_eq!(reg.label_of(1).unwrap(), "dickens");
    }

    #[test]
    fn test_duplicates_collapse() {
        let reg = AuthorRegistry::from_names(&["austen", "austen", "woolf"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let reg = AuthorRegistry::from_names(&["austen"]);
        let err = reg.label_of(7).unwrap_err();
        assert!(err.to_string().contains("Unknown class id 7"));
    }

    #[test]
    fn test_unknown_name_is_none() {
        let reg = AuthorRegistry::from_names(&["austen"]);
        assert_eq!(reg.id_of("nobody"), None);
    }
}
