// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads an author-labelled plain-text corpus laid out as:
//
//   corpus/
//     austen/
//       emma.txt
//       persuasion.txt
//     dickens/
//       bleak_house.txt
//     ...
//
// The subdirectory name is the ground-truth author label.
// One unreadable file is logged and skipped — a single bad
// file should not abort a whole training run.
//
// Reference: Rust Book §9 (Error Handling), §12 (Working with Files)

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::domain::document::Document;
use crate::domain::traits::DocumentSource;

/// Loads all .txt files from a per-author directory tree.
/// Implements the DocumentSource trait from Layer 3.
pub struct TextLoader {
    /// Path to the corpus root directory
    dir: String,
}

impl TextLoader {
    /// Create a new TextLoader pointed at a corpus root
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every .txt file inside one author's subdirectory
    fn load_author_dir(&self, author: &str, dir: &Path) -> Result<Vec<Document>> {
        let mut docs = Vec::new();

        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read author directory '{}'", dir.display()))?
        {
            let path = entry?.path();

            // Only process files with the .txt extension
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }

            match fs::read_to_string(&path) {
                Ok(text) => {
                    let source = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown")
                        .to_string();
                    tracing::debug!("Loaded: {}/{} ({} chars)", author, source, text.len());
                    docs.push(Document::new(author, source, text));
                }
                // Log a warning but continue — don't fail on one bad file
                Err(e) => {
                    tracing::warn!("Skipping '{}': {}", path.display(), e);
                }
            }
        }

        Ok(docs)
    }
}

impl DocumentSource for TextLoader {
    fn load_all(&self) -> Result<Vec<Document>> {
        let dir = Path::new(&self.dir);

        // A missing corpus is a hard error at training time:
        // there is nothing meaningful to train on.
        anyhow::ensure!(
            dir.exists(),
            "Corpus directory '{}' does not exist",
            self.dir
        );

        let mut docs = Vec::new();

        // Each subdirectory is one author
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read corpus directory '{}'", self.dir))?
        {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }

            let author = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            let author_docs = self.load_author_dir(&author, &path)?;
            if author_docs.is_empty() {
                tracing::warn!("Author '{}' has no .txt files — skipping", author);
            }
            docs.extend(author_docs);
        }

        tracing::info!("Successfully loaded {} documents", docs.len());
        Ok(docs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_corpus_is_an_error() {
        let loader = TextLoader::new("definitely/not/a/real/path");
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_loads_author_labelled_files() {
        let tmp = std::env::temp_dir().join("stylo_attrib_loader_test");
        let austen = tmp.join("austen");
        fs::create_dir_all(&austen).unwrap();
        fs::write(austen.join("emma.txt"), "It is a truth universally...").unwrap();
        fs::write(austen.join("notes.md"), "not part of the corpus").unwrap();

        let docs = TextLoader::new(tmp.to_str().unwrap()).load_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].author, "austen");
        assert_eq!(docs[0].source, "emma.txt");

        fs::remove_dir_all(&tmp).ok();
    }
}
