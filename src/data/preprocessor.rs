// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises raw corpus text before tokenisation.
//
// Project Gutenberg dumps and OCR'd editions carry a lot of
// noise that would otherwise waste vocabulary slots: non-breaking
// spaces, zero-width characters, Windows line endings, stray
// control characters, and runs of spaces from hard-wrapped lines.
//
// Cleaning steps (applied in order):
//   1. Map Unicode whitespace variants to plain space, \r to \n,
//      and drop other control characters
//   2. Collapse runs of spaces and trim each line
//   3. Collapse more than one consecutive blank line
//
// Authorship attribution is sensitive to function-word and
// punctuation habits, so cleaning stops at whitespace: casing
// and punctuation are left exactly as the author wrote them.

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw text string for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        // Step 1: character-level normalisation
        let normalised: String = text
            .chars()
            .map(|c| match c {
                '\t' | '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                '\r' => '\n',
                c if c.is_control() && c != '\n' => ' ',
                c => c,
            })
            .collect();

        // Step 2: collapse spaces within each line, trim the edges
        let lines: String = normalised
            .lines()
            .map(|line| {
                let mut out = String::with_capacity(line.len());
                let mut last_space = false;
                for c in line.chars() {
                    if c == ' ' {
                        if !last_space {
                            out.push(' ');
                        }
                        last_space = true;
                    } else {
                        out.push(c);
                        last_space = false;
                    }
                }
                out.trim().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");

        // Step 3: allow at most one blank line in a row
        let mut result = String::with_capacity(lines.len());
        let mut newlines = 0usize;
        for c in lines.chars() {
            if c == '\n' {
                newlines += 1;
                if newlines <= 2 {
                    result.push(c);
                }
            } else {
                newlines = 0;
                result.push(c);
            }
        }

        result.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello   world"), "hello world");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  hello world  "), "hello world");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("hello\x01world"), "hello world");
    }

    #[test]
    fn test_punctuation_and_case_survive() {
        // Stylometric signal — must pass through untouched
        let p = Preprocessor::new();
        assert_eq!(p.clean("Reader, I married him;"), "Reader, I married him;");
    }

    #[test]
    fn test_collapses_blank_lines() {
        let p = Preprocessor::new();
        let output = p.clean("line1\n\n\n\n\nline2");
        assert!(!output.contains("\n\n\n"));
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
