// ============================================================
// Layer 4 — Text Chunker
// ============================================================
// Splits long documents into overlapping windows of words.
//
// A novel is far longer than one model input, and a single
// (document, author) pair would give the model one training
// example per book. Sliding windows turn each document into
// many fixed-size segments that all inherit the author label,
// and the overlap keeps phrase-level style patterns intact at
// window boundaries.
//
// Example with chunk_size=5, overlap=2:
//   Document: "A B C D E F G H I J"
//   Chunk 1:  "A B C D E"          (positions 0-4)
//   Chunk 2:  "C D E F G"          (positions 2-6)
//   Chunk 3:  "E F G H I"          (positions 4-8)
//   Chunk 4:  "G H I J"            (last chunk, shorter)
//
// The stride (step between chunks) = chunk_size - overlap

pub struct Chunker {
    /// Target number of words per chunk
    chunk_size: usize,
    /// Number of words shared between adjacent chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new Chunker.
    ///
    /// # Panics
    /// Panics if overlap >= chunk_size, because the stride
    /// would be 0 and chunking would never advance.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(
            overlap < chunk_size,
            "overlap ({}) must be less than chunk_size ({})",
            overlap,
            chunk_size
        );
        Self { chunk_size, overlap }
    }

    /// Split text into overlapping word-level chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += stride;
        }

        chunks
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_chunking() {
        let c = Chunker::new(5, 2);
        let chunks = c.chunk("a b c d e f g h i j");
        assert_eq!(chunks[0], "a b c d e");
        assert!(chunks.len() > 1);
    }

    #[test]
    fn test_overlap_is_correct() {
        let c = Chunker::new(4, 2);
        let chunks = c.chunk("a b c d e f");
        // stride = 2: second chunk starts two words in
        assert_eq!(chunks[0], "a b c d");
        assert!(chunks[1].starts_with("c d"));
    }

    #[test]
    fn test_short_text_gives_one_chunk() {
        let c = Chunker::new(100, 10);
        let chunks = c.chunk("just a few words");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "just a few words");
    }

    #[test]
    fn test_empty_text_gives_no_chunks() {
        let c = Chunker::new(5, 2);
        assert!(c.chunk("").is_empty());
    }

    #[test]
    #[should_panic]
    fn test_overlap_must_be_less_than_chunk_size() {
        let _ = Chunker::new(5, 5);
    }
}
