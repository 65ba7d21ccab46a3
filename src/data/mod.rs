// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from raw corpus files
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   corpus dir (one subdir per author)
//       │
//       ▼
//   TextLoader        → reads .txt files, labels them by author
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, encoding)
//       │
//       ▼
//   Chunker           → splits long docs into overlapping windows
//       │
//       ▼
//   Tokenizer         → converts words to token ID numbers
//       │
//       ▼
//   AttributionDataset → implements Burn's Dataset trait
//       │
//       ▼
//   AttributionBatcher → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads per-author .txt files from the corpus directory
pub mod loader;

/// Cleans and normalises raw text
pub mod preprocessor;

/// Splits long documents into overlapping chunks
pub mod chunker;

/// Implements Burn's Dataset trait for attribution samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
