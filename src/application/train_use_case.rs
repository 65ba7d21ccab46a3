// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the corpus            (Layer 4 - data)
//   Step 2: Build the author registry  (Layer 3 - domain)
//   Step 3: Clean the text             (Layer 4 - data)
//   Step 4: Chunk into segments        (Layer 4 - data)
//   Step 5: Build tokenizer            (Layer 6 - infra)
//   Step 6: Tokenise training samples  (Layer 4 - data)
//   Step 7: Split train/validation     (Layer 4 - data)
//   Step 8: Save config + registry     (Layer 6 - infra)
//   Step 9: Run training loop          (Layer 5 - ml)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;

use crate::data::{
    loader::TextLoader,
    preprocessor::Preprocessor,
    chunker::Chunker,
    dataset::AttributionSample,
    dataset::AttributionDataset,
    splitter::split_train_val,
};
use crate::domain::author::AuthorRegistry;
use crate::domain::traits::DocumentSource;
use crate::ml::trainer::run_training;
use crate::infra::{
    tokenizer_store::TokenizerStore,
    checkpoint::CheckpointManager,
};

/// Id of the [PAD] token that fills short segments
const PAD_ID: u32 = 0;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved to disk and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_dir:     String,
    pub checkpoint_dir: String,
    pub max_seq_len:    usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub emb_dim:        usize,
    pub hid_dim:        usize,
    pub n_layers:       usize,
    pub kernel_size:    usize,
    pub dropout:        f64,
    pub vocab_size:     usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_dir:     "data/corpus".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            max_seq_len:    128,
            batch_size:     16,
            epochs:         10,
            lr:             1e-4,
            emb_dim:        128,
            hid_dim:        128,
            n_layers:       6,
            kernel_size:    3,
            dropout:        0.5,
            vocab_size:     15000,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the author-labelled corpus ──────────────────────────
        tracing::info!("Loading corpus from '{}'", cfg.corpus_dir);
        let loader   = TextLoader::new(&cfg.corpus_dir);
        let raw_docs = loader.load_all()?;
        ensure!(!raw_docs.is_empty(), "Corpus '{}' contains no documents", cfg.corpus_dir);
        tracing::info!("Loaded {} documents", raw_docs.len());

        // ── Step 2: Build the author registry ─────────────────────────────────
        // Class ids come from the sorted set of author directory names
        let authors: Vec<&str> = raw_docs.iter().map(|d| d.author.as_str()).collect();
        let registry = AuthorRegistry::from_names(&authors);
        ensure!(
            registry.len() >= 2,
            "Attribution needs at least 2 authors, found {}",
            registry.len()
        );
        tracing::info!("Registry holds {} authors", registry.len());

        // ── Step 3: Clean / normalise text ────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let clean_docs: Vec<(String, String)> = raw_docs
            .iter()
            .map(|d| (d.author.clone(), preprocessor.clean(&d.text)))
            .collect();

        // ── Step 4: Chunk documents into training segments ────────────────────
        // Each window inherits its document's author label.
        // chunk_size = max_seq_len words, overlap = a quarter of it,
        // so boundary phrases appear whole in at least one segment.
        let chunker = Chunker::new(cfg.max_seq_len, cfg.max_seq_len / 4);
        let labelled_chunks: Vec<(String, String)> = clean_docs
            .iter()
            .flat_map(|(author, text)| {
                chunker
                    .chunk(text)
                    .into_iter()
                    .map(move |chunk| (author.clone(), chunk))
            })
            .collect();
        tracing::info!("Created {} segments", labelled_chunks.len());

        // ── Step 5: Build / load tokenizer ────────────────────────────────────
        let texts: Vec<String> = labelled_chunks.iter().map(|(_, c)| c.clone()).collect();
        let tok_store = TokenizerStore::new(&cfg.checkpoint_dir);
        let tokenizer = tok_store.load_or_build(&texts, cfg.vocab_size)?;

        // ── Step 6: Tokenise into fixed-length samples ────────────────────────
        let samples = build_samples(&labelled_chunks, &tokenizer, &registry, cfg)?;
        tracing::info!("Built {} training samples", samples.len());

        // ── Step 7: Train / validation split (80/20) ──────────────────────────
        let (train_samples, val_samples) = split_train_val(samples, 0.8);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );

        let train_dataset = AttributionDataset::new(train_samples);
        let val_dataset   = AttributionDataset::new(val_samples);

        // ── Step 8: Save config and registry for inference ────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        registry.save(ckpt_manager.registry_path())?;

        // ── Step 9: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, registry.len(), train_dataset, val_dataset, ckpt_manager)?;

        Ok(())
    }
}

// ─── Sample Construction ─────────────────────────────────────────────────────
// Tokenise each labelled segment and pad it to max_seq_len.
// Segments that tokenise to fewer than 10 ids carry too little
// style signal and are dropped.
fn build_samples(
    chunks:    &[(String, String)],
    tokenizer: &Tokenizer,
    registry:  &AuthorRegistry,
    cfg:       &TrainConfig,
) -> Result<Vec<AttributionSample>> {
    let mut samples = Vec::new();

    for (author, chunk) in chunks {
        let author_id = registry
            .id_of(author)
            .ok_or_else(|| anyhow::anyhow!("Author '{}' missing from registry", author))?;

        let enc = tokenizer
            .encode(chunk.as_str(), false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();

        if input_ids.len() < 10 {
            continue;
        }

        // Fixed-length windows: truncate long, pad short
        input_ids.truncate(cfg.max_seq_len);
        while input_ids.len() < cfg.max_seq_len {
            input_ids.push(PAD_ID);
        }

        samples.push(AttributionSample { input_ids, author_id });
    }

    Ok(samples)
}
