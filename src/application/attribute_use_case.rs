// ============================================================
// Layer 2 — Attribute Use Case
// ============================================================
// Answers "who wrote this text?" for a trained checkpoint:
//   1. Load the tokenizer, author registry and model weights
//   2. Clean the disputed text the same way training data was
//   3. Let the model vote per token position
//   4. Report the majority author

use anyhow::Result;
use tokenizers::Tokenizer;

use crate::data::preprocessor::Preprocessor;
use crate::domain::author::AuthorRegistry;
use crate::domain::traits::Attributor;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::inferencer::Inferencer;

pub struct AttributeUseCase {
    tokenizer:  Tokenizer,
    inferencer: Inferencer,
}

impl AttributeUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let tok_store  = TokenizerStore::new(&checkpoint_dir);
        let tokenizer  = tok_store.load()?;
        let ckpt       = CheckpointManager::new(&checkpoint_dir);
        let registry   = AuthorRegistry::load(ckpt.registry_path())?;
        let inferencer = Inferencer::from_checkpoint(&ckpt, registry)?;
        Ok(Self { tokenizer, inferencer })
    }
}

impl Attributor for AttributeUseCase {
    fn attribute(&self, text: &str) -> Result<String> {
        // Same cleaning as the training pipeline, so the token
        // distribution matches what the model saw
        let prep  = Preprocessor::new();
        let clean = prep.clean(text);

        let (author, confidence) = self.inferencer.attribute(&clean, &self.tokenizer)?;
        tracing::info!(
            "Attributed to '{}' ({:.1}% of positions agree)",
            author,
            confidence * 100.0
        );

        Ok(author)
    }
}
