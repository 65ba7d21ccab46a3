// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Loads a trained checkpoint and attributes a text: the model
// produces one author label per token position, and the
// document-level attribution is the majority vote over all
// positions, with the vote fraction as a confidence figure.

use anyhow::{ensure, Result};
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::domain::author::AuthorRegistry;
use crate::domain::device::ComputeDevice;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::decoder::LinearDecoderConfig;
use crate::ml::encoder::ConvEmbeddingConfig;
use crate::ml::model::GoodWillHunting;

type InferBackend = burn::backend::Wgpu;

pub struct Inferencer {
    model:       GoodWillHunting<InferBackend>,
    registry:    AuthorRegistry,
    max_seq_len: usize,
    device:      burn::backend::wgpu::WgpuDevice,
}

impl Inferencer {
    /// Rebuild the trained architecture from the saved config and
    /// registry, then load the recorded weights into it.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        registry:     AuthorRegistry,
    ) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        let cfg    = ckpt_manager.load_config()?;

        let encoder = ConvEmbeddingConfig::new()
            .with_vocab_size(cfg.vocab_size)
            .with_device(ComputeDevice::Gpu)
            .with_emb_dim(cfg.emb_dim)
            .with_hid_dim(cfg.hid_dim)
            .with_n_layers(cfg.n_layers)
            .with_kernel_size(cfg.kernel_size)
            .with_dropout(0.0)
            .init::<InferBackend>(&device)?;
        let decoder = LinearDecoderConfig::new(cfg.emb_dim, registry.len())
            .with_device(ComputeDevice::Gpu)
            .init::<InferBackend>(&device);

        let model = GoodWillHunting::new(encoder, decoder, ComputeDevice::Gpu, &device)?;
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self { model, registry, max_seq_len: cfg.max_seq_len, device })
    }

    /// Attribute a cleaned text. Returns the winning author and
    /// the fraction of token positions that voted for them.
    pub fn attribute(&self, text: &str, tokenizer: &Tokenizer) -> Result<(String, f64)> {
        let enc = tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
        let mut input_ids: Vec<u32> = enc.get_ids().to_vec();
        ensure!(!input_ids.is_empty(), "Text produced no tokens");

        // One window of at most max_seq_len tokens per forward pass
        input_ids.truncate(self.max_seq_len);

        let input_flat: Vec<i32> = input_ids.iter().map(|&x| x as i32).collect();
        let tokens = Tensor::<InferBackend, 1, Int>::from_ints(
            input_flat.as_slice(),
            &self.device,
        )
        .unsqueeze::<2>();

        // One label per position for the single batch element
        let labels = self.model.predict(tokens, &self.registry)?;
        let votes = &labels[0];

        // Majority vote across positions
        let mut counts: std::collections::HashMap<&str, usize> = Default::default();
        for label in votes {
            *counts.entry(label.as_str()).or_insert(0) += 1;
        }
        let (winner, count) = counts
            .into_iter()
            .max_by_key(|&(_, count)| count)
            .ok_or_else(|| anyhow::anyhow!("No positions to vote on"))?;

        let confidence = count as f64 / votes.len() as f64;
        tracing::debug!(
            "Attribution: '{}' with {}/{} positions ({:.1}%)",
            winner, count, votes.len(), confidence * 100.0
        );

        Ok((winner.to_string(), confidence))
    }
}
