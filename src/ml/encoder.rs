// ============================================================
// Layer 5 — Sequence Encoder
// ============================================================
// The SequenceEncoder trait is the capability contract for
// "maps token-id sequences to dense vector sequences": an
// input cardinality, a device tag, and an encode operation.
// ConvEmbedding is the one concrete encoder: a token embedding
// refined by a stack of gated convolutional blocks.
//
// Each block doubles the channel count with a 1-D convolution,
// halves it back with a GLU (one half sigmoid-gates the other),
// adds the block input as a residual, and scales the sum by
// √0.5 to keep activation variance stable as depth grows.
// Symmetric padding of (kernel−1)/2 preserves sequence length,
// which is why the kernel size must be odd.
//
// Reference: Burn Book §3 (Building Blocks)
//            Dauphin et al. (2017) — GLU
//            Gehring et al. (2017) — residual scaling

use anyhow::{ensure, Result};
use burn::{
    module::{Ignored, Module},
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
};

use crate::domain::device::ComputeDevice;

/// Variance-preserving residual scale: √0.5 = 1/√2.
const RESIDUAL_SCALE: f64 = std::f64::consts::FRAC_1_SQRT_2;

// ─── SequenceEncoder ──────────────────────────────────────────────────────────
/// Capability contract for sequence encoders. No computation is
/// defined at this level — conforming variants declare their input
/// cardinality and device tag and supply the encode operation.
pub trait SequenceEncoder<B: Backend> {
    /// Vocabulary size — valid token ids are [0, vocab_size)
    fn vocab_size(&self) -> usize;

    /// The device tag this encoder was constructed for
    fn device_tag(&self) -> ComputeDevice;

    /// tokens: [batch, seq_len] → vectors: [batch, seq_len, emb_dim]
    fn encode(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3>;
}

// ─── ConvEmbedding ────────────────────────────────────────────────────────────
// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ConvEmbeddingConfig {
    /// Total number of token ids the embedding table covers
    #[config(default = 15000)]
    pub vocab_size: usize,

    /// Device tag recorded on the encoder and checked by the composite
    #[config(default = "ComputeDevice::Cpu")]
    pub device: ComputeDevice,

    /// Width of the embedding vectors (encoder output width)
    #[config(default = 128)]
    pub emb_dim: usize,

    /// Channel width inside the convolutional stack
    #[config(default = 128)]
    pub hid_dim: usize,

    /// Number of stacked gated convolutional layers
    #[config(default = 6)]
    pub n_layers: usize,

    /// Convolution kernel size — must be odd
    #[config(default = 3)]
    pub kernel_size: usize,

    /// Dropout probability applied before the embedding projection
    /// and before every convolution
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl ConvEmbeddingConfig {
    /// Build the encoder. Fails fast on an even kernel size:
    /// symmetric padding of (k−1)/2 only preserves sequence
    /// length when k is odd, and a silently shifted sequence
    /// would corrupt every downstream position.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<ConvEmbedding<B>> {
        ensure!(
            self.kernel_size % 2 == 1,
            "Kernel size must be odd, got {}",
            self.kernel_size
        );

        let tok_embedding = EmbeddingConfig::new(self.vocab_size, self.emb_dim).init(device);
        let emb2hid = LinearConfig::new(self.emb_dim, self.hid_dim).init(device);
        let hid2emb = LinearConfig::new(self.hid_dim, self.emb_dim).init(device);

        // One independently parameterised convolution per layer,
        // each widening hid_dim channels to 2 × hid_dim for the GLU
        let padding = (self.kernel_size - 1) / 2;
        let convs: Vec<Conv1d<B>> = (0..self.n_layers)
            .map(|_| {
                Conv1dConfig::new(self.hid_dim, 2 * self.hid_dim, self.kernel_size)
                    .with_padding(PaddingConfig1d::Explicit(padding))
                    .init(device)
            })
            .collect();

        let dropout = DropoutConfig::new(self.dropout).init();

        Ok(ConvEmbedding {
            tok_embedding,
            emb2hid,
            hid2emb,
            convs,
            dropout,
            hid_dim: self.hid_dim,
            vocab_size: self.vocab_size,
            device: Ignored(self.device),
        })
    }
}

/// Token embedding + gated convolutional refinement.
/// Stateless between calls: nothing is retained beyond the
/// convolution's local receptive field.
#[derive(Module, Debug)]
pub struct ConvEmbedding<B: Backend> {
    pub tok_embedding: Embedding<B>,
    pub emb2hid:       Linear<B>,
    pub hid2emb:       Linear<B>,
    pub convs:         Vec<Conv1d<B>>,
    pub dropout:       Dropout,
    pub hid_dim:       usize,
    pub vocab_size:    usize,
    pub device:        Ignored<ComputeDevice>,
}

impl<B: Backend> ConvEmbedding<B> {
    /// tokens: [batch, seq_len] → [batch, seq_len, emb_dim]
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        // Embed tokens, then dropout
        let embedded = self.dropout.forward(self.tok_embedding.forward(tokens));

        // emb_dim → hid_dim, then channel-first for the convolutions:
        // [batch, seq_len, hid] → [batch, hid, seq_len]
        let mut conv_input = self.emb2hid.forward(embedded).swap_dims(1, 2);

        for conv in &self.convs {
            // [batch, hid, seq_len] → [batch, 2*hid, seq_len]
            let conved = conv.forward(self.dropout.forward(conv_input.clone()));

            // GLU halves the channels back to hid_dim
            let gated = glu(conved, self.hid_dim);

            // Residual connection, scaled to preserve variance
            conv_input = (gated + conv_input).mul_scalar(RESIDUAL_SCALE);
        }

        // Back to sequence-first layout, then hid_dim → emb_dim
        self.hid2emb.forward(conv_input.swap_dims(1, 2))
    }
}

impl<B: Backend> SequenceEncoder<B> for ConvEmbedding<B> {
    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn device_tag(&self) -> ComputeDevice {
        self.device.0
    }

    fn encode(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        self.forward(tokens)
    }
}

/// Gated linear unit over the channel dimension: the first
/// `channels` channels are gated by a sigmoid over the rest.
/// x: [batch, 2*channels, seq_len] → [batch, channels, seq_len]
fn glu<B: Backend>(x: Tensor<B, 3>, channels: usize) -> Tensor<B, 3> {
    let [batch, _, seq_len] = x.dims();
    let value = x.clone().slice([0..batch, 0..channels, 0..seq_len]);
    let gate  = x.slice([0..batch, channels..2 * channels, 0..seq_len]);
    value * burn::tensor::activation::sigmoid(gate)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn device() -> <TestBackend as Backend>::Device {
        Default::default()
    }

    fn token_batch(batch: usize, seq_len: usize) -> Tensor<TestBackend, 2, Int> {
        // Deterministic ids well inside a small vocabulary
        let ids: Vec<i32> = (0..batch * seq_len).map(|i| (i % 50) as i32).collect();
        Tensor::<TestBackend, 1, Int>::from_ints(ids.as_slice(), &device())
            .reshape([batch, seq_len])
    }

    #[test]
    fn test_even_kernel_sizes_are_rejected() {
        for k in [2, 4, 6] {
            let result = ConvEmbeddingConfig::new()
                .with_vocab_size(100)
                .with_kernel_size(k)
                .init::<TestBackend>(&device());
            assert!(result.is_err(), "kernel size {k} should be rejected");
        }
    }

    #[test]
    fn test_odd_kernel_sizes_construct() {
        for k in [1, 3, 5] {
            let result = ConvEmbeddingConfig::new()
                .with_vocab_size(100)
                .with_kernel_size(k)
                .init::<TestBackend>(&device());
            assert!(result.is_ok(), "kernel size {k} should construct");
        }
    }

    #[test]
    fn test_forward_preserves_sequence_length() {
        let encoder = ConvEmbeddingConfig::new()
            .with_vocab_size(100)
            .with_emb_dim(32)
            .with_hid_dim(16)
            .with_n_layers(2)
            .init::<TestBackend>(&device())
            .unwrap();

        for seq_len in [1, 5, 50] {
            let out = encoder.forward(token_batch(2, seq_len));
            assert_eq!(out.dims(), [2, seq_len, 32]);
        }
    }

    #[test]
    fn test_encoder_trait_surface() {
        let encoder = ConvEmbeddingConfig::new()
            .with_vocab_size(250)
            .with_device(ComputeDevice::Cpu)
            .init::<TestBackend>(&device())
            .unwrap();

        assert_eq!(SequenceEncoder::vocab_size(&encoder), 250);
        assert_eq!(encoder.device_tag(), ComputeDevice::Cpu);

        let out = encoder.encode(token_batch(3, 7));
        assert_eq!(out.dims()[0..2], [3, 7]);
    }
}
