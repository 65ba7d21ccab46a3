// ============================================================
// Layer 5 — Linear Decoder
// ============================================================
// The classification head: one linear map from encoder output
// width to class-score width, optionally preceded by a highway
// projection. Output is raw logits — no softmax here, the
// criterion owns normalisation.
//
// The highway branch is OFF by default and modelled as an
// Option, so its absence is visible in the type rather than
// hidden behind an inert always-present field.
//
// Reference: Srivastava et al. (2015) Highway Networks

use burn::{
    module::{Ignored, Module},
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::{relu, sigmoid, tanh},
};
use serde::{Deserialize, Serialize};

use crate::domain::device::ComputeDevice;

/// Activation applied to the highway transform branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighwayActivation {
    Relu,
    Tanh,
}

#[derive(Config, Debug)]
pub struct LinearDecoderConfig {
    /// Width of the encoder output this decoder consumes
    pub enc_dim: usize,

    /// Number of output classes (known authors)
    pub out_dim: usize,

    /// Device tag recorded on the decoder and checked by the composite
    #[config(default = "ComputeDevice::Cpu")]
    pub device: ComputeDevice,

    /// Number of highway layers — 0 means no highway branch at all
    #[config(default = 0)]
    pub highway_layers: usize,

    /// Activation for the highway transform branch
    #[config(default = "HighwayActivation::Relu")]
    pub highway_act: HighwayActivation,
}

impl LinearDecoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LinearDecoder<B> {
        // highway_layers == 0 → the branch does not exist
        let highway = (self.highway_layers > 0).then(|| {
            HighwayConfig::new(self.enc_dim, self.highway_layers, self.highway_act)
                .init(device)
        });

        LinearDecoder {
            highway,
            output: LinearConfig::new(self.enc_dim, self.out_dim).init(device),
            out_dim: self.out_dim,
            device: Ignored(self.device),
        }
    }
}

/// Projects encoder vectors to per-class scores at every position.
#[derive(Module, Debug)]
pub struct LinearDecoder<B: Backend> {
    pub highway: Option<Highway<B>>,
    pub output:  Linear<B>,
    pub out_dim: usize,
    pub device:  Ignored<ComputeDevice>,
}

impl<B: Backend> LinearDecoder<B> {
    /// enc_outs: [batch, seq_len, enc_dim] → [batch, seq_len, out_dim]
    pub fn forward(&self, enc_outs: Tensor<B, 3>) -> Tensor<B, 3> {
        let enc_outs = match &self.highway {
            Some(highway) => highway.forward(enc_outs),
            None => enc_outs,
        };
        self.output.forward(enc_outs)
    }

    pub fn device_tag(&self) -> ComputeDevice {
        self.device.0
    }
}

// ─── Highway ──────────────────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct HighwayConfig {
    pub dim: usize,
    pub n_layers: usize,
    pub activation: HighwayActivation,
}

impl HighwayConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> Highway<B> {
        let transforms = (0..self.n_layers)
            .map(|_| LinearConfig::new(self.dim, self.dim).init(device))
            .collect();
        let gates = (0..self.n_layers)
            .map(|_| LinearConfig::new(self.dim, self.dim).init(device))
            .collect();
        Highway {
            transforms,
            gates,
            activation: Ignored(self.activation),
        }
    }
}

/// Learned gate blending a transformed and an untransformed signal:
/// y = g ⊙ act(T(x)) + (1 − g) ⊙ x, with g = σ(G(x)).
#[derive(Module, Debug)]
pub struct Highway<B: Backend> {
    transforms: Vec<Linear<B>>,
    gates:      Vec<Linear<B>>,
    activation: Ignored<HighwayActivation>,
}

impl<B: Backend> Highway<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let mut x = x;
        for (transform, gate) in self.transforms.iter().zip(self.gates.iter()) {
            let transformed = match self.activation.0 {
                HighwayActivation::Relu => relu(transform.forward(x.clone())),
                HighwayActivation::Tanh => tanh(transform.forward(x.clone())),
            };
            let g = sigmoid(gate.forward(x.clone()));
            x = g.clone() * transformed + g.neg().add_scalar(1.0) * x;
        }
        x
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn device() -> <TestBackend as Backend>::Device {
        Default::default()
    }

    #[test]
    fn test_output_width_is_class_count() {
        let decoder = LinearDecoderConfig::new(32, 5).init::<TestBackend>(&device());

        for (batch, seq_len) in [(1, 1), (2, 9), (4, 33)] {
            let input = Tensor::<TestBackend, 3>::zeros([batch, seq_len, 32], &device());
            let out = decoder.forward(input);
            assert_eq!(out.dims(), [batch, seq_len, 5]);
        }
    }

    #[test]
    fn test_highway_absent_by_default() {
        let decoder = LinearDecoderConfig::new(16, 3).init::<TestBackend>(&device());
        assert!(decoder.highway.is_none());
    }

    #[test]
    fn test_highway_preserves_shape() {
        let decoder = LinearDecoderConfig::new(16, 3)
            .with_highway_layers(2)
            .with_highway_act(HighwayActivation::Tanh)
            .init::<TestBackend>(&device());
        assert!(decoder.highway.is_some());

        let input = Tensor::<TestBackend, 3>::zeros([2, 7, 16], &device());
        assert_eq!(decoder.forward(input).dims(), [2, 7, 3]);
    }
}
