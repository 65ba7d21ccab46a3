// ============================================================
// Layer 5 — GoodWillHunting (Composite Model)
// ============================================================
// Owns exactly one encoder and one decoder and exposes the
// three entry points of the system:
//
//   forward(src)                          → raw class scores
//   predict(src, registry)                → author labels per position
//   train_epoch(src, trg, scorer, crit)   → scalar loss for one batch
//
// Construction refuses mismatched device tags: encoder, decoder
// and the declared tag must agree exactly, so tensors never
// migrate between devices in the middle of a pass.
//
// The model also carries a per-class weight buffer (nll_weight,
// all ones by default). It is persisted with the parameters and
// read by the trainer to build the loss criterion; the model
// itself never computes a loss and never steps an optimiser —
// both belong to external collaborators.

use anyhow::{ensure, Result};
use burn::{
    module::{Ignored, Module, Param},
    prelude::*,
};

use crate::domain::author::AuthorRegistry;
use crate::domain::device::ComputeDevice;
use crate::ml::criterion::Criterion;
use crate::ml::decoder::LinearDecoder;
use crate::ml::encoder::{ConvEmbedding, SequenceEncoder};
use crate::ml::scorer::Scorer;

#[derive(Module, Debug)]
pub struct GoodWillHunting<B: Backend> {
    pub encoder: ConvEmbedding<B>,
    pub decoder: LinearDecoder<B>,

    /// Per-class loss weights, ones by default. A buffer, not a
    /// trainable parameter: persisted with the checkpoint so a
    /// reloaded model trains with the same weighting.
    pub nll_weight: Param<Tensor<B, 1>>,

    pub device: Ignored<ComputeDevice>,
}

impl<B: Backend> GoodWillHunting<B> {
    /// Compose a model from independently constructed parts.
    /// Fails fast when any device tag disagrees — a model whose
    /// halves live on different devices cannot run a single pass.
    pub fn new(
        encoder: ConvEmbedding<B>,
        decoder: LinearDecoder<B>,
        device: ComputeDevice,
        tensor_device: &B::Device,
    ) -> Result<Self> {
        ensure!(
            encoder.device_tag() == device && decoder.device_tag() == device,
            "All devices should be the same: encoder={}, decoder={}, model={}",
            encoder.device_tag(),
            decoder.device_tag(),
            device,
        );

        let nll_weight = Tensor::ones([decoder.out_dim], tensor_device)
            .set_require_grad(false);

        Ok(Self {
            encoder,
            decoder,
            nll_weight: Param::from_tensor(nll_weight),
            device: Ignored(device),
        })
    }

    /// src: [batch, seq_len] token ids
    /// → [batch, seq_len, n_classes] raw scores
    pub fn forward(&self, src: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let encoded = self.encoder.encode(src);
        self.decoder.forward(encoded)
    }

    /// Arg-max class per position, mapped through the author
    /// registry. One label vector per batch element; an id the
    /// registry does not know is an error, never a placeholder.
    pub fn predict(
        &self,
        src: Tensor<B, 2, Int>,
        classnames: &AuthorRegistry,
    ) -> Result<Vec<Vec<String>>> {
        let scores = self.forward(src);
        let [batch, seq_len, _] = scores.dims();

        // argmax keeps the class dim as size 1 — squeeze it away
        let ids: Vec<i64> = scores
            .argmax(2)
            .squeeze::<2>(2)
            .into_data()
            .convert::<i64>()
            .to_vec()
            .map_err(|e| anyhow::anyhow!("Cannot read prediction tensor: {e:?}"))?;

        let mut labels = Vec::with_capacity(batch);
        for row in ids.chunks(seq_len) {
            let row_labels = row
                .iter()
                .map(|&id| Ok(classnames.label_of(id as usize)?.to_string()))
                .collect::<Result<Vec<String>>>()?;
            labels.push(row_labels);
        }
        Ok(labels)
    }

    /// Process one training batch: forward, register the batch
    /// with the scorer, and delegate the loss to the criterion
    /// over flattened positions. The optimiser step is the
    /// caller's job.
    ///
    /// src: [batch, seq_len] token ids
    /// trg: [batch, seq_len] author class ids
    pub fn train_epoch(
        &self,
        src: Tensor<B, 2, Int>,
        trg: Tensor<B, 2, Int>,
        scorer: &mut dyn Scorer<B>,
        criterion: &dyn Criterion<B>,
    ) -> Result<Tensor<B, 1>> {
        let output = self.forward(src.clone());
        let [batch, seq_len, n_classes] = output.dims();

        ensure!(
            trg.dims() == [batch, seq_len],
            "Target shape {:?} is incompatible with model output [{}, {}, {}]",
            trg.dims(),
            batch,
            seq_len,
            n_classes,
        );

        scorer.register_batch(
            output.clone().argmax(2).squeeze::<2>(2),
            trg.clone(),
            src,
        );

        let loss = criterion.compute(
            output.reshape([batch * seq_len, n_classes]),
            trg.reshape([batch * seq_len]),
        );
        Ok(loss)
    }

    /// The per-class weight buffer as plain floats, for building
    /// the criterion.
    pub fn class_weights(&self) -> Result<Vec<f32>> {
        self.nll_weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read class weight buffer: {e:?}"))
    }

    pub fn n_classes(&self) -> usize {
        self.decoder.out_dim
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::criterion::WeightedCrossEntropy;
    use crate::ml::decoder::LinearDecoderConfig;
    use crate::ml::encoder::ConvEmbeddingConfig;
    use crate::ml::scorer::AttributionScorer;

    type TestBackend = burn::backend::NdArray;

    fn device() -> <TestBackend as Backend>::Device {
        Default::default()
    }

    fn small_model(
        enc_tag: ComputeDevice,
        dec_tag: ComputeDevice,
        model_tag: ComputeDevice,
    ) -> Result<GoodWillHunting<TestBackend>> {
        let encoder = ConvEmbeddingConfig::new()
            .with_vocab_size(60)
            .with_emb_dim(16)
            .with_hid_dim(8)
            .with_n_layers(2)
            .with_device(enc_tag)
            .init(&device())?;
        let decoder = LinearDecoderConfig::new(16, 3)
            .with_device(dec_tag)
            .init(&device());
        GoodWillHunting::new(encoder, decoder, model_tag, &device())
    }

    fn token_batch(batch: usize, seq_len: usize) -> Tensor<TestBackend, 2, Int> {
        let ids: Vec<i32> = (0..batch * seq_len).map(|i| (i % 60) as i32).collect();
        Tensor::<TestBackend, 1, Int>::from_ints(ids.as_slice(), &device())
            .reshape([batch, seq_len])
    }

    #[test]
    fn test_device_tags_must_all_match() {
        use ComputeDevice::{Cpu, Gpu};
        assert!(small_model(Cpu, Cpu, Cpu).is_ok());
        assert!(small_model(Cpu, Cpu, Gpu).is_err());
        assert!(small_model(Gpu, Cpu, Cpu).is_err());
        assert!(small_model(Cpu, Gpu, Cpu).is_err());
    }

    #[test]
    fn test_forward_shape() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        let out = model.forward(token_batch(2, 11));
        assert_eq!(out.dims(), [2, 11, 3]);
    }

    #[test]
    fn test_nll_weight_starts_as_ones() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        assert_eq!(model.class_weights().unwrap(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_predict_one_label_per_position() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        // Registry sized to the model's 3 classes
        let registry = AuthorRegistry::from_names(&["austen", "dickens", "woolf"]);

        let labels = model.predict(token_batch(2, 5), &registry).unwrap();
        assert_eq!(labels.len(), 2);
        for row in &labels {
            assert_eq!(row.len(), 5);
            for label in row {
                assert!(registry.id_of(label).is_some());
            }
        }
    }

    #[test]
    fn test_predict_errors_on_unmapped_class_id() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        // Registry with fewer authors than the model has classes:
        // any argmax id >= 1 must surface as an error. With 200
        // positions and randomly initialised weights, at least one
        // position lands outside class 0.
        let registry = AuthorRegistry::from_names(&["austen"]);

        let result = model.predict(token_batch(4, 50), &registry);
        assert!(result.is_err(), "an unmapped class id should be an error");
    }

    #[test]
    fn test_train_epoch_returns_finite_loss() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        let criterion =
            WeightedCrossEntropy::<TestBackend>::new(model.class_weights().unwrap(), &device());
        let mut scorer = AttributionScorer::new(model.n_classes());

        let src = token_batch(2, 7);
        let trg: Tensor<TestBackend, 2, Int> =
            Tensor::<TestBackend, 1, Int>::from_ints(vec![1i32; 14].as_slice(), &device())
                .reshape([2, 7]);

        let loss = model
            .train_epoch(src, trg, &mut scorer, &criterion)
            .unwrap();
        let loss: f64 = loss.into_scalar().elem();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
        // The scorer saw every position exactly once
        assert_eq!(scorer.total(), 14);
    }

    #[test]
    fn test_train_epoch_rejects_mismatched_targets() {
        let model = small_model(
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
            ComputeDevice::Cpu,
        )
        .unwrap();
        let criterion =
            WeightedCrossEntropy::<TestBackend>::new(model.class_weights().unwrap(), &device());
        let mut scorer = AttributionScorer::new(model.n_classes());

        let src = token_batch(2, 7);
        // Wrong sequence length on the targets
        let trg: Tensor<TestBackend, 2, Int> =
            Tensor::<TestBackend, 1, Int>::from_ints(vec![0i32; 10].as_slice(), &device())
                .reshape([2, 5]);

        let result = model.train_epoch(src, trg, &mut scorer, &criterion);
        assert!(result.is_err());
    }
}
