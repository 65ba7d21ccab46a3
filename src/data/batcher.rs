// ============================================================
// Layer 4 — Attribution Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec of
// AttributionSamples into tensors for the model.
//
// The model is trained per token position, so the author id is
// broadcast across every position of its segment: a sample with
// seq_len S contributes S target values, all the same class.
// This matches how train_epoch flattens [batch, seq] before
// handing predictions and targets to the criterion.
//
// All sequences are already padded to the same length upstream,
// so batching is a flatten-and-reshape with no dynamic padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::AttributionSample;

// ─── AttributionBatch ─────────────────────────────────────────────────────────
/// A batch of segments ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct AttributionBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub tokens: Tensor<B, 2, Int>,

    /// Author class ids, one per position — shape: [batch_size, seq_len]
    pub targets: Tensor<B, 2, Int>,
}

// ─── AttributionBatcher ───────────────────────────────────────────────────────
/// Holds the target device so tensors are created where the
/// model expects them.
#[derive(Clone, Debug)]
pub struct AttributionBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> AttributionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<AttributionSample, AttributionBatch<B>> for AttributionBatcher<B> {
    fn batch(&self, items: Vec<AttributionSample>) -> AttributionBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len = items[0].input_ids.len();

        // Vec<Vec<u32>> → flat Vec<i32> (Burn uses i32 for Int tensors)
        let token_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        // The author id fills every position of its segment
        let target_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| std::iter::repeat(s.author_id as i32).take(seq_len))
            .collect();

        let tokens = Tensor::<B, 1, Int>::from_ints(token_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let targets = Tensor::<B, 1, Int>::from_ints(target_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        AttributionBatch { tokens, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_broadcast_targets() {
        let batcher = AttributionBatcher::<TestBackend>::new(Default::default());
        let items = vec![
            AttributionSample { input_ids: vec![1, 2, 3], author_id: 0 },
            AttributionSample { input_ids: vec![4, 5, 6], author_id: 2 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.tokens.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 3]);

        let targets: Vec<i64> = batch
            .targets
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap();
        assert_eq!(targets, vec![0, 0, 0, 2, 2, 2]);
    }
}
