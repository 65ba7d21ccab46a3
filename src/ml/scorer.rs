// ============================================================
// Layer 5 — Scorer (Metrics Collaborator)
// ============================================================
// train_epoch registers every batch's (argmax predictions,
// targets, raw inputs) with a Scorer before computing the loss.
// The scorer accumulates across batches; the trainer reads the
// aggregates at the end of each epoch and resets it.
//
// AttributionScorer keeps token-level accuracy and a dense
// confusion matrix (rows = true author, columns = predicted).

use burn::prelude::*;

/// Metrics collaborator: accumulates per-batch prediction/target
/// pairs for later aggregate reporting. The raw inputs are part
/// of the contract so richer scorers can report per-segment
/// diagnostics; AttributionScorer does not use them.
pub trait Scorer<B: Backend> {
    /// predictions, targets, inputs: all [batch, seq_len]
    fn register_batch(
        &mut self,
        predictions: Tensor<B, 2, Int>,
        targets:     Tensor<B, 2, Int>,
        inputs:      Tensor<B, 2, Int>,
    );
}

/// Token-level accuracy and confusion counts over all batches
/// registered since the last reset.
#[derive(Debug, Clone)]
pub struct AttributionScorer {
    n_classes: usize,
    correct:   usize,
    total:     usize,
    /// Row-major [n_classes × n_classes]: confusion[true][pred]
    confusion: Vec<usize>,
}

impl AttributionScorer {
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            correct: 0,
            total: 0,
            confusion: vec![0; n_classes * n_classes],
        }
    }

    /// Fraction of positions predicted correctly; 0.0 before any batch
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    /// How often `actual` was predicted as `predicted`
    pub fn confusion(&self, actual: usize, predicted: usize) -> usize {
        self.confusion[actual * self.n_classes + predicted]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Clear all counts — called between epochs
    pub fn reset(&mut self) {
        self.correct = 0;
        self.total = 0;
        self.confusion.fill(0);
    }
}

impl<B: Backend> Scorer<B> for AttributionScorer {
    fn register_batch(
        &mut self,
        predictions: Tensor<B, 2, Int>,
        targets:     Tensor<B, 2, Int>,
        _inputs:     Tensor<B, 2, Int>,
    ) {
        let preds: Vec<i64> = predictions
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap_or_default();
        let trues: Vec<i64> = targets
            .into_data()
            .convert::<i64>()
            .to_vec()
            .unwrap_or_default();

        for (&pred, &actual) in preds.iter().zip(trues.iter()) {
            self.total += 1;
            if pred == actual {
                self.correct += 1;
            }
            let (pred, actual) = (pred as usize, actual as usize);
            if pred < self.n_classes && actual < self.n_classes {
                self.confusion[actual * self.n_classes + pred] += 1;
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn int_tensor(values: &[i32], shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default()).reshape(shape)
    }

    #[test]
    fn test_accuracy_over_batches() {
        let mut scorer = AttributionScorer::new(3);

        // 3 of 4 positions correct
        let preds   = int_tensor(&[0, 1, 2, 2], [2, 2]);
        let targets = int_tensor(&[0, 1, 2, 0], [2, 2]);
        let inputs  = int_tensor(&[5, 6, 7, 8], [2, 2]);
        Scorer::<TestBackend>::register_batch(&mut scorer, preds, targets, inputs);

        assert_eq!(scorer.total(), 4);
        assert!((scorer.accuracy() - 0.75).abs() < 1e-9);

        // The miss was true 0 predicted as 2
        assert_eq!(scorer.confusion(0, 2), 1);
        assert_eq!(scorer.confusion(1, 1), 1);
    }

    #[test]
    fn test_reset_clears_counts() {
        let mut scorer = AttributionScorer::new(2);
        let preds   = int_tensor(&[0, 1], [1, 2]);
        let targets = int_tensor(&[0, 0], [1, 2]);
        let inputs  = int_tensor(&[1, 2], [1, 2]);
        Scorer::<TestBackend>::register_batch(&mut scorer, preds, targets, inputs);

        scorer.reset();
        assert_eq!(scorer.total(), 0);
        assert_eq!(scorer.accuracy(), 0.0);
        assert_eq!(scorer.confusion(0, 1), 0);
    }

    #[test]
    fn test_empty_scorer_accuracy_is_zero() {
        let scorer = AttributionScorer::new(4);
        assert_eq!(scorer.accuracy(), 0.0);
    }
}
