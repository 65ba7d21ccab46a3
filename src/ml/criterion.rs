// ============================================================
// Layer 5 — Criterion (Loss Collaborator)
// ============================================================
// The model never owns its loss. train_epoch flattens the
// batch and position dimensions and hands (predictions,
// targets) to whatever Criterion the caller supplies; the
// trainer builds a class-weighted cross entropy from the
// model's per-class weight buffer.
//
// Reference: Burn Book §5 (Training)

use burn::{
    nn::loss::{CrossEntropyLoss, CrossEntropyLossConfig},
    prelude::*,
};

/// Loss collaborator: converts flattened predictions and targets
/// into a scalar training signal.
pub trait Criterion<B: Backend> {
    /// predictions: [n, classes] raw logits, targets: [n] class ids
    /// → scalar loss tensor
    fn compute(&self, predictions: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> Tensor<B, 1>;
}

/// Cross entropy with per-class weights, so rare authors are not
/// drowned out by prolific ones.
pub struct WeightedCrossEntropy<B: Backend> {
    loss: CrossEntropyLoss<B>,
}

impl<B: Backend> WeightedCrossEntropy<B> {
    /// `weights` has one entry per class — the model's nll_weight
    /// buffer in the default setup.
    pub fn new(weights: Vec<f32>, device: &B::Device) -> Self {
        let loss = CrossEntropyLossConfig::new()
            .with_weights(Some(weights))
            .init(device);
        Self { loss }
    }
}

impl<B: Backend> Criterion<B> for WeightedCrossEntropy<B> {
    fn compute(&self, predictions: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> Tensor<B, 1> {
        self.loss.forward(predictions, targets)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_uniform_weights_give_finite_loss() {
        let device = Default::default();
        let criterion = WeightedCrossEntropy::<TestBackend>::new(vec![1.0; 3], &device);

        let logits = Tensor::<TestBackend, 2>::from_floats(
            [[2.0, 0.1, 0.1], [0.1, 2.0, 0.1]],
            &device,
        );
        let targets = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);

        let loss: f64 = criterion.compute(logits, targets).into_scalar().elem();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }
}
