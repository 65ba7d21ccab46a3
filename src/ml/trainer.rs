// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// The model only ever processes a batch and hands back its loss
// (train_epoch); everything around it lives here:
//   - the Adam optimiser and the backward/step cycle
//   - the criterion built from the model's class weight buffer
//   - the scorers accumulating token accuracy per phase
//   - per-epoch metrics CSV and checkpointing
//
// Training runs on Autodiff<Wgpu>; model.valid() strips the
// autodiff wrapper so validation pays no gradient overhead and
// dropout is inactive.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::AttributionBatcher, dataset::AttributionDataset};
use crate::domain::device::ComputeDevice;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::criterion::WeightedCrossEntropy;
use crate::ml::decoder::LinearDecoderConfig;
use crate::ml::encoder::ConvEmbeddingConfig;
use crate::ml::model::GoodWillHunting;
use crate::ml::scorer::AttributionScorer;

type MyBackend      = burn::backend::Autodiff<burn::backend::Wgpu>;
type MyInnerBackend = burn::backend::Wgpu;

pub fn run_training(
    cfg:           &TrainConfig,
    n_classes:     usize,
    train_dataset: AttributionDataset,
    val_dataset:   AttributionDataset,
    ckpt_manager:  CheckpointManager,
) -> Result<()> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop(cfg, n_classes, train_dataset, val_dataset, ckpt_manager, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    n_classes:     usize,
    train_dataset: AttributionDataset,
    val_dataset:   AttributionDataset,
    ckpt_manager:  CheckpointManager,
    device:        burn::backend::wgpu::WgpuDevice,
) -> Result<()> {

    // ── Build model: encoder and decoder composed under one tag ──────────────
    let encoder = ConvEmbeddingConfig::new()
        .with_vocab_size(cfg.vocab_size)
        .with_device(ComputeDevice::Gpu)
        .with_emb_dim(cfg.emb_dim)
        .with_hid_dim(cfg.hid_dim)
        .with_n_layers(cfg.n_layers)
        .with_kernel_size(cfg.kernel_size)
        .with_dropout(cfg.dropout)
        .init::<MyBackend>(&device)?;

    let decoder = LinearDecoderConfig::new(cfg.emb_dim, n_classes)
        .with_device(ComputeDevice::Gpu)
        .init::<MyBackend>(&device);

    let mut model = GoodWillHunting::new(encoder, decoder, ComputeDevice::Gpu, &device)?;
    tracing::info!(
        "Model ready: {} conv layers, emb_dim={}, {} authors",
        cfg.n_layers, cfg.emb_dim, n_classes
    );

    // ── Loss criterion from the model's class weight buffer ──────────────────
    let criterion = WeightedCrossEntropy::<MyBackend>::new(model.class_weights()?, &device);
    let val_criterion = WeightedCrossEntropy::<MyInnerBackend>::new(
        model.class_weights()?,
        &device,
    );

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = AttributionBatcher::<MyBackend>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = AttributionBatcher::<MyInnerBackend>::new(device.clone());
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
    let mut train_scorer = AttributionScorer::new(n_classes);
    let mut val_scorer   = AttributionScorer::new(n_classes);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        train_scorer.reset();
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let loss = model.train_epoch(
                batch.tokens,
                batch.targets,
                &mut train_scorer,
                &criterion,
            )?;

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → GoodWillHunting<MyInnerBackend>
        // dropout disabled for deterministic evaluation
        let model_valid = model.valid();

        val_scorer.reset();
        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let loss = model_valid.train_epoch(
                batch.tokens,
                batch.targets,
                &mut val_scorer,
                &val_criterion,
            )?;
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else { f64::NAN };

        let m = EpochMetrics::new(
            epoch,
            avg_train_loss,
            avg_val_loss,
            train_scorer.accuracy(),
            val_scorer.accuracy(),
        );

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | train_acc={:.1}% | val_acc={:.1}%",
            epoch, cfg.epochs, m.train_loss, m.val_loss,
            m.train_acc * 100.0, m.val_acc * 100.0,
        );

        metrics.log(&m)?;
        ckpt_manager.save_model(&model, epoch)?;
        tracing::info!("Checkpoint saved for epoch {}", epoch);
    }

    tracing::info!("Training complete!");
    Ok(())
}
