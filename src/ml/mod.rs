// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// (and the data batcher, which builds the tensors it feeds us).
//
// What's in this layer:
//
//   encoder.rs   — The SequenceEncoder contract and the
//                  ConvEmbedding encoder:
//                  • Token embeddings
//                  • emb→hid / hid→emb projections
//                  • Stacked 1-D convolutions with GLU gating
//                  • Residual connections scaled by √0.5
//
//   decoder.rs   — The LinearDecoder classification head,
//                  with an optional highway projection
//
//   model.rs     — GoodWillHunting: the encoder/decoder
//                  composite with the forward / predict /
//                  train_epoch contracts
//
//   criterion.rs — The loss collaborator (class-weighted
//                  cross entropy)
//
//   scorer.rs    — The metrics collaborator (token accuracy
//                  and confusion counts)
//
//   trainer.rs   — The training loop: forward, loss, backward,
//                  optimiser step, validation, checkpointing
//
//   inferencer.rs — Loads a checkpoint and attributes a text
//                   by majority vote over per-token labels
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Dauphin et al. (2017) Language Modeling with
//              Gated Convolutional Networks
//            Gehring et al. (2017) Convolutional Sequence to
//              Sequence Learning

/// The encoder contract and the gated-convolutional encoder
pub mod encoder;

/// The linear classification head
pub mod decoder;

/// The encoder/decoder composite model
pub mod model;

/// Loss collaborator invoked by train_epoch
pub mod criterion;

/// Metrics collaborator invoked by train_epoch
pub mod scorer;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and attributes texts
pub mod inferencer;
