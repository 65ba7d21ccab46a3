// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `attribute`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the attribution model on a per-author text corpus
    Train(TrainArgs),

    /// Attribute a text file using a trained checkpoint
    Attribute(AttributeArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Directory containing one subdirectory of .txt files per author
    #[arg(long, default_value = "data/corpus")]
    pub corpus_dir: String,

    /// Directory to save model checkpoints, tokenizer and author registry
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of tokens per training segment
    #[arg(long, default_value_t = 128)]
    pub max_seq_len: usize,

    /// Number of segments processed together in one forward pass
    #[arg(long, default_value_t = 16)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// How fast the model learns — too high causes instability,
    /// too low causes slow convergence
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    /// Width of the token embedding vectors
    #[arg(long, default_value_t = 128)]
    pub emb_dim: usize,

    /// Hidden width of the convolutional stack
    #[arg(long, default_value_t = 128)]
    pub hid_dim: usize,

    /// Number of stacked gated convolutional layers
    #[arg(long, default_value_t = 6)]
    pub n_layers: usize,

    /// Convolution kernel size — must be odd so padding can be symmetric
    #[arg(long, default_value_t = 3)]
    pub kernel_size: usize,

    /// Dropout probability — randomly zeroes activations during training
    /// to prevent overfitting
    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Total number of unique tokens the model can recognise
    #[arg(long, default_value_t = 15000)]
    pub vocab_size: usize,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_dir:     a.corpus_dir,
            checkpoint_dir: a.checkpoint_dir,
            max_seq_len:    a.max_seq_len,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            emb_dim:        a.emb_dim,
            hid_dim:        a.hid_dim,
            n_layers:       a.n_layers,
            kernel_size:    a.kernel_size,
            dropout:        a.dropout,
            vocab_size:     a.vocab_size,
        }
    }
}

/// All arguments for the `attribute` command
#[derive(Args, Debug, Clone)]
pub struct AttributeArgs {
    /// Path to the text file whose authorship is in question
    #[arg(long)]
    pub file: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
