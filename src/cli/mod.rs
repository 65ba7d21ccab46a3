// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`     — trains the attribution model on a text corpus
//   2. `attribute` — loads a checkpoint and names the likely author
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, TrainArgs, AttributeArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "stylo-attrib",
    version = "0.1.0",
    about = "Train a convolutional authorship-attribution model, then attribute texts."
)]
pub struct Cli {
    /// The subcommand to run (train or attribute)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Train(args)     => self.run_train(args.clone()),
            Commands::Attribute(args) => self.run_attribute(args.clone()),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(&self, args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus in: {}", args.corpus_dir);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `attribute` subcommand.
    /// Loads the model from checkpoint and prints the predicted author.
    fn run_attribute(&self, args: AttributeArgs) -> Result<()> {
        use crate::application::attribute_use_case::AttributeUseCase;
        use crate::domain::traits::Attributor;

        // Build the use case from the checkpoint directory
        let use_case = AttributeUseCase::new(args.checkpoint_dir.clone())?;

        // Read the disputed text from the given file
        let text = std::fs::read_to_string(&args.file)?;

        // Run inference and print the result
        let author = use_case.attribute(&text)?;
        println!("\nAttributed to: {}", author);
        Ok(())
    }
}
