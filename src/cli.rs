// =============================================================================
// cli.rs — Command-line arguments for the sparse-moe binary
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use sparse_moe_sim::model::Result;
use sparse_moe_sim::SparseConfig;

/// Deterministic sparse mixture-of-experts simulator.
#[derive(Parser, Debug)]
#[command(name = "sparse-moe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub arch: ArchArgs,

    /// Log engine construction and per-run summaries (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Route a prompt and print the per-token timeline
    Run {
        /// Prompt words (default prompt if omitted)
        prompt: Vec<String>,

        /// Print the result as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Print the architecture description
    Describe {
        /// Print the description as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Run two prompts on one engine and show vocabulary growth
    Demo,
}

/// Architecture overrides, applied on top of `--config` (or the defaults).
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchArgs {
    /// JSON config file (camelCase keys; missing keys use defaults)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "layers", global = true)]
    pub layers: Option<usize>,

    #[arg(long = "neurons", global = true)]
    pub neurons: Option<usize>,

    #[arg(long = "top-k", global = true)]
    pub top_k: Option<usize>,

    #[arg(long = "hidden-dim", global = true)]
    pub hidden_dim: Option<usize>,

    #[arg(long = "embedding-dim", global = true)]
    pub embedding_dim: Option<usize>,
}

impl ArchArgs {
    /// Resolve the final configuration.  Validation happens in the engine.
    pub fn resolve(&self) -> Result<SparseConfig> {
        let mut cfg = match &self.config {
            Some(path) => SparseConfig::from_json_file(path)?,
            None => SparseConfig::default(),
        };
        if let Some(v) = self.layers {
            cfg.layers = v;
        }
        if let Some(v) = self.neurons {
            cfg.neurons_per_layer = v;
        }
        if let Some(v) = self.top_k {
            cfg.top_k = v;
        }
        if let Some(v) = self.hidden_dim {
            cfg.hidden_dim = v;
        }
        if let Some(v) = self.embedding_dim {
            cfg.embedding_dim = v;
        }
        Ok(cfg)
    }
}
