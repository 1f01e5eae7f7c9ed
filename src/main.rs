// =============================================================================
// main.rs — Sparse MoE routing simulator CLI
// =============================================================================
//
// CLI Commands:
//   run      [PROMPT...] [--json]     Route a prompt, print the timeline
//   describe [--json]                 Show the architecture description
//   demo                              Two prompts on one engine + stats
//
// Architecture flags (any command):
//   --config <FILE> --layers N --neurons N --top-k K --hidden-dim H
//   --embedding-dim F
//
// Logging goes to stderr through tracing; RUST_LOG overrides --verbose.
// =============================================================================

mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sparse_moe_sim::{ArchitectureDescription, SparseEngine, SparseRunResult, DEFAULT_PROMPT};

use cli::{Cli, Command};

type CliResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Entrypoint
// ---------------------------------------------------------------------------
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[error] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn execute(cli: &Cli) -> CliResult {
    let engine = SparseEngine::new(cli.arch.resolve()?)?;

    match &cli.command {
        Command::Run { prompt, json } => cmd_run(&engine, prompt, *json),
        Command::Describe { json } => cmd_describe(&engine, *json),
        Command::Demo => cmd_demo(&engine),
    }
}

// ---------------------------------------------------------------------------
// Command: run
// ---------------------------------------------------------------------------
fn cmd_run(engine: &SparseEngine, words: &[String], json: bool) -> CliResult {
    let prompt = if words.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        words.join(" ")
    };
    let result = engine.run(&prompt);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("[run] Prompt: \"{}\"", prompt);
    print_timeline(&result);
    println!("\n[run] {}", engine.sparse_stats_report());
    Ok(())
}

// ---------------------------------------------------------------------------
// Command: describe
// ---------------------------------------------------------------------------
fn cmd_describe(engine: &SparseEngine, json: bool) -> CliResult {
    let d = engine.describe();
    if json {
        println!("{}", serde_json::to_string_pretty(&d)?);
    } else {
        print_description(&d);
        let cfg = engine.config();
        println!(
            "  Params:         {} generated, {} touched per token ({:.1}% sparse)",
            cfg.param_count(),
            cfg.active_param_count(),
            cfg.sparsity() * 100.0
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command: demo
// ---------------------------------------------------------------------------
fn cmd_demo(engine: &SparseEngine) -> CliResult {
    println!("=== Demo Mode: Sparse MoE Routing ===\n");
    print_description(&engine.describe());

    for prompt in [DEFAULT_PROMPT, "hello world"] {
        let before = engine.vocabulary_size();
        println!("\n[demo] Prompt: \"{}\"", prompt);
        let result = engine.run(prompt);
        print_timeline(&result);
        println!(
            "[demo] Vocabulary: {} → {} entries",
            before,
            engine.vocabulary_size()
        );
    }

    let stats = engine.routing_stats();
    println!("\n[demo] {}", stats.report());
    for layer in 0..engine.config().layers {
        let cold = stats.coldest(layer);
        if !cold.is_empty() {
            println!("  L{} never fired: {:?}", layer, cold);
        }
    }
    println!("[demo] Token table: {} bytes", engine.memory_bytes());
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------
fn print_description(d: &ArchitectureDescription) {
    println!("[describe] Sparse MoE architecture");
    println!("  Layers:         {}", d.layers);
    println!("  Neurons/layer:  {} (top-{} active)", d.neurons_per_layer, d.top_k);
    println!("  Hidden dim:     {}", d.hidden_dim);
    println!("  Embedding dim:  {}", d.embedding_dim);
    println!("  Vocabulary:     {}", d.vocabulary);
}

fn print_timeline(result: &SparseRunResult) {
    if result.is_empty() {
        println!("  (no tokens)");
    }
    for t in &result.token_traces {
        println!("  #{:<3} {}", t.token_index, t.token);
        for layer in &t.layers {
            let fired: Vec<String> = layer
                .selected
                .iter()
                .map(|n| {
                    format!(
                        "n{:02} {:5.1}% raw={:+.2} {}",
                        n.id,
                        n.weight * 100.0,
                        n.raw_score,
                        intensity_bar(n.intensity())
                    )
                })
                .collect();
            println!("        L{}  {}", layer.layer_index, fired.join("  "));
        }
    }
    println!(
        "  Predicted next token: \"{}\"  ({} neuron activations)",
        result.predicted_token,
        result.activated_neurons()
    );
}

/// Four-step bar; full at intensity 1.
fn intensity_bar(intensity: f32) -> &'static str {
    const BARS: [&str; 5] = ["[    ]", "[#   ]", "[##  ]", "[### ]", "[####]"];
    let step = (intensity.clamp(0.0, 1.0) * 4.0).round() as usize;
    BARS[step.min(4)]
}
