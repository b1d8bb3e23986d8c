//! Runs or trains an N-layer network described by a JSON configuration.
//!
//! Usage:
//!   nlayer config.json --save-weights weights.txt

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nlayer::config::load_config;
use nlayer::data::save_weights;
use nlayer::feedforward::Net;
use nlayer::report;

#[derive(Parser, Debug)]
#[command(name = "nlayer")]
#[command(about = "Run or train an N-layer feedforward network")]
struct Args {
    /// Configuration file
    #[arg(default_value = "config.json")]
    config: PathBuf,

    /// Write final weights here, overriding the configuration
    #[arg(long)]
    save_weights: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let started = Instant::now();

    let mut config = load_config(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if let Some(path) = args.save_weights {
        config.save_weights = Some(path);
    }
    println!("{}", report::describe_config(&config, &args.config));

    let weights = config
        .initial_weights(&mut rand::thread_rng())
        .context("preparing initial weights")?;
    let cases = config.load_cases().context("loading cases")?;
    let net = Net::new(config.topology.clone(), weights)
        .context("building network")?
        .with_activation(config.activation);

    let mut net = if config.train {
        let criteria = config.stop_criteria();
        let mut trainer = net.build_trainer(config.learning_rate);
        let outcome = trainer.train_until(&cases, &criteria).context("training")?;
        println!("{}", report::training_summary(&outcome, &criteria));
        trainer.teardown()
    } else {
        println!("The network has finished running.");
        net
    };

    let outputs = net.run_batch(&cases).context("running cases")?;
    println!("{}", report::truth_table(&cases, &outputs));

    if let Some(path) = &config.save_weights {
        save_weights(path, net.weights())
            .with_context(|| format!("saving weights to {}", path.display()))?;
        println!("Weights have been written to {}", path.display());
    }

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    println!("Total elapsed time: {}ms.", started.elapsed().as_millis());
    Ok(())
}
