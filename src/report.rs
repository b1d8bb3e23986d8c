//! Human-readable text for the command-line driver: configuration echo,
//! stop reason and truth table.

use std::fmt::Write;
use std::path::Path;

use crate::config::{NetworkConfig, WeightSource};
use crate::feedforward::{CaseSet, StopCriteria, TrainingOutcome};

const RULE: &str = "----------------------------------------------";

/// Describes what a run with `config` is about to do.
pub fn describe_config(config: &NetworkConfig, path: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "N-Layer Network Configuration = {}", config.topology);
    let _ = writeln!(out, "Config File: {}", path.display());
    let _ = writeln!(out, "Activation: {}", config.activation);

    match &config.weights {
        WeightSource::Random { min, max } => {
            let _ = writeln!(
                out,
                "Weights will be randomly generated within ({}, {})",
                min, max
            );
        }
        WeightSource::File { path } => {
            let _ = writeln!(out, "Weights will be loaded from {}", path.display());
        }
        WeightSource::Constant { value } => {
            let _ = writeln!(out, "All weights start at {}", value);
        }
    }

    if let Some(path) = &config.save_weights {
        let _ = writeln!(out, "Weights will be written to {}", path.display());
    }

    let _ = writeln!(out, "Number of cases = {}", config.cases.len());

    if config.train {
        let _ = writeln!(out, "Maximum Number of Iterations = {}", config.max_iterations);
        let _ = writeln!(out, "Error Threshold to Stop Training = {}", config.error_threshold);
        let _ = writeln!(out, "Learning Factor = {}", config.learning_rate);
        let _ = writeln!(out, "Training will now begin.");
    } else {
        let _ = writeln!(out, "Running without training.");
    }
    let _ = write!(out, "{}", RULE);
    out
}

/// Explains which condition(s) stopped training.
pub fn stop_reason(outcome: &TrainingOutcome, criteria: &StopCriteria) -> String {
    let mut reason = String::new();
    if outcome.max_iterations_reached {
        let _ = write!(
            reason,
            "The maximum number of iterations, {}, has been reached. ",
            criteria.max_iterations
        );
    }
    if outcome.error_threshold_reached {
        let _ = write!(
            reason,
            "The network reached the error threshold in {} iterations. ",
            outcome.epochs
        );
    }
    reason.push_str("Thus, training ended.");
    reason
}

/// Summary printed once training stopped.
pub fn training_summary(outcome: &TrainingOutcome, criteria: &StopCriteria) -> String {
    format!(
        "{rule}\nThe network has stopped training.\n{reason}\n\
         The total number of iterations is {epochs}.\n\
         Average error of the model is {error} while the error threshold was {threshold}\n{rule}",
        rule = RULE,
        reason = stop_reason(outcome, criteria),
        epochs = outcome.epochs,
        error = outcome.average_error,
        threshold = criteria.error_threshold,
    )
}

/// Table of expected (`T#`) and computed (`F#`) outputs, one row per case.
pub fn truth_table(cases: &CaseSet, outputs: &[Vec<f64>]) -> String {
    let mut table = String::new();
    let _ = writeln!(table, "Truth table: T are targets, F are calculated outputs.");

    for i in 0..cases.output_size() {
        let _ = write!(table, "  T#{}  |", i + 1);
    }
    for i in 0..cases.output_size() {
        let _ = write!(table, "  F#{}  |", i + 1);
    }

    for (case, outputs) in cases.iter().zip(outputs) {
        table.push('\n');
        for target in case.targets.iter() {
            let _ = write!(table, " {:.3} |", target);
        }
        for output in outputs {
            let _ = write!(table, " {:.3} |", output);
        }
    }
    table
}
