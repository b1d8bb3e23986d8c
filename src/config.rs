//! Configuration structures for running and training a network
//!
//! A configuration is a JSON file naming the topology, hyperparameters, where
//! initial weights come from and the cases to run or train on.

use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::data;
use crate::error::{Error, Result};
use crate::feedforward::{Activation, Case, CaseSet, StopCriteria, Topology, Weights};

/// Where initial weights come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", deny_unknown_fields)]
pub enum WeightSource {
    /// Uniformly random within `[min, max]`.
    Random { min: f64, max: f64 },
    /// Flat weight dump, see `data::load_weights`.
    File { path: PathBuf },
    /// Every weight set to `value`.
    Constant { value: f64 },
}

/// One case: targets plus inputs given inline or read from a file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CaseSource {
    Inline { inputs: Vec<f64>, targets: Vec<f64> },
    File { inputs_file: PathBuf, targets: Vec<f64> },
}

fn default_train() -> bool {
    true
}

/// Configuration for a run of the network
///
/// # Example
///
/// ```json
/// {
///   "topology": [2, 5, 1],
///   "learning_rate": 0.3,
///   "max_iterations": 100000,
///   "error_threshold": 0.0002,
///   "progress_interval": 10000,
///   "weights": { "source": "random", "min": -1.5, "max": 1.5 },
///   "save_weights": "weights.txt",
///   "cases": [
///     { "inputs": [0, 0], "targets": [0] },
///     { "inputs_file": "cases/1-1.txt", "targets": [1] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Number of neurons in each layer
    pub topology: Topology,

    #[serde(default)]
    pub activation: Activation,

    /// Train before running the cases; `false` only runs them
    #[serde(default = "default_train")]
    pub train: bool,

    /// Step size of every weight update (lambda)
    #[serde(alias = "lambda")]
    pub learning_rate: f64,

    /// Epoch cap for training
    pub max_iterations: usize,

    /// Training stops once the average error is at or below this
    pub error_threshold: f64,

    /// Epochs between progress log lines, 0 disables them
    #[serde(default)]
    pub progress_interval: usize,

    pub weights: WeightSource,

    /// Where to write the final weights, if anywhere
    #[serde(default)]
    pub save_weights: Option<PathBuf>,

    pub cases: Vec<CaseSource>,
}

impl NetworkConfig {
    /// Parses and validates configuration from a JSON string.
    /// Relative paths are left as they are.
    pub fn from_json(json: &str) -> Result<NetworkConfig> {
        let config: NetworkConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }

        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be positive".to_owned()));
        }

        if self.error_threshold.is_nan() || self.error_threshold < 0.0 {
            return Err(Error::Config(format!(
                "error_threshold must be non-negative, got {}",
                self.error_threshold
            )));
        }

        match self.weights {
            WeightSource::Random { min, max } => {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    return Err(Error::Config(format!(
                        "random weight bounds must be finite and ordered, got [{}, {}]",
                        min, max
                    )));
                }
            }
            WeightSource::Constant { value } => {
                if !value.is_finite() {
                    return Err(Error::Config(format!("weight value must be finite, got {}", value)));
                }
            }
            WeightSource::File { .. } => {}
        }

        if self.cases.is_empty() {
            return Err(Error::Config("at least one case is needed".to_owned()));
        }

        Ok(())
    }

    /// Resolves every relative path against `base`.
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        if let WeightSource::File { path } = &mut self.weights {
            resolve(path);
        }
        if let Some(path) = &mut self.save_weights {
            resolve(path);
        }
        for case in self.cases.iter_mut() {
            if let CaseSource::File { inputs_file, .. } = case {
                resolve(inputs_file);
            }
        }
    }

    /// Stop conditions for training.
    pub fn stop_criteria(&self) -> StopCriteria {
        StopCriteria::new(self.max_iterations, self.error_threshold)
            .with_progress_interval(self.progress_interval)
    }

    /// Builds initial weights. `rng` is used only for random weights.
    pub fn initial_weights<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Weights> {
        match &self.weights {
            WeightSource::Random { min, max } => {
                Ok(Weights::random(&self.topology, *min, *max, rng))
            }
            WeightSource::File { path } => data::load_weights(path, &self.topology),
            WeightSource::Constant { value } => Ok(Weights::filled(&self.topology, *value)),
        }
    }

    /// Loads all cases, reading input files where needed, in configuration order.
    pub fn load_cases(&self) -> Result<CaseSet> {
        let cases = self
            .cases
            .iter()
            .map(|source| match source {
                CaseSource::Inline { inputs, targets } => {
                    Ok(Case::new(inputs.clone(), targets.clone()))
                }
                CaseSource::File {
                    inputs_file,
                    targets,
                } => {
                    let inputs = data::load_case_inputs(inputs_file, self.topology.input_size())?;
                    Ok(Case::new(inputs, targets.clone()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CaseSet::new(&self.topology, cases)?)
    }
}

/// Loads a configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into a `NetworkConfig` and validates it.
/// Relative paths inside are resolved against the directory of `path`.
///
/// # Returns
///
/// `Ok(NetworkConfig)` on success, or an error if the file cannot be read, the JSON is
/// invalid or values are out of range.
///
/// # Examples
///
/// ```no_run
/// use nlayer::config::load_config;
///
/// let cfg = load_config("config.json").unwrap();
/// println!("{}", cfg.topology);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut config = NetworkConfig::from_json(&contents)?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_paths(base);

    debug!(path = %path.display(), topology = %config.topology, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "topology": [2, 2, 1],
        "learning_rate": 0.3,
        "max_iterations": 10,
        "error_threshold": 0.001,
        "weights": { "source": "constant", "value": 0.5 },
        "cases": [ { "inputs": [0, 1], "targets": [1] } ]
    }"#;

    #[test]
    fn defaults_are_applied() {
        let config = NetworkConfig::from_json(MINIMAL).unwrap();
        assert!(config.train);
        assert_eq!(config.activation, Activation::Sigmoid);
        assert_eq!(config.progress_interval, 0);
        assert_eq!(config.save_weights, None);
        assert_eq!(config.weights, WeightSource::Constant { value: 0.5 });
    }

    #[test]
    fn lambda_is_accepted_as_learning_rate() {
        let json = MINIMAL.replace("learning_rate", "lambda");
        assert_eq!(NetworkConfig::from_json(&json).unwrap().learning_rate, 0.3);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for (from, to) in [
            ("\"learning_rate\": 0.3", "\"learning_rate\": 0.0"),
            ("\"max_iterations\": 10", "\"max_iterations\": 0"),
            ("\"error_threshold\": 0.001", "\"error_threshold\": -1.0"),
            (
                "{ \"source\": \"constant\", \"value\": 0.5 }",
                "{ \"source\": \"random\", \"min\": 1.0, \"max\": -1.0 }",
            ),
        ] {
            let json = MINIMAL.replace(from, to);
            assert!(
                matches!(NetworkConfig::from_json(&json), Err(Error::Config(_))),
                "{} should be rejected",
                to
            );
        }
    }

    #[test]
    fn bad_topology_is_a_json_error() {
        let json = MINIMAL.replace("[2, 2, 1]", "[2, 0, 1]");
        assert!(matches!(NetworkConfig::from_json(&json), Err(Error::Json(_))));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = MINIMAL.replace("\"max_iterations\"", "\"max_iters\": 1, \"max_iterations\"");
        assert!(NetworkConfig::from_json(&json).is_err());
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let json = MINIMAL
            .replace(
                "{ \"source\": \"constant\", \"value\": 0.5 }",
                "{ \"source\": \"file\", \"path\": \"w.txt\" }",
            )
            .replace(
                "{ \"inputs\": [0, 1], \"targets\": [1] }",
                "{ \"inputs_file\": \"cases/1.txt\", \"targets\": [1] }",
            );
        let mut config = NetworkConfig::from_json(&json).unwrap();
        config.resolve_paths(Path::new("/data/run"));

        assert_eq!(
            config.weights,
            WeightSource::File {
                path: PathBuf::from("/data/run/w.txt")
            }
        );
        assert_eq!(
            config.cases[0],
            CaseSource::File {
                inputs_file: PathBuf::from("/data/run/cases/1.txt"),
                targets: vec![1.0]
            }
        );
    }

    #[test]
    fn builds_core_values() {
        let config = NetworkConfig::from_json(MINIMAL).unwrap();
        let weights = config.initial_weights(&mut rand::thread_rng()).unwrap();
        assert_eq!(weights, Weights::filled(&config.topology, 0.5));

        let cases = config.load_cases().unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(&*cases.get(0).unwrap().inputs, &[0.0, 1.0]);

        let criteria = config.stop_criteria();
        assert_eq!(criteria.max_iterations, 10);
        assert_eq!(criteria.error_threshold, 0.001);
    }
}
