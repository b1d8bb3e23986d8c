use thiserror::Error;
use tracing::debug;

use super::activation::Activation;
use super::cases::CaseSet;
use super::topology::Topology;
use super::trainer::Trainer;
use super::weights::{WeightMatrix, Weights, WeightsError};

/// Neural network structure
pub struct Net {
    /// The number of neurons in each layer.
    pub(super) topology: Topology,

    /// Weights between every pair of adjacent layers (see `Weights` documentation).
    pub(super) weights: Weights,

    pub(super) activation: Activation,

    /// Activations of every layer for the most recently processed input.
    ///
    /// Each layer gets a buffer of exactly its own size:
    /// `activations = [layer_0][layer_1] ... [layer_N]`, where `layer_0` is a copy of
    /// the inputs. The trainer reads hidden activations from here during
    /// backpropagation, so nothing is overwritten between forward and backward pass.
    pub(super) activations: Box<[Box<[f64]>]>,
}

impl Net {
    /// Returns network for given topology and weights, using the sigmoid activation.
    ///
    /// # Arguments
    /// * `topology` - number of neurons in each layer;
    /// * `weights` - initial weights, see `Weights` for ways to build them.
    ///
    /// # Returns
    /// * `Ok(Net)` if weights have the dimensions `topology` asks for;
    /// * `Err(NewNetError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Net, Topology, Weights};
    /// let topology = Topology::new(&[10, 20, 20, 3]).unwrap();
    /// let weights = Weights::filled(&topology, 0.1);
    /// let net = Net::new(topology, weights).unwrap();
    /// ```
    pub fn new(topology: Topology, weights: Weights) -> Result<Net, NewNetError> {
        weights.check_topology(&topology)?;

        let activations = topology
            .layers()
            .iter()
            .map(|&size| vec![0.0; size].into_boxed_slice())
            .collect();

        debug!(%topology, weights = topology.weights_count(), "built network");

        Ok(Net {
            topology,
            weights,
            activation: Activation::default(),
            activations,
        })
    }

    /// Replaces the activation function.
    pub fn with_activation(mut self, activation: Activation) -> Net {
        self.activation = activation;
        self
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Activations of `layer` left by the last forward pass.
    pub fn layer_activations(&self, layer: usize) -> &[f64] {
        &self.activations[layer]
    }

    /// Exports topology and weights from network.
    ///
    /// # Returns
    /// `(topology, weights)`.
    pub fn export(&self) -> (&Topology, &Weights) {
        (&self.topology, &self.weights)
    }

    /// Computes one layer from the previous one.
    ///
    /// For every destination neuron `b`:
    /// `theta[b] = prev . column_b(weights)` and `out[b] = f(theta[b])`.
    /// Weighted sums are kept in `thetas` when one is given.
    fn process_layer(
        weights: &WeightMatrix,
        activation: Activation,
        prev: &[f64],
        mut thetas: Option<&mut [f64]>,
        out: &mut [f64],
    ) {
        for (b, a) in out.iter_mut().enumerate() {
            let mut theta = 0.0;
            for (g, &x) in prev.iter().enumerate() {
                theta += x * weights.get(g, b);
            }
            if let Some(thetas) = thetas.as_deref_mut() {
                thetas[b] = theta;
            }
            *a = activation.apply(theta);
        }
    }

    /// Runs the forward pass over all layers.
    /// Sizes must be checked by the caller.
    ///
    /// # Arguments
    /// * `inputs` - activations of input neurons;
    /// * `thetas` - per-layer weighted sums buffer, filled for every non-input layer if given.
    pub(super) fn forward(&mut self, inputs: &[f64], mut thetas: Option<&mut [Box<[f64]>]>) {
        self.activations[0].copy_from_slice(inputs);

        for layer in 1..self.activations.len() {
            let (done, rest) = self.activations.split_at_mut(layer);
            Net::process_layer(
                self.weights.matrix(layer - 1),
                self.activation,
                &done[layer - 1],
                thetas.as_deref_mut().map(|t| &mut *t[layer]),
                &mut rest[0],
            );
        }
    }

    /// Output layer activations of the last forward pass.
    pub(super) fn outputs(&self) -> &[f64] {
        &self.activations[self.activations.len() - 1]
    }

    pub(super) fn check_inputs(&self, inputs: &[f64]) -> Result<(), SizeMismatch> {
        if inputs.len() != self.topology.input_size() {
            return Err(SizeMismatch {
                expected: self.topology.input_size(),
                got: inputs.len(),
            });
        }
        Ok(())
    }

    /// Calculates output of the network using given input.
    ///
    /// # Returns
    /// * `Ok(&[f64])` with activations of output neurons if amount of inputs is right;
    /// * `Err(ProcessError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Net, Topology, Weights};
    /// let topology = Topology::new(&[10, 20, 20, 3]).unwrap();
    /// let mut net = Net::new(topology.clone(), Weights::filled(&topology, 0.1)).unwrap();
    /// let outputs = net.process(&[1.0; 10]).unwrap();
    /// assert_eq!(outputs.len(), 3);
    /// ```
    pub fn process(&mut self, inputs: &[f64]) -> Result<&[f64], ProcessError> {
        self.check_inputs(inputs).map_err(ProcessError::BadInputs)?;
        self.forward(inputs, None);
        Ok(self.outputs())
    }

    /// Same as `Net::process`, but copies output activations into `outputs`.
    pub fn process_into(&mut self, inputs: &[f64], outputs: &mut [f64]) -> Result<(), ProcessError> {
        if outputs.len() != self.topology.output_size() {
            return Err(ProcessError::BadOutputs(SizeMismatch {
                expected: self.topology.output_size(),
                got: outputs.len(),
            }));
        }
        outputs.copy_from_slice(self.process(inputs)?);
        Ok(())
    }

    /// Runs every case of `cases` through the network, without training.
    ///
    /// # Returns
    /// * `Ok(outputs)` with one output vector per case, in case order;
    /// * `Err(ProcessError)` if the case set was built for other layer sizes.
    ///   Nothing is run in that case.
    pub fn run_batch(&mut self, cases: &CaseSet) -> Result<Vec<Vec<f64>>, ProcessError> {
        if cases.input_size() != self.topology.input_size() {
            return Err(ProcessError::BadInputs(SizeMismatch {
                expected: self.topology.input_size(),
                got: cases.input_size(),
            }));
        }
        if cases.output_size() != self.topology.output_size() {
            return Err(ProcessError::BadOutputs(SizeMismatch {
                expected: self.topology.output_size(),
                got: cases.output_size(),
            }));
        }

        Ok(cases
            .iter()
            .map(|case| {
                self.forward(&case.inputs, None);
                self.outputs().to_vec()
            })
            .collect())
    }

    /// Calculates error of output values given the desired values.
    /// Implements the formula:
    /// `sum(0.5 * (desired - output)^2)`
    ///
    /// # Returns
    /// * `Ok(f64)` if `outputs` and `targets` have the same size;
    /// * `SizeMismatch` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::Net;
    /// let outputs = [10.0; 1000];
    /// let targets = [10.25; 1000];
    /// let error = Net::calc_error(&outputs, &targets).unwrap();
    /// assert_eq!(error, 31.25);
    /// ```
    pub fn calc_error(outputs: &[f64], targets: &[f64]) -> Result<f64, SizeMismatch> {
        if outputs.len() != targets.len() {
            return Err(SizeMismatch {
                expected: outputs.len(),
                got: targets.len(),
            });
        }
        Ok(Net::half_squared_error(outputs, targets))
    }

    pub(super) fn half_squared_error(outputs: &[f64], targets: &[f64]) -> f64 {
        outputs
            .iter()
            .zip(targets.iter())
            .map(|(&o, &t)| 0.5 * (t - o) * (t - o))
            .sum()
    }

    /// Consumes `Net` and builds `Trainer` object containing it.
    /// See `Trainer`'s documentation for details.
    pub fn build_trainer(self, learning_rate: f64) -> Trainer {
        Trainer::build(self, learning_rate)
    }
}

/// Error structure for `Net::new`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NewNetError {
    #[error("Weights don't fit the topology: {0}")]
    BadWeights(#[from] WeightsError),
}

/// Error structure for `Net::process`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("Expected {} input(s), but got {}!", .0.expected, .0.got)]
    BadInputs(SizeMismatch),
    #[error("Expected {} output(s), but got {}!", .0.expected, .0.got)]
    BadOutputs(SizeMismatch),
}

/// Error structure for collections size mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} values, but got {got}!")]
pub struct SizeMismatch {
    pub expected: usize,
    pub got: usize,
}
