use thiserror::Error;
use tracing::debug;

use super::net::{Net, SizeMismatch};

/// Net trainer structure.
///
/// To train Net, additional buffers are needed. We will contain them in this structure.
/// Training procedure will look like this:
/// * One allocates additional buffers by calling `Net::build_trainer`, which will consume `Net`
/// and return `Trainer` object.
/// (Consuming `Net` is needed to prevent one from using the network while its weights change.)
/// * Training data is processed one case at a time via `Trainer::train`, which updates weights
/// right away, or over a whole case set via `Trainer::train_epoch` and `Trainer::train_until`.
/// Also, at any time one can call `Trainer::net_mut` to get access to `Net::process`.
/// * Once finished training, one can use `Trainer::teardown` to free all the additional buffers,
/// allocated in Trainer, and get `Net` object back.
pub struct Trainer {
    /// The network object trainer posesses.
    pub(crate) net: Net,

    /// Step size of every weight update (lambda).
    pub(crate) learning_rate: f64,

    /// Weighted sums of every layer, computed during the forward pass of `Trainer::train`.
    ///
    /// Ragged the same way `Net::activations` is:
    /// `thetas = [layer_0][layer_1] ... [layer_N]`, with `layer_0` left empty
    /// since inputs have no weighted sum.
    pub(crate) thetas: Box<[Box<[f64]>]>,

    /// Error terms (psi) of every layer, same layout as `thetas`.
    pub(crate) psis: Box<[Box<[f64]>]>,
}

impl Trainer {
    /// Consumes `Net` and builds `Trainer` object containing it.
    pub(super) fn build(net: Net, learning_rate: f64) -> Trainer {
        let buffers = || -> Box<[Box<[f64]>]> {
            net.topology
                .layers()
                .iter()
                .enumerate()
                .map(|(layer, &size)| vec![0.0; if layer == 0 { 0 } else { size }].into_boxed_slice())
                .collect()
        };
        let thetas = buffers();
        let psis = buffers();

        debug!(topology = %net.topology, learning_rate, "built trainer");

        Trainer {
            net,
            learning_rate,
            thetas,
            psis,
        }
    }

    /// Returns reference to contained `Net`.
    pub fn net_ref(&self) -> &Net {
        &self.net
    }

    /// Returns mutable reference to contained `Net`, allowing the use of `Net::process`.
    pub fn net_mut(&mut self) -> &mut Net {
        &mut self.net
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Error terms of `layer` computed by the last `Trainer::train` call.
    /// Empty for the input layer.
    pub fn error_terms(&self, layer: usize) -> &[f64] {
        &self.psis[layer]
    }

    /// Performs one step of gradient descent on a given case, updating weights immediately.
    ///
    /// # Arguments
    /// * `inputs` - slice that holds activations of input neurons;
    /// * `targets` - slice that holds desired activations of output neurons.
    ///
    /// # Returns
    /// * `Ok(())` if both slices fit the network, the weights have moved one step
    /// toward smaller squared error on this case;
    /// * `Err(TrainError)` otherwise, and nothing is changed.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Net, Topology, Weights};
    /// let topology = Topology::new(&[10, 20, 20, 3]).unwrap();
    /// let weights = Weights::filled(&topology, 0.1);
    /// let mut trainer = Net::new(topology, weights).unwrap().build_trainer(0.3);
    /// trainer.train(&[1.0; 10], &[0.0, 1.0, 0.0]).unwrap();
    /// ```
    pub fn train(&mut self, inputs: &[f64], targets: &[f64]) -> Result<(), TrainError> {
        self.net.check_inputs(inputs).map_err(TrainError::BadInputs)?;
        let outputs_count = self.net.topology.output_size();
        if targets.len() != outputs_count {
            return Err(TrainError::BadTargets(SizeMismatch {
                expected: outputs_count,
                got: targets.len(),
            }));
        }

        self.train_case(inputs, targets);
        Ok(())
    }

    /// Forward pass followed by backpropagation, sizes must be checked by the caller.
    pub(super) fn train_case(&mut self, inputs: &[f64], targets: &[f64]) {
        self.net.forward(inputs, Some(&mut self.thetas[..]));
        self.backpropagate(targets);
    }

    /// Computes error terms from the output layer back and updates weights on the way.
    ///
    /// Every weight `W_k[g][b]` is read once for the error sum of neuron `g` and
    /// updated right after that read, before moving on to `b + 1`. The update
    /// uses `psi_{k+1}[b]`, which is already final at that point.
    fn backpropagate(&mut self, targets: &[f64]) {
        let activation = self.net.activation;
        let learning_rate = self.learning_rate;
        let out_layer = self.net.activations.len() - 1;

        // Output layer: psi = (target - output) * f'(theta)
        for (((psi, &target), &output), &theta) in self.psis[out_layer]
            .iter_mut()
            .zip(targets.iter())
            .zip(self.net.activations[out_layer].iter())
            .zip(self.thetas[out_layer].iter())
        {
            *psi = (target - output) * activation.derivative(theta);
        }

        // Hidden layers, going in reverse order
        for layer in (1..out_layer).rev() {
            let (current_psis, next_psis) = self.psis.split_at_mut(layer + 1);
            let current_psis = &mut current_psis[layer];
            let next_psis = &next_psis[0];
            let activations = &self.net.activations[layer];
            let thetas = &self.thetas[layer];
            let weights = self.net.weights.matrix_mut(layer);

            for (g, psi) in current_psis.iter_mut().enumerate() {
                let delta_coeff = learning_rate * activations[g];
                let mut omega = 0.0;
                for (w, &next_psi) in weights.row_mut(g).iter_mut().zip(next_psis.iter()) {
                    omega += next_psi * *w;
                    *w += delta_coeff * next_psi;
                }
                *psi = omega * activation.derivative(thetas[g]);
            }
        }

        // Input layer has nothing upstream, only its outgoing weights change
        let inputs = &self.net.activations[0];
        let next_psis = &self.psis[1];
        let weights = self.net.weights.matrix_mut(0);
        for (g, &input) in inputs.iter().enumerate() {
            let delta_coeff = learning_rate * input;
            for (w, &next_psi) in weights.row_mut(g).iter_mut().zip(next_psis.iter()) {
                *w += delta_coeff * next_psi;
            }
        }
    }

    /// Frees training buffers, consuming `Trainer` object, and returns contained `Net` back.
    pub fn teardown(self) -> Net {
        self.net
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    #[error("Expected {} input(s), but got {}!", .0.expected, .0.got)]
    BadInputs(SizeMismatch),
    #[error("Expected {} target(s), but got {}!", .0.expected, .0.got)]
    BadTargets(SizeMismatch),
    #[error("Can't train on an empty case set!")]
    NoCases,
}
