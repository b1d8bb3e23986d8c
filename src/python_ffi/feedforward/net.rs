use pyo3::prelude::*;

use super::case_set;
use super::trainer::{ConsumableTrainer, Trainer};
use crate::feedforward::{
    CaseError, Net as InnerNet, NewNetError, ProcessError, SizeMismatch, Topology, TopologyError, Weights,
    WeightsError,
};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableNet, InnerNet, Net);

#[pyclass]
pub struct Net {
    pub(super) net: ConsumableNet,
}

#[pymethods]
impl Net {
    /// Weights are taken from `weights` (nested `[layer][source][dest]`), else all set to
    /// `default_weight`, else drawn uniformly from [-1, 1].
    #[new]
    pub fn new(
        topology: Vec<usize>,
        weights: Option<Vec<Vec<Vec<f64>>>>,
        default_weight: Option<f64>,
    ) -> PyResult<Self> {
        let topology = Topology::new(&topology)?;
        let weights = match (weights, default_weight) {
            (Some(rows), _) => Weights::from_rows(&topology, &rows)?,
            (None, Some(value)) => Weights::filled(&topology, value),
            (None, None) => Weights::random(&topology, -1.0, 1.0, &mut rand::thread_rng()),
        };

        Ok(Self {
            net: ConsumableNet::acquire(InnerNet::new(topology, weights)?),
        })
    }

    pub fn topology(&self) -> PyResult<Vec<usize>> {
        Ok(self.net.get_ref()?.topology().layers().to_vec())
    }

    pub fn export_weights(&self) -> PyResult<Vec<Vec<Vec<f64>>>> {
        Ok(self.net.get_ref()?.weights().to_rows())
    }

    pub fn process(&mut self, inputs: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.net.get_ref_mut()?.process(&inputs)?.to_vec())
    }

    pub fn run_batch(&mut self, samples: Vec<(Vec<f64>, Vec<f64>)>) -> PyResult<Vec<Vec<f64>>> {
        let net = self.net.get_ref_mut()?;
        let cases = case_set(net.topology(), samples)?;
        Ok(net.run_batch(&cases)?)
    }

    pub fn build_trainer(&mut self, learning_rate: f64) -> PyResult<Trainer> {
        Ok(Trainer {
            trainer: ConsumableTrainer::acquire(self.net.release()?.build_trainer(learning_rate)),
        })
    }

    #[staticmethod]
    pub fn calc_error(outputs: Vec<f64>, targets: Vec<f64>) -> PyResult<f64> {
        Ok(InnerNet::calc_error(&outputs, &targets)?)
    }
}

Impl_to_PyErr!(for NewNetError, ProcessError, SizeMismatch, TopologyError, WeightsError, CaseError);
