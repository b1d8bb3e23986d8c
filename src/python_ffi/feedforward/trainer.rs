use pyo3::prelude::*;

use super::case_set;
use super::net::{ConsumableNet, Net};
use crate::feedforward::{StopCriteria, TrainError, Trainer as InnerTrainer};
use crate::{Impl_to_PyErr, MakeConsumable};

MakeConsumable!(ConsumableTrainer, InnerTrainer, Trainer);

#[pyclass]
pub struct Trainer {
    pub(super) trainer: ConsumableTrainer,
}

#[pymethods]
impl Trainer {
    pub fn topology(&self) -> PyResult<Vec<usize>> {
        Ok(self.trainer.get_ref()?.net_ref().topology().layers().to_vec())
    }

    pub fn export_weights(&self) -> PyResult<Vec<Vec<Vec<f64>>>> {
        Ok(self.trainer.get_ref()?.net_ref().weights().to_rows())
    }

    pub fn learning_rate(&self) -> PyResult<f64> {
        Ok(self.trainer.get_ref()?.learning_rate())
    }

    pub fn process(&mut self, inputs: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.trainer.get_ref_mut()?.net_mut().process(&inputs)?.to_vec())
    }

    pub fn train(&mut self, inputs: Vec<f64>, targets: Vec<f64>) -> PyResult<()> {
        Ok(self.trainer.get_ref_mut()?.train(&inputs, &targets)?)
    }

    /// Returns the average error of the epoch.
    pub fn train_epoch(&mut self, samples: Vec<(Vec<f64>, Vec<f64>)>) -> PyResult<f64> {
        let trainer = self.trainer.get_ref_mut()?;
        let cases = case_set(trainer.net_ref().topology(), samples)?;
        Ok(trainer.train_epoch(&cases)?)
    }

    /// Returns `(epochs, average_error, max_iterations_reached, error_threshold_reached)`.
    pub fn train_until(
        &mut self,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
        max_iterations: usize,
        error_threshold: f64,
    ) -> PyResult<(usize, f64, bool, bool)> {
        let trainer = self.trainer.get_ref_mut()?;
        let cases = case_set(trainer.net_ref().topology(), samples)?;
        let outcome = trainer.train_until(&cases, &StopCriteria::new(max_iterations, error_threshold))?;
        Ok((
            outcome.epochs,
            outcome.average_error,
            outcome.max_iterations_reached,
            outcome.error_threshold_reached,
        ))
    }

    pub fn teardown(&mut self) -> PyResult<Net> {
        Ok(Net {
            net: ConsumableNet::acquire(self.trainer.release()?.teardown()),
        })
    }
}

Impl_to_PyErr!(for TrainError);
