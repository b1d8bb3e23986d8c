pub mod net;
pub mod trainer;

use pyo3::{prelude::*, wrap_pymodule};

use crate::feedforward::{Case, CaseSet, Topology};

#[pymodule]
fn feedforward(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<net::Net>()?;
    m.add_class::<trainer::Trainer>()?;
    Ok(())
}

pub fn construct_module(m: &PyModule) -> PyResult<()> {
    m.add_wrapped(wrap_pymodule!(feedforward))?;
    Ok(())
}

/// Builds a case set out of `(inputs, targets)` pairs coming from Python.
pub(super) fn case_set(topology: &Topology, samples: Vec<(Vec<f64>, Vec<f64>)>) -> PyResult<CaseSet> {
    let cases = samples
        .into_iter()
        .map(|(inputs, targets)| Case::new(inputs, targets))
        .collect();
    Ok(CaseSet::new(topology, cases)?)
}
