//! Python FFI, built with the `python` feature
use pyo3::prelude::*;

pub mod feedforward;
mod gen_macros;

#[pymodule]
fn nlayer(_py: Python, m: &PyModule) -> PyResult<()> {
    feedforward::construct_module(m)?;
    Ok(())
}
