//! N-layer feedforward neural network with online backpropagation.
//!
//! The numeric core lives in [`feedforward`]: a [`feedforward::Net`] evaluates inputs,
//! [`feedforward::Net::build_trainer`] turns it into a [`feedforward::Trainer`] that
//! updates weights one case at a time and runs epochs until a stop condition fires.
//!
//! Everything else feeds the core or reports on it:
//!
//! - `config`: JSON run configuration
//! - `data`: case input files and the flat weight dump
//! - `report`: text for configuration echo, stop reason and truth table
//! - `error`: crate error type
//!
//! With the `python` feature the core is also exposed as a Python extension module.

pub mod config;
pub mod data;
pub mod error;
pub mod feedforward;
pub mod report;

#[cfg(feature = "python")]
mod python_ffi;

pub use error::{Error, Result};
