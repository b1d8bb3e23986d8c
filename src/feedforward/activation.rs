use serde::{Deserialize, Serialize};
use std::fmt;

/// Neuron activation function.
///
/// Only the sigmoid family is supported; the enum is what configuration
/// files name when choosing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Logistic sigmoid, `1 / (1 + exp(-x))`.
    #[default]
    Sigmoid,
}

impl Activation {
    /// Applies the function to a weighted sum.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid(x),
        }
    }

    /// First derivative evaluated at the weighted sum `x`.
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => sigmoid_der_s(sigmoid(x)),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Activation::Sigmoid => write!(f, "sigmoid"),
        }
    }
}

/// Sigmoid function.
/// Implements the formula:
/// `1 / (1 + exp(-x))`.
///
/// Negative arguments go through `exp(x) / (1 + exp(x))` so that `exp` never
/// overflows.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Sigmoid derivative function, expressed in terms of sigmoid itself.
/// Implements the formula:
/// `s * (1 - s)`.
pub fn sigmoid_der_s(s: f64) -> f64 {
    s * (1.0 - s)
}
