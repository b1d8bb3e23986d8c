//! Feedforward neural network with online backpropagation-based gradient descent training

mod activation;
mod cases;
mod convergence;
mod net;
mod topology;
mod trainer;
mod weights;

pub use activation::*;
pub use cases::*;
pub use convergence::*;
pub use net::*;
pub use topology::*;
pub use trainer::*;
pub use weights::*;
