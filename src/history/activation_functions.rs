use serde::{Deserialize, Serialize};

/// The activation function a node gene asks its phenotype to use. This crate
/// only records the choice on a gene; applying the function is the network
/// evaluator's business.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ActivationFunction {
    None,       // f(x) = x, i.e. Linear
    Sigmoid,    // f(x) = 1.0 / (1.0 + exp(-x))
    ReLU,       // f(x) = if x > 0 { x } else { 0.0 }
    LReLU,      // f(x) = if x > 0 { x } else ( 0.1 * x )
    Tanh,       // f(x) = tanh(x) = (exp(x) - exp(-x)) / (exp(x) + exp(-x))
}
