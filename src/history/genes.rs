use std::fmt;

use serde::{Deserialize, Serialize};

use super::activation_functions::ActivationFunction;

/// Which section of the archetype a node gene belongs to. The derived `Ord`
/// follows declaration order, which is exactly the order sections must appear
/// in within an archetype: inputs, then hidden nodes, then outputs.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum NodeType {
    Input,
    Hidden,
    Output,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Input  => write!(f, "Input"),
            NodeType::Hidden => write!(f, "Hidden"),
            NodeType::Output => write!(f, "Output"),
        }
    }
}

/// One structural gene: a neuron that existed at some point in a population's
/// history. The `innovation` number is the gene's identity; two genes with the
/// same innovation number are the same historical gene no matter which genome
/// they appear in.
///
/// Once placed in an archetype a gene is never modified (only removed by
/// pruning); `from_combining_crossover` is set at creation time on clones
/// spliced in while merging two independently evolved gene spaces.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct NodeGene {
    pub innovation: u64,
    pub node_type: NodeType,
    pub activation_function: ActivationFunction,
    pub bias: f64,
    #[serde(default)]
    pub from_combining_crossover: bool,
}

impl NodeGene {
    pub fn new(innovation: u64, node_type: NodeType, activation_function: ActivationFunction, bias: f64) -> NodeGene {
        NodeGene {
            innovation,
            node_type,
            activation_function,
            bias,
            from_combining_crossover: false,
        }
    }
}

impl fmt::Display for NodeGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeGene({}:{}{})", self.innovation, self.node_type,
            if self.from_combining_crossover { ", combined" } else { "" })
    }
}
