//! Neural network structure and evaluation.

use crate::config::NetworkConfig;
use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors surfaced by network operations.
///
/// Both are recoverable: a failed evaluation skips that sweeper's tick and
/// a failed replacement leaves the previous weights intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// `evaluate` was called with the wrong number of inputs
    InputSizeMismatch { expected: usize, found: usize },
    /// `replace_weights` was called with a vector of the wrong length
    WeightSizeMismatch { expected: usize, found: usize },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputSizeMismatch { expected, found } => {
                write!(f, "input size mismatch: expected {}, found {}", expected, found)
            }
            Self::WeightSizeMismatch { expected, found } => {
                write!(f, "weight size mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

/// A single layer in the network.
///
/// One row per neuron; `thresholds` holds each neuron's extra weight, added
/// to the net input alongside the configured bias constant.
#[derive(Clone, Debug)]
pub struct Layer {
    pub weights: Array2<f64>,
    pub thresholds: Array1<f64>,
}

impl Layer {
    /// Create a layer of `neurons` neurons taking `inputs` inputs each,
    /// with all weights drawn uniformly from [-1, 1]
    fn random(neurons: usize, inputs: usize, rng: &mut impl Rng) -> Self {
        Self {
            weights: Array2::from_shape_fn((neurons, inputs), |_| rng.gen_range(-1.0..=1.0)),
            thresholds: Array1::from_shape_fn(neurons, |_| rng.gen_range(-1.0..=1.0)),
        }
    }

    /// Neuron count for this layer
    fn neurons(&self) -> usize {
        self.weights.nrows()
    }

    /// Weights per neuron including the threshold entry
    fn weights_per_neuron(&self) -> usize {
        self.weights.ncols() + 1
    }
}

impl Serialize for Layer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let shape = self.weights.shape();
        let weights_data: Vec<f64> = self.weights.iter().copied().collect();
        let thresholds_data: Vec<f64> = self.thresholds.iter().copied().collect();

        let mut state = serializer.serialize_struct("Layer", 3)?;
        state.serialize_field("shape", &[shape[0], shape[1]])?;
        state.serialize_field("weights", &weights_data)?;
        state.serialize_field("thresholds", &thresholds_data)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Layer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct LayerData {
            shape: [usize; 2],
            weights: Vec<f64>,
            thresholds: Vec<f64>,
        }

        let data = LayerData::deserialize(deserializer)?;
        let weights = Array2::from_shape_vec((data.shape[0], data.shape[1]), data.weights)
            .map_err(serde::de::Error::custom)?;
        let thresholds = Array1::from_vec(data.thresholds);

        Ok(Layer { weights, thresholds })
    }
}

/// Fixed-topology feedforward network.
///
/// Topology is set at construction and never changes; evolution only
/// replaces weight values through [`Network::replace_weights`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Network {
    /// Number of input neurons
    pub inputs: usize,
    /// Number of output neurons
    pub outputs: usize,
    /// Threshold value added to every neuron's net input
    bias: f64,
    /// Sigmoid response divisor
    activation_response: f64,
    /// Network layers: hidden layers followed by the output layer
    layers: Vec<Layer>,
}

impl Network {
    /// Create a randomly weighted network from topology configuration
    pub fn new(config: &NetworkConfig, rng: &mut impl Rng) -> Self {
        let mut layers = Vec::with_capacity(config.hidden_layers + 1);

        if config.hidden_layers > 0 {
            layers.push(Layer::random(config.neurons_per_hidden, config.inputs, rng));
            for _ in 1..config.hidden_layers {
                layers.push(Layer::random(
                    config.neurons_per_hidden,
                    config.neurons_per_hidden,
                    rng,
                ));
            }
            layers.push(Layer::random(config.outputs, config.neurons_per_hidden, rng));
        } else {
            layers.push(Layer::random(config.outputs, config.inputs, rng));
        }

        Self {
            inputs: config.inputs,
            outputs: config.outputs,
            bias: config.bias,
            activation_response: config.activation_response,
            layers,
        }
    }

    /// Run the inputs through every layer and return the output activations.
    ///
    /// Per neuron: `net = Σ w_k·x_k + threshold + bias`, squashed through
    /// the sigmoid.
    pub fn evaluate(&self, inputs: &[f64]) -> Result<Vec<f64>, NetworkError> {
        if inputs.len() != self.inputs {
            return Err(NetworkError::InputSizeMismatch {
                expected: self.inputs,
                found: inputs.len(),
            });
        }

        let mut activation = Array1::from_vec(inputs.to_vec());
        for layer in &self.layers {
            let net = layer.weights.dot(&activation) + &layer.thresholds + self.bias;
            activation = net.mapv(|x| self.sigmoid(x));
        }

        Ok(activation.to_vec())
    }

    /// Total number of weights across all neurons, thresholds included
    pub fn total_weight_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.neurons() * l.weights_per_neuron())
            .sum()
    }

    /// Overwrite every weight from a flat vector in layer-major,
    /// neuron-major, weight-index-major order (threshold last per neuron).
    ///
    /// On length mismatch the previous weights are left untouched.
    pub fn replace_weights(&mut self, flat: &[f64]) -> Result<(), NetworkError> {
        let expected = self.total_weight_count();
        if flat.len() != expected {
            return Err(NetworkError::WeightSizeMismatch {
                expected,
                found: flat.len(),
            });
        }

        let mut cursor = 0;
        for layer in &mut self.layers {
            for neuron in 0..layer.neurons() {
                for k in 0..layer.weights.ncols() {
                    layer.weights[[neuron, k]] = flat[cursor];
                    cursor += 1;
                }
                layer.thresholds[neuron] = flat[cursor];
                cursor += 1;
            }
        }

        Ok(())
    }

    /// Read every weight back out in the [`Network::replace_weights`] order
    pub fn weights(&self) -> Vec<f64> {
        let mut flat = Vec::with_capacity(self.total_weight_count());
        for layer in &self.layers {
            for neuron in 0..layer.neurons() {
                for k in 0..layer.weights.ncols() {
                    flat.push(layer.weights[[neuron, k]]);
                }
                flat.push(layer.thresholds[neuron]);
            }
        }
        flat
    }

    /// Check that no weight has gone non-finite
    pub fn is_valid(&self) -> bool {
        self.layers.iter().all(|layer| {
            layer.weights.iter().all(|w| w.is_finite())
                && layer.thresholds.iter().all(|t| t.is_finite())
        })
    }

    fn sigmoid(&self, net: f64) -> f64 {
        1.0 / (1.0 + (-net / self.activation_response).exp())
    }
}
