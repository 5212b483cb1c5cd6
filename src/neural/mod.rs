//! Neural network module for sweeper brains.
//!
//! Implements fixed-topology feedforward networks with:
//! - Dense layer representation
//! - Sigmoid activation with configurable response
//! - Flat weight-vector replacement for genetic evolution

mod network;

pub use network::{Layer, Network, NetworkError};
