//! # QVM Router
//!
//! Greedy qubit routing: maps the logical qubits of a circuit onto a device
//! whose two-qubit operations are restricted to coupled sites, inserting
//! swaps so that every operation runs on adjacent physical qubits.

// Core modules
pub mod error;
pub mod circuit_ir;
pub mod topology;
pub mod routing;

// Re-exports for convenience
pub use error::{Result, RouterError};
pub use circuit_ir::{CircuitBuilder, ClassicalBit, Operation, QuantumCircuit, Qubit};
pub use topology::{PhysicalQubit, Position, Topology, TopologyBuilder};
pub use routing::{route_circuit_greedily, RouterConfig, SwapNetwork};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// High-level router bound to one device
#[derive(Debug, Clone)]
pub struct QubitRouter {
    topology: Topology,
    config: RouterConfig,
}

impl QubitRouter {
    /// Create a router for the given topology with the default configuration
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            config: RouterConfig::default(),
        }
    }

    /// Create a router with a custom configuration
    pub fn with_config(topology: Topology, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { topology, config })
    }

    /// Route one circuit
    pub fn route(&self, circuit: &QuantumCircuit) -> Result<SwapNetwork> {
        route_circuit_greedily(circuit, &self.topology, &self.config)
    }

    /// Route several circuits independently, stopping at the first failure
    pub fn route_all(&self, circuits: &[QuantumCircuit]) -> Result<Vec<SwapNetwork>> {
        circuits.iter().map(|circuit| self.route(circuit)).collect()
    }

    /// Get the underlying topology
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Get the configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}
