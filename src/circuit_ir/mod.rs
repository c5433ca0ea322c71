//! Quantum circuit intermediate representation
//!
//! Provides the circuit data model consumed by the router: qubits, operations,
//! circuits, and the reorder-aware dependency DAG built from them.

pub mod builder;
pub mod dag;
pub mod operations;

pub use builder::*;
pub use dag::*;
pub use operations::*;

use crate::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Logical qubit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Qubit(pub usize);

impl Qubit {
    /// Create a new qubit with the given index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the qubit index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for Qubit {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Classical bit identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassicalBit(pub usize);

impl ClassicalBit {
    /// Create a new classical bit with the given index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the classical bit index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ClassicalBit {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Quantum circuit: an ordered list of operations over a fixed qubit register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantumCircuit {
    /// Circuit name/identifier
    pub name: String,
    /// Number of qubits
    pub num_qubits: usize,
    /// Number of classical bits
    pub num_classical: usize,
    /// Operations in the circuit
    pub operations: Vec<Operation>,
}

impl QuantumCircuit {
    /// Create a new empty quantum circuit
    pub fn new(name: impl Into<String>, num_qubits: usize, num_classical: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_classical,
            operations: Vec::new(),
        }
    }

    /// Add an operation to the circuit
    pub fn add_operation(&mut self, operation: Operation) -> Result<()> {
        self.validate_operation(&operation)?;
        self.operations.push(operation);
        Ok(())
    }

    /// Validate an operation against circuit constraints
    pub fn validate_operation(&self, operation: &Operation) -> Result<()> {
        let qubits = operation.qubits();
        for (i, qubit) in qubits.iter().enumerate() {
            if qubit.index() >= self.num_qubits {
                return Err(RouterError::invalid_circuit(format!(
                    "Qubit {} out of range for circuit with {} qubits",
                    qubit.index(),
                    self.num_qubits
                )));
            }
            if qubits[..i].contains(qubit) {
                return Err(RouterError::invalid_circuit(format!(
                    "Qubit {} used twice in one operation",
                    qubit.index()
                )));
            }
        }

        if let Operation::Measurement { classical, .. } = operation {
            if classical.index() >= self.num_classical {
                return Err(RouterError::invalid_circuit(
                    "Classical bit out of range".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Validate every operation in the circuit
    pub fn validate(&self) -> Result<()> {
        self.operations
            .iter()
            .try_for_each(|op| self.validate_operation(op))
    }

    /// The full logical qubit register, used or not
    pub fn qubits(&self) -> BTreeSet<Qubit> {
        (0..self.num_qubits).map(Qubit).collect()
    }

    /// Get all qubits used by at least one operation
    pub fn used_qubits(&self) -> Vec<Qubit> {
        let used: BTreeSet<Qubit> = self
            .operations
            .iter()
            .flat_map(|op| op.qubits())
            .collect();
        used.into_iter().collect()
    }

    /// Get two-qubit operation count
    pub fn two_qubit_gate_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_two_qubit()).count()
    }

    /// Build the dependency DAG of this circuit
    pub fn to_dag(&self, can_reorder: ReorderPredicate) -> CircuitDag {
        CircuitDag::from_circuit(self, can_reorder)
    }
}

impl Default for QuantumCircuit {
    fn default() -> Self {
        Self::new("circuit", 0, 0)
    }
}
