//! Routed output: circuit operations placed on device sites, interleaved with swaps

use crate::circuit_ir::{Operation, QuantumCircuit, Qubit, TwoQubitGate};
use crate::topology::PhysicalQubit;
use crate::Result;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// One step of a routed circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalOperation {
    /// A circuit operation executed on `sites`, positionally matching its operands
    Gate {
        operation: Operation,
        sites: SmallVec<[PhysicalQubit; 4]>,
    },
    /// Exchange of the contents of two adjacent sites
    Swap(PhysicalQubit, PhysicalQubit),
}

impl PhysicalOperation {
    /// Sites the step acts on
    pub fn sites(&self) -> SmallVec<[PhysicalQubit; 4]> {
        match self {
            Self::Gate { sites, .. } => sites.clone(),
            Self::Swap(a, b) => SmallVec::from_slice(&[*a, *b]),
        }
    }

    /// Whether the step is an inserted swap
    pub fn is_swap(&self) -> bool {
        matches!(self, Self::Swap(..))
    }

    /// The step as an operation on qubits numbered by site index
    pub fn to_operation(&self) -> Result<Operation> {
        match self {
            Self::Gate { operation, sites } => {
                let qubits: SmallVec<[Qubit; 4]> = sites.iter().map(|p| Qubit(p.index())).collect();
                operation.with_qubits(&qubits)
            }
            Self::Swap(a, b) => Ok(Operation::TwoQubit {
                gate: TwoQubitGate::SWAP,
                control: Qubit(a.index()),
                target: Qubit(b.index()),
                parameters: SmallVec::new(),
            }),
        }
    }
}

/// A routed circuit together with the placement it starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapNetwork {
    /// Routed steps in execution order
    pub operations: Vec<PhysicalOperation>,
    /// Physical-to-logical placement before the first step
    pub initial_mapping: BTreeMap<PhysicalQubit, Qubit>,
}

impl SwapNetwork {
    pub fn new(operations: Vec<PhysicalOperation>, initial_mapping: BTreeMap<PhysicalQubit, Qubit>) -> Self {
        Self {
            operations,
            initial_mapping,
        }
    }

    /// Number of inserted swaps
    pub fn swap_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_swap()).count()
    }

    /// Placement after every swap has been applied
    pub fn final_mapping(&self) -> BTreeMap<PhysicalQubit, Qubit> {
        let mut mapping = self.initial_mapping.clone();
        for op in &self.operations {
            if let PhysicalOperation::Swap(a, b) = op {
                let la = mapping.remove(a);
                let lb = mapping.remove(b);
                if let Some(l) = la {
                    mapping.insert(*b, l);
                }
                if let Some(l) = lb {
                    mapping.insert(*a, l);
                }
            }
        }
        mapping
    }

    /// The routed circuit over `num_sites` qubits, one per device site,
    /// with swaps written as `SWAP` gates.
    pub fn to_physical_circuit(&self, name: impl Into<String>, num_sites: usize, num_classical: usize) -> Result<QuantumCircuit> {
        let mut circuit = QuantumCircuit::new(name, num_sites, num_classical);
        for op in &self.operations {
            circuit.add_operation(op.to_operation()?)?;
        }
        Ok(circuit)
    }
}
