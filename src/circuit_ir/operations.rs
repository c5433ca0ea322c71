//! Quantum operations and gate definitions

use crate::{ClassicalBit, Qubit, Result, RouterError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Quantum operation variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Single-qubit gate
    SingleQubit {
        gate: SingleQubitGate,
        qubit: Qubit,
        parameters: SmallVec<[f64; 2]>,
    },
    /// Two-qubit gate
    TwoQubit {
        gate: TwoQubitGate,
        control: Qubit,
        target: Qubit,
        parameters: SmallVec<[f64; 2]>,
    },
    /// Gate on three or more qubits
    MultiQubit {
        gate: MultiQubitGate,
        qubits: SmallVec<[Qubit; 4]>,
        parameters: SmallVec<[f64; 4]>,
    },
    /// Measurement operation
    Measurement {
        qubit: Qubit,
        classical: ClassicalBit,
    },
    /// Reset operation
    Reset {
        qubit: Qubit,
    },
    /// Barrier for synchronization
    Barrier {
        qubits: SmallVec<[Qubit; 4]>,
    },
}

/// Single-qubit gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SingleQubitGate {
    /// Identity gate
    I,
    /// Pauli-X (NOT) gate
    X,
    /// Pauli-Y gate
    Y,
    /// Pauli-Z gate
    Z,
    /// Hadamard gate
    H,
    /// S gate (phase)
    S,
    /// S-dagger gate
    Sdg,
    /// T gate (π/8 phase)
    T,
    /// T-dagger gate
    Tdg,
    /// Rotation around X-axis
    RX,
    /// Rotation around Y-axis
    RY,
    /// Rotation around Z-axis
    RZ,
    /// Phase gate
    P,
    /// Square root of X
    SX,
}

/// Two-qubit gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TwoQubitGate {
    /// Controlled-NOT gate
    CNOT,
    /// Controlled-Z gate
    CZ,
    /// Controlled phase gate
    CP,
    /// SWAP gate
    SWAP,
    /// iSWAP gate
    ISWAP,
    /// ZZ interaction
    ZZ,
}

/// Gates on three or more qubits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiQubitGate {
    /// Toffoli (CCX) gate
    Toffoli,
    /// Fredkin (CSWAP) gate
    Fredkin,
}

impl Operation {
    /// Get all qubits involved in this operation, in operand order
    pub fn qubits(&self) -> SmallVec<[Qubit; 4]> {
        match self {
            Self::SingleQubit { qubit, .. }
            | Self::Measurement { qubit, .. }
            | Self::Reset { qubit } => SmallVec::from_slice(&[*qubit]),
            Self::TwoQubit { control, target, .. } => SmallVec::from_slice(&[*control, *target]),
            Self::MultiQubit { qubits, .. } | Self::Barrier { qubits } => qubits.clone(),
        }
    }

    /// Number of qubits the operation acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            Self::SingleQubit { .. } | Self::Measurement { .. } | Self::Reset { .. } => 1,
            Self::TwoQubit { .. } => 2,
            Self::MultiQubit { qubits, .. } | Self::Barrier { qubits } => qubits.len(),
        }
    }

    /// Return the same operation acting on `qubits` instead.
    ///
    /// `qubits` must have exactly as many entries as the operation has operands;
    /// they replace the operands positionally.
    pub fn with_qubits(&self, qubits: &[Qubit]) -> Result<Self> {
        if qubits.len() != self.num_qubits() {
            return Err(RouterError::invalid_circuit(format!(
                "cannot rebind {}-qubit operation onto {} qubits",
                self.num_qubits(),
                qubits.len()
            )));
        }

        let rebound = match self {
            Self::SingleQubit { gate, parameters, .. } => Self::SingleQubit {
                gate: *gate,
                qubit: qubits[0],
                parameters: parameters.clone(),
            },
            Self::TwoQubit { gate, parameters, .. } => Self::TwoQubit {
                gate: *gate,
                control: qubits[0],
                target: qubits[1],
                parameters: parameters.clone(),
            },
            Self::MultiQubit { gate, parameters, .. } => Self::MultiQubit {
                gate: *gate,
                qubits: SmallVec::from_slice(qubits),
                parameters: parameters.clone(),
            },
            Self::Measurement { classical, .. } => Self::Measurement {
                qubit: qubits[0],
                classical: *classical,
            },
            Self::Reset { .. } => Self::Reset { qubit: qubits[0] },
            Self::Barrier { .. } => Self::Barrier {
                qubits: SmallVec::from_slice(qubits),
            },
        };
        Ok(rebound)
    }

    /// Check if this operation is a two-qubit gate
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, Self::TwoQubit { .. })
    }

    /// Check if this operation involves a specific qubit
    pub fn involves_qubit(&self, qubit: Qubit) -> bool {
        self.qubits().contains(&qubit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_qubit_operation() {
        let op = Operation::SingleQubit {
            gate: SingleQubitGate::X,
            qubit: Qubit(0),
            parameters: SmallVec::new(),
        };

        let expected: SmallVec<[Qubit; 4]> = SmallVec::from_slice(&[Qubit(0)]);
        assert_eq!(op.qubits(), expected);
        assert!(op.involves_qubit(Qubit(0)));
        assert!(!op.involves_qubit(Qubit(1)));
        assert!(!op.is_two_qubit());
    }

    #[test]
    fn test_two_qubit_operation() {
        let op = Operation::TwoQubit {
            gate: TwoQubitGate::CNOT,
            control: Qubit(0),
            target: Qubit(1),
            parameters: SmallVec::new(),
        };

        let expected: SmallVec<[Qubit; 4]> = SmallVec::from_slice(&[Qubit(0), Qubit(1)]);
        assert_eq!(op.qubits(), expected);
        assert_eq!(op.num_qubits(), 2);
        assert!(op.is_two_qubit());
    }

    #[test]
    fn test_with_qubits_keeps_gate_and_parameters() {
        let op = Operation::TwoQubit {
            gate: TwoQubitGate::CP,
            control: Qubit(0),
            target: Qubit(1),
            parameters: SmallVec::from_slice(&[0.25]),
        };

        let rebound = op.with_qubits(&[Qubit(7), Qubit(3)]).unwrap();
        match rebound {
            Operation::TwoQubit { gate, control, target, parameters } => {
                assert_eq!(gate, TwoQubitGate::CP);
                assert_eq!(control, Qubit(7));
                assert_eq!(target, Qubit(3));
                assert_eq!(parameters.as_slice(), &[0.25]);
            }
            other => panic!("Expected two-qubit gate, got {:?}", other),
        }
    }

    #[test]
    fn test_with_qubits_rejects_wrong_arity() {
        let op = Operation::Measurement {
            qubit: Qubit(0),
            classical: ClassicalBit(0),
        };
        assert!(op.with_qubits(&[Qubit(1), Qubit(2)]).is_err());
    }
}
