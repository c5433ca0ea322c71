//! Circuit builder for programmatic circuit construction

use crate::circuit_ir::{
    ClassicalBit, MultiQubitGate, Operation, QuantumCircuit, Qubit, SingleQubitGate,
    TwoQubitGate,
};
use crate::Result;
use smallvec::SmallVec;
use std::f64::consts::PI;

/// Builder for constructing quantum circuits programmatically
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(name: impl Into<String>, num_qubits: usize, num_classical: usize) -> Self {
        Self {
            circuit: QuantumCircuit::new(name, num_qubits, num_classical),
        }
    }

    /// Build the final circuit
    pub fn build(self) -> QuantumCircuit {
        self.circuit
    }

    /// Append an arbitrary operation
    pub fn operation(mut self, operation: Operation) -> Result<Self> {
        self.circuit.add_operation(operation)?;
        Ok(self)
    }

    fn single(self, gate: SingleQubitGate, qubit: Qubit, parameters: &[f64]) -> Result<Self> {
        self.operation(Operation::SingleQubit {
            gate,
            qubit,
            parameters: SmallVec::from_slice(parameters),
        })
    }

    fn two(self, gate: TwoQubitGate, control: Qubit, target: Qubit, parameters: &[f64]) -> Result<Self> {
        self.operation(Operation::TwoQubit {
            gate,
            control,
            target,
            parameters: SmallVec::from_slice(parameters),
        })
    }

    // === Single-qubit gates ===

    /// Add an X (NOT) gate
    pub fn x(self, qubit: impl Into<Qubit>) -> Result<Self> {
        self.single(SingleQubitGate::X, qubit.into(), &[])
    }

    /// Add a Z gate
    pub fn z(self, qubit: impl Into<Qubit>) -> Result<Self> {
        self.single(SingleQubitGate::Z, qubit.into(), &[])
    }

    /// Add a Hadamard gate
    pub fn h(self, qubit: impl Into<Qubit>) -> Result<Self> {
        self.single(SingleQubitGate::H, qubit.into(), &[])
    }

    /// Add a T gate
    pub fn t(self, qubit: impl Into<Qubit>) -> Result<Self> {
        self.single(SingleQubitGate::T, qubit.into(), &[])
    }

    /// Add an RZ rotation gate
    pub fn rz(self, angle: f64, qubit: impl Into<Qubit>) -> Result<Self> {
        self.single(SingleQubitGate::RZ, qubit.into(), &[angle])
    }

    // === Two-qubit gates ===

    /// Add a CNOT gate
    pub fn cx(self, control: impl Into<Qubit>, target: impl Into<Qubit>) -> Result<Self> {
        self.two(TwoQubitGate::CNOT, control.into(), target.into(), &[])
    }

    /// Add a CZ gate
    pub fn cz(self, control: impl Into<Qubit>, target: impl Into<Qubit>) -> Result<Self> {
        self.two(TwoQubitGate::CZ, control.into(), target.into(), &[])
    }

    /// Add a ZZ interaction
    pub fn zz(self, qubit1: impl Into<Qubit>, qubit2: impl Into<Qubit>) -> Result<Self> {
        self.two(TwoQubitGate::ZZ, qubit1.into(), qubit2.into(), &[])
    }

    /// Add a SWAP gate
    pub fn swap(self, qubit1: impl Into<Qubit>, qubit2: impl Into<Qubit>) -> Result<Self> {
        self.two(TwoQubitGate::SWAP, qubit1.into(), qubit2.into(), &[])
    }

    /// Add a controlled-phase gate
    pub fn cp(self, angle: f64, control: impl Into<Qubit>, target: impl Into<Qubit>) -> Result<Self> {
        self.two(TwoQubitGate::CP, control.into(), target.into(), &[angle])
    }

    /// Add a Toffoli gate
    pub fn ccx(self, control1: impl Into<Qubit>, control2: impl Into<Qubit>, target: impl Into<Qubit>) -> Result<Self> {
        self.operation(Operation::MultiQubit {
            gate: MultiQubitGate::Toffoli,
            qubits: SmallVec::from_slice(&[control1.into(), control2.into(), target.into()]),
            parameters: SmallVec::new(),
        })
    }

    // === Measurement and control ===

    /// Add a measurement operation
    pub fn measure(self, qubit: impl Into<Qubit>, classical: impl Into<ClassicalBit>) -> Result<Self> {
        self.operation(Operation::Measurement {
            qubit: qubit.into(),
            classical: classical.into(),
        })
    }

    /// Add measurements for all qubits
    pub fn measure_all(mut self) -> Result<Self> {
        let min_bits = self.circuit.num_qubits.min(self.circuit.num_classical);
        for i in 0..min_bits {
            self = self.measure(i, i)?;
        }
        Ok(self)
    }

    /// Add a reset operation
    pub fn reset(self, qubit: impl Into<Qubit>) -> Result<Self> {
        self.operation(Operation::Reset { qubit: qubit.into() })
    }

    // === Higher-level operations ===

    /// Create a Bell state preparation circuit
    pub fn bell_state(self, qubit1: impl Into<Qubit>, qubit2: impl Into<Qubit>) -> Result<Self> {
        let q1 = qubit1.into();
        let q2 = qubit2.into();
        self.h(q1)?.cx(q1, q2)
    }

    /// Create a GHZ state preparation circuit
    pub fn ghz_state(mut self, qubits: &[Qubit]) -> Result<Self> {
        let Some((&first, rest)) = qubits.split_first() else {
            return Ok(self);
        };

        self = self.h(first)?;
        for &target in rest {
            self = self.cx(first, target)?;
        }
        Ok(self)
    }

    /// Add a quantum Fourier transform
    pub fn qft(mut self, qubits: &[Qubit]) -> Result<Self> {
        let n = qubits.len();

        for i in 0..n {
            self = self.h(qubits[i])?;
            for j in (i + 1)..n {
                let angle = PI / (1u64 << (j - i)) as f64;
                self = self.cp(angle, qubits[j], qubits[i])?;
            }
        }

        for i in 0..(n / 2) {
            self = self.swap(qubits[i], qubits[n - 1 - i])?;
        }
        Ok(self)
    }
}
