//! Checks on routed output

use crate::circuit_ir::{QuantumCircuit, ReorderPredicate};
use crate::routing::{PhysicalOperation, SwapNetwork};
use crate::topology::Topology;
use log::debug;

/// Whether every step acts on device sites and every two-site step on a
/// device edge.
pub fn ops_are_consistent_with_device_graph<'a>(
    ops: impl IntoIterator<Item = &'a PhysicalOperation>,
    topology: &Topology,
) -> bool {
    ops.into_iter().all(|op| {
        let sites = op.sites();
        if !sites.iter().all(|&p| topology.contains(p)) {
            return false;
        }
        match sites.as_slice() {
            [a, b] => topology.are_connected(*a, *b),
            _ => true,
        }
    })
}

/// Whether `network` is a faithful routing of `circuit` on `topology`.
///
/// Replays the network from its initial mapping and checks that each gate
/// runs on the sites currently holding its operands, that it was free to run
/// at that point under `can_reorder`, and that every circuit operation runs
/// exactly once.
pub fn is_valid_routing(
    circuit: &QuantumCircuit,
    network: &SwapNetwork,
    topology: &Topology,
    can_reorder: ReorderPredicate,
) -> bool {
    if !ops_are_consistent_with_device_graph(&network.operations, topology) {
        debug!("routed operations do not fit the device graph");
        return false;
    }

    let mut mapping = network.initial_mapping.clone();
    let mut remaining = circuit.to_dag(can_reorder);

    for op in &network.operations {
        match op {
            PhysicalOperation::Swap(a, b) => {
                let la = mapping.remove(a);
                let lb = mapping.remove(b);
                if let Some(l) = la {
                    mapping.insert(*b, l);
                }
                if let Some(l) = lb {
                    mapping.insert(*a, l);
                }
            }
            PhysicalOperation::Gate { operation, sites } => {
                let operands = operation.qubits();
                let placed = operands.len() == sites.len()
                    && operands
                        .iter()
                        .zip(sites.iter())
                        .all(|(l, p)| mapping.get(p) == Some(l));
                if !placed {
                    debug!("{:?} does not run on the sites of its operands", operation);
                    return false;
                }

                let ready = remaining.ordered_nodes().into_iter().find(|&node| {
                    remaining.predecessors(node).is_empty()
                        && remaining.operation(node) == Some(operation)
                });
                match ready {
                    Some(node) => {
                        remaining.remove_node(node);
                    }
                    None => {
                        debug!("{:?} runs out of order or is not in the circuit", operation);
                        return false;
                    }
                }
            }
        }
    }

    remaining.is_empty()
}
