//! Reorder-aware dependency DAG over circuit operations
//!
//! An edge `a -> b` means `a` comes before `b` in the circuit and the two may
//! not be exchanged. Which pairs may be exchanged is decided by a
//! [`ReorderPredicate`]; by default operations commute only when they act on
//! disjoint qubits.

use crate::circuit_ir::{Operation, QuantumCircuit, Qubit};
use petgraph::graph::UnGraph;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction::{Incoming, Outgoing};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Decides whether two operations may be executed in either order
pub type ReorderPredicate = fn(&Operation, &Operation) -> bool;

/// Default reorder predicate: operations on disjoint qubits commute.
pub fn disjoint_qubits(a: &Operation, b: &Operation) -> bool {
    let a_qubits = a.qubits();
    b.qubits().iter().all(|q| !a_qubits.contains(q))
}

#[derive(Debug, Clone)]
struct DagNode {
    /// Insertion position; ascending positions form a topological order.
    position: usize,
    operation: Operation,
}

/// Dependency DAG of the operations that still have to be executed
#[derive(Debug, Clone)]
pub struct CircuitDag {
    graph: StableDiGraph<DagNode, ()>,
    qubits: BTreeSet<Qubit>,
    can_reorder: ReorderPredicate,
    next_position: usize,
}

/// One readiness layer of two-qubit operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlice {
    /// Logical qubit pairs acted on by the layer, each unordered pair once
    pub edges: Vec<(Qubit, Qubit)>,
}

impl TimeSlice {
    /// Qubits touched by the layer
    pub fn qubits(&self) -> BTreeSet<Qubit> {
        self.edges.iter().flat_map(|&(a, b)| [a, b]).collect()
    }

    /// Whether the layer contains the unordered pair `{a, b}`
    pub fn contains_edge(&self, a: Qubit, b: Qubit) -> bool {
        self.edges
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Interaction graph of the layer, with `extra` qubits added as isolated
    /// nodes. Nodes are inserted in ascending qubit order.
    pub fn to_graph(&self, extra: impl IntoIterator<Item = Qubit>) -> UnGraph<Qubit, ()> {
        let mut qubits = self.qubits();
        qubits.extend(extra);

        let mut graph = UnGraph::with_capacity(qubits.len(), self.edges.len());
        let nodes: HashMap<Qubit, _> = qubits
            .into_iter()
            .map(|q| (q, graph.add_node(q)))
            .collect();
        for (a, b) in &self.edges {
            graph.update_edge(nodes[a], nodes[b], ());
        }
        graph
    }
}

impl CircuitDag {
    /// Create an empty DAG over the given qubit register
    pub fn new(qubits: BTreeSet<Qubit>, can_reorder: ReorderPredicate) -> Self {
        Self {
            graph: StableDiGraph::new(),
            qubits,
            can_reorder,
            next_position: 0,
        }
    }

    /// Build the DAG of a circuit; the qubit register is the circuit's full register
    pub fn from_circuit(circuit: &QuantumCircuit, can_reorder: ReorderPredicate) -> Self {
        let mut dag = Self::new(circuit.qubits(), can_reorder);
        for operation in &circuit.operations {
            dag.append(operation.clone());
        }
        dag
    }

    /// Build a DAG whose register is exactly the qubits used by `operations`
    pub fn from_operations(
        operations: impl IntoIterator<Item = Operation>,
        can_reorder: ReorderPredicate,
    ) -> Self {
        let mut dag = Self::new(BTreeSet::new(), can_reorder);
        for operation in operations {
            dag.append(operation);
        }
        dag
    }

    /// Append an operation after everything already in the DAG
    pub fn append(&mut self, operation: Operation) -> NodeIndex {
        let predecessors: Vec<NodeIndex> = self
            .ordered_nodes()
            .into_iter()
            .filter(|&node| !(self.can_reorder)(&self.graph[node].operation, &operation))
            .collect();

        self.qubits.extend(operation.qubits());
        let node = self.graph.add_node(DagNode {
            position: self.next_position,
            operation,
        });
        self.next_position += 1;

        for predecessor in predecessors {
            self.graph.add_edge(predecessor, node, ());
        }
        node
    }

    /// Number of remaining operations
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether every operation has been removed
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The qubit register of the DAG
    pub fn all_qubits(&self) -> &BTreeSet<Qubit> {
        &self.qubits
    }

    /// Remaining nodes in circuit order, which is a topological order
    pub fn ordered_nodes(&self) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.node_indices().collect();
        nodes.sort_by_key(|&node| self.graph[node].position);
        nodes
    }

    /// Operation stored at `node`
    pub fn operation(&self, node: NodeIndex) -> Option<&Operation> {
        self.graph.node_weight(node).map(|n| &n.operation)
    }

    /// Whether `b` directly depends on `a`
    pub fn has_edge(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }

    /// Direct prerequisites of `node`
    pub fn predecessors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(node, Incoming).collect()
    }

    /// Collect, in circuit order, every node that can run before the first
    /// blocker on its branch.
    ///
    /// A node is returned when `is_blocker` is false for it and for all of its
    /// ancestors. Once a blocker is met, it and all of its descendants are
    /// excluded.
    pub fn findall_nodes_until_blocked<F>(&self, mut is_blocker: F) -> Vec<NodeIndex>
    where
        F: FnMut(&Operation) -> bool,
    {
        let mut blocked: HashSet<NodeIndex> = HashSet::new();
        let mut found = Vec::new();

        for node in self.ordered_nodes() {
            if blocked.contains(&node) {
                continue;
            }
            if !is_blocker(&self.graph[node].operation) {
                found.push(node);
                continue;
            }

            let mut worklist = vec![node];
            while let Some(current) = worklist.pop() {
                if blocked.insert(current) {
                    worklist.extend(self.graph.neighbors_directed(current, Outgoing));
                }
            }
        }
        found
    }

    /// Remove an executed node and its edges
    pub fn remove_node(&mut self, node: NodeIndex) -> Option<Operation> {
        self.graph.remove_node(node).map(|n| n.operation)
    }

    /// Partition the remaining two-qubit operations into readiness layers.
    ///
    /// The layer of an operation is the largest number of two-qubit
    /// operations on any chain of its ancestors; single-qubit operations do
    /// not add a layer. Layers without two-qubit operations are dropped.
    pub fn time_slices(&self) -> Vec<TimeSlice> {
        let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(self.len());
        let mut layers: BTreeMap<usize, TimeSlice> = BTreeMap::new();

        for node in self.ordered_nodes() {
            let level = self
                .graph
                .neighbors_directed(node, Incoming)
                .map(|pred| depth[&pred] + usize::from(self.graph[pred].operation.num_qubits() > 1))
                .max()
                .unwrap_or(0);
            depth.insert(node, level);

            let qubits = self.graph[node].operation.qubits();
            if let [a, b] = qubits.as_slice() {
                let slice = layers.entry(level).or_default();
                if !slice.contains_edge(*a, *b) {
                    slice.edges.push((*a, *b));
                }
            }
        }
        layers.into_values().collect()
    }
}
