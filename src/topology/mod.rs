//! Hardware topology abstraction
//!
//! Provides the device graph the router places qubits on: physical qubits as
//! vertices, couplings that admit a two-qubit operation as undirected edges.

pub mod loaders;

pub use loaders::*;

use crate::{Result, RouterError};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// Physical qubit (device site) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PhysicalQubit(pub usize);

impl PhysicalQubit {
    /// Create a new physical qubit with the given index
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the physical qubit index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for PhysicalQubit {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for PhysicalQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// 2D position in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculate Manhattan distance to another position
    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

/// Quantum hardware topology representation
#[derive(Debug, Clone)]
pub struct Topology {
    /// Graph representation of qubit connectivity
    graph: UnGraph<PhysicalQubit, ()>,
    /// Mapping from qubit to graph node
    qubit_to_node: HashMap<PhysicalQubit, NodeIndex>,
    /// Physical positions of qubits (if available)
    positions: HashMap<PhysicalQubit, Position>,
    /// Topology metadata
    metadata: TopologyMetadata,
}

/// Topology metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyMetadata {
    /// Topology name
    pub name: String,
    /// Physical dimensions
    pub dimensions: Option<(usize, usize)>,
    /// Topology type classification
    pub topology_type: TopologyType,
}

/// Classification of topology types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TopologyType {
    #[default]
    /// Grid/lattice topology
    Grid,
    /// Linear chain
    Linear,
    /// Ring topology
    Ring,
    /// Star topology
    Star,
    /// Fully connected
    Complete,
    /// Custom/irregular topology
    Custom,
}

impl Topology {
    /// Create a new empty topology
    pub fn new() -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            qubit_to_node: HashMap::new(),
            positions: HashMap::new(),
            metadata: TopologyMetadata::default(),
        }
    }

    /// Add a qubit to the topology
    pub fn add_qubit(&mut self, qubit: PhysicalQubit, position: Option<Position>) -> Result<()> {
        if self.qubit_to_node.contains_key(&qubit) {
            return Err(RouterError::topology_error(format!(
                "Qubit {} already exists in topology",
                qubit
            )));
        }

        let node_idx = self.graph.add_node(qubit);
        self.qubit_to_node.insert(qubit, node_idx);
        if let Some(pos) = position {
            self.positions.insert(qubit, pos);
        }
        Ok(())
    }

    /// Add a connection between two qubits. Adding an existing connection is a no-op.
    pub fn add_connection(&mut self, qubit1: PhysicalQubit, qubit2: PhysicalQubit) -> Result<()> {
        if qubit1 == qubit2 {
            return Err(RouterError::topology_error(format!(
                "Qubit {} cannot be connected to itself",
                qubit1
            )));
        }
        let node1 = self.node(qubit1)?;
        let node2 = self.node(qubit2)?;

        self.graph.update_edge(node1, node2, ());
        Ok(())
    }

    fn node(&self, qubit: PhysicalQubit) -> Result<NodeIndex> {
        self.qubit_to_node
            .get(&qubit)
            .copied()
            .ok_or_else(|| RouterError::topology_error(format!("Qubit {} not found", qubit)))
    }

    /// Underlying graph, for graph algorithms
    pub fn graph(&self) -> &UnGraph<PhysicalQubit, ()> {
        &self.graph
    }

    /// Get the number of qubits in the topology
    pub fn qubit_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of connections in the topology
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check whether a qubit belongs to the topology
    pub fn contains(&self, qubit: PhysicalQubit) -> bool {
        self.qubit_to_node.contains_key(&qubit)
    }

    /// Check if two qubits are connected
    pub fn are_connected(&self, qubit1: PhysicalQubit, qubit2: PhysicalQubit) -> bool {
        match (self.qubit_to_node.get(&qubit1), self.qubit_to_node.get(&qubit2)) {
            (Some(&node1), Some(&node2)) => self.graph.find_edge(node1, node2).is_some(),
            _ => false,
        }
    }

    /// Get all qubits connected to a given qubit, in ascending order
    pub fn neighbors(&self, qubit: PhysicalQubit) -> Vec<PhysicalQubit> {
        let Some(&node) = self.qubit_to_node.get(&qubit) else {
            return Vec::new();
        };
        let mut neighbors: Vec<PhysicalQubit> =
            self.graph.neighbors(node).map(|n| self.graph[n]).collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Get all qubits in the topology, in ascending order
    pub fn qubits(&self) -> Vec<PhysicalQubit> {
        let mut qubits: Vec<PhysicalQubit> = self.qubit_to_node.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    /// All connections as `(low, high)` pairs, in ascending order
    pub fn edges(&self) -> Vec<(PhysicalQubit, PhysicalQubit)> {
        let mut edges: Vec<(PhysicalQubit, PhysicalQubit)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a], self.graph[b]);
                if a < b { (a, b) } else { (b, a) }
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Calculate a shortest path between two qubits.
    ///
    /// Breadth-first with neighbours visited in ascending order, so the same
    /// path is returned on every call.
    pub fn shortest_path(&self, start: PhysicalQubit, end: PhysicalQubit) -> Option<Vec<PhysicalQubit>> {
        if !self.contains(start) || !self.contains(end) {
            return None;
        }

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut parent: HashMap<PhysicalQubit, PhysicalQubit> = HashMap::new();

        queue.push_back(start);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            if current == end {
                let mut path = vec![current];
                let mut node = current;
                while let Some(&previous) = parent.get(&node) {
                    path.push(previous);
                    node = previous;
                }
                path.reverse();
                return Some(path);
            }

            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    parent.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    /// Whether every qubit can reach every other qubit
    pub fn is_connected(&self) -> bool {
        connected_components(&self.graph) <= 1
    }

    /// Calculate connectivity degree (average number of neighbors)
    pub fn connectivity_degree(&self) -> f64 {
        if self.qubit_count() == 0 {
            return 0.0;
        }
        2.0 * self.connection_count() as f64 / self.qubit_count() as f64
    }

    /// Get qubit position
    pub fn position(&self, qubit: PhysicalQubit) -> Option<Position> {
        self.positions.get(&qubit).copied()
    }

    /// Get topology metadata
    pub fn metadata(&self) -> &TopologyMetadata {
        &self.metadata
    }

    /// Set topology metadata
    pub fn set_metadata(&mut self, metadata: TopologyMetadata) {
        self.metadata = metadata;
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating common topology patterns
pub struct TopologyBuilder;

impl TopologyBuilder {
    /// Create a grid topology
    pub fn grid(width: usize, height: usize) -> Topology {
        TopologyLoader::new().create_grid(width, height)
    }

    /// Create a linear topology
    pub fn linear(size: usize) -> Topology {
        TopologyLoader::new().create_linear(size)
    }

    /// Create a ring topology; fewer than 3 qubits yields a line
    pub fn ring(size: usize) -> Topology {
        TopologyLoader::new()
            .create_ring(size)
            .unwrap_or_else(|_| Self::linear(size))
    }

    /// Create a star topology; qubit 0 is the hub
    pub fn star(size: usize) -> Topology {
        TopologyLoader::new().create_star(size).unwrap_or_default()
    }

    /// Create a fully connected topology
    pub fn complete(size: usize) -> Topology {
        TopologyLoader::new().create_complete(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_creation() {
        let mut topology = Topology::new();
        topology.add_qubit(PhysicalQubit(0), Some(Position::new(0, 0))).unwrap();
        topology.add_qubit(PhysicalQubit(1), Some(Position::new(1, 0))).unwrap();
        topology.add_connection(PhysicalQubit(0), PhysicalQubit(1)).unwrap();

        assert_eq!(topology.qubit_count(), 2);
        assert_eq!(topology.connection_count(), 1);
        assert!(topology.are_connected(PhysicalQubit(0), PhysicalQubit(1)));
        assert!(topology.are_connected(PhysicalQubit(1), PhysicalQubit(0)));
    }

    #[test]
    fn test_duplicate_and_invalid_connections() {
        let mut topology = TopologyBuilder::linear(3);
        topology.add_connection(PhysicalQubit(1), PhysicalQubit(0)).unwrap();
        assert_eq!(topology.connection_count(), 2);

        assert!(topology.add_connection(PhysicalQubit(2), PhysicalQubit(2)).is_err());
        assert!(topology.add_connection(PhysicalQubit(0), PhysicalQubit(9)).is_err());
        assert!(topology.add_qubit(PhysicalQubit(1), None).is_err());
    }

    #[test]
    fn test_grid_topology() {
        let topology = TopologyBuilder::grid(3, 3);
        assert_eq!(topology.qubit_count(), 9);
        assert_eq!(topology.connection_count(), 12); // 3 * 2 + 3 * 2

        assert_eq!(topology.neighbors(PhysicalQubit(4)).len(), 4);
        assert_eq!(topology.neighbors(PhysicalQubit(0)), vec![PhysicalQubit(1), PhysicalQubit(3)]);
    }

    #[test]
    fn test_shortest_path() {
        let topology = TopologyBuilder::linear(5);
        let path = topology.shortest_path(PhysicalQubit(0), PhysicalQubit(4)).unwrap();
        assert_eq!(path, (0..5).map(PhysicalQubit).collect::<Vec<_>>());

        let single = topology.shortest_path(PhysicalQubit(2), PhysicalQubit(2)).unwrap();
        assert_eq!(single, vec![PhysicalQubit(2)]);
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let mut topology = Topology::new();
        topology.add_qubit(PhysicalQubit(0), None).unwrap();
        topology.add_qubit(PhysicalQubit(1), None).unwrap();

        assert!(topology.shortest_path(PhysicalQubit(0), PhysicalQubit(1)).is_none());
        assert!(!topology.is_connected());
    }

    #[test]
    fn test_edges_are_normalized() {
        let topology = TopologyBuilder::ring(4);
        assert_eq!(
            topology.edges(),
            vec![
                (PhysicalQubit(0), PhysicalQubit(1)),
                (PhysicalQubit(0), PhysicalQubit(3)),
                (PhysicalQubit(1), PhysicalQubit(2)),
                (PhysicalQubit(2), PhysicalQubit(3)),
            ]
        );
    }

    #[test]
    fn test_connectivity_degree() {
        let topology = TopologyBuilder::linear(5);
        let degree = topology.connectivity_degree();
        assert!((degree - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_position_distance() {
        let pos1 = Position::new(0, 0);
        let pos2 = Position::new(3, 4);
        assert_eq!(pos1.manhattan_distance(&pos2), 7);
    }
}
