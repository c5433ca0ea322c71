//! All-pairs hop distances and disjoint-edge matchings of a device graph

use crate::topology::{PhysicalQubit, Topology};
use crate::{Result, RouterError};
use itertools::Itertools;
use petgraph::algo::dijkstra;
use std::collections::{BTreeMap, HashMap};

/// A device edge as `(low, high)`
pub type DeviceEdge = (PhysicalQubit, PhysicalQubit);

/// Shortest-path distances between every pair of mutually reachable sites,
/// plus a per-size cache of edge matchings.
#[derive(Debug, Clone)]
pub struct DistanceIndex {
    distances: HashMap<(PhysicalQubit, PhysicalQubit), u32>,
    edges: Vec<DeviceEdge>,
    edge_sets: BTreeMap<usize, Vec<Vec<DeviceEdge>>>,
}

impl DistanceIndex {
    /// Compute the index for `topology`
    pub fn new(topology: &Topology) -> Result<Self> {
        let graph = topology.graph();
        if graph.node_count() == 0 {
            return Err(RouterError::topology_error("device graph has no qubits"));
        }

        let mut distances = HashMap::with_capacity(graph.node_count() * graph.node_count());
        for source in graph.node_indices() {
            for (target, cost) in dijkstra(graph, source, None, |_| 1u32) {
                distances.insert((graph[source], graph[target]), cost);
            }
        }

        Ok(Self {
            distances,
            edges: topology.edges(),
            edge_sets: BTreeMap::new(),
        })
    }

    /// Hop distance between two sites
    pub fn distance(&self, a: PhysicalQubit, b: PhysicalQubit) -> Result<u32> {
        self.distances.get(&(a, b)).copied().ok_or_else(|| {
            RouterError::topology_error(format!("no path between {} and {}", a, b))
        })
    }

    /// Device edges in ascending order
    pub fn edges(&self) -> &[DeviceEdge] {
        &self.edges
    }

    /// All sets of `k` pairwise disjoint device edges.
    ///
    /// Sets are listed in lexicographic order of their sorted edges and
    /// computed once per `k`.
    pub fn edge_sets(&mut self, k: usize) -> &[Vec<DeviceEdge>] {
        let edges = &self.edges;
        self.edge_sets.entry(k).or_insert_with(|| {
            edges
                .iter()
                .copied()
                .combinations(k)
                .filter(|set| are_disjoint(set))
                .collect()
        })
    }
}

fn are_disjoint(edges: &[DeviceEdge]) -> bool {
    let mut sites: Vec<PhysicalQubit> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
    let total = sites.len();
    sites.sort_unstable();
    sites.dedup();
    sites.len() == total
}
