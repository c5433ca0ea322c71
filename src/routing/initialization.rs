//! Initial placement of logical qubits onto device sites
//!
//! The most central logical qubit goes on the most central site. The rest are
//! grown outward one at a time: the unplaced qubits with the most placed
//! neighbours compete for the free sites bordering the placed region, and the
//! border site farthest (in total) from everything already placed wins.

use crate::circuit_ir::Qubit;
use crate::routing::DistanceIndex;
use crate::topology::{PhysicalQubit, Topology};
use crate::{Result, RouterError};
use log::trace;
use petgraph::graph::UnGraph;
use rand::seq::SliceRandom;
use rand::Rng;
use rustworkx_core::centrality::betweenness_centrality;
use std::collections::{BTreeMap, BTreeSet};

/// Node of maximum normalised betweenness centrality.
///
/// Ties go to the node inserted first. Returns `None` for an empty graph.
pub fn get_center<N: Copy + Sync>(graph: &UnGraph<N, ()>) -> Option<N> {
    let centralities = betweenness_centrality(graph, false, true, 200);

    let mut best: Option<(N, f64)> = None;
    for node in graph.node_indices() {
        let score = centralities
            .get(node.index())
            .copied()
            .flatten()
            .filter(|s| s.is_finite())
            .unwrap_or(0.0);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((graph[node], score)),
        }
    }
    best.map(|(n, _)| n)
}

/// Compute a physical-to-logical initial mapping covering every node of
/// `logical_graph`.
pub fn get_initial_mapping<R: Rng + ?Sized>(
    logical_graph: &UnGraph<Qubit, ()>,
    topology: &Topology,
    distances: &DistanceIndex,
    rng: &mut R,
) -> Result<BTreeMap<PhysicalQubit, Qubit>> {
    let (Some(logical_center), Some(device_center)) =
        (get_center(logical_graph), get_center(topology.graph()))
    else {
        if logical_graph.node_count() == 0 {
            return Ok(BTreeMap::new());
        }
        return Err(RouterError::topology_error("device graph has no qubits"));
    };

    let logical_count = logical_graph.node_count();
    if logical_count > topology.qubit_count() {
        return Err(RouterError::allocation_error(format!(
            "Not enough physical qubits available: {} logical, {} physical",
            logical_count,
            topology.qubit_count()
        )));
    }

    let neighbors: BTreeMap<Qubit, BTreeSet<Qubit>> = logical_graph
        .node_indices()
        .map(|n| (logical_graph[n], logical_graph.neighbors(n).map(|m| logical_graph[m]).collect()))
        .collect();

    let mut mapping: BTreeMap<PhysicalQubit, Qubit> = BTreeMap::from([(device_center, logical_center)]);
    let mut placed: BTreeSet<Qubit> = BTreeSet::from([logical_center]);
    let mut unplaced: BTreeSet<Qubit> = neighbors.keys().copied().collect();
    unplaced.remove(&logical_center);

    while !unplaced.is_empty() {
        let placed_neighbor_counts: Vec<(Qubit, usize)> = unplaced
            .iter()
            .map(|q| (*q, neighbors[q].intersection(&placed).count()))
            .collect();
        let max_placed = placed_neighbor_counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
        let candidates: Vec<Qubit> = placed_neighbor_counts
            .into_iter()
            .filter(|&(_, n)| n == max_placed)
            .map(|(q, _)| q)
            .collect();

        let border: BTreeSet<PhysicalQubit> = mapping
            .keys()
            .flat_map(|&p| topology.neighbors(p))
            .filter(|p| !mapping.contains_key(p))
            .collect();
        if border.is_empty() {
            return Err(RouterError::topology_error(format!(
                "cannot place {} more logical qubits: no free site is connected to the placed region",
                unplaced.len()
            )));
        }

        let mut best_score = 0;
        let mut best_pairs: Vec<(Qubit, PhysicalQubit)> = Vec::new();
        for &site in &border {
            let score = mapping
                .keys()
                .map(|&used| distances.distance(site, used))
                .sum::<Result<u32>>()?;
            if score > best_score || best_pairs.is_empty() {
                best_score = score;
                best_pairs.clear();
            }
            if score == best_score {
                best_pairs.extend(candidates.iter().map(|&q| (q, site)));
            }
        }

        let &(qubit, site) = best_pairs
            .choose(rng)
            .ok_or_else(|| RouterError::internal_error("no placement candidates"))?;
        trace!("placing {} on {} (score {})", qubit, site, best_score);

        mapping.insert(site, qubit);
        placed.insert(qubit);
        unplaced.remove(&qubit);
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyBuilder;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn path_graph(n: usize) -> UnGraph<Qubit, ()> {
        let mut graph = UnGraph::new_undirected();
        let nodes: Vec<_> = (0..n).map(|i| graph.add_node(Qubit(i))).collect();
        for pair in nodes.windows(2) {
            graph.add_edge(pair[0], pair[1], ());
        }
        graph
    }

    #[test]
    fn test_center_of_star_is_hub() {
        let topology = TopologyBuilder::star(5);
        assert_eq!(get_center(topology.graph()), Some(PhysicalQubit(0)));
    }

    #[test]
    fn test_center_of_path_is_middle() {
        assert_eq!(get_center(&path_graph(5)), Some(Qubit(2)));
    }

    #[test]
    fn test_center_tie_goes_to_first_node() {
        let mut graph: UnGraph<Qubit, ()> = UnGraph::new_undirected();
        graph.add_node(Qubit(3));
        graph.add_node(Qubit(1));
        assert_eq!(get_center(&graph), Some(Qubit(3)));

        assert_eq!(get_center(&UnGraph::<Qubit, ()>::new_undirected()), None);
    }

    #[test]
    fn test_mapping_is_injective_and_complete() {
        let topology = TopologyBuilder::grid(3, 3);
        let distances = DistanceIndex::new(&topology).unwrap();
        let logical = path_graph(5);

        for seed in 0..10 {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            let mapping = get_initial_mapping(&logical, &topology, &distances, &mut rng).unwrap();

            assert_eq!(mapping.len(), 5);
            let logical_qubits: BTreeSet<Qubit> = mapping.values().copied().collect();
            assert_eq!(logical_qubits, (0..5).map(Qubit).collect());
            assert!(mapping.keys().all(|&p| topology.contains(p)));
            // the logical center sits on the device center
            assert_eq!(mapping.get(&PhysicalQubit(4)), Some(&Qubit(2)));
        }
    }

    #[test]
    fn test_placed_region_stays_connected() {
        let topology = TopologyBuilder::linear(6);
        let distances = DistanceIndex::new(&topology).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let mapping = get_initial_mapping(&path_graph(4), &topology, &distances, &mut rng).unwrap();

        let sites: Vec<usize> = mapping.keys().map(|p| p.index()).collect();
        assert_eq!(sites.len(), 4);
        assert_eq!(sites[3] - sites[0], 3);
    }

    #[test]
    fn test_same_seed_same_mapping() {
        let topology = TopologyBuilder::grid(4, 4);
        let distances = DistanceIndex::new(&topology).unwrap();
        let logical = path_graph(8);

        let first = get_initial_mapping(&logical, &topology, &distances, &mut Pcg64Mcg::seed_from_u64(3)).unwrap();
        let second = get_initial_mapping(&logical, &topology, &distances, &mut Pcg64Mcg::seed_from_u64(3)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_logical_graph() {
        let topology = TopologyBuilder::linear(3);
        let distances = DistanceIndex::new(&topology).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let mapping =
            get_initial_mapping(&UnGraph::new_undirected(), &topology, &distances, &mut rng).unwrap();
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_too_many_logical_qubits() {
        let topology = TopologyBuilder::linear(3);
        let distances = DistanceIndex::new(&topology).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        let err = get_initial_mapping(&path_graph(4), &topology, &distances, &mut rng).unwrap_err();
        assert!(matches!(err, RouterError::AllocationError(_)));
    }

    #[test]
    fn test_disconnected_device() {
        let mut topology = Topology::new();
        topology.add_qubit(PhysicalQubit(0), None).unwrap();
        topology.add_qubit(PhysicalQubit(1), None).unwrap();
        let distances = DistanceIndex::new(&topology).unwrap();
        let mut rng = Pcg64Mcg::seed_from_u64(0);

        let err = get_initial_mapping(&path_graph(2), &topology, &distances, &mut rng).unwrap_err();
        assert!(matches!(err, RouterError::TopologyError(_)));
    }
}
