//! Greedy swap-insertion router
//!
//! The router alternates between two phases until the circuit is exhausted:
//!
//! - **draining** executes every operation whose operands are currently
//!   adjacent (and whose prerequisites have run);
//! - **searching** picks a set of disjoint device edges to swap on. Candidate
//!   sets of growing size are scored against the upcoming time slices and
//!   narrowed by Pareto dominance; a unique survivor is applied. If the search
//!   is inconclusive, the two frontier operands that are farthest apart are
//!   moved next to each other along a shortest path.

use crate::circuit_ir::{disjoint_qubits, CircuitDag, Operation, QuantumCircuit, Qubit, ReorderPredicate};
use crate::routing::distance::{DeviceEdge, DistanceIndex};
use crate::routing::initialization::get_initial_mapping;
use crate::routing::{ops_are_consistent_with_device_graph, Layout, PhysicalOperation, SwapNetwork};
use crate::topology::{PhysicalQubit, Topology};
use crate::{Result, RouterError};
use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Largest number of simultaneous swaps considered in one search step
    pub max_search_radius: usize,
    /// Consecutive unproductive search steps before the shortest-path fallback is forced
    pub stall_limit: usize,
    /// Seed for tie-breaking; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Physical-to-logical placement to start from instead of the greedy placement
    pub initial_mapping: Option<BTreeMap<PhysicalQubit, Qubit>>,
    /// Which operations may be exchanged; defaults to [`disjoint_qubits`]
    #[serde(skip)]
    pub can_reorder: Option<ReorderPredicate>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_search_radius: 1,
            stall_limit: 16,
            seed: None,
            initial_mapping: None,
            can_reorder: None,
        }
    }
}

impl RouterConfig {
    /// Set the largest number of simultaneous swaps searched
    pub fn with_max_search_radius(mut self, radius: usize) -> Self {
        self.max_search_radius = radius;
        self
    }

    /// Set how many unproductive search steps force the fallback
    pub fn with_stall_limit(mut self, limit: usize) -> Self {
        self.stall_limit = limit;
        self
    }

    /// Fix the tie-breaking seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start from the given placement
    pub fn with_initial_mapping(mut self, mapping: BTreeMap<PhysicalQubit, Qubit>) -> Self {
        self.initial_mapping = Some(mapping);
        self
    }

    /// Use a custom test for which operations may be exchanged
    pub fn with_reorder_predicate(mut self, can_reorder: ReorderPredicate) -> Self {
        self.can_reorder = Some(can_reorder);
        self
    }

    /// Check the configuration values are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_search_radius == 0 {
            return Err(RouterError::config_error("max_search_radius must be positive"));
        }
        if self.stall_limit == 0 {
            return Err(RouterError::config_error("stall_limit must be positive"));
        }
        Ok(())
    }
}

/// Phase of a routing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterState {
    /// Executable operations may be pending
    Draining,
    /// Every remaining operation is blocked; swaps are needed
    Searching,
    /// All operations have been placed
    Done,
}

/// State of one greedy routing run
#[derive(Debug)]
pub struct GreedyRouter<'a, R: Rng> {
    topology: &'a Topology,
    distances: DistanceIndex,
    remaining_dag: CircuitDag,
    logical_qubits: BTreeSet<Qubit>,
    physical_qubits: BTreeSet<PhysicalQubit>,
    initial_mapping: BTreeMap<PhysicalQubit, Qubit>,
    layout: Layout,
    physical_ops: Vec<PhysicalOperation>,
    max_search_radius: usize,
    stall_limit: usize,
    stalled_steps: usize,
    rng: R,
    state: RouterState,
}

impl<'a, R: Rng> GreedyRouter<'a, R> {
    /// Prepare a routing run of `circuit` on `topology`.
    ///
    /// The seed in `config` is ignored; randomness comes from `rng`.
    pub fn new(
        circuit: &QuantumCircuit,
        topology: &'a Topology,
        config: &RouterConfig,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        circuit.validate()?;
        if let Some(op) = circuit.operations.iter().find(|op| op.num_qubits() > 2) {
            return Err(RouterError::scheduling_error(format!(
                "cannot route {:?}: operations on more than two qubits are not supported",
                op
            )));
        }

        let distances = DistanceIndex::new(topology)?;
        let remaining_dag = circuit.to_dag(config.can_reorder.unwrap_or(disjoint_qubits));
        let logical_qubits = remaining_dag.all_qubits().clone();
        let physical_qubits: BTreeSet<PhysicalQubit> = topology.qubits().into_iter().collect();

        let initial_mapping = match &config.initial_mapping {
            Some(mapping) => mapping.clone(),
            None => {
                let frontier = remaining_dag.time_slices().into_iter().next().unwrap_or_default();
                let logical_graph = frontier.to_graph(logical_qubits.iter().copied());
                get_initial_mapping(&logical_graph, topology, &distances, &mut rng)?
            }
        };
        let layout = Layout::new(&initial_mapping, &physical_qubits, &logical_qubits)?;
        debug!(
            "routing {} operations over {} logical qubits on {} sites",
            remaining_dag.len(),
            logical_qubits.len(),
            physical_qubits.len()
        );

        Ok(Self {
            topology,
            distances,
            remaining_dag,
            logical_qubits,
            physical_qubits,
            initial_mapping,
            layout,
            physical_ops: Vec::new(),
            max_search_radius: config.max_search_radius,
            stall_limit: config.stall_limit,
            stalled_steps: 0,
            rng,
            state: RouterState::Draining,
        })
    }

    /// Current phase
    pub fn state(&self) -> RouterState {
        self.state
    }

    /// Current placement
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Operations not yet executed
    pub fn remaining(&self) -> &CircuitDag {
        &self.remaining_dag
    }

    /// Routed steps so far
    pub fn physical_ops(&self) -> &[PhysicalOperation] {
        &self.physical_ops
    }

    /// Run to completion
    pub fn route(&mut self) -> Result<()> {
        self.apply_possible_ops()?;
        while self.state != RouterState::Done {
            self.apply_next_swaps()?;
            self.apply_possible_ops()?;
        }

        if !ops_are_consistent_with_device_graph(&self.physical_ops, self.topology) {
            return Err(RouterError::internal_error(
                "routed operations do not fit the device graph",
            ));
        }
        info!(
            "routed {} operations with {} swaps",
            self.physical_ops.len(),
            self.physical_ops.iter().filter(|op| op.is_swap()).count()
        );
        Ok(())
    }

    /// Whether `operation` needs its operands moved before it can run
    pub fn acts_on_nonadjacent_qubits(&self, operation: &Operation) -> Result<bool> {
        match operation.qubits().as_slice() {
            [a, b] => {
                let (pa, pb) = (self.layout.physical(*a)?, self.layout.physical(*b)?);
                Ok(!self.topology.are_connected(pa, pb))
            }
            _ => Ok(false),
        }
    }

    /// Execute every operation that can run under the current placement.
    ///
    /// Returns the number of operations executed.
    pub fn apply_possible_ops(&mut self) -> Result<usize> {
        let mut lookup_error = None;
        let nodes = self.remaining_dag.findall_nodes_until_blocked(|op| {
            self.acts_on_nonadjacent_qubits(op).unwrap_or_else(|err| {
                lookup_error.get_or_insert(err);
                true
            })
        });
        if let Some(err) = lookup_error {
            return Err(err);
        }

        for &node in &nodes {
            let operation = self
                .remaining_dag
                .remove_node(node)
                .ok_or_else(|| RouterError::internal_error("executable node vanished from the DAG"))?;
            let sites = operation
                .qubits()
                .iter()
                .map(|&q| self.layout.physical(q))
                .collect::<Result<SmallVec<[PhysicalQubit; 4]>>>()?;
            if let [a, b] = sites.as_slice() {
                if !self.topology.are_connected(*a, *b) {
                    return Err(RouterError::scheduling_error(format!(
                        "{:?} placed on non-adjacent sites {} and {}",
                        operation, a, b
                    )));
                }
            }
            self.physical_ops.push(PhysicalOperation::Gate { operation, sites });
        }

        if !nodes.is_empty() {
            self.stalled_steps = 0;
        }
        self.state = if self.remaining_dag.is_empty() {
            RouterState::Done
        } else {
            RouterState::Searching
        };
        debug!(
            "executed {} operations, {} remaining, now {:?}",
            nodes.len(),
            self.remaining_dag.len(),
            self.state
        );
        Ok(nodes.len())
    }

    /// Apply swaps that move the placement toward one where the next
    /// operations can run.
    pub fn apply_next_swaps(&mut self) -> Result<()> {
        let time_slices = self.remaining_dag.time_slices();
        let Some(frontier) = time_slices.first() else {
            return Ok(());
        };

        self.stalled_steps += 1;
        if self.stalled_steps > self.stall_limit {
            debug!("no progress in {} search steps, forcing the fallback", self.stall_limit);
        } else {
            for k in 1..=self.max_search_radius {
                let mut candidates: Vec<Vec<DeviceEdge>> = self.distances.edge_sets(k).to_vec();
                for time_slice in &time_slices {
                    if candidates.is_empty() {
                        break;
                    }
                    let vectors = candidates
                        .iter()
                        .map(|swaps| self.distance_vector(&time_slice.edges, swaps))
                        .collect::<Result<Vec<_>>>()?;
                    let dominated = dominated_indices(&vectors);
                    trace!(
                        "radius {}: {} of {} candidate swap sets dominated",
                        k,
                        dominated.len(),
                        candidates.len()
                    );
                    candidates = candidates
                        .into_iter()
                        .enumerate()
                        .filter(|(i, _)| !dominated.contains(i))
                        .map(|(_, swaps)| swaps)
                        .collect();

                    if let [swaps] = candidates.as_slice() {
                        let swaps = swaps.clone();
                        self.apply_swaps(&swaps)?;
                        return self.check_layout();
                    }
                }
            }
        }

        self.bring_farthest_pair_together(&frontier.edges)?;
        self.check_layout()
    }

    /// Distances between the sites of each logical edge after `swaps` are
    /// applied. The placement is restored before returning.
    pub fn distance_vector(&mut self, edges: &[(Qubit, Qubit)], swaps: &[DeviceEdge]) -> Result<Vec<u32>> {
        self.update_layout(swaps.iter())?;
        let vector = edges
            .iter()
            .map(|&edge| self.logical_distance(edge))
            .collect::<Result<Vec<u32>>>();
        self.update_layout(swaps.iter().rev())?;
        vector
    }

    /// Move the two frontier operands that are farthest apart next to each
    /// other along a shortest path, meeting in the middle.
    pub fn bring_farthest_pair_together(&mut self, pairs: &[(Qubit, Qubit)]) -> Result<()> {
        let distances = pairs
            .iter()
            .map(|&pair| self.logical_distance(pair))
            .collect::<Result<Vec<u32>>>()?;
        let Some(&max_distance) = distances.iter().max() else {
            return Err(RouterError::internal_error("no frontier pairs to bring together"));
        };
        let farthest: Vec<(Qubit, Qubit)> = pairs
            .iter()
            .zip(&distances)
            .filter(|&(_, &d)| d == max_distance)
            .map(|(&pair, _)| pair)
            .collect();
        let &(a, b) = farthest
            .choose(&mut self.rng)
            .ok_or_else(|| RouterError::internal_error("no farthest pair"))?;

        let (pa, pb) = (self.layout.physical(a)?, self.layout.physical(b)?);
        let path = self
            .topology
            .shortest_path(pa, pb)
            .ok_or_else(|| RouterError::topology_error(format!("no path between {} and {}", pa, pb)))?;
        if path.len() != max_distance as usize + 1 {
            return Err(RouterError::internal_error(format!(
                "shortest path from {} to {} has {} hops, expected {}",
                pa,
                pb,
                path.len().saturating_sub(1),
                max_distance
            )));
        }
        debug!("bringing {} and {} together ({} hops)", a, b, max_distance);

        let midpoint = max_distance as usize / 2;
        self.swap_along_path(&path[..=midpoint])?;
        let back_half: Vec<PhysicalQubit> = path[midpoint + 1..].iter().rev().copied().collect();
        self.swap_along_path(&back_half)
    }

    /// Carry the content of `path[0]` to the last site of `path`
    pub fn swap_along_path(&mut self, path: &[PhysicalQubit]) -> Result<()> {
        for hop in path.windows(2) {
            self.apply_swaps(&[(hop[0], hop[1])])?;
        }
        Ok(())
    }

    /// Swap on each edge and record the swaps
    pub fn apply_swaps(&mut self, swaps: &[DeviceEdge]) -> Result<()> {
        self.update_layout(swaps.iter())?;
        for &(a, b) in swaps {
            debug!("swap {} <-> {}", a, b);
            self.physical_ops.push(PhysicalOperation::Swap(a, b));
        }
        Ok(())
    }

    /// The routed result so far
    pub fn swap_network(&self) -> SwapNetwork {
        SwapNetwork::new(self.physical_ops.clone(), self.initial_mapping.clone())
    }

    /// Consume the router, returning the routed result
    pub fn into_swap_network(self) -> SwapNetwork {
        SwapNetwork::new(self.physical_ops, self.initial_mapping)
    }

    fn update_layout<'e>(&mut self, swaps: impl Iterator<Item = &'e DeviceEdge>) -> Result<()> {
        for &(a, b) in swaps {
            self.layout.swap(a, b)?;
        }
        Ok(())
    }

    fn logical_distance(&self, (a, b): (Qubit, Qubit)) -> Result<u32> {
        self.distances
            .distance(self.layout.physical(a)?, self.layout.physical(b)?)
    }

    fn check_layout(&self) -> Result<()> {
        if cfg!(debug_assertions) {
            self.layout
                .check_consistency(&self.logical_qubits, &self.physical_qubits)?;
        }
        Ok(())
    }
}

/// Indices of vectors that are element-wise `>=` some other vector.
///
/// Equal vectors dominate each other, so all copies are removed.
pub fn dominated_indices(vectors: &[Vec<u32>]) -> BTreeSet<usize> {
    (0..vectors.len())
        .filter(|&i| {
            vectors.iter().enumerate().any(|(j, w)| {
                j != i && w.iter().zip(&vectors[i]).all(|(wk, vk)| wk <= vk)
            })
        })
        .collect()
}

/// Route `circuit` on `topology` in one call
pub fn route_circuit_greedily(
    circuit: &QuantumCircuit,
    topology: &Topology,
    config: &RouterConfig,
) -> Result<SwapNetwork> {
    let rng = match config.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_entropy(),
    };
    let mut router = GreedyRouter::new(circuit, topology, config, rng)?;
    router.route()?;
    Ok(router.into_swap_network())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit_ir::CircuitBuilder;
    use crate::routing::is_valid_routing;
    use crate::topology::TopologyBuilder;

    fn p(i: usize) -> PhysicalQubit {
        PhysicalQubit(i)
    }

    fn identity_mapping(n: usize) -> BTreeMap<PhysicalQubit, Qubit> {
        (0..n).map(|i| (p(i), Qubit(i))).collect()
    }

    fn router<'a>(
        circuit: &QuantumCircuit,
        topology: &'a Topology,
        config: &RouterConfig,
    ) -> GreedyRouter<'a, Pcg64Mcg> {
        GreedyRouter::new(circuit, topology, config, Pcg64Mcg::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(RouterConfig::default().validate().is_ok());
        assert!(matches!(
            RouterConfig::default().with_max_search_radius(0).validate(),
            Err(RouterError::ConfigError(_))
        ));
        assert!(RouterConfig::default().with_stall_limit(0).validate().is_err());
    }

    #[test]
    fn test_config_serde_skips_predicate() {
        let config = RouterConfig::default()
            .with_seed(9)
            .with_initial_mapping(identity_mapping(2))
            .with_reorder_predicate(disjoint_qubits);
        let json = serde_json::to_string(&config).unwrap();
        let restored: RouterConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.seed, Some(9));
        assert_eq!(restored.initial_mapping, Some(identity_mapping(2)));
        assert!(restored.can_reorder.is_none());
    }

    #[test]
    fn test_dominated_indices() {
        let vectors = vec![vec![1, 2], vec![2, 1], vec![1, 1], vec![3, 3]];
        assert_eq!(dominated_indices(&vectors), BTreeSet::from([0, 1, 3]));

        let incomparable = vec![vec![1, 3], vec![3, 1], vec![2, 2]];
        assert!(dominated_indices(&incomparable).is_empty());

        let ties = vec![vec![2, 2], vec![2, 2]];
        assert_eq!(dominated_indices(&ties), BTreeSet::from([0, 1]));

        assert!(dominated_indices(&[vec![5]]).is_empty());
    }

    #[test]
    fn test_single_swap_on_three_site_path() {
        let topology = TopologyBuilder::linear(3);
        let circuit = CircuitBuilder::new("c", 3, 0).cz(0, 2).unwrap().build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(3));

        let mut router = router(&circuit, &topology, &config);
        router.route().unwrap();
        let network = router.swap_network();

        assert_eq!(network.swap_count(), 1);
        assert_eq!(network.operations[0], PhysicalOperation::Swap(p(0), p(1)));
        match &network.operations[1] {
            PhysicalOperation::Gate { operation, sites } => {
                assert_eq!(operation, &circuit.operations[0]);
                assert_eq!(sites.as_slice(), &[p(1), p(2)]);
            }
            other => panic!("expected the cz, got {:?}", other),
        }
        assert!(is_valid_routing(&circuit, &network, &topology, disjoint_qubits));
    }

    #[test]
    fn test_single_qubit_circuit_needs_no_swaps() {
        let topology = TopologyBuilder::linear(3);
        let circuit = CircuitBuilder::new("c", 3, 0)
            .h(0).unwrap()
            .x(1).unwrap()
            .t(2).unwrap()
            .build();
        let mut router = router(&circuit, &topology, &RouterConfig::default());

        assert_eq!(router.apply_possible_ops().unwrap(), 3);
        assert_eq!(router.state(), RouterState::Done);
        assert_eq!(router.swap_network().swap_count(), 0);
    }

    #[test]
    fn test_device_without_edges() {
        let mut topology = Topology::new();
        topology.add_qubit(p(0), None).unwrap();
        topology.add_qubit(p(1), None).unwrap();
        let circuit = CircuitBuilder::new("c", 2, 0).cx(0, 1).unwrap().build();

        let result = route_circuit_greedily(&circuit, &topology, &RouterConfig::default().with_seed(1));
        assert!(matches!(result, Err(RouterError::TopologyError(_))));

        let config = RouterConfig::default().with_initial_mapping(identity_mapping(2));
        let result = route_circuit_greedily(&circuit, &topology, &config);
        assert!(matches!(result, Err(RouterError::TopologyError(_))));
    }

    #[test]
    fn test_distance_vector_restores_layout() {
        let topology = TopologyBuilder::grid(3, 3);
        let circuit = CircuitBuilder::new("c", 4, 0)
            .cx(0, 3).unwrap()
            .cx(1, 2).unwrap()
            .build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(4));
        let mut router = router(&circuit, &topology, &config);

        let before = router.layout().clone();
        let edges = [(Qubit(0), Qubit(3)), (Qubit(1), Qubit(2))];
        let swaps = [(p(0), p(1)), (p(3), p(4)), (p(5), p(8))];
        let vector = router.distance_vector(&edges, &swaps).unwrap();

        // q0 -> p1, q3 -> p4, q1 -> p0, q2 stays on p2
        assert_eq!(vector, vec![1, 2]);
        assert_eq!(router.layout(), &before);
        assert!(router.physical_ops().is_empty());
    }

    #[test]
    fn test_rejects_wide_operations() {
        let topology = TopologyBuilder::linear(3);
        let circuit = CircuitBuilder::new("c", 3, 0).ccx(0, 1, 2).unwrap().build();
        let result = GreedyRouter::new(&circuit, &topology, &RouterConfig::default(), Pcg64Mcg::seed_from_u64(0));
        assert!(matches!(result, Err(RouterError::SchedulingError(_))));
    }

    #[test]
    fn test_rejects_bad_initial_mapping() {
        let topology = TopologyBuilder::linear(3);
        let circuit = CircuitBuilder::new("c", 3, 0).cz(0, 2).unwrap().build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(2));
        let result = GreedyRouter::new(&circuit, &topology, &config, Pcg64Mcg::seed_from_u64(0));
        assert!(matches!(result, Err(RouterError::MappingError(_))));
    }

    #[test]
    fn test_too_few_sites() {
        let topology = TopologyBuilder::linear(2);
        let circuit = CircuitBuilder::new("c", 3, 0).cz(0, 2).unwrap().build();
        let result = route_circuit_greedily(&circuit, &topology, &RouterConfig::default().with_seed(0));
        assert!(matches!(result, Err(RouterError::AllocationError(_))));
    }

    #[test]
    fn test_layout_stays_bijective_at_every_step() {
        let topology = TopologyBuilder::grid(3, 3);
        let circuit = CircuitBuilder::new("c", 6, 0)
            .cx(0, 5).unwrap()
            .cx(1, 4).unwrap()
            .cx(2, 3).unwrap()
            .cx(0, 3).unwrap()
            .cx(5, 1).unwrap()
            .build();
        let logical: BTreeSet<Qubit> = circuit.qubits();
        let physical: BTreeSet<PhysicalQubit> = topology.qubits().into_iter().collect();
        let mut router = router(&circuit, &topology, &RouterConfig::default());

        router.apply_possible_ops().unwrap();
        router.layout().check_consistency(&logical, &physical).unwrap();
        while router.state() != RouterState::Done {
            router.apply_next_swaps().unwrap();
            router.layout().check_consistency(&logical, &physical).unwrap();
            router.apply_possible_ops().unwrap();
            router.layout().check_consistency(&logical, &physical).unwrap();
        }

        let network = router.swap_network();
        assert_eq!(network.final_mapping(), router.layout().to_mapping());
        assert!(is_valid_routing(&circuit, &network, &topology, disjoint_qubits));
    }

    #[test]
    fn test_fallback_meets_in_the_middle() {
        let topology = TopologyBuilder::linear(6);
        let circuit = CircuitBuilder::new("c", 6, 0).cx(0, 5).unwrap().build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(6));
        let mut router = router(&circuit, &topology, &config);

        router.bring_farthest_pair_together(&[(Qubit(0), Qubit(5))]).unwrap();
        assert_eq!(router.swap_network().swap_count(), 4);
        assert_eq!(router.layout().physical(Qubit(0)).unwrap(), p(2));
        assert_eq!(router.layout().physical(Qubit(5)).unwrap(), p(3));
    }

    #[test]
    fn test_fallback_picks_the_farthest_pair() {
        let topology = TopologyBuilder::linear(6);
        let circuit = CircuitBuilder::new("c", 6, 0)
            .cx(0, 5).unwrap()
            .cx(1, 3).unwrap()
            .build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(6));
        let mut router = router(&circuit, &topology, &config);

        router
            .bring_farthest_pair_together(&[(Qubit(1), Qubit(3)), (Qubit(0), Qubit(5))])
            .unwrap();
        assert_eq!(router.swap_network().swap_count(), 4);
        let (a, b) = (router.layout().physical(Qubit(0)).unwrap(), router.layout().physical(Qubit(5)).unwrap());
        assert!(topology.are_connected(a, b));
    }

    #[test]
    fn test_fallback_breaks_distance_ties() {
        let topology = TopologyBuilder::linear(6);
        let circuit = CircuitBuilder::new("c", 6, 0)
            .cx(0, 2).unwrap()
            .cx(3, 5).unwrap()
            .build();
        let config = RouterConfig::default().with_initial_mapping(identity_mapping(6));
        let pairs = [(Qubit(0), Qubit(2)), (Qubit(3), Qubit(5))];

        let mut chosen = Vec::new();
        for seed in 0..8 {
            let mut router =
                GreedyRouter::new(&circuit, &topology, &config, Pcg64Mcg::seed_from_u64(seed)).unwrap();
            router.bring_farthest_pair_together(&pairs).unwrap();
            assert_eq!(router.swap_network().swap_count(), 1);

            let adjacent: Vec<(Qubit, Qubit)> = pairs
                .iter()
                .copied()
                .filter(|&(a, b)| {
                    let (pa, pb) = (router.layout().physical(a).unwrap(), router.layout().physical(b).unwrap());
                    topology.are_connected(pa, pb)
                })
                .collect();
            assert_eq!(adjacent.len(), 1);
            chosen.push(adjacent[0]);
        }

        // the same seed makes the same choice
        let mut again =
            GreedyRouter::new(&circuit, &topology, &config, Pcg64Mcg::seed_from_u64(0)).unwrap();
        again.bring_farthest_pair_together(&pairs).unwrap();
        let (pa, pb) = (again.layout().physical(chosen[0].0).unwrap(), again.layout().physical(chosen[0].1).unwrap());
        assert!(topology.are_connected(pa, pb));
    }

    #[test]
    fn test_stall_limit_forces_fallback() {
        let topology = TopologyBuilder::grid(3, 3);
        let circuit = CircuitBuilder::new("c", 9, 0)
            .cx(0, 8).unwrap()
            .cx(2, 6).unwrap()
            .cx(1, 7).unwrap()
            .build();
        let config = RouterConfig::default()
            .with_initial_mapping(identity_mapping(9))
            .with_stall_limit(1);

        let network = route_circuit_greedily(&circuit, &topology, &config.with_seed(4)).unwrap();
        assert!(is_valid_routing(&circuit, &network, &topology, disjoint_qubits));
    }

    #[test]
    fn test_wider_search_radius() {
        let topology = TopologyBuilder::grid(3, 3);
        let circuit = CircuitBuilder::new("c", 8, 0)
            .cx(0, 7).unwrap()
            .cz(3, 5).unwrap()
            .cx(2, 6).unwrap()
            .cz(1, 4).unwrap()
            .build();
        let config = RouterConfig::default().with_max_search_radius(2).with_seed(11);

        let network = route_circuit_greedily(&circuit, &topology, &config).unwrap();
        assert!(is_valid_routing(&circuit, &network, &topology, disjoint_qubits));
    }

    #[test]
    fn test_same_seed_same_network() {
        let topology = TopologyBuilder::grid(3, 3);
        let circuit = CircuitBuilder::new("c", 7, 0)
            .cx(0, 6).unwrap()
            .cx(3, 2).unwrap()
            .cx(5, 1).unwrap()
            .cx(4, 0).unwrap()
            .build();
        let config = RouterConfig::default().with_seed(21);

        let first = route_circuit_greedily(&circuit, &topology, &config).unwrap();
        let second = route_circuit_greedily(&circuit, &topology, &config).unwrap();
        assert_eq!(first, second);
    }
}
