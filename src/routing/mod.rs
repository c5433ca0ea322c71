//! Qubit routing
//!
//! Places the logical qubits of a circuit on a device and inserts swaps so
//! that every two-qubit operation runs on adjacent sites.

pub mod distance;
pub mod greedy;
pub mod initialization;
pub mod layout;
pub mod swap_network;
pub mod utils;

pub use distance::{DeviceEdge, DistanceIndex};
pub use greedy::{dominated_indices, route_circuit_greedily, GreedyRouter, RouterConfig, RouterState};
pub use initialization::{get_center, get_initial_mapping};
pub use layout::Layout;
pub use swap_network::{PhysicalOperation, SwapNetwork};
pub use utils::{is_valid_routing, ops_are_consistent_with_device_graph};
