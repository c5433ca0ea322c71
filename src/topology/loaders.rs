//! Topology loaders for various formats and standard architectures

use crate::topology::{PhysicalQubit, Position, Topology, TopologyMetadata, TopologyType};
use crate::{Result, RouterError};
use serde::{Deserialize, Serialize};

/// Topology loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Auto-generate positions for topologies without explicit positions
    pub auto_generate_positions: bool,
    /// Reject loaded topologies whose qubits are not all mutually reachable
    pub require_connected: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            auto_generate_positions: true,
            require_connected: false,
        }
    }
}

/// JSON topology format for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTopology {
    /// Topology metadata
    #[serde(default)]
    pub metadata: TopologyMetadata,
    /// Qubit definitions
    pub qubits: Vec<JsonQubit>,
    /// Connection definitions
    #[serde(default)]
    pub connections: Vec<JsonConnection>,
}

/// JSON qubit definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonQubit {
    /// Qubit index
    pub index: usize,
    /// Physical position (optional)
    #[serde(default)]
    pub position: Option<(i32, i32)>,
}

/// JSON connection definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonConnection {
    /// Source qubit index
    pub source: usize,
    /// Target qubit index
    pub target: usize,
}

/// Topology loader for various formats
#[derive(Debug, Clone, Default)]
pub struct TopologyLoader {
    config: LoaderConfig,
}

impl TopologyLoader {
    /// Create a new topology loader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a topology loader with custom configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load topology from JSON string
    pub fn from_json(&self, json_str: &str) -> Result<Topology> {
        let json_topology: JsonTopology = serde_json::from_str(json_str)?;

        let mut topology = Topology::new();
        topology.set_metadata(json_topology.metadata);

        for json_qubit in json_topology.qubits {
            let position = json_qubit.position.map(|(x, y)| Position::new(x, y));
            topology.add_qubit(PhysicalQubit(json_qubit.index), position)?;
        }

        for json_conn in json_topology.connections {
            topology.add_connection(PhysicalQubit(json_conn.source), PhysicalQubit(json_conn.target))?;
        }

        self.finish(topology)
    }

    /// Save topology to JSON string
    pub fn to_json(&self, topology: &Topology) -> Result<String> {
        let qubits = topology
            .qubits()
            .into_iter()
            .map(|qubit| JsonQubit {
                index: qubit.index(),
                position: topology.position(qubit).map(|p| (p.x, p.y)),
            })
            .collect();

        let connections = topology
            .edges()
            .into_iter()
            .map(|(source, target)| JsonConnection {
                source: source.index(),
                target: target.index(),
            })
            .collect();

        let json_topology = JsonTopology {
            metadata: topology.metadata().clone(),
            qubits,
            connections,
        };

        Ok(serde_json::to_string_pretty(&json_topology)?)
    }

    /// Create a grid topology (2D lattice, 4-connected)
    pub fn create_grid(&self, width: usize, height: usize) -> Topology {
        let index = |x: usize, y: usize| y * width + x;
        let mut edges = Vec::new();
        for y in 0..height {
            for x in 0..width {
                if x + 1 < width {
                    edges.push((index(x, y), index(x + 1, y)));
                }
                if y + 1 < height {
                    edges.push((index(x, y), index(x, y + 1)));
                }
            }
        }

        let metadata = TopologyMetadata {
            name: format!("grid_{}x{}", width, height),
            dimensions: Some((width, height)),
            topology_type: TopologyType::Grid,
        };
        let columns = width.max(1);
        self.assemble(width * height, edges, metadata, |i| {
            Position::new((i % columns) as i32, (i / columns) as i32)
        })
    }

    /// Create a linear topology (1D chain)
    pub fn create_linear(&self, size: usize) -> Topology {
        let edges = (1..size).map(|i| (i - 1, i)).collect();
        let metadata = TopologyMetadata {
            name: format!("linear_{}", size),
            dimensions: Some((size, 1)),
            topology_type: TopologyType::Linear,
        };
        self.assemble(size, edges, metadata, |i| Position::new(i as i32, 0))
    }

    /// Create a ring topology
    pub fn create_ring(&self, size: usize) -> Result<Topology> {
        if size < 3 {
            return Err(RouterError::topology_error(
                "Ring topology must have at least 3 qubits",
            ));
        }

        let mut edges: Vec<(usize, usize)> = (1..size).map(|i| (i - 1, i)).collect();
        edges.push((size - 1, 0));
        let metadata = TopologyMetadata {
            name: format!("ring_{}", size),
            dimensions: None,
            topology_type: TopologyType::Ring,
        };
        Ok(self.assemble(size, edges, metadata, |i| circle_position(i, size, 3.0)))
    }

    /// Create a star topology with qubit 0 at the center
    pub fn create_star(&self, size: usize) -> Result<Topology> {
        if size == 0 {
            return Err(RouterError::topology_error(
                "Star topology must have at least one qubit",
            ));
        }

        let edges = (1..size).map(|i| (0, i)).collect();
        let metadata = TopologyMetadata {
            name: format!("star_{}", size),
            dimensions: None,
            topology_type: TopologyType::Star,
        };
        Ok(self.assemble(size, edges, metadata, |i| {
            if i == 0 {
                Position::new(0, 0)
            } else {
                circle_position(i - 1, size - 1, 3.0)
            }
        }))
    }

    /// Create a fully connected topology
    pub fn create_complete(&self, size: usize) -> Topology {
        let edges = (0..size)
            .flat_map(|i| ((i + 1)..size).map(move |j| (i, j)))
            .collect();
        let metadata = TopologyMetadata {
            name: format!("complete_{}", size),
            dimensions: None,
            topology_type: TopologyType::Complete,
        };
        self.assemble(size, edges, metadata, |i| circle_position(i, size, 3.0))
    }

    /// Load topology from the line-oriented configuration format.
    ///
    /// ```text
    /// name my_device
    /// type linear
    /// qubit 0 0 0
    /// qubit 1 1 0
    /// connection 0 1
    /// ```
    ///
    /// Errors report the 1-based line number as their position.
    pub fn from_config_string(&self, config_str: &str) -> Result<Topology> {
        let mut topology = Topology::new();
        let mut metadata = TopologyMetadata::default();

        for (line_idx, raw_line) in config_str.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                ["name", name] => metadata.name = (*name).to_string(),
                ["type", topology_type] => {
                    metadata.topology_type = match *topology_type {
                        "grid" => TopologyType::Grid,
                        "linear" => TopologyType::Linear,
                        "ring" => TopologyType::Ring,
                        "star" => TopologyType::Star,
                        "complete" => TopologyType::Complete,
                        _ => TopologyType::Custom,
                    };
                }
                ["qubit", index] => {
                    let qubit = PhysicalQubit(parse_field(index, line_no)?);
                    topology
                        .add_qubit(qubit, None)
                        .map_err(|e| at_line(e, line_no))?;
                }
                ["qubit", index, x, y] => {
                    let qubit = PhysicalQubit(parse_field(index, line_no)?);
                    let position = Position::new(parse_field(x, line_no)?, parse_field(y, line_no)?);
                    topology
                        .add_qubit(qubit, Some(position))
                        .map_err(|e| at_line(e, line_no))?;
                }
                ["connection", source, target] => {
                    let source = PhysicalQubit(parse_field(source, line_no)?);
                    let target = PhysicalQubit(parse_field(target, line_no)?);
                    topology
                        .add_connection(source, target)
                        .map_err(|e| at_line(e, line_no))?;
                }
                _ => {
                    return Err(RouterError::parse_error(
                        format!("unrecognised directive `{}`", line),
                        line_no,
                    ));
                }
            }
        }

        topology.set_metadata(metadata);
        self.finish(topology)
    }

    fn finish(&self, topology: Topology) -> Result<Topology> {
        if self.config.require_connected && !topology.is_connected() {
            return Err(RouterError::topology_error(format!(
                "topology `{}` is not connected",
                topology.metadata().name
            )));
        }
        Ok(topology)
    }

    /// Build a topology over qubits `0..size` from index pairs known to be in range
    fn assemble(
        &self,
        size: usize,
        edges: Vec<(usize, usize)>,
        metadata: TopologyMetadata,
        position: impl Fn(usize) -> Position,
    ) -> Topology {
        let mut topology = Topology::new();
        for i in 0..size {
            let qubit = PhysicalQubit(i);
            let node = topology.graph.add_node(qubit);
            topology.qubit_to_node.insert(qubit, node);
            if self.config.auto_generate_positions {
                topology.positions.insert(qubit, position(i));
            }
        }
        for (a, b) in edges {
            let (na, nb) = (topology.qubit_to_node[&PhysicalQubit(a)], topology.qubit_to_node[&PhysicalQubit(b)]);
            topology.graph.update_edge(na, nb, ());
        }
        topology.set_metadata(metadata);
        topology
    }
}

fn circle_position(i: usize, count: usize, radius: f64) -> Position {
    let angle = 2.0 * std::f64::consts::PI * i as f64 / count.max(1) as f64;
    Position::new((angle.cos() * radius).round() as i32, (angle.sin() * radius).round() as i32)
}

fn parse_field<T: std::str::FromStr>(field: &str, line_no: usize) -> Result<T> {
    field
        .parse()
        .map_err(|_| RouterError::parse_error(format!("invalid number `{}`", field), line_no))
}

fn at_line(err: RouterError, line_no: usize) -> RouterError {
    RouterError::parse_error(err.to_string(), line_no)
}
