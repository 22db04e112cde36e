//! Module for parsing and representing TSP instances.
//!
//! Handles TSP-LIB format files (`NODE_COORD_SECTION` with the common
//! edge-weight functions) as well as JSON city maps of the form
//! `{"City": [x, y]}`. Distances are computed on demand by the instance's
//! edge-weight function; the solver materializes them into its own cache.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Represents a location in a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier (1-indexed in files, 0-indexed internally)
    pub id: usize,
    /// Display name (city name for JSON maps, the id otherwise)
    pub name: String,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Node {
    pub fn new(id: usize, name: impl Into<String>, x: f64, y: f64) -> Self {
        Node { id, name: name.into(), x, y }
    }

    /// Check if this node is the colony/home node
    pub fn is_home(&self) -> bool {
        self.id == 0
    }
}

/// Edge-weight functions from the TSP-LIB specification
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EdgeWeightType {
    /// Euclidean distance in the plane
    Euc2d,
    /// Euclidean distance rounded up
    Ceil2d,
    /// Geographical distance (x = longitude, y = latitude, in degrees)
    Geo,
    /// Pseudo-Euclidean distance (ATT instances)
    Att,
}

impl EdgeWeightType {
    /// Cost of travelling between two nodes
    pub fn cost(&self, a: &Node, b: &Node) -> f64 {
        match self {
            EdgeWeightType::Euc2d => euc_2d(a, b),
            EdgeWeightType::Ceil2d => euc_2d(a, b).ceil(),
            EdgeWeightType::Geo => geo(a, b),
            EdgeWeightType::Att => att(a, b),
        }
    }
}

fn euc_2d(a: &Node, b: &Node) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn geo(a: &Node, b: &Node) -> f64 {
    const RRR: f64 = 6378.388; // Earth radius in km

    let lon1 = to_radians(a.x);
    let lat1 = to_radians(a.y);
    let lon2 = to_radians(b.x);
    let lat2 = to_radians(b.y);

    let q1 = (lon1 - lon2).cos();
    let q2 = (lat1 - lat2).cos();
    let q3 = (lat1 + lat2).cos();

    RRR * (0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3)).acos() + 1.0
}

fn att(a: &Node, b: &Node) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let rij = ((dx * dx + dy * dy) / 10.0).sqrt();
    let tij = rij.round();
    if tij < rij {
        tij + 1.0
    } else {
        tij
    }
}

/// Represents a complete TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TspInstance {
    /// Name of the instance
    pub name: String,
    /// Comment/description
    pub comment: String,
    /// Edge-weight function used as the cost oracle
    pub edge_weight_type: EdgeWeightType,
    /// List of all nodes; index 0 is the colony/home node
    pub nodes: Vec<Node>,
}

impl TspInstance {
    /// Number of nodes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.nodes.len()
    }

    /// Build an instance from raw coordinates (Euclidean costs)
    pub fn from_points(name: &str, points: &[(f64, f64)]) -> Self {
        let nodes = points
            .iter()
            .enumerate()
            .map(|(id, &(x, y))| Node::new(id, id.to_string(), x, y))
            .collect();

        TspInstance {
            name: name.to_string(),
            comment: String::new(),
            edge_weight_type: EdgeWeightType::Euc2d,
            nodes,
        }
    }

    /// Load an instance from a file, dispatching on the extension:
    /// `.json` city maps, TSP-LIB otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(path),
            _ => Self::from_tsplib(path),
        }
    }

    /// Parse a TSP-LIB format file (`NODE_COORD_SECTION`)
    pub fn from_tsplib<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(&path).map_err(|e| format!("Cannot open file: {}", e))?;
        let reader = BufReader::new(file);

        let mut name = String::new();
        let mut comment = String::new();
        let mut dimension = 0usize;
        let mut edge_weight_type = EdgeWeightType::Euc2d;
        let mut coords: Vec<(usize, f64, f64)> = Vec::new();

        let mut in_coords = false;

        for line in reader.lines() {
            let line = line.map_err(|e| format!("Read error: {}", e))?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" {
                continue;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                in_coords = true;
                continue;
            }
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }

            if in_coords {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() >= 3 {
                    let id: usize = parts[0].parse().map_err(|_| "Invalid node id")?;
                    let x: f64 = parts[1].parse().map_err(|_| "Invalid x coordinate")?;
                    let y: f64 = parts[2].parse().map_err(|_| "Invalid y coordinate")?;
                    coords.push((id, x, y));
                }
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let value = value.trim();
                match key.trim() {
                    "NAME" => name = value.to_string(),
                    "COMMENT" => comment = value.to_string(),
                    "DIMENSION" => {
                        dimension = value.parse().map_err(|_| "Invalid dimension")?;
                    }
                    "EDGE_WEIGHT_TYPE" => {
                        edge_weight_type = match value {
                            "EUC_2D" => EdgeWeightType::Euc2d,
                            "CEIL_2D" => EdgeWeightType::Ceil2d,
                            "GEO" => EdgeWeightType::Geo,
                            "ATT" => EdgeWeightType::Att,
                            other => {
                                return Err(format!("Unsupported edge weight type: {}", other))
                            }
                        };
                    }
                    _ => {}
                }
            }
        }

        if dimension > 0 && coords.len() != dimension {
            return Err(format!(
                "DIMENSION is {} but {} coordinates were found",
                dimension,
                coords.len()
            ));
        }

        let nodes = coords
            .iter()
            .map(|&(id, x, y)| Node::new(id - 1, (id - 1).to_string(), x, y))
            .collect();

        Ok(TspInstance {
            name,
            comment,
            edge_weight_type,
            nodes,
        })
    }

    /// Parse a JSON city map: `{"City": [x, y]}` or `{"City": "(x, y)"}`.
    /// Cities are sorted by name; the first becomes the home node.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| format!("Cannot open file: {}", e))?;
        let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format!("Invalid JSON: {}", e))?;

        let map = value
            .as_object()
            .ok_or("Expected a JSON object mapping city names to coordinates")?;

        let mut cities: Vec<(String, f64, f64)> = Vec::with_capacity(map.len());
        for (city, coords) in map {
            let (x, y) = parse_coordinates(coords)
                .ok_or_else(|| format!("Invalid coordinates for city {:?}", city))?;
            cities.push((city.clone(), x, y));
        }
        cities.sort_by(|a, b| a.0.cmp(&b.0));

        let nodes = cities
            .into_iter()
            .enumerate()
            .map(|(id, (city, x, y))| Node::new(id, city, x, y))
            .collect();

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(TspInstance {
            name,
            comment: String::new(),
            edge_weight_type: EdgeWeightType::Euc2d,
            nodes,
        })
    }

    /// Cost of travelling between two nodes. Self-pairs cost 0.
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.edge_weight_type.cost(&self.nodes[i], &self.nodes[j])
    }

    /// Total cyclic tour length: consecutive edges plus the closing edge
    /// back to the first node
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }

        let mut length = 0.0;
        for i in 0..tour.len() - 1 {
            length += self.cost(tour[i], tour[i + 1]);
        }

        length += self.cost(tour[tour.len() - 1], tour[0]);

        length
    }

    /// Get statistics about the instance
    pub fn statistics(&self) -> InstanceStatistics {
        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::new();
        for i in 0..n {
            for j in i + 1..n {
                distances.push(self.cost(i, j));
            }
        }

        let (avg_distance, min_distance, max_distance) = if distances.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let avg = distances.iter().sum::<f64>() / distances.len() as f64;
            let min = distances.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = distances.iter().cloned().fold(0.0, f64::max);
            (avg, min, max)
        };

        InstanceStatistics {
            name: self.name.clone(),
            dimension: n,
            edge_weight_type: self.edge_weight_type,
            avg_distance,
            min_distance,
            max_distance,
        }
    }
}

fn parse_coordinates(value: &serde_json::Value) -> Option<(f64, f64)> {
    match value {
        serde_json::Value::Array(items) if items.len() == 2 => {
            Some((items[0].as_f64()?, items[1].as_f64()?))
        }
        // Legacy format: coordinates serialized as a "(x, y)" string
        serde_json::Value::String(s) => {
            let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
            let (x, y) = inner.split_once(',')?;
            Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
        }
        _ => None,
    }
}

/// Statistics about a TSP instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStatistics {
    pub name: String,
    pub dimension: usize,
    pub edge_weight_type: EdgeWeightType,
    pub avg_distance: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl std::fmt::Display for InstanceStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Instance: {}", self.name)?;
        writeln!(
            f,
            "  Nodes: {} (1 home + {} to visit)",
            self.dimension,
            self.dimension.saturating_sub(1)
        )?;
        writeln!(f, "  Edge weights: {:?}", self.edge_weight_type)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_euclidean_cost() {
        let instance = TspInstance::from_points("test", &[(0.0, 0.0), (3.0, 4.0)]);

        assert!((instance.cost(0, 1) - 5.0).abs() < 1e-10);
        assert!((instance.cost(1, 0) - 5.0).abs() < 1e-10);
        assert_eq!(instance.cost(0, 0), 0.0);
        assert_eq!(instance.cost(1, 1), 0.0);
    }

    #[test]
    fn test_ceil_cost() {
        let a = Node::new(0, "a", 0.0, 0.0);
        let b = Node::new(1, "b", 1.0, 1.0);
        let d = EdgeWeightType::Ceil2d.cost(&a, &b);
        assert_eq!(d, 2.0); // sqrt(2) rounded up
    }

    #[test]
    fn test_tour_length_includes_closing_edge() {
        let instance =
            TspInstance::from_points("triangle", &[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        // 3 + 4 + 5 back to the start
        let length = instance.tour_length(&[0, 1, 2]);
        assert!((length - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_tour_length_degenerate() {
        let instance = TspInstance::from_points("single", &[(0.0, 0.0)]);
        assert_eq!(instance.tour_length(&[0]), 0.0);
        assert_eq!(instance.tour_length(&[]), 0.0);
    }

    #[test]
    fn test_from_tsplib() {
        let path = std::env::temp_dir().join("aco_tsp_solver_test_parse.tsp");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "NAME: square4").unwrap();
        writeln!(file, "COMMENT: unit square").unwrap();
        writeln!(file, "TYPE: TSP").unwrap();
        writeln!(file, "DIMENSION: 4").unwrap();
        writeln!(file, "EDGE_WEIGHT_TYPE: EUC_2D").unwrap();
        writeln!(file, "NODE_COORD_SECTION").unwrap();
        writeln!(file, "1 0.0 0.0").unwrap();
        writeln!(file, "2 1.0 0.0").unwrap();
        writeln!(file, "3 1.0 1.0").unwrap();
        writeln!(file, "4 0.0 1.0").unwrap();
        writeln!(file, "EOF").unwrap();
        drop(file);

        let instance = TspInstance::from_tsplib(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.name, "square4");
        assert_eq!(instance.dimension(), 4);
        assert_eq!(instance.nodes[0].id, 0);
        assert!((instance.cost(0, 2) - 2f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_from_json_sorts_cities() {
        let path = std::env::temp_dir().join("aco_tsp_solver_test_cities.json");
        std::fs::write(
            &path,
            r#"{"Boston": [738.4, 190.8], "Austin": "(389.2, 448.4)", "Denver": [293.6, 274.0]}"#,
        )
        .unwrap();

        let instance = TspInstance::from_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(instance.dimension(), 3);
        assert_eq!(instance.nodes[0].name, "Austin");
        assert_eq!(instance.nodes[1].name, "Boston");
        assert_eq!(instance.nodes[2].name, "Denver");
        assert!((instance.nodes[0].x - 389.2).abs() < 1e-10);
        assert!(instance.nodes[0].is_home());
    }

    #[test]
    fn test_statistics() {
        let instance =
            TspInstance::from_points("triangle", &[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        let stats = instance.statistics();

        assert_eq!(stats.dimension, 3);
        assert!((stats.min_distance - 3.0).abs() < 1e-10);
        assert!((stats.max_distance - 5.0).abs() < 1e-10);
        assert!((stats.avg_distance - 4.0).abs() < 1e-10);
    }
}
