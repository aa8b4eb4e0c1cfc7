//! On-disk description of the warehouse graph.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::route::heading::Heading;

/// A node of the warehouse graph.
///
/// Serialized as `{"zone": 3}` or `{"intersection": 7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeId {
    Zone(u32),
    Intersection(u32),
}

impl NodeId {
    pub fn is_intersection(&self) -> bool {
        matches!(self, Self::Intersection(_))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone(id) => write!(f, "Z{id}"),
            Self::Intersection(id) => write!(f, "I{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub id: u32,
    pub name: String,
    pub center: [f64; 2],
    /// `[x1, y1, x2, y2]` footprint on the map.
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionSpec {
    pub id: u32,
    pub position: [f64; 2],
    /// Neighbor reached by leaving the intersection towards each heading.
    #[serde(default)]
    pub memory: BTreeMap<Heading, NodeId>,
}

/// A drawn line segment joining two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub start: NodeId,
    pub end: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSpec {
    pub custom_id: String,
    /// Heading of travel when the tag is read.
    pub entry_direction: Heading,
    /// Intersection the tag is mounted at.
    #[serde(default)]
    pub assigned_to: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSchema {
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub intersections: Vec<IntersectionSpec>,
    #[serde(default)]
    pub lines: Vec<LineSpec>,
    #[serde(default)]
    pub tags: Vec<TagSpec>,
}

impl GraphSchema {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schema() {
        let json = r#"{
            "zones": [{"id": 1, "name": "Dock", "center": [0, 100]}],
            "intersections": [
                {"id": 1, "position": [100, 100], "memory": {"W": {"zone": 1}}}
            ],
            "lines": [{"start": {"zone": 1}, "end": {"intersection": 1}}],
            "tags": [{"custom_id": "T1", "entry_direction": "E", "assigned_to": 1}]
        }"#;
        let schema = GraphSchema::from_json_str(json).unwrap();

        assert_eq!(schema.zones[0].name, "Dock");
        assert_eq!(schema.zones[0].bbox, None);
        assert_eq!(schema.intersections[0].memory[&Heading::W], NodeId::Zone(1));
        assert_eq!(schema.lines[0].end, NodeId::Intersection(1));
        assert_eq!(schema.tags[0].entry_direction, Heading::E);
    }

    #[test]
    fn test_missing_file() {
        let err = GraphSchema::from_json_file("/nonexistent/graph.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_node_display() {
        assert_eq!(NodeId::Zone(4).to_string(), "Z4");
        assert_eq!(NodeId::Intersection(2).to_string(), "I2");
    }
}
