//! Shortest routes between warehouse zones.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::Path;

use log::{debug, info};
use nalgebra::Point2;

use crate::error::RouteError;
use crate::route::heading::{Heading, Turn, relative_turn};
use crate::route::schema::{GraphSchema, NodeId};
use crate::route::tag::Tag;

/// Display names of the zones; no two zones may share a name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneAliases {
    by_zone: BTreeMap<u32, String>,
}

impl ZoneAliases {
    pub fn zone_for(&self, alias: &str) -> Option<u32> {
        self.by_zone
            .iter()
            .find_map(|(&id, name)| (name == alias).then_some(id))
    }

    pub fn alias_of(&self, zone: u32) -> Option<&str> {
        self.by_zone.get(&zone).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.by_zone.iter().map(|(&id, name)| (id, name.as_str()))
    }

    /// Bind `alias` to `zone`, rejecting aliases held by another zone.
    pub fn bind(&mut self, zone: u32, alias: &str) -> Result<(), RouteError> {
        match self.zone_for(alias) {
            Some(owner) if owner != zone => Err(RouteError::AliasTaken {
                alias: alias.to_string(),
                zone: owner,
            }),
            _ => {
                self.by_zone.insert(zone, alias.to_string());
                Ok(())
            }
        }
    }

    /// Rename the zone currently called `existing` to `new_alias`.
    ///
    /// The table is left untouched on error.
    pub fn rename(&mut self, existing: &str, new_alias: &str) -> Result<u32, RouteError> {
        let zone = self
            .zone_for(existing)
            .ok_or_else(|| RouteError::UnknownZone(existing.to_string()))?;
        self.bind(zone, new_alias)?;
        Ok(zone)
    }
}

/// Turn taken at one intersection of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAt {
    pub node: NodeId,
    /// Side of the intersection the robot arrives from.
    pub entry: Heading,
    /// Side of the intersection the robot leaves through.
    pub exit: Heading,
    pub turn: Turn,
}

/// A planned route between two zones.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<NodeId>,
    pub turns: Vec<TurnAt>,
    /// Tags that can be read along the route, in path order.
    pub tags: Vec<String>,
}

impl Route {
    pub fn direction_codes(&self) -> Vec<u8> {
        self.turns.iter().map(|t| t.turn.code()).collect()
    }

    pub fn expects_tag(&self, custom_id: &str) -> bool {
        self.tags.iter().any(|t| t == custom_id)
    }

    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// The warehouse graph, loaded once and queried for routes.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    positions: HashMap<NodeId, Point2<f64>>,
    adjacency: HashMap<NodeId, Vec<NodeId>>,
    tags: Vec<Tag>,
    aliases: ZoneAliases,
}

impl RouteResolver {
    pub fn from_schema(schema: &GraphSchema) -> Result<Self, RouteError> {
        let mut positions = HashMap::new();
        let mut aliases = ZoneAliases::default();
        for zone in &schema.zones {
            let node = NodeId::Zone(zone.id);
            if positions.insert(node, Point2::from(zone.center)).is_some() {
                return Err(RouteError::DuplicateNode(node));
            }
            aliases.bind(zone.id, &zone.name)?;
        }
        let mut memories = HashMap::new();
        for inter in &schema.intersections {
            let node = NodeId::Intersection(inter.id);
            if positions.insert(node, Point2::from(inter.position)).is_some() {
                return Err(RouteError::DuplicateNode(node));
            }
            memories.insert(inter.id, &inter.memory);
        }

        let mut adjacency: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for line in &schema.lines {
            for node in [line.start, line.end] {
                if !positions.contains_key(&node) {
                    return Err(RouteError::DanglingReference(node));
                }
            }
            for (a, b) in [(line.start, line.end), (line.end, line.start)] {
                let neighbors = adjacency.entry(a).or_default();
                if !neighbors.contains(&b) {
                    neighbors.push(b);
                }
            }
        }

        let tags = schema
            .tags
            .iter()
            .map(|spec| {
                let memory = spec.assigned_to.and_then(|id| memories.get(&id).copied());
                Tag::new(spec, memory)
            })
            .collect();

        debug!(
            "loaded graph: {} nodes, {} lines, {} tags",
            positions.len(),
            schema.lines.len(),
            schema.tags.len()
        );
        Ok(Self {
            positions,
            adjacency,
            tags,
            aliases,
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        Self::from_schema(&GraphSchema::from_json_file(path)?)
    }

    pub fn aliases(&self) -> &ZoneAliases {
        &self.aliases
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag(&self, custom_id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.custom_id == custom_id)
    }

    pub fn position(&self, node: NodeId) -> Option<Point2<f64>> {
        self.positions.get(&node).copied()
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rename a zone; fails if `new_alias` already names another zone.
    pub fn rename(&mut self, existing: &str, new_alias: &str) -> Result<(), RouteError> {
        let zone = self.aliases.rename(existing, new_alias)?;
        info!("zone {zone} renamed '{existing}' -> '{new_alias}'");
        Ok(())
    }

    pub fn zone_node(&self, alias: &str) -> Result<NodeId, RouteError> {
        self.aliases
            .zone_for(alias)
            .map(NodeId::Zone)
            .ok_or_else(|| RouteError::UnknownZone(alias.to_string()))
    }

    /// Fewest-hop path by breadth-first search, `None` when disconnected.
    ///
    /// Among equally short paths the first one discovered wins, so the
    /// result follows the order of the lines in the schema.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if !self.positions.contains_key(&from) || !self.positions.contains_key(&to) {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }

        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut visited = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);

        while let Some(node) = queue.pop_front() {
            for &next in self.neighbors(node) {
                if !visited.insert(next) {
                    continue;
                }
                parent.insert(next, node);
                if next == to {
                    let mut path = vec![to];
                    let mut cur = to;
                    while let Some(&p) = parent.get(&cur) {
                        path.push(p);
                        cur = p;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// Turn at every intersection strictly inside `path`.
    pub fn annotate_turns(&self, path: &[NodeId]) -> Vec<TurnAt> {
        path.windows(3)
            .filter(|w| w[1].is_intersection())
            .filter_map(|w| {
                let here = self.position(w[1])?;
                let entry = Heading::from_delta(&(self.position(w[0])? - here))?;
                let exit = Heading::from_delta(&(self.position(w[2])? - here))?;
                Some(TurnAt {
                    node: w[1],
                    entry,
                    exit,
                    turn: relative_turn(entry, exit),
                })
            })
            .collect()
    }

    /// Tags that will be read along `path`, in either travel direction.
    pub fn candidate_tags(&self, path: &[NodeId]) -> Vec<&Tag> {
        let mut hits: Vec<(usize, usize)> = Vec::new();
        for (i, w) in path.windows(3).enumerate() {
            let NodeId::Intersection(here) = w[1] else {
                continue;
            };
            for (prev, next) in [(w[0], w[2]), (w[2], w[0])] {
                for (t, tag) in self.tags.iter().enumerate() {
                    if tag.assigned_to == Some(here) && tag.fits_transition(prev, next) {
                        hits.push((i, t));
                    }
                }
            }
        }

        hits.sort_by_key(|&(i, _)| i);
        let mut seen = HashSet::new();
        hits.into_iter()
            .filter(|&(_, t)| seen.insert(t))
            .map(|(_, t)| &self.tags[t])
            .collect()
    }

    /// Resolve zone names, find the path and annotate it.
    pub fn plan_route(&self, source: &str, target: &str) -> Result<Route, RouteError> {
        let from = self.zone_node(source)?;
        let to = self.zone_node(target)?;
        let path = self
            .shortest_path(from, to)
            .ok_or(RouteError::NoPath { from, to })?;
        let turns = self.annotate_turns(&path);
        let tags = self
            .candidate_tags(&path)
            .into_iter()
            .map(|t| t.custom_id.clone())
            .collect();

        let route = Route { path, turns, tags };
        info!(
            "route {source} -> {target}: {} hops, turns {:?}, tags {:?}",
            route.hops(),
            route.direction_codes(),
            route.tags
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::schema::{IntersectionSpec, LineSpec, ZoneSpec};

    fn zone(id: u32, name: &str, center: [f64; 2]) -> ZoneSpec {
        ZoneSpec {
            id,
            name: name.into(),
            center,
            bbox: None,
        }
    }

    fn inter(id: u32, position: [f64; 2]) -> IntersectionSpec {
        IntersectionSpec {
            id,
            position,
            memory: BTreeMap::new(),
        }
    }

    fn line(start: NodeId, end: NodeId) -> LineSpec {
        LineSpec { start, end }
    }

    /// Z1 - I1 - I2 - Z2 with a detour I1 - I3 - I2, and Z3 on its own.
    fn five_nodes() -> RouteResolver {
        let (z1, z2) = (NodeId::Zone(1), NodeId::Zone(2));
        let (i1, i2, i3) = (
            NodeId::Intersection(1),
            NodeId::Intersection(2),
            NodeId::Intersection(3),
        );
        let schema = GraphSchema {
            zones: vec![
                zone(1, "Dock", [0.0, 0.0]),
                zone(2, "Shelf", [300.0, 0.0]),
                zone(3, "Island", [900.0, 900.0]),
            ],
            intersections: vec![
                inter(1, [100.0, 0.0]),
                inter(2, [200.0, 0.0]),
                inter(3, [150.0, 100.0]),
            ],
            lines: vec![
                line(z1, i1),
                line(i1, i3),
                line(i3, i2),
                line(i1, i2),
                line(i2, z2),
            ],
            tags: vec![],
        };
        RouteResolver::from_schema(&schema).unwrap()
    }

    #[test]
    fn test_bfs_finds_minimum_hops() {
        let resolver = five_nodes();
        let path = resolver
            .shortest_path(NodeId::Zone(1), NodeId::Zone(2))
            .unwrap();
        assert_eq!(
            path,
            vec![
                NodeId::Zone(1),
                NodeId::Intersection(1),
                NodeId::Intersection(2),
                NodeId::Zone(2)
            ]
        );
    }

    #[test]
    fn test_disconnected_is_none() {
        let resolver = five_nodes();
        assert!(resolver.shortest_path(NodeId::Zone(1), NodeId::Zone(3)).is_none());
        assert!(matches!(
            resolver.plan_route("Dock", "Island"),
            Err(RouteError::NoPath { .. })
        ));
    }

    #[test]
    fn test_trivial_and_unknown_nodes() {
        let resolver = five_nodes();
        assert_eq!(
            resolver.shortest_path(NodeId::Zone(1), NodeId::Zone(1)),
            Some(vec![NodeId::Zone(1)])
        );
        assert!(resolver.shortest_path(NodeId::Zone(1), NodeId::Zone(42)).is_none());
    }

    #[test]
    fn test_straight_through_is_back() {
        let resolver = five_nodes();
        let route = resolver.plan_route("Dock", "Shelf").unwrap();
        assert_eq!(route.turns.len(), 2);
        assert!(route.turns.iter().all(|t| t.turn == Turn::Back));
        assert_eq!(route.direction_codes(), vec![4, 4]);
    }

    #[test]
    fn test_rename_keeps_aliases_injective() {
        let mut resolver = five_nodes();
        let before = resolver.aliases().clone();

        let err = resolver.rename("Dock", "Shelf").unwrap_err();
        assert!(matches!(err, RouteError::AliasTaken { zone: 2, .. }));
        assert_eq!(resolver.aliases(), &before);

        resolver.rename("Dock", "Inbound").unwrap();
        assert_eq!(resolver.zone_node("Inbound").unwrap(), NodeId::Zone(1));
        assert!(resolver.zone_node("Dock").is_err());

        // Renaming to the current name is allowed.
        resolver.rename("Inbound", "Inbound").unwrap();
    }

    #[test]
    fn test_dangling_line_rejected() {
        let schema = GraphSchema {
            zones: vec![zone(1, "Dock", [0.0, 0.0])],
            lines: vec![line(NodeId::Zone(1), NodeId::Intersection(9))],
            ..Default::default()
        };
        assert!(matches!(
            RouteResolver::from_schema(&schema),
            Err(RouteError::DanglingReference(NodeId::Intersection(9)))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let schema = GraphSchema {
            zones: vec![zone(1, "Dock", [0.0, 0.0]), zone(1, "Shelf", [300.0, 0.0])],
            ..Default::default()
        };
        assert!(matches!(
            RouteResolver::from_schema(&schema),
            Err(RouteError::DuplicateNode(NodeId::Zone(1)))
        ));

        let schema = GraphSchema {
            intersections: vec![inter(4, [0.0, 0.0]), inter(4, [50.0, 0.0])],
            ..Default::default()
        };
        assert!(matches!(
            RouteResolver::from_schema(&schema),
            Err(RouteError::DuplicateNode(NodeId::Intersection(4)))
        ));
    }

    #[test]
    fn test_duplicate_zone_names_rejected() {
        let schema = GraphSchema {
            zones: vec![zone(1, "Dock", [0.0, 0.0]), zone(2, "Dock", [1.0, 0.0])],
            ..Default::default()
        };
        assert!(matches!(
            RouteResolver::from_schema(&schema),
            Err(RouteError::AliasTaken { zone: 1, .. })
        ));
    }
}
