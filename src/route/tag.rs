//! RFID/NFC checkpoints mounted at intersections.

use std::collections::BTreeMap;

use crate::route::heading::{Heading, Turn, relative_turn};
use crate::route::schema::{NodeId, TagSpec};

/// A tag together with the neighbors reachable from its intersection.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub custom_id: String,
    pub entry_direction: Heading,
    pub assigned_to: Option<u32>,
    /// Neighbor for each turn, relative to `entry_direction`.
    pub exits: BTreeMap<Turn, NodeId>,
}

impl Tag {
    /// Derive exits from the memory of the intersection the tag is assigned to.
    pub fn new(spec: &TagSpec, memory: Option<&BTreeMap<Heading, NodeId>>) -> Self {
        let exits = memory
            .map(|memory| {
                memory
                    .iter()
                    .map(|(&heading, &node)| (relative_turn(spec.entry_direction, heading), node))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            custom_id: spec.custom_id.clone(),
            entry_direction: spec.entry_direction,
            assigned_to: spec.assigned_to,
            exits,
        }
    }

    pub fn exit(&self, turn: Turn) -> Option<NodeId> {
        self.exits.get(&turn).copied()
    }

    pub fn leads_to(&self, node: NodeId) -> bool {
        self.exits.values().any(|&n| n == node)
    }

    /// Whether the tag is read when passing its intersection from `prev` to `next`.
    pub fn fits_transition(&self, prev: NodeId, next: NodeId) -> bool {
        self.exit(Turn::Back) == Some(prev) && self.leads_to(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exits_follow_entry_direction() {
        let memory = BTreeMap::from([
            (Heading::W, NodeId::Intersection(1)),
            (Heading::S, NodeId::Intersection(3)),
        ]);
        let spec = TagSpec {
            custom_id: "T2".into(),
            entry_direction: Heading::E,
            assigned_to: Some(2),
        };
        let tag = Tag::new(&spec, Some(&memory));

        assert_eq!(tag.exit(Turn::Back), Some(NodeId::Intersection(1)));
        assert_eq!(tag.exit(Turn::Left), Some(NodeId::Intersection(3)));
        assert!(tag.fits_transition(NodeId::Intersection(1), NodeId::Intersection(3)));
        assert!(!tag.fits_transition(NodeId::Intersection(3), NodeId::Intersection(1)));
    }

    #[test]
    fn test_unassigned_tag_has_no_exits() {
        let spec = TagSpec {
            custom_id: "loose".into(),
            entry_direction: Heading::N,
            assigned_to: None,
        };
        let tag = Tag::new(&spec, None);
        assert!(tag.exits.is_empty());
    }
}
