//! Warehouse navigation: zone-to-zone routes, turns and tag checkpoints.

mod heading;
mod resolver;
mod schema;
mod tag;

pub use heading::{Heading, Turn, relative_turn};
pub use resolver::{Route, RouteResolver, TurnAt, ZoneAliases};
pub use schema::{GraphSchema, IntersectionSpec, LineSpec, NodeId, TagSpec, ZoneSpec};
pub use tag::Tag;
