//! Geometry utilities shared by every engine: planar predicates, validation,
//! metric projection and buffering, and an R-tree backed shape collection.
mod algorithm;
mod bbox;
mod geom;
mod predicates;
mod validate;

pub use algorithm::{buffer, Buffer, ProjectionKind, Projector, DEFAULT_CIRCLE_SEGMENTS};
pub(crate) use geom::{union_all, Geometries};
pub use predicates::{area, contains, equals, intersects};
pub(crate) use predicates::{relation, PairRelation};
pub use validate::{validate, GeometryIssue};
