//! Polygon resolution: turns raw, overlapping park polygons into a clean park set.
//!
//! Unnamed polygons that intersect each other are merged into one synthetic park per
//! connected component. Unnamed polygons that intersect a named park are dropped, as are
//! named parks lying entirely inside another named park.
mod classify;
mod cluster;
mod engine;
mod merge;
mod report;

pub use engine::{Resolution, Resolver};
pub use report::{MergedCluster, ResolutionReport, SkipReason, SkippedFeature};
