use std::fmt;

use crate::geom::GeometryIssue;

/// Why an input feature never entered the resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InvalidGeometry(GeometryIssue),
    /// Another feature earlier in the input already used this identifier.
    DuplicateId,
    /// An earlier unnamed feature, `of`, has the same geometry.
    DuplicateGeometry { of: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidGeometry(issue) => write!(f, "invalid geometry: {issue}"),
            SkipReason::DuplicateId => write!(f, "duplicate identifier"),
            SkipReason::DuplicateGeometry { of } => write!(f, "same geometry as unnamed feature {of}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    pub id: String,
    pub reason: SkipReason,
}

/// A synthetic park and the identifiers of the unnamed polygons it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCluster {
    pub id: String,
    pub members: Vec<String>,
}

/// What happened to each input identifier during one resolution pass.
///
/// Every input feature is accounted for once across the resolved park set, the members
/// of `merged`, and the four removal lists. A repeated identifier therefore shows up once
/// for the feature that was kept and once more in `skipped` for each later copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionReport {
    /// Intersection graph edges between unnamed polygons, before removals were applied.
    pub intersection_edges: Vec<(String, String)>,
    /// Unnamed polygons dropped because they intersect a named park.
    pub unnamed_removed: Vec<String>,
    /// Named parks dropped because they lie inside another named park.
    pub contained_removed: Vec<String>,
    /// Identifiers dropped because they are on the configured removal list.
    pub manually_removed: Vec<String>,
    pub merged: Vec<MergedCluster>,
    pub skipped: Vec<SkippedFeature>,
}

impl ResolutionReport {
    /// Identifiers of every input removed for any reason, including skipped features.
    pub fn removed_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.unnamed_removed.iter()
            .chain(&self.contained_removed)
            .chain(&self.manually_removed)
            .map(String::as_str)
            .chain(self.skipped.iter().map(|skipped| skipped.id.as_str()))
    }

    /// Identifiers of inputs folded into a merged park.
    pub fn merged_member_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.merged.iter().flat_map(|cluster| cluster.members.iter().map(String::as_str))
    }

    /// True if the pass changed nothing: no merges, removals or skips.
    pub fn is_fixed_point(&self) -> bool {
        self.merged.is_empty() && self.removed_ids().next().is_none()
    }
}
