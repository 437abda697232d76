use std::{collections::BTreeMap, fmt};

use geo::MultiPolygon;
use serde_json::Value;

use crate::geom;

/// Name given to polygons that arrive without one.
pub const UNNAMED_PARK: &str = "Unnamed Park";

/// Name given to the union of a cluster of unnamed polygons.
pub const UNNAMED_MERGED_PARK: &str = "Unnamed Merged Park";

/// Park name with the two sentinel names lifted into variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParkName {
    Named(String),
    Unnamed,
    Merged,
}

impl ParkName {
    /// Standardize a raw name: absent or blank becomes `Unnamed`, sentinel strings map back to their variants.
    pub fn from_raw(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            None | Some("") => ParkName::Unnamed,
            Some(UNNAMED_PARK) => ParkName::Unnamed,
            Some(UNNAMED_MERGED_PARK) => ParkName::Merged,
            Some(name) => ParkName::Named(name.to_string()),
        }
    }

    /// True for real names, false for either sentinel.
    #[inline] pub fn is_named(&self) -> bool { matches!(self, ParkName::Named(_)) }

    pub fn as_str(&self) -> &str {
        match self {
            ParkName::Named(name) => name,
            ParkName::Unnamed => UNNAMED_PARK,
            ParkName::Merged => UNNAMED_MERGED_PARK,
        }
    }
}

impl fmt::Display for ParkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw park polygon with its provenance tags (e.g. `leisure`, `landuse`).
#[derive(Debug, Clone, PartialEq)]
pub struct ParkFeature {
    pub id: String,
    pub name: ParkName,
    pub geometry: MultiPolygon<f64>,
    pub tags: BTreeMap<String, Value>,
}

impl ParkFeature {
    pub fn new(id: impl Into<String>, name: Option<&str>, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            id: id.into(),
            name: ParkName::from_raw(name),
            geometry: geometry.into(),
            tags: BTreeMap::new(),
        }
    }

    /// Attach a provenance tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// A park that survived resolution, either as an input feature or as a merged cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPark {
    pub feature: ParkFeature,
    pub is_merged: bool,
}

impl ResolvedPark {
    #[inline] pub fn id(&self) -> &str { &self.feature.id }

    #[inline] pub fn name(&self) -> &ParkName { &self.feature.name }

    #[inline] pub fn geometry(&self) -> &MultiPolygon<f64> { &self.feature.geometry }

    /// Planar area in squared degrees.
    #[inline] pub fn area(&self) -> f64 { geom::area(&self.feature.geometry) }
}
