use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geom::{ProjectionKind, DEFAULT_CIRCLE_SEGMENTS};

/// Settings for every engine. Missing fields in a config file fall back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolve: ResolveConfig,
    pub review: ReviewConfig,
    pub index: IndexConfig,
    /// Metric CRS used for every buffer.
    pub projection: ProjectionKind,
}

/// Polygon resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Identifiers removed regardless of geometry. Used for duplicates that differ only by
    /// coordinate rounding and so escape the containment check.
    pub manual_removals: Vec<String>,
    /// Seed for the generator of merged-park identifiers.
    pub merged_id_seed: u64,
    /// Prefix for merged-park identifiers.
    pub merged_id_prefix: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            manual_removals: Vec::new(),
            merged_id_seed: 2024,
            merged_id_prefix: "merged-".to_string(),
        }
    }
}

/// What an unreviewed park contributes to the rating index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnratedPolicy {
    /// Unrated parks count as rating 0; housing left at 0 is backfilled with the dataset mean.
    #[default]
    Zero,
    /// Unrated parks take the mean of all non-zero park ratings.
    DatasetMean,
}

/// Review attribution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Radius used to buffer review points that arrive without a footprint.
    pub buffer_meters: f64,
    /// Whether suffix stripping and similarity compare names case-sensitively.
    pub case_sensitive: bool,
    /// Generic words removed from park and review names before comparison.
    pub suffixes: Vec<String>,
    /// Minimum (exclusive) Jaro-Winkler similarity for ordinary names.
    pub threshold: f64,
    /// Minimum (exclusive) Jaro-Winkler similarity for numbered parks such as "No. 593".
    pub numbered_threshold: f64,
    pub unrated_policy: UnratedPolicy,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            buffer_meters: 250.0,
            case_sensitive: true,
            suffixes: ["Park", "park", "Garden", "Field", "Playground"].map(String::from).to_vec(),
            threshold: 0.85,
            numbered_threshold: 0.97,
            unrated_policy: UnratedPolicy::Zero,
        }
    }
}

/// Accessibility index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Walking distance around each housing point, in meters.
    pub walk_meters: f64,
    /// Segments used to approximate each buffer circle.
    pub circle_segments: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { walk_meters: 1000.0, circle_segments: DEFAULT_CIRCLE_SEGMENTS }
    }
}

impl Config {
    /// Read a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_json_slice(&bytes)
            .with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    /// Parse a config from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("[config] Failed to parse config JSON")
    }

    /// Defaults plus the hand-curated Chicago park duplicates that containment checks miss.
    pub fn chicago() -> Self {
        let mut config = Self::default();
        config.resolve.manual_removals = [
            "242304191", "747168477", "747168489", "747184016", "747184053", "860267019",
        ].map(String::from).to_vec();
        config
    }
}
