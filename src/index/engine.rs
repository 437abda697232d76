use anyhow::{Context, Result};
use geo::{BoundingRect, MultiPoint, MultiPolygon};
use tracing::{debug, info, warn};

use crate::{
    config::IndexConfig,
    geom::{Buffer, Geometries, ProjectionKind, Projector},
    index::{reach::reachable, HousingPoint, NormalizationStats},
    review::RatedPark,
};

/// Accessibility scores of one housing point.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessibilityRecord {
    pub id: usize,
    pub park_count: usize,
    /// Identifiers of the reachable parks, in park order.
    pub park_ids: Vec<String>,
    /// Sum of reachable park areas.
    pub raw_size_index: f64,
    /// Sum of reachable park areas weighted by rating, before backfill.
    pub raw_rating_index: f64,
    /// `raw_size_index` rescaled to `0..=100`.
    pub size_index: f64,
    /// Backfilled `raw_rating_index` rescaled to `0..=100`.
    pub rating_index: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Scored housing points and the constants used to normalize them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessibilityIndex {
    pub records: Vec<AccessibilityRecord>,
    pub stats: NormalizationStats,
}

/// Scores housing points by the parks within walking distance.
#[derive(Debug, Clone, Default)]
pub struct IndexEngine {
    config: IndexConfig,
    projection: ProjectionKind,
}

impl IndexEngine {
    pub fn new(config: IndexConfig, projection: ProjectionKind) -> Self {
        Self { config, projection }
    }

    #[inline] pub fn config(&self) -> &IndexConfig { &self.config }

    /// Walking-distance buffer around every housing point, in lon/lat.
    /// Points with a non-finite coordinate get an empty buffer.
    pub fn buffers(&self, housing: &[HousingPoint]) -> Result<Vec<MultiPolygon<f64>>> {
        let finite = housing.iter()
            .filter(|point| point.coord.x().is_finite() && point.coord.y().is_finite())
            .map(|point| point.coord)
            .collect::<Vec<_>>();
        if finite.is_empty() {
            return Ok(vec![MultiPolygon(vec![]); housing.len()]);
        }
        let projector = Projector::for_bounds(self.projection, MultiPoint(finite).bounding_rect())?;

        housing.iter()
            .map(|point| {
                if !(point.coord.x().is_finite() && point.coord.y().is_finite()) {
                    warn!("[index] housing point {} has a non-finite coordinate", point.id);
                    return Ok(MultiPolygon(vec![]));
                }
                point.coord.buffer_with(&projector, self.config.walk_meters, self.config.circle_segments)
                    .with_context(|| format!("[index] Failed to buffer housing point {}", point.id))
            })
            .collect()
    }

    /// Score every housing point against `parks`. Output order follows `housing`.
    pub fn score(&self, parks: &[RatedPark], housing: &[HousingPoint]) -> Result<AccessibilityIndex> {
        let buffers = self.buffers(housing)?;
        let shapes = Geometries::new(parks.iter().map(|park| park.park.geometry().clone()).collect());
        let reached = reachable(&buffers, &shapes);

        let raw = reached.iter()
            .map(|found| found.iter().fold((0.0, 0.0), |(size, rating), &j| {
                let area = parks[j].rating.area;
                (size + area, rating + area * parks[j].effective_rating)
            }))
            .collect::<Vec<_>>();

        let stats = NormalizationStats::from_raw(raw.iter().copied());
        debug!(
            "[index] max size {:.6e}, max rating {:.6e}, mean rating {:.6e}",
            stats.max_size, stats.max_rating, stats.mean_rating,
        );

        let records = housing.iter().zip(&reached).zip(&raw)
            .map(|((point, found), &(raw_size, raw_rating))| AccessibilityRecord {
                id: point.id,
                park_count: found.len(),
                park_ids: found.iter().map(|&j| parks[j].park.id().to_string()).collect(),
                raw_size_index: raw_size,
                raw_rating_index: raw_rating,
                size_index: stats.size(raw_size),
                rating_index: stats.rating(raw_rating),
                latitude: point.latitude(),
                longitude: point.longitude(),
            })
            .collect::<Vec<_>>();

        let served = records.iter().filter(|record| record.park_count > 0).count();
        info!(
            "[index] {} housing points scored, {} within {} m of a park",
            records.len(), served, self.config.walk_meters,
        );

        Ok(AccessibilityIndex { records, stats })
    }
}
