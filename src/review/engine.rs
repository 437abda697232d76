use anyhow::{Context, Result};
use geo::{BoundingRect, Coord, MultiPolygon, Rect};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    config::ReviewConfig,
    geom::{Buffer, Geometries, ProjectionKind, Projector, DEFAULT_CIRCLE_SEGMENTS},
    park::{ParkName, ResolvedPark},
    review::{mean_rating, NameMatcher, ParkRating, ReviewRecord},
};

/// A resolved park together with the reviews attributed to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedPark {
    pub park: ResolvedPark,
    pub rating: ParkRating,
    /// Rating fed to the index, after the unrated policy is applied.
    pub effective_rating: f64,
}

impl RatedPark {
    /// Last matched review name, falling back to the park's own name.
    pub fn display_name(&self) -> &str {
        self.rating.matched_name.as_deref().unwrap_or_else(|| self.park.name().as_str())
    }
}

/// Attaches review ratings to resolved parks.
///
/// A park first collects every review whose footprint intersects it. Parks with a real
/// name then replace that set with the reviews whose names match theirs, even when the
/// name match comes back empty.
#[derive(Debug, Clone)]
pub struct Attributor {
    config: ReviewConfig,
    projection: ProjectionKind,
    matcher: NameMatcher,
}

impl Attributor {
    pub fn new(config: ReviewConfig, projection: ProjectionKind) -> Result<Self> {
        let matcher = NameMatcher::new(&config)?;
        Ok(Self { config, projection, matcher })
    }

    #[inline] pub fn matcher(&self) -> &NameMatcher { &self.matcher }

    /// Footprint of every review: its precomputed geometry, or its point buffered by
    /// `buffer_meters`. Reviews with a non-finite location get an empty footprint.
    pub fn footprints(&self, reviews: &[ReviewRecord]) -> Result<Vec<MultiPolygon<f64>>> {
        let pending = reviews.iter()
            .filter(|review| review.footprint.is_none() && is_finite(review.coord.0))
            .map(|review| review.coord.0)
            .collect::<Vec<_>>();

        let projector = if pending.is_empty() { None }
            else { Some(Projector::for_bounds(self.projection, point_bounds(&pending))?) };

        reviews.iter()
            .map(|review| match (&review.footprint, &projector) {
                (Some(footprint), _) => Ok(footprint.clone()),
                (None, Some(projector)) if is_finite(review.coord.0) => review.coord
                    .buffer_with(projector, self.config.buffer_meters, DEFAULT_CIRCLE_SEGMENTS)
                    .with_context(|| format!("[review] Failed to buffer review location for {:?}", review.name)),
                (None, _) => {
                    warn!("[review] review {:?} has no usable location", review.name);
                    Ok(MultiPolygon(vec![]))
                }
            })
            .collect()
    }

    /// Rate every park from `reviews`. Output order follows `parks`.
    pub fn attribute(&self, parks: &[ResolvedPark], reviews: &[ReviewRecord]) -> Result<Vec<RatedPark>> {
        let footprints = Geometries::new(self.footprints(reviews)?);
        let cleaned = reviews.iter().map(|review| self.matcher.clean(&review.name)).collect::<Vec<_>>();

        let ratings = parks.par_iter()
            .map(|park| {
                let matched: Vec<usize> = match park.name() {
                    ParkName::Named(name) => {
                        let query = self.matcher.park(name);
                        (0..reviews.len()).filter(|&i| query.matches_cleaned(&cleaned[i])).collect()
                    }
                    ParkName::Unnamed | ParkName::Merged => footprints.intersecting(park.geometry()).to_vec(),
                };
                ParkRating::aggregate(park.id(), park.area(), matched.iter().map(|&i| &reviews[i]))
            })
            .collect::<Vec<_>>();

        let dataset_mean = mean_rating(&ratings);
        let rated = ratings.iter().filter(|rating| rating.rating.is_rated()).count();
        info!("[review] {} of {} parks rated from {} reviews", rated, parks.len(), reviews.len());
        debug!("[review] dataset mean rating {:.3}, unrated policy {:?}", dataset_mean, self.config.unrated_policy);

        Ok(parks.iter().zip(ratings)
            .map(|(park, rating)| RatedPark {
                effective_rating: rating.effective_rating(self.config.unrated_policy, dataset_mean),
                park: park.clone(),
                rating,
            })
            .collect())
    }
}

fn is_finite(coord: Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

fn point_bounds(coords: &[Coord<f64>]) -> Option<Rect<f64>> {
    geo::MultiPoint::from(coords.iter().map(|&c| geo::Point(c)).collect::<Vec<_>>()).bounding_rect()
}
