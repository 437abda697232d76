use anyhow::Result;
use tracing::info;

use crate::{
    config::Config,
    index::{AccessibilityIndex, HousingPoint, IndexEngine},
    park::{ParkFeature, ResolvedPark},
    resolve::{Resolution, Resolver},
    review::{Attributor, RatedPark, ReviewRecord},
};

/// Everything produced by one end-to-end run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub resolution: Resolution,
    pub rated: Vec<RatedPark>,
    pub index: AccessibilityIndex,
}

/// The three engines wired together under one [`Config`].
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self { Self { config } }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    /// Raw polygons to resolved parks.
    pub fn resolve(&self, features: Vec<ParkFeature>) -> Resolution {
        Resolver::new(self.config.resolve.clone()).resolve(features)
    }

    /// Resolved parks plus reviews to rated parks.
    pub fn rate(&self, parks: &[ResolvedPark], reviews: &[ReviewRecord]) -> Result<Vec<RatedPark>> {
        Attributor::new(self.config.review.clone(), self.config.projection)?.attribute(parks, reviews)
    }

    /// Rated parks plus housing points to the accessibility index.
    pub fn index(&self, parks: &[RatedPark], housing: &[HousingPoint]) -> Result<AccessibilityIndex> {
        IndexEngine::new(self.config.index.clone(), self.config.projection).score(parks, housing)
    }

    pub fn run(
        &self,
        features: Vec<ParkFeature>,
        reviews: &[ReviewRecord],
        housing: &[HousingPoint],
    ) -> Result<PipelineOutput> {
        info!("[pipeline] {} park features, {} reviews, {} housing points", features.len(), reviews.len(), housing.len());
        let resolution = self.resolve(features);
        let rated = self.rate(&resolution.parks, reviews)?;
        let index = self.index(&rated, housing)?;
        Ok(PipelineOutput { resolution, rated, index })
    }
}
