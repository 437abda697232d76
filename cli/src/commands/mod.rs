pub mod index;
pub mod rate;
pub mod resolve;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::Result;
use greenspace::{Config, ProjectionKind, UnratedPolicy};

use crate::cli::{Cli, IndexOptions, Projection, ResolveOptions, ReviewOptions};

/// Config from the preset or file, with global flags applied.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None if cli.chicago => Config::chicago(),
        None => Config::default(),
    };
    if cli.chicago && cli.config.is_some() {
        config.resolve.manual_removals.extend(Config::chicago().resolve.manual_removals);
    }
    if let Some(projection) = cli.projection {
        config.projection = match projection {
            Projection::Utm => ProjectionKind::Utm,
            Projection::WebMercator => ProjectionKind::WebMercator,
        };
    }
    tracing::debug!("[config] {config:?}");
    Ok(config)
}

/// `path`, or `default` inside the current directory.
pub(crate) fn output_path(path: &Option<PathBuf>, default: &str) -> PathBuf {
    path.clone().unwrap_or_else(|| Path::new(".").join(default))
}

impl ResolveOptions {
    pub(crate) fn apply(&self, config: &mut Config) {
        config.resolve.manual_removals.extend(self.manual_removals.iter().cloned());
    }
}

impl ReviewOptions {
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(meters) = self.review_buffer { config.review.buffer_meters = meters }
        if self.case_insensitive { config.review.case_sensitive = false }
        if self.unrated_mean { config.review.unrated_policy = UnratedPolicy::DatasetMean }
    }
}

impl IndexOptions {
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(meters) = self.walk { config.index.walk_meters = meters }
    }
}
