use anyhow::Result;
use greenspace::{read_housing, read_park_features, read_reviews, write_rated_parks, write_resolved_parks, write_scored_housing, Pipeline};

use crate::commands::load_config;

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RunArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    args.resolve.apply(&mut config);
    args.review.apply(&mut config);
    args.index.apply(&mut config);
    let out_dir = args.output.clone().unwrap_or(".".into());

    eprintln!("[run] loading inputs");
    let features = read_park_features(&args.parks)?;
    let reviews = read_reviews(&args.reviews)?;
    let housing = read_housing(&args.housing)?;

    let output = Pipeline::new(config).run(features, &reviews, &housing)?;

    eprintln!("[run] writing outputs to {}", out_dir.display());
    write_resolved_parks(&out_dir.join("resolved_parks.geojson"), &output.resolution.parks)?;
    write_rated_parks(&out_dir.join("rated_parks.geojson"), &output.rated)?;
    write_scored_housing(&out_dir.join("housing_index.geojson"), &output.index)?;

    if cli.verbose > 0 {
        eprintln!(
            "[run] {} parks, {} housing points, max size index {:.6e}",
            output.rated.len(), output.index.records.len(), output.index.stats.max_size,
        );
    }
    Ok(())
}
