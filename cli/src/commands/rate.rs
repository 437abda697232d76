use anyhow::Result;
use greenspace::{read_resolved_parks, read_reviews, write_rated_parks, Pipeline};

use crate::commands::{load_config, output_path};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::RateArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    args.review.apply(&mut config);
    let out_path = output_path(&args.output, "rated_parks.geojson");

    eprintln!("[rate] loading parks from {}", args.parks.display());
    let parks = read_resolved_parks(&args.parks)?;

    eprintln!("[rate] loading reviews from {}", args.reviews.display());
    let reviews = read_reviews(&args.reviews)?;

    let rated = Pipeline::new(config).rate(&parks, &reviews)?;
    let with_reviews = rated.iter().filter(|park| park.rating.rating.is_rated()).count();
    eprintln!("[rate] {with_reviews} of {} parks have reviews", rated.len());

    eprintln!("[rate] writing rated parks to {}", out_path.display());
    write_rated_parks(&out_path, &rated)
}
