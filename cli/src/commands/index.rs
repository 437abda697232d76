use anyhow::Result;
use greenspace::{read_housing, read_rated_parks, write_scored_housing, Pipeline};

use crate::commands::{load_config, output_path};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::IndexArgs) -> Result<()> {
    let mut config = load_config(cli)?;
    args.index.apply(&mut config);
    let out_path = output_path(&args.output, "housing_index.geojson");

    eprintln!("[index] loading rated parks from {}", args.parks.display());
    let parks = read_rated_parks(&args.parks)?;

    eprintln!("[index] loading housing from {}", args.housing.display());
    let housing = read_housing(&args.housing)?;

    eprintln!("[index] scoring {} housing points within {} m", housing.len(), config.index.walk_meters);
    let index = Pipeline::new(config).index(&parks, &housing)?;

    eprintln!("[index] writing scored housing to {}", out_path.display());
    write_scored_housing(&out_path, &index)
}
