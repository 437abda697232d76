use std::path::PathBuf;

/// Green-space accessibility CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "greenspace", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON config file; flags below override its values
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Start from the Chicago preset (adds its manual removal list)
    #[arg(long, global = true)]
    pub chicago: bool,

    /// Metric projection used for buffering
    #[arg(long, global = true, value_enum)]
    pub projection: Option<Projection>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Projection {
    Utm,
    WebMercator,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Merge and deduplicate raw park polygons
    Resolve(ResolveArgs),

    /// Attach review ratings to resolved parks
    Rate(RateArgs),

    /// Score housing points by reachable parks
    Index(IndexArgs),

    /// Resolve, rate and index in one pass
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct ResolveOptions {
    /// Park id to remove regardless of geometry (repeatable)
    #[arg(long = "remove", value_name = "ID")]
    pub manual_removals: Vec<String>,
}

#[derive(clap::Args, Debug, Default)]
pub struct ReviewOptions {
    /// Radius in meters around review locations without a footprint
    #[arg(long, value_name = "METERS")]
    pub review_buffer: Option<f64>,

    /// Compare park names ignoring case
    #[arg(long)]
    pub case_insensitive: bool,

    /// Give unreviewed parks the mean park rating instead of 0
    #[arg(long)]
    pub unrated_mean: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct IndexOptions {
    /// Walking distance around each housing point, in meters
    #[arg(long, value_name = "METERS")]
    pub walk: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Raw park polygons (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub parks: PathBuf,

    /// Output file, defaults to "./resolved_parks.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Also write the resolution report as JSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub resolve: ResolveOptions,
}

#[derive(clap::Args, Debug)]
pub struct RateArgs {
    /// Resolved parks (GeoJSON written by `resolve`)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub parks: PathBuf,

    /// Review listings (.json, .csv or .geojson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub reviews: PathBuf,

    /// Output file, defaults to "./rated_parks.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub review: ReviewOptions,
}

#[derive(clap::Args, Debug)]
pub struct IndexArgs {
    /// Rated parks (GeoJSON written by `rate`)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub parks: PathBuf,

    /// Housing locations (.csv or .geojson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub housing: PathBuf,

    /// Output file, defaults to "./housing_index.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub index: IndexOptions,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Raw park polygons (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub parks: PathBuf,

    /// Review listings (.json, .csv or .geojson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub reviews: PathBuf,

    /// Housing locations (.csv or .geojson)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub housing: PathBuf,

    /// Output directory for every intermediate and final file, defaults to "."
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub resolve: ResolveOptions,

    #[command(flatten)]
    pub review: ReviewOptions,

    #[command(flatten)]
    pub index: IndexOptions,
}
