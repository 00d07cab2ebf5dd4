use std::path::PathBuf;

/// Food-security atlas of Sumatran districts
#[derive(clap::Parser, Debug)]
#[command(name = "pangan", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// JSON configuration (column names, match cutoff and metric)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Boundary polygons: .shp, zipped shapefile, or .geojson
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// SOM cluster table: .xlsx (or another spreadsheet) or .csv
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub clusters: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the provinces present in the boundary file
    Provinces,

    /// Print headline metrics for a province (or all)
    Summary(SelectArgs),

    /// Write the enriched data table as CSV (stdout unless -o)
    Table(ExportArgs),

    /// Draw a choropleth SVG, defaults to "./peta.svg"
    Map(MapArgs),

    /// Write the enriched features as GeoJSON (stdout unless -o)
    Geojson(ExportArgs),

    /// List districts without a cluster row, and the fuzzy matches made
    Unmatched,

    /// Print the indicator notes, category legend and usage guide
    Indicators,

    /// Interactive browser reading commands from stdin
    Browse,
}

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Province name as in the boundary file, e.g. "Sumatera Barat"
    #[arg(short, long)]
    pub province: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Output SVG file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Image width in pixels
    #[arg(short, long, default_value_t = 1100)]
    pub width: u32,
}
