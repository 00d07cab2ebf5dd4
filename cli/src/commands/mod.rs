pub mod browse;
pub mod export;
pub mod report;

use anyhow::{Result, bail};
use pangan::{Atlas, AtlasConfig, AtlasSource};

use crate::cli::Cli;

/// Input paths and configuration from the global flags.
pub fn source(cli: &Cli) -> Result<AtlasSource> {
    let config = match &cli.config {
        Some(path) => AtlasConfig::from_json_file(path)?,
        None => AtlasConfig::default(),
    };
    Ok(AtlasSource::new(&cli.boundaries, &cli.clusters, config))
}

pub fn load(cli: &Cli) -> Result<Atlas> {
    Atlas::load(&source(cli)?)
}

/// Reject a province the boundary file does not contain.
pub fn check_province(atlas: &Atlas, province: Option<&str>) -> Result<()> {
    match province {
        Some(p) if !atlas.has_province(p) => {
            bail!("unknown province {p:?}; expected one of: {}", atlas.provinces().join(", "))
        }
        _ => Ok(()),
    }
}
