use std::{io::Write, path::PathBuf};

use anyhow::Result;

use crate::cli::{Cli, ExportArgs, MapArgs};

pub fn table(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let atlas = super::load(cli)?;
    let province = args.select.province.as_deref();
    super::check_province(&atlas, province)?;

    match &args.output {
        Some(path) => {
            atlas.to_csv(path, province)?;
            eprintln!("[table] wrote {}", path.display());
        }
        None => atlas.write_csv(province, std::io::stdout().lock())?,
    }
    Ok(())
}

pub fn map(cli: &Cli, args: &MapArgs) -> Result<()> {
    let atlas = super::load(cli)?;
    let province = args.select.province.as_deref();
    super::check_province(&atlas, province)?;

    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("./peta.svg"));
    atlas.to_svg_with_width(&out_path, province, args.width)?;
    eprintln!("[map] wrote {}", out_path.display());
    Ok(())
}

pub fn geojson(cli: &Cli, args: &ExportArgs) -> Result<()> {
    let atlas = super::load(cli)?;
    let province = args.select.province.as_deref();
    super::check_province(&atlas, province)?;

    match &args.output {
        Some(path) => {
            atlas.to_geojson(path, province)?;
            eprintln!("[geojson] wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&atlas.to_geojson_bytes(province)?)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
