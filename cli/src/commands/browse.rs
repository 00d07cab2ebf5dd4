use std::{io::{BufRead, Write}, path::PathBuf, sync::Arc};

use anyhow::{Result, bail};
use pangan::{Atlas, AtlasCache};

use crate::cli::Cli;

const HELP: &str = "\
commands:
  provinces              list provinces
  province <NAME>|all    select a province
  summary                headline metrics of the selection
  table [FILE]           data table as CSV (stdout without FILE)
  map [FILE]             choropleth SVG, defaults to ./peta.svg
  geojson FILE           export the selection as GeoJSON
  unmatched              match report
  indicators             indicator notes and guide
  reload                 rebuild from the input files
  quit";

#[derive(Debug, PartialEq)]
enum Action {
    Provinces,
    Select(Option<String>),
    Summary,
    Table(Option<PathBuf>),
    Map(Option<PathBuf>),
    Geojson(PathBuf),
    Unmatched,
    Indicators,
    Reload,
    Help,
    Quit,
}

impl Action {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let path = || (!rest.is_empty()).then(|| PathBuf::from(rest));

        let action = match command {
            "" => return Ok(None),
            "provinces" => Action::Provinces,
            "province" if rest.is_empty() => bail!("usage: province <NAME>|all"),
            "province" if rest.eq_ignore_ascii_case("all") => Action::Select(None),
            "province" => Action::Select(Some(rest.to_string())),
            "summary" => Action::Summary,
            "table" => Action::Table(path()),
            "map" => Action::Map(path()),
            "geojson" => match path() {
                Some(path) => Action::Geojson(path),
                None => bail!("usage: geojson FILE"),
            },
            "unmatched" => Action::Unmatched,
            "indicators" => Action::Indicators,
            "reload" => Action::Reload,
            "help" | "?" => Action::Help,
            "quit" | "exit" | "q" => Action::Quit,
            other => bail!("unknown command {other:?} (try \"help\")"),
        };
        Ok(Some(action))
    }
}

/// Read commands from stdin until `quit` or end of input.
/// The atlas comes from the cache, so unchanged inputs are loaded once.
pub fn run(cli: &Cli) -> Result<()> {
    let source = super::source(cli)?;
    let mut cache = AtlasCache::new();
    let mut atlas = cache.get(&source)?;
    let mut province: Option<String> = None;

    eprintln!("[browse] {} districts loaded; type \"help\" for commands", atlas.len());

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("{}> ", province.as_deref().unwrap_or("semua"));
        std::io::stderr().flush()?;

        let Some(line) = lines.next() else { break };
        let action = match Action::parse(&line?) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(err) => { eprintln!("{err}"); continue }
        };

        match action {
            Action::Quit => break,
            Action::Reload => {
                cache.invalidate(&source);
                atlas = cache.get(&source)?;
                eprintln!("[browse] reloaded {} districts", atlas.len());
            }
            action => {
                atlas = cache.get(&source)?;
                if let Err(err) = apply(&atlas, &mut province, action) {
                    eprintln!("{err:#}");
                }
            }
        }
    }
    Ok(())
}

fn apply(atlas: &Arc<Atlas>, province: &mut Option<String>, action: Action) -> Result<()> {
    let selected = province.as_deref();
    match action {
        Action::Provinces => super::report::print_provinces(atlas),
        Action::Select(choice) => {
            super::check_province(atlas, choice.as_deref())?;
            *province = choice;
        }
        Action::Summary => print!("{}", atlas.summary(selected)),
        Action::Table(Some(path)) => atlas.to_csv(&path, selected)?,
        Action::Table(None) => atlas.write_csv(selected, std::io::stdout().lock())?,
        Action::Map(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from("./peta.svg"));
            atlas.to_svg(&path, selected)?;
            eprintln!("[browse] wrote {}", path.display());
        }
        Action::Geojson(path) => {
            atlas.to_geojson(&path, selected)?;
            eprintln!("[browse] wrote {}", path.display());
        }
        Action::Unmatched => super::report::print_match_report(atlas),
        Action::Indicators => super::report::indicators()?,
        Action::Help => eprintln!("{HELP}"),
        Action::Reload | Action::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Action::parse("  ").unwrap(), None);
        assert_eq!(Action::parse("summary").unwrap(), Some(Action::Summary));
        assert_eq!(Action::parse("province Sumatera Barat").unwrap(), Some(Action::Select(Some("Sumatera Barat".into()))));
        assert_eq!(Action::parse("province ALL").unwrap(), Some(Action::Select(None)));
        assert_eq!(Action::parse("map").unwrap(), Some(Action::Map(None)));
        assert_eq!(Action::parse("table out.csv").unwrap(), Some(Action::Table(Some("out.csv".into()))));
        assert_eq!(Action::parse("q").unwrap(), Some(Action::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Action::parse("province").is_err());
        assert!(Action::parse("geojson").is_err());
        assert!(Action::parse("draw").is_err());
    }
}
