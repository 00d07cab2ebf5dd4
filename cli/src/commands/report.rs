use anyhow::Result;
use pangan::{Atlas, GUIDE, INDICATORS, category_legend};

use crate::cli::{Cli, SelectArgs};

pub fn provinces(cli: &Cli) -> Result<()> {
    let atlas = super::load(cli)?;
    print_provinces(&atlas);
    Ok(())
}

pub fn summary(cli: &Cli, args: &SelectArgs) -> Result<()> {
    let atlas = super::load(cli)?;
    let province = args.province.as_deref();
    super::check_province(&atlas, province)?;

    print!("{}", atlas.summary(province));
    Ok(())
}

pub fn unmatched(cli: &Cli) -> Result<()> {
    let atlas = super::load(cli)?;
    print_match_report(&atlas);
    Ok(())
}

pub fn indicators() -> Result<()> {
    println!("{INDICATORS}");
    println!("Kategori (SOM)\n{}", category_legend());
    println!("{GUIDE}");
    Ok(())
}

pub(super) fn print_provinces(atlas: &Atlas) {
    for province in atlas.provinces() {
        println!("{province}");
    }
}

pub(super) fn print_match_report(atlas: &Atlas) {
    let stats = atlas.match_stats();
    println!("exact={} fuzzy={} unmatched={} duplicate_keys={}",
        stats.exact, stats.fuzzy, stats.unmatched, stats.duplicate_keys);

    for (record, candidate, score) in atlas.reconciled() {
        println!("fuzzy      {} / {} -> {candidate} ({score:.3})", record.province(), record.district_name());
    }
    for record in atlas.unmatched() {
        println!("unmatched  {} / {}", record.province(), record.district_name());
    }
}
