//! Spreadsheet reading (xlsx, xlsm, xlsb, xls, ods) into polars DataFrames.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use calamine::{Data, Reader, open_workbook_auto};
use polars::{frame::DataFrame, prelude::Column};

/// File extensions handled by this module.
pub(crate) const EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads one worksheet (the first unless `sheet` is given) into a DataFrame.
///
/// The first row is the header. A column whose non-empty cells are all numbers
/// becomes Float64; any other column becomes String, numbers rendered as text.
pub(crate) fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("[io::xlsx] Failed to open workbook {}", path.display()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook.sheet_names().first().cloned()
            .ok_or_else(|| anyhow!("[io::xlsx] workbook {} contains no sheets", path.display()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)
        .with_context(|| format!("[io::xlsx] Failed to read sheet {sheet_name:?} of {}", path.display()))?;

    let mut rows = range.rows();
    let header = rows.next()
        .ok_or_else(|| anyhow!("[io::xlsx] sheet {sheet_name:?} of {} is empty", path.display()))?;
    let body = rows.collect::<Vec<_>>();

    let mut columns = Vec::with_capacity(header.len());
    for (c, cell) in header.iter().enumerate() {
        let name = match cell_text(cell) {
            Some(name) => name,
            None if body.iter().all(|row| is_empty(row.get(c))) => continue,
            None => bail!("[io::xlsx] column {} of sheet {sheet_name:?} has data but no header", c + 1),
        };
        let cells = body.iter().map(|row| row.get(c)).collect::<Vec<_>>();
        columns.push(to_column(&name, &cells));
    }

    DataFrame::new(columns)
        .with_context(|| format!("[io::xlsx] Failed to build table from sheet {sheet_name:?} of {}", path.display()))
}

fn is_empty(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(n) => Some(*n),
        Data::Int(n) => Some(*n as f64),
        _ => None,
    }
}

/// Trimmed text of a cell; integral floats print without decimals.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn to_column(name: &str, cells: &[Option<&Data>]) -> Column {
    let numeric = cells.iter()
        .all(|cell| is_empty(*cell) || cell.and_then(cell_number).is_some());

    if numeric {
        let values = cells.iter().map(|cell| cell.and_then(cell_number)).collect::<Vec<_>>();
        Column::new(name.into(), values)
    } else {
        let values = cells.iter().map(|cell| cell.and_then(cell_text)).collect::<Vec<_>>();
        Column::new(name.into(), values)
    }
}

#[cfg(test)]
mod tests {
    use calamine::Data;
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn numeric_columns_become_floats() {
        let (three, half, empty) = (Data::Int(3), Data::Float(2.5), Data::Empty);
        let cells = [Some(&three), None, Some(&half), Some(&empty)];
        let column = to_column("Cluster", &cells);
        assert_eq!(column.dtype(), &DataType::Float64);
        let values = column.f64().unwrap().into_iter().collect::<Vec<_>>();
        assert_eq!(values, vec![Some(3.0), None, Some(2.5), None]);
    }

    #[test]
    fn mixed_columns_become_text() {
        let name = Data::String(" Kota Medan ".into());
        let twelve = Data::Float(12.0);
        let cells = [Some(&name), Some(&twelve), None];
        let column = to_column("Kabupaten/Kota", &cells);
        assert_eq!(column.dtype(), &DataType::String);
        let values = column.str().unwrap().into_iter().collect::<Vec<_>>();
        assert_eq!(values, vec![Some("Kota Medan"), Some("12"), None]);
    }

    #[test]
    fn blank_text_counts_as_empty() {
        let blank = Data::String("  ".into());
        assert!(is_empty(Some(&blank)));
        assert!(is_empty(None));
        let zero = Data::Int(0);
        assert!(!is_empty(Some(&zero)));
        assert_eq!(cell_text(&blank), None);
    }
}
