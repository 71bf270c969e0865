//! Plain-text rendering of answer frames for the console.

use crate::utils::{MISSING, fmt_float};
use polars::prelude::*;

const GAP: &str = "  ";

fn cell(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => MISSING.to_owned(),
        AnyValue::Float64(x) => fmt_float(Some(x)),
        AnyValue::Float32(x) => fmt_float(Some(f64::from(x))),
        AnyValue::String(s) => s.to_owned(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

/// Renders `df` as an aligned table: text columns left-aligned, numbers
/// right-aligned, one header line.
pub fn table(df: &DataFrame) -> PolarsResult<String> {
    if df.height() == 0 {
        return Ok("(no rows)\n".to_owned());
    }

    let mut columns = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let mut cells = Vec::with_capacity(df.height() + 1);
        cells.push(series.name().to_string());
        for i in 0..series.len() {
            cells.push(cell(series.get(i)?));
        }
        let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        columns.push((cells, width, is_numeric(series.dtype())));
    }

    let mut out = String::new();
    for row in 0..=df.height() {
        let mut line = String::new();
        for (i, (cells, width, numeric)) in columns.iter().enumerate() {
            let width = *width;
            if i > 0 {
                line.push_str(GAP);
            }
            let text = cells.get(row).map_or("", String::as_str);
            let padded = if *numeric {
                format!("{text:>width$}")
            } else {
                format!("{text:<width$}")
            };
            line.push_str(&padded);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

/// One name per line.
pub fn lines(names: &[String]) -> String {
    names.iter().map(|n| format!("{n}\n")).collect()
}
