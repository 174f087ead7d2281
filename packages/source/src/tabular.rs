//! CSV parsing into [`RawRow`]s.
//!
//! Header names are resolved through the dataset's [`FieldMapping`]: each
//! field lists candidate columns, and for every record the first candidate
//! with a non-empty cell wins. Numeric cells that fail to parse become
//! `0.0`. A record without a parsable year is dropped.

use conflict_map_data_models::RawRow;
use conflict_map_source_models::FieldMapping;

use crate::SourceError;

/// Column indices for each field, in fallback order.
#[derive(Debug, Default)]
struct ColumnPlan {
    country_key: Vec<usize>,
    country: Vec<usize>,
    year: Vec<usize>,
    events: Vec<usize>,
    deaths: Vec<usize>,
    fatality_rate: Vec<usize>,
    share: Vec<usize>,
    violence_type: Vec<usize>,
    region: Vec<usize>,
}

impl ColumnPlan {
    fn new(headers: &[String], fields: &FieldMapping) -> Self {
        let resolve = |candidates: &[String]| -> Vec<usize> {
            candidates
                .iter()
                .filter_map(|name| headers.iter().position(|h| h == name))
                .collect()
        };

        Self {
            country_key: resolve(&fields.country_key),
            country: resolve(&fields.country),
            year: resolve(&fields.year),
            events: resolve(&fields.events),
            deaths: resolve(&fields.deaths),
            fatality_rate: resolve(&fields.fatality_rate),
            share: resolve(&fields.share),
            violence_type: resolve(&fields.violence_type),
            region: resolve(&fields.region),
        }
    }
}

/// Returns the first non-empty cell among `columns`.
fn first_cell<'a>(record: &'a csv::StringRecord, columns: &[usize]) -> Option<&'a str> {
    columns
        .iter()
        .filter_map(|&i| record.get(i))
        .map(str::trim)
        .find(|cell| !cell.is_empty())
}

/// Parses a numeric cell, `0.0` when missing or unparsable.
fn number(record: &csv::StringRecord, columns: &[usize]) -> f64 {
    first_cell(record, columns)
        .and_then(|cell| cell.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parses an integer cell, accepting integral floats such as `"2001.0"`.
#[allow(clippy::cast_possible_truncation)]
fn integer(cell: &str) -> Option<i64> {
    if let Ok(value) = cell.parse::<i64>() {
        return Some(value);
    }
    let value = cell.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

fn cell_text(record: &csv::StringRecord, columns: &[usize]) -> String {
    first_cell(record, columns).unwrap_or_default().to_owned()
}

/// Parses CSV text into rows using `fields` to locate columns.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read. Bad
/// records are skipped, not reported.
pub fn parse_rows(text: &str, fields: &FieldMapping) -> Result<Vec<RawRow>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    let plan = ColumnPlan::new(&headers, fields);
    if plan.year.is_empty() {
        log::warn!("No year column among headers {headers:?}; every row will be skipped");
    }

    let mut rows = Vec::new();
    let mut skipped = 0_usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable CSV record: {e}");
                skipped += 1;
                continue;
            }
        };

        let Some(year) = first_cell(&record, &plan.year)
            .and_then(integer)
            .and_then(|y| i32::try_from(y).ok())
        else {
            skipped += 1;
            continue;
        };

        rows.push(RawRow {
            country: cell_text(&record, &plan.country),
            country_key: cell_text(&record, &plan.country_key),
            year,
            events: number(&record, &plan.events),
            deaths: number(&record, &plan.deaths),
            fatality_rate: number(&record, &plan.fatality_rate),
            share: number(&record, &plan.share),
            violence_type: first_cell(&record, &plan.violence_type)
                .and_then(integer)
                .and_then(|t| u8::try_from(t).ok()),
            region: first_cell(&record, &plan.region).map(str::to_owned),
        });
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} CSV records without a usable year");
    }

    Ok(rows)
}
