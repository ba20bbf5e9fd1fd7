#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! External index importer.
//!
//! Parses an arbitrary delimited text file (CSV/TSV/semicolon) into a
//! normalized [`ExternalIndex`] keyed by area name, explicit id, rounded
//! lat/lon, or a synthetic row number. Import is a two-step flow: parse
//! the raw text into a [`ParsedTable`] (headers and rows available for
//! column selection), then import a chosen value column. Individual bad
//! rows are silently dropped; the operation fails only when nothing
//! survives.

use std::collections::BTreeMap;

use area_compare_metrics_models::ExternalIndex;
use thiserror::Error;

/// Errors surfaced to the caller as a user-facing import failure.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file has fewer than a header row plus one data row.
    #[error("File must contain a header row and at least one data row")]
    EmptyFile,

    /// A column the caller named is absent from the header row.
    #[error("Column '{column}' not found in the header row")]
    MissingColumn {
        /// The column that was requested.
        column: String,
    },

    /// Every row was dropped during numeric/key validation.
    #[error("No rows with a usable key and a numeric value survived import")]
    NoValidRows,

    /// The delimited reader rejected the input outright.
    #[error("Failed to read delimited text: {0}")]
    Csv(#[from] csv::Error),
}

/// Column selection for an import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Header of the column holding the numeric values. Required.
    pub value_column: String,
    /// Column holding area names, preferred as the row key.
    pub area_column: Option<String>,
    /// Column holding explicit row ids, used when no area column is set.
    pub id_column: Option<String>,
    /// Latitude column, used with [`Self::lon_column`] as a fallback key.
    pub lat_column: Option<String>,
    /// Longitude column.
    pub lon_column: Option<String>,
    /// Display name for the resulting index; defaults to the value column.
    pub name: Option<String>,
    /// Optional unit label.
    pub unit: Option<String>,
    /// Where the data came from (file name, provider, ...).
    pub source: String,
}

/// A parsed delimited file: headers plus data rows, ready for column
/// selection.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: u8,
}

/// Picks the field delimiter by counting literals in the first line:
/// tab wins if present, else semicolon wins only when no comma appears,
/// else comma.
fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains('\t') {
        b'\t'
    } else if first_line.contains(';') && !first_line.contains(',') {
        b';'
    } else {
        b','
    }
}

impl ParsedTable {
    /// Parses raw delimited text.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::EmptyFile`] when the text has no header row
    /// or no data rows, and [`ImportError::Csv`] when the reader rejects
    /// the input.
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let first_line = text.lines().next().ok_or(ImportError::EmptyFile)?;
        let delimiter = detect_delimiter(first_line);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            records.push(record.iter().map(|f| f.trim().to_owned()).collect());
        }

        if records.len() < 2 {
            return Err(ImportError::EmptyFile);
        }

        let headers = records.remove(0);
        log::debug!(
            "Parsed {} data rows with {} columns (delimiter {:?})",
            records.len(),
            headers.len(),
            char::from(delimiter)
        );

        Ok(Self {
            headers,
            rows: records,
            delimiter,
        })
    }

    /// Column headers from the first row.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The delimiter byte that was detected.
    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    fn column_index(&self, column: &str) -> Result<usize, ImportError> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| ImportError::MissingColumn {
                column: column.to_owned(),
            })
    }

    fn optional_column_index(&self, column: Option<&str>) -> Result<Option<usize>, ImportError> {
        column.map(|c| self.column_index(c)).transpose()
    }

    /// Imports the selected value column into an [`ExternalIndex`].
    ///
    /// Rows whose value fails to parse as a finite number, or whose key
    /// cannot be built, are silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingColumn`] when a named column is
    /// absent from the headers and [`ImportError::NoValidRows`] when zero
    /// rows survive validation.
    pub fn import(&self, options: &ImportOptions) -> Result<ExternalIndex, ImportError> {
        let value_idx = self.column_index(&options.value_column)?;
        let key_idx = match &options.area_column {
            Some(col) => Some(self.column_index(col)?),
            None => self.optional_column_index(options.id_column.as_deref())?,
        };
        let lat_idx = self.optional_column_index(options.lat_column.as_deref())?;
        let lon_idx = self.optional_column_index(options.lon_column.as_deref())?;

        let mut values = BTreeMap::new();
        let mut dropped = 0usize;

        for (row_number, row) in self.rows.iter().enumerate() {
            let Some(value) = row
                .get(value_idx)
                .and_then(|f| f.parse::<f64>().ok())
                .filter(|v| v.is_finite())
            else {
                dropped += 1;
                continue;
            };

            let Some(key) = row_key(row, row_number, key_idx, lat_idx, lon_idx) else {
                dropped += 1;
                continue;
            };

            values.insert(key, value);
        }

        if values.is_empty() {
            return Err(ImportError::NoValidRows);
        }
        if dropped > 0 {
            log::debug!("Dropped {dropped} rows during import validation");
        }

        let min = values.values().copied().fold(f64::INFINITY, f64::min);
        let max = values.values().copied().fold(f64::NEG_INFINITY, f64::max);
        let name = options
            .name
            .clone()
            .unwrap_or_else(|| options.value_column.clone());

        Ok(ExternalIndex {
            id: slug(&name),
            name,
            source: options.source.clone(),
            values,
            min,
            max,
            unit: options.unit.clone(),
            imported_at: chrono::Utc::now(),
        })
    }
}

/// Builds the row key in priority order: explicit area/id column, then
/// `"lat,lon"` rounded to six decimals, then a synthetic `"row-N"`.
///
/// Returns `None` (drop the row) when an explicit or coordinate key was
/// configured but the row cannot produce one.
fn row_key(
    row: &[String],
    row_number: usize,
    key_idx: Option<usize>,
    lat_idx: Option<usize>,
    lon_idx: Option<usize>,
) -> Option<String> {
    if let Some(idx) = key_idx {
        let cell = row.get(idx).map_or("", String::as_str);
        if !cell.is_empty() {
            return Some(cell.to_owned());
        }
    }

    if let (Some(lat_idx), Some(lon_idx)) = (lat_idx, lon_idx) {
        let lat = row.get(lat_idx).and_then(|f| f.parse::<f64>().ok());
        let lon = row.get(lon_idx).and_then(|f| f.parse::<f64>().ok());
        return match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(format!("{lat:.6},{lon:.6}"))
            }
            _ => None,
        };
    }

    if key_idx.is_some() {
        // An explicit key column was configured but this row's cell was
        // empty and no coordinate fallback exists.
        return None;
    }

    Some(format!("row-{}", row_number + 1))
}

/// Lowercase alphanumeric slug for index ids.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_options(value_column: &str) -> ImportOptions {
        ImportOptions {
            value_column: value_column.to_owned(),
            source: "test.csv".to_owned(),
            ..ImportOptions::default()
        }
    }

    #[test]
    fn imports_area_keyed_values() {
        let table = ParsedTable::parse("area_name,score\nA,10\nB,20\n").unwrap();
        let options = ImportOptions {
            area_column: Some("area_name".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();

        assert_eq!(index.values.len(), 2);
        assert!((index.values["A"] - 10.0).abs() < f64::EPSILON);
        assert!((index.values["B"] - 20.0).abs() < f64::EPSILON);
        assert!((index.min - 10.0).abs() < f64::EPSILON);
        assert!((index.max - 20.0).abs() < f64::EPSILON);
        assert_eq!(index.name, "score");
        assert_eq!(index.source, "test.csv");
    }

    #[test]
    fn missing_value_column_is_a_named_failure() {
        let table = ParsedTable::parse("area_name,score\nA,10\n").unwrap();
        let err = table.import(&value_options("walkscore")).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumn { column } if column == "walkscore"
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        assert!(matches!(
            ParsedTable::parse("area,score\n").unwrap_err(),
            ImportError::EmptyFile
        ));
        assert!(matches!(
            ParsedTable::parse("").unwrap_err(),
            ImportError::EmptyFile
        ));
    }

    #[test]
    fn tab_delimiter_wins_over_everything() {
        let table = ParsedTable::parse("area\tscore;x,y\nA\t1\n").unwrap();
        assert_eq!(table.delimiter(), b'\t');
        assert_eq!(table.headers()[0], "area");
    }

    #[test]
    fn semicolon_wins_only_without_comma() {
        let semi = ParsedTable::parse("area;score\nA;1\n").unwrap();
        assert_eq!(semi.delimiter(), b';');

        let mixed = ParsedTable::parse("area,score;note\nA,1;x\n").unwrap();
        assert_eq!(mixed.delimiter(), b',');
    }

    #[test]
    fn quoted_fields_are_stripped() {
        let table = ParsedTable::parse("\"area name\",\"score\"\n\"Old Town\",\"12.5\"\n").unwrap();
        assert_eq!(table.headers()[0], "area name");
        let options = ImportOptions {
            area_column: Some("area name".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();
        assert!((index.values["Old Town"] - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unparsable_values_are_dropped_not_fatal() {
        let table = ParsedTable::parse("area,score\nA,10\nB,n/a\nC,\nD,20\n").unwrap();
        let options = ImportOptions {
            area_column: Some("area".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();
        assert_eq!(index.values.len(), 2);
        assert!(index.values.contains_key("A"));
        assert!(index.values.contains_key("D"));
    }

    #[test]
    fn all_rows_invalid_fails_with_no_valid_rows() {
        let table = ParsedTable::parse("area,score\nA,x\nB,y\n").unwrap();
        let options = ImportOptions {
            area_column: Some("area".to_owned()),
            ..value_options("score")
        };
        assert!(matches!(
            table.import(&options).unwrap_err(),
            ImportError::NoValidRows
        ));
    }

    #[test]
    fn coordinate_keys_round_to_six_decimals() {
        let table =
            ParsedTable::parse("lat,lon,score\n41.87811234,-87.62987654,5\nbad,-87.6,7\n").unwrap();
        let options = ImportOptions {
            lat_column: Some("lat".to_owned()),
            lon_column: Some("lon".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();
        // The row with an unparsable coordinate is dropped.
        assert_eq!(index.values.len(), 1);
        assert!(index.values.contains_key("41.878112,-87.629877"));
    }

    #[test]
    fn synthetic_row_keys_are_one_based() {
        let table = ParsedTable::parse("score\n3\n7\n").unwrap();
        let index = table.import(&value_options("score")).unwrap();
        assert!((index.values["row-1"] - 3.0).abs() < f64::EPSILON);
        assert!((index.values["row-2"] - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let table = ParsedTable::parse("area,score\nA,inf\nB,NaN\nC,4\n").unwrap();
        let options = ImportOptions {
            area_column: Some("area".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();
        assert_eq!(index.values.len(), 1);
        assert!((index.min - 4.0).abs() < f64::EPSILON);
        assert!((index.max - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn index_id_is_a_slug_of_the_name() {
        let table = ParsedTable::parse("area,score\nA,1\n").unwrap();
        let options = ImportOptions {
            area_column: Some("area".to_owned()),
            name: Some("Walk Score (2024)".to_owned()),
            ..value_options("score")
        };
        let index = table.import(&options).unwrap();
        assert_eq!(index.id, "walk-score-2024");
    }
}
