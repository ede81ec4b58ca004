//! CSV source loading.

use std::path::Path;
use std::sync::Arc;

use csv::ReaderBuilder;

use crate::error::DataError;
use crate::row::Row;

const BOM: char = '\u{feff}';

/// Load every record of a CSV file as [`Row`]s.
///
/// Headers come from the first line (a leading UTF-8 BOM is stripped).
/// Invalid UTF-8 sequences are replaced rather than rejected, and records
/// with fewer or more fields than the header are tolerated. A missing file
/// is reported as [`DataError::NotFound`] so callers can tell it apart from
/// a corrupt one.
pub fn load_csv(path: &Path) -> Result<Vec<Row>, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(path.display().to_string()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Arc<[String]> = rdr
        .byte_headers()?
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches(BOM)
                .trim()
                .to_string()
        })
        .collect::<Vec<_>>()
        .into();

    let mut rows = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        let values = record
            .iter()
            .map(|v| String::from_utf8_lossy(v).into_owned())
            .collect();
        rows.push(Row::new(Arc::clone(&headers), values));
    }

    Ok(rows)
}
