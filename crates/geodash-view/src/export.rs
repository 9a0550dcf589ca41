//! # CSV Export
//!
//! Serializes the filtered `(country, sector)` subset as a CSV download.
//! The header row is [`COLUMNS`] and rows follow table order. Every record
//! must match the pair named in the filename; a mismatch is rejected rather
//! than silently exported.

use geodash_core::{Catalog, FactRecord, COLUMNS};
use geodash_state::Selection;
use thiserror::Error;

/// MIME type of every export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A ready-to-send file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// `Content-Disposition` header value for this file.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("record {company:?} belongs to ({country}, {sector}), expected ({expected_country}, {expected_sector})")]
    InconsistentRecord {
        company: String,
        country: String,
        sector: String,
        expected_country: String,
        expected_sector: String,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),
}

/// `"{country}_{sector}_data.csv"`, verbatim.
pub fn export_filename(country: &str, sector: &str) -> String {
    format!("{country}_{sector}_data.csv")
}

/// Encode `records` as a CSV download for `(country, sector)`.
///
/// An empty iterator yields a header-only file.
pub fn to_downloadable<'a, I>(
    records: I,
    country: &str,
    sector: &str,
) -> Result<Download, ExportError>
where
    I: IntoIterator<Item = &'a FactRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for record in records {
        if record.country != country || record.sector != sector {
            return Err(ExportError::InconsistentRecord {
                company: record.company.clone(),
                country: record.country.clone(),
                sector: record.sector.clone(),
                expected_country: country.to_string(),
                expected_sector: sector.to_string(),
            });
        }
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;

    Ok(Download {
        filename: export_filename(country, sector),
        content_type: CSV_CONTENT_TYPE,
        bytes,
    })
}

/// The download for `selection`, or `None` before a sector is chosen.
pub fn download_for(
    catalog: &Catalog,
    selection: &Selection,
) -> Result<Option<Download>, ExportError> {
    let (Some(country), Some(sector)) = (selection.country(), selection.sector()) else {
        return Ok(None);
    };
    let records = catalog
        .facts()
        .query_by_country_and_sector(Some(country), Some(sector));
    to_downloadable(records, country, sector).map(Some)
}
