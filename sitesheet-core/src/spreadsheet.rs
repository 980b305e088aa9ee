//! Encoding of harvested records into an in-memory xlsx workbook.

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook, XlsxError};
use sitesheet_harvester::record::{HEADING_LEVELS, PageRecord};
use sitesheet_harvester::sitemap::SITEMAP_SUFFIX;

/// The fixed column layout of every exported worksheet.
pub const COLUMNS: [&str; 10] = [
    "URL",
    "Title",
    "Description",
    "Keywords",
    "H1",
    "H2",
    "H3",
    "H4",
    "H5",
    "H6",
];

/// Encode records into xlsx bytes: one header row, one row per record in
/// sequence order, heading lists joined with `", "`.
///
/// The workbook creation timestamp is pinned, so identical input yields
/// byte-identical output. Callers must not pass an empty slice; the pipeline
/// suppresses export for empty results before reaching this point.
pub fn encode(records: &[PageRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let worksheet = workbook.add_worksheet();
    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        worksheet.write_string(row, 0, &record.url)?;
        worksheet.write_string(row, 1, &record.title)?;
        worksheet.write_string(row, 2, &record.description)?;
        worksheet.write_string(row, 3, &record.keywords)?;
        for level in 0..HEADING_LEVELS {
            worksheet.write_string(row, (4 + level) as u16, record.headings[level].join(", "))?;
        }
    }

    workbook.save_to_buffer()
}

/// Derive the artifact filename from the source sitemap URL.
///
/// The `.xml` suffix is replaced by `.xlsx`; a URL without that exact suffix
/// is used whole. The caller is responsible for making the name safe for its
/// transport (the CLI sanitizes path-hostile characters).
pub fn artifact_filename(source_url: &str) -> String {
    let stem = source_url.strip_suffix(SITEMAP_SUFFIX).unwrap_or(source_url);
    format!("{}.xlsx", stem)
}
