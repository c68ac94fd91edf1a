//! CSV result sink.
//!
//! One row per offer with the columns `Website,Price,Reviews`. Values are the
//! raw page text; absent fields are written as `N/A`. Each write replaces the
//! previous file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::Error;
use crate::offer::OfferTable;

#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "Website")]
    website: &'a str,
    #[serde(rename = "Price")]
    price: &'a str,
    #[serde(rename = "Reviews")]
    reviews: &'a str,
}

/// Serialize `table` as CSV into `writer`.
///
/// # Errors
///
/// Returns `Error::SinkFailed` if a row cannot be written or flushed.
pub fn write_csv_to<W: Write>(table: &OfferTable, writer: W) -> Result<(), Error> {
    let mut csv = csv::Writer::from_writer(writer);
    for offer in table {
        csv.serialize(Row { website: offer.site.name(), price: offer.price_text(), reviews: offer.review_text() })?;
    }
    if table.is_empty() {
        csv.write_record(["Website", "Price", "Reviews"])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `table` to `path`, truncating any previous contents.
///
/// # Errors
///
/// Returns `Error::SinkFailed` if the file cannot be created or written.
pub fn write_csv(table: &OfferTable, path: impl AsRef<Path>) -> Result<(), Error> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_csv_to(table, file)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote offer table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::{RawOffer, Site};

    fn sample_table() -> OfferTable {
        OfferTable::from_raw([
            RawOffer::new(Site::Amazon, Some("1,299".into()), Some("4.1 out of 5 stars".into())),
            RawOffer::new(Site::Flipkart, Some("₹999".into()), None),
            RawOffer::unavailable(Site::Myntra),
        ])
    }

    #[test]
    fn test_write_csv_to_buffer() {
        let mut buf = Vec::new();
        write_csv_to(&sample_table(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "Website,Price,Reviews");
        assert_eq!(lines[1], "Amazon,\"1,299\",4.1 out of 5 stars");
        assert_eq!(lines[2], "Flipkart,₹999,N/A");
        assert_eq!(lines[3], "Myntra,N/A,N/A");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_csv_to(&OfferTable::default(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Website,Price,Reviews\n");
    }

    #[test]
    fn test_write_csv_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.csv");
        std::fs::write(&path, "stale,contents,here\nmore,stale,rows\nand,even,more\nlines,lines,lines\n").unwrap();

        let table = OfferTable::from_raw([RawOffer::new(Site::Myntra, Some("₹45".into()), Some("4.4".into()))]);
        write_csv(&table, &path).unwrap();

        let out = std::fs::read_to_string(&path).unwrap();
        assert_eq!(out, "Website,Price,Reviews\nMyntra,₹45,4.4\n");
    }

    #[test]
    fn test_write_csv_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("offers.csv");
        let result = write_csv(&sample_table(), &path);
        assert!(matches!(result, Err(Error::SinkFailed(_))));
    }
}
