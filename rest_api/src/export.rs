// rest_api/src/export.rs

use models::{schema, Record};

/// Serializes the fetched dataset as CSV: the schema header row followed by
/// one row per record, cells in schema order, RFC 4180 quoting. Output is
/// deterministic for a given record sequence.
pub fn records_to_csv(records: &[Record]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(schema::field_names())?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
