//! CSV and JSON io for raw OHLCV rows.
//!
//! Used by the demo binary and by tests; the engine itself only consumes
//! in-memory rows handed over by the caller.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{Reader, Writer};

use super::types::RawRecord;

/// Load raw OHLCV rows from a CSV file with a
/// `Date,Open,High,Low,Close,Volume` header.
pub fn load_records_csv<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open file: {:?}", path.as_ref()))?;

    let mut reader = Reader::from_reader(file);
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let record: RawRecord = result.context("failed to parse OHLCV row")?;
        records.push(record);
    }

    Ok(records)
}

/// Save raw OHLCV rows to a CSV file.
pub fn save_records_csv<P: AsRef<Path>>(records: &[RawRecord], path: P) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("failed to create file: {:?}", path.as_ref()))?;

    let mut writer = Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load raw OHLCV rows from a JSON array file.
pub fn load_records_json<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let file = File::open(&path)
        .with_context(|| format!("failed to open file: {:?}", path.as_ref()))?;
    let records: Vec<RawRecord> = serde_json::from_reader(file)?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_csv_round_trip() {
        let records = vec![
            RawRecord {
                date: "2024-01-02".parse().unwrap(),
                open: Some(100.0),
                high: Some(102.0),
                low: Some(99.0),
                close: Some(101.0),
                volume: Some(1_000.0),
            },
            RawRecord {
                date: "2024-01-03".parse().unwrap(),
                open: Some(101.0),
                high: Some(103.0),
                low: Some(100.0),
                close: Some(102.5),
                volume: None,
            },
        ];

        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");

        save_records_csv(&records, &path).unwrap();
        let loaded = load_records_csv(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].close, Some(101.0));
        assert_eq!(loaded[1].volume, None);
        assert_eq!(loaded[1].date, records[1].date);
    }
}
