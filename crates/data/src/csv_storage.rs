use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, Writer};
use fx_sentiment_core::{RawReading, Snapshot};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub struct CsvStorage;

impl CsvStorage {
    /// Reads scraped readings from a CSV file.
    ///
    /// Format: symbol,source,long_percent,short_percent,timestamp (RFC 3339)
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or a row does not parse
    pub fn read_raw_readings(path: impl AsRef<Path>) -> Result<Vec<RawReading>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        Self::parse_raw_readings(file)
            .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
    }

    /// Parses readings from any CSV source with a header row.
    ///
    /// # Errors
    /// Returns error if a row does not parse
    pub fn parse_raw_readings<R: Read>(reader: R) -> Result<Vec<RawReading>> {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let mut readings = Vec::new();
        for (line, row) in reader.deserialize::<RawReading>().enumerate() {
            // +2: header row and 1-based numbering
            readings.push(row.with_context(|| format!("Invalid row at line {}", line + 2))?);
        }
        Ok(readings)
    }

    /// Writes stored snapshots in the same layout `read_raw_readings` accepts.
    ///
    /// # Errors
    /// Returns error if file cannot be created or writing fails
    pub fn write_snapshots(path: impl AsRef<Path>, snapshots: &[Snapshot]) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(["symbol", "source", "long_percent", "short_percent", "timestamp"])?;

        let mut sorted = snapshots.to_vec();
        sorted.sort_by_key(|s| s.timestamp);

        for snapshot in sorted {
            writer.write_record(&[
                snapshot.symbol.clone(),
                snapshot.source.as_str().to_string(),
                snapshot.long_percent.to_string(),
                snapshot.short_percent.to_string(),
                snapshot.timestamp.to_rfc3339(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}
