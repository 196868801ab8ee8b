use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::record::Record;

const HEADER: [&str; 4] = ["type", "tag", "text", "href"];

/// Write the header row followed by one row per record.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    // Written by hand so an empty record set still gets a header.
    wtr.write_record(HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_records(file, records).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "Saved CSV");
    Ok(())
}
