use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use csv::{Terminator, WriterBuilder};
use tracing::{info, warn};

use crate::models::{error::Result, record::MatchRecord};

/// Writes both output files. Nothing is touched when `results` is empty.
pub fn save_results(results: &[MatchRecord], csv_path: &Path, jsonl_path: &Path) -> Result<()> {
    if results.is_empty() {
        warn!("No results to save.");
        return Ok(());
    }

    let rows = write_csv(results, csv_path)?;
    info!("Wrote {} rows to {}", rows, csv_path.display());

    let rows = write_jsonl(results, jsonl_path)?;
    info!("Wrote {} rows to {}", rows, jsonl_path.display());

    Ok(())
}

pub fn write_csv(results: &[MatchRecord], path: &Path) -> Result<usize> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_path(path)?;
    for record in results {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(results.len())
}

pub fn write_jsonl(results: &[MatchRecord], path: &Path) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in results {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(results.len())
}
