//! CSV output for transcribed files
//!
//! Rows are streamed into a temporary file beside the destination and the
//! file is renamed into place only after the last row has been flushed. A
//! failure at any point leaves no file under the destination name.

use crate::error::{Result, TranscribeError};
use crate::types::{OutputRow, Selection};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where transcribed CSV files are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Directory for CSV output (default: beside each input file)
    pub output_dir: Option<PathBuf>,
}

/// Output file for `input`: `<stem>.csv` in the output directory or beside the input
pub fn compute_output_path(input: &Path, options: &ExportOptions) -> Result<PathBuf> {
    let stem = input.file_stem().ok_or_else(|| {
        TranscribeError::configuration(format!("input path {} has no file name", input.display()))
    })?;

    let dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let mut file_name = stem.to_os_string();
    file_name.push(".csv");
    Ok(dir.join(file_name))
}

/// Write the header and all rows to `output`, returning the number of data rows
pub fn write_csv<I>(output: &Path, selection: &Selection, rows: I) -> Result<u64>
where
    I: IntoIterator<Item = Result<OutputRow>>,
{
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let temp = tempfile::Builder::new()
        .prefix(".transcribe-")
        .suffix(".part")
        .tempfile_in(&dir)?;

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(temp);

    writer.write_record(selection.header())?;

    let mut written = 0u64;
    for row in rows {
        writer.write_record(row?.fields())?;
        written += 1;
    }

    let temp: NamedTempFile = writer.into_inner().map_err(|err| err.into_error())?;
    temp.as_file().sync_all()?;
    temp.persist(output)?;

    Ok(written)
}
