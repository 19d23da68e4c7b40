//! Channel catalog loading
//!
//! The logger keeps its tag names in a companion table whose records, in
//! order, give each tag's index. A plain text list with one name per line is
//! accepted as well.

use crate::error::{Result, TranscribeError};
use crate::parser::decoder::decode_padded_text;
use crate::parser::stream::open_table;
use crate::types::ChannelCatalog;
use crate::InputFormat;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Field holding the tag name in the logger's tag table
pub const TAGNAME_FIELD: &str = "Tagname";

/// Load a catalog, choosing table or text parsing from the file extension
pub fn load_catalog(path: &Path) -> Result<ChannelCatalog> {
    let catalog = match InputFormat::from_path(path) {
        Some(InputFormat::Table) => load_catalog_table(path, TAGNAME_FIELD)?,
        _ => load_catalog_text(BufReader::new(File::open(path)?))?,
    };

    if catalog.is_empty() {
        return Err(TranscribeError::configuration(format!(
            "catalog {} lists no channels",
            path.display()
        )));
    }

    info!(path = %path.display(), channels = catalog.len(), "loaded channel catalog");
    Ok(catalog)
}

/// Read tag names from the `field` column of a tag table
pub fn load_catalog_table(path: &Path, field: &str) -> Result<ChannelCatalog> {
    let (_, records) = open_table(path, &[field])?;
    let mut names = Vec::new();
    for record in records {
        let record = record?;
        if let Some(bytes) = record.get(field) {
            names.push(decode_padded_text(bytes).trim().to_string());
        }
    }
    Ok(ChannelCatalog::new(names))
}

/// Read one tag name per line, ignoring blank lines
pub fn load_catalog_text<R: BufRead>(reader: R) -> Result<ChannelCatalog> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(ChannelCatalog::new(names))
}
