//! Single-file conversion

use crate::demux::Demultiplexer;
use crate::error::{Result, TranscribeError};
use crate::export::{compute_output_path, write_csv, ExportOptions};
use crate::parser::{ChannelSource, TableChannelSource, TextChannelSource};
use crate::types::{ChannelCatalog, FileOutcome, Selection, TableLayout};
use std::path::Path;
use tracing::{debug, warn};

/// Encoding of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Binary fixed-record table (`.DAT`, `.DBF`)
    Table,
    /// Legacy flat text export (`.CSV`, `.TXT`)
    Text,
}

impl InputFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "dat" | "dbf" => Some(InputFormat::Table),
            "csv" | "txt" => Some(InputFormat::Text),
            _ => None,
        }
    }
}

/// How to pick the format of each input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatChoice {
    #[default]
    Auto,
    Force(InputFormat),
}

impl FormatChoice {
    pub fn resolve(&self, path: &Path) -> Result<InputFormat> {
        match self {
            FormatChoice::Force(format) => Ok(*format),
            FormatChoice::Auto => InputFormat::from_path(path).ok_or_else(|| {
                TranscribeError::configuration(format!(
                    "cannot tell the format of {} from its extension",
                    path.display()
                ))
            }),
        }
    }
}

/// Immutable settings shared by every file of one conversion job
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub catalog: ChannelCatalog,
    pub selection: Selection,
    pub layout: TableLayout,
    pub export: ExportOptions,
    pub format: FormatChoice,
}

impl ConversionJob {
    /// Validate the channel selection against the catalog
    pub fn new<S: AsRef<str>>(
        catalog: ChannelCatalog,
        channels: &[S],
        total_tags: Option<usize>,
    ) -> Result<Self> {
        let selection = Selection::resolve(&catalog, channels, total_tags)?;
        Ok(Self {
            catalog,
            selection,
            layout: TableLayout::default(),
            export: ExportOptions::default(),
            format: FormatChoice::default(),
        })
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    pub fn with_format(mut self, format: FormatChoice) -> Self {
        self.format = format;
        self
    }

    /// Convert one input file into its CSV
    pub fn convert_file(&self, input: &Path) -> Result<FileOutcome> {
        let format = self.format.resolve(input)?;
        let output = compute_output_path(input, &self.export)?;
        debug!(input = %input.display(), output = %output.display(), ?format, "converting");

        let source: Box<dyn ChannelSource> = match format {
            InputFormat::Table => Box::new(TableChannelSource::open(
                input,
                &self.layout,
                &self.selection,
            )?),
            InputFormat::Text => Box::new(TextChannelSource::open(input, &self.selection)?),
        };

        let mut rows = Demultiplexer::new(source, self.selection.len());
        let rows_written = write_csv(&output, &self.selection, &mut rows)?;

        let dropped_readings = rows.dropped_readings();
        if dropped_readings > 0 {
            warn!(
                input = %input.display(),
                dropped_readings,
                "incomplete final cycle not written"
            );
        }

        Ok(FileOutcome {
            input: input.to_path_buf(),
            output,
            rows_written,
            dropped_readings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            InputFormat::from_path(Path::new("2026 10 19 0000 (Float).DAT")),
            Some(InputFormat::Table)
        );
        assert_eq!(
            InputFormat::from_path(Path::new("export.Csv")),
            Some(InputFormat::Text)
        );
        assert_eq!(InputFormat::from_path(Path::new("notes.md")), None);
        assert_eq!(InputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_forced_format_ignores_extension() {
        let choice = FormatChoice::Force(InputFormat::Text);
        assert_eq!(
            choice.resolve(Path::new("odd.bin")).unwrap(),
            InputFormat::Text
        );
        assert!(FormatChoice::Auto.resolve(Path::new("odd.bin")).is_err());
    }

    #[test]
    fn test_job_rejects_unknown_channel() {
        let catalog: ChannelCatalog = ["A", "B"].into_iter().collect();
        let err = ConversionJob::new(catalog, &["C"], None).unwrap_err();
        assert!(matches!(err, TranscribeError::Configuration(_)));
    }
}
