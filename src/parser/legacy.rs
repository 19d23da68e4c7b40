//! Legacy flat text exports
//!
//! One header line, then one line per single-channel reading laid out as
//! `date,time,channel id,value[,...]`. A line's channel is its data-line index
//! modulo the cycle length; the channel id column is not consulted.

use crate::error::{Result, TranscribeError};
use crate::parser::source::ChannelSource;
use crate::types::{ChannelReading, CycleFilter, Selection};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const DATE_COLUMN: usize = 0;
const TIME_COLUMN: usize = 1;
const VALUE_COLUMN: usize = 3;

/// Selected readings from a legacy text export; values stay as written
pub struct TextChannelSource<R: Read> {
    reader: csv::Reader<R>,
    line: csv::StringRecord,
    filter: CycleFilter,
    position: usize,
}

impl TextChannelSource<BufReader<File>> {
    pub fn open(path: &Path, selection: &Selection) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), selection))
    }
}

impl<R: Read> TextChannelSource<R> {
    pub fn new(input: R, selection: &Selection) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        Self {
            reader,
            line: csv::StringRecord::new(),
            filter: selection.cycle_filter(),
            position: 0,
        }
    }
}

fn column(line: &csv::StringRecord, index: usize, position: usize) -> Result<&str> {
    line.get(index).ok_or_else(|| {
        TranscribeError::record_decode(format!(
            "data line {} has {} columns, expected at least {}",
            position,
            line.len(),
            VALUE_COLUMN + 1
        ))
    })
}

impl<R: Read> ChannelSource for TextChannelSource<R> {
    fn next_reading(&mut self) -> Result<Option<ChannelReading>> {
        loop {
            if !self.reader.read_record(&mut self.line)? {
                return Ok(None);
            }
            let position = self.position;
            self.position += 1;
            if !self.filter.keeps(position) {
                continue;
            }

            let reading = ChannelReading::new(
                column(&self.line, DATE_COLUMN, position)?,
                column(&self.line, TIME_COLUMN, position)?,
                column(&self.line, VALUE_COLUMN, position)?,
            );
            return Ok(Some(reading));
        }
    }
}
