use crate::error::{Result, TranscribeError};
use crate::parser::decoder::{decode_date, decode_time, decode_value_text};
use crate::parser::header::decode_table_header;
use crate::parser::plan::ReadPlan;
use crate::parser::source::ChannelSource;
use crate::types::{
    ChannelReading, CycleFilter, RawRecord, Selection, SkipEntry, TableHeader, TableLayout,
};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Leading byte of a live record
pub const ACTIVE_MARKER: u8 = b' ';
/// Leading byte of a soft-deleted record
pub const DELETED_MARKER: u8 = b'*';
/// Byte terminating the record area
pub const END_OF_DATA_MARKER: u8 = 0x1A;

/// Forward-only reader over the records of a table.
///
/// Only the bytes of kept fields are read; skip runs and passed-over records
/// are seeked across without touching their contents.
pub struct RecordStream<R: Read + Seek> {
    reader: BufReader<R>,
    plan: ReadPlan,
    /// Position filter over active records
    filter: Option<CycleFilter>,
    active_seen: usize,
    passed_over: usize,
    finished: bool,
}

impl<R: Read + Seek> RecordStream<R> {
    /// Wrap a reader already positioned at the first record
    pub fn new(reader: BufReader<R>, plan: ReadPlan) -> Self {
        Self {
            reader,
            plan,
            filter: None,
            active_seen: 0,
            passed_over: 0,
            finished: false,
        }
    }

    /// Only materialize active records whose position the filter keeps
    pub fn with_cycle_filter(mut self, filter: CycleFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Active records encountered so far, kept or not
    pub fn active_seen(&self) -> usize {
        self.active_seen
    }

    /// Deleted, unknown and unselected records seeked over
    pub fn passed_over(&self) -> usize {
        self.passed_over
    }

    /// Read the next kept record, `Ok(None)` at end of data.
    ///
    /// After an error the stream is finished and yields nothing more.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.advance();
        if result.is_err() {
            self.finished = true;
        }
        result
    }

    fn advance(&mut self) -> Result<Option<RawRecord>> {
        loop {
            let marker = match self.read_marker()? {
                Some(marker) if marker != END_OF_DATA_MARKER => marker,
                _ => {
                    self.finished = true;
                    return Ok(None);
                }
            };

            if marker != ACTIVE_MARKER {
                self.skip_record()?;
                continue;
            }

            let position = self.active_seen;
            self.active_seen += 1;
            if !self.keeps_position(position) {
                self.skip_record()?;
                continue;
            }

            return self.read_planned(position).map(Some);
        }
    }

    fn keeps_position(&self, position: usize) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |filter| filter.keeps(position))
    }

    fn read_marker(&mut self) -> Result<Option<u8>> {
        let mut marker = [0u8; 1];
        loop {
            match self.reader.read(&mut marker) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(marker[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn skip_record(&mut self) -> Result<()> {
        self.passed_over += 1;
        self.reader.seek_relative(self.plan.record_width() as i64)?;
        Ok(())
    }

    fn read_planned(&mut self, position: usize) -> Result<RawRecord> {
        let mut record = RawRecord::default();
        for entry in self.plan.entries() {
            match entry {
                SkipEntry::Skip(run) => self.reader.seek_relative(*run as i64)?,
                SkipEntry::Keep { name, byte_length } => {
                    let mut bytes = vec![0u8; *byte_length];
                    self.reader.read_exact(&mut bytes).map_err(|err| {
                        if err.kind() == ErrorKind::UnexpectedEof {
                            TranscribeError::record_decode(format!(
                                "record {} ends inside field '{}'",
                                position, name
                            ))
                        } else {
                            TranscribeError::Io(err)
                        }
                    })?;
                    record.fields.insert(name.clone(), bytes);
                }
            }
        }
        Ok(record)
    }
}

impl<R: Read + Seek> Iterator for RecordStream<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Open a table file, decode its header and plan reads for `required` fields
pub fn open_table<S: AsRef<str>>(
    path: &Path,
    required: &[S],
) -> Result<(TableHeader, RecordStream<File>)> {
    let mut reader = BufReader::new(File::open(path)?);
    let header = decode_table_header(&mut reader)?;

    for name in required {
        if header.field(name.as_ref()).is_none() {
            return Err(TranscribeError::malformed_header(format!(
                "table has no '{}' field (fields: {})",
                name.as_ref(),
                header.field_names().join(", ")
            )));
        }
    }

    let plan = ReadPlan::compile(&header.fields, required);
    debug!(
        path = %path.display(),
        kept = plan.kept_fields(),
        seeks = plan.seek_count(),
        "compiled read plan"
    );
    Ok((header, RecordStream::new(reader, plan)))
}

/// Selected readings from a binary float table
pub struct TableChannelSource<R: Read + Seek> {
    records: RecordStream<R>,
    layout: TableLayout,
}

impl TableChannelSource<File> {
    pub fn open(path: &Path, layout: &TableLayout, selection: &Selection) -> Result<Self> {
        let (header, records) = open_table(path, &layout.required_fields())?;

        let value_width = header
            .field(&layout.value_field)
            .map(|f| f.byte_length)
            .unwrap_or_default();
        if value_width != 8 {
            return Err(TranscribeError::record_decode(format!(
                "value field '{}' is {} bytes, expected 8",
                layout.value_field, value_width
            )));
        }

        Ok(Self::new(records, layout.clone(), selection))
    }
}

impl<R: Read + Seek> TableChannelSource<R> {
    pub fn new(records: RecordStream<R>, layout: TableLayout, selection: &Selection) -> Self {
        Self {
            records: records.with_cycle_filter(selection.cycle_filter()),
            layout,
        }
    }

    fn field<'a>(&self, record: &'a RawRecord, name: &str) -> Result<&'a [u8]> {
        record.get(name).ok_or_else(|| {
            TranscribeError::record_decode(format!("record is missing field '{}'", name))
        })
    }
}

impl<R: Read + Seek> ChannelSource for TableChannelSource<R> {
    fn next_reading(&mut self) -> Result<Option<ChannelReading>> {
        let record = match self.records.next_record()? {
            Some(record) => record,
            None => return Ok(None),
        };

        let date = decode_date(self.field(&record, &self.layout.date_field)?)?;
        let time = decode_time(self.field(&record, &self.layout.time_field)?)?;
        let value = decode_value_text(self.field(&record, &self.layout.value_field)?)?;
        Ok(Some(ChannelReading { date, time, value }))
    }
}
