//! Channel demultiplexing
//!
//! Sources yield one reading per selected channel, cycle after cycle, in
//! ascending catalog order. Every `width` consecutive readings form one output
//! row stamped with the date and time of the first reading in the group.
//!
//! The grouping is purely positional: a cycle missing a record shifts every
//! following row. An incomplete group left when the source runs dry is not
//! emitted; its size is available from [`Demultiplexer::dropped_readings`].

use crate::error::Result;
use crate::parser::ChannelSource;
use crate::types::OutputRow;

pub struct Demultiplexer<S: ChannelSource> {
    source: S,
    width: usize,
    /// Readings placed in the current group; equals `width` between groups
    pending: usize,
    current: Option<OutputRow>,
    dropped: usize,
    done: bool,
}

impl<S: ChannelSource> Demultiplexer<S> {
    /// `width` is the number of selected channels and must be at least 1
    pub fn new(source: S, width: usize) -> Self {
        let width = width.max(1);
        Self {
            source,
            width,
            pending: width,
            current: None,
            dropped: 0,
            done: false,
        }
    }

    /// Readings of an incomplete final group that were discarded
    pub fn dropped_readings(&self) -> usize {
        self.dropped
    }

    fn next_row(&mut self) -> Result<Option<OutputRow>> {
        while let Some(reading) = self.source.next_reading()? {
            if self.pending == self.width {
                let mut values = Vec::with_capacity(self.width);
                values.push(reading.value);
                self.current = Some(OutputRow {
                    date: reading.date,
                    time: reading.time,
                    values,
                });
                self.pending = 1;
            } else {
                if let Some(row) = self.current.as_mut() {
                    row.values.push(reading.value);
                }
                self.pending += 1;
            }

            if self.pending == self.width {
                return Ok(self.current.take());
            }
        }

        if let Some(partial) = self.current.take() {
            self.dropped = partial.values.len();
        }
        Ok(None)
    }
}

impl<S: ChannelSource> Iterator for Demultiplexer<S> {
    type Item = Result<OutputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_row() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
