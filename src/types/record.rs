use std::collections::HashMap;

/// Kept field bytes of one active record, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub fields: HashMap<String, Vec<u8>>,
}

impl RawRecord {
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single channel reading at one timestamp, already rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelReading {
    pub date: String,
    pub time: String,
    pub value: String,
}

impl ChannelReading {
    pub fn new(date: impl Into<String>, time: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            value: value.into(),
        }
    }
}

/// One timestamp's worth of selected channel values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub date: String,
    pub time: String,
    pub values: Vec<String>,
}

impl OutputRow {
    /// Columns in output order: date, time, then one value per selected channel
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        [self.date.as_str(), self.time.as_str()]
            .into_iter()
            .chain(self.values.iter().map(|v| v.as_str()))
    }
}
