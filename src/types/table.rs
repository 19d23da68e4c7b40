#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One column of a binary table, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDescriptor {
    pub name: String,
    pub field_type: char,
    pub byte_length: usize,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: char, byte_length: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            byte_length,
        }
    }
}

/// Decoded table header: where records start and how they are laid out
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableHeader {
    pub version: u8,
    /// Record count as declared by the writer (informational only)
    pub declared_records: u32,
    pub header_byte_length: usize,
    pub fields: Vec<FieldDescriptor>,
}

impl TableHeader {
    /// Width of the field bytes of one record, excluding the marker byte
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(|f| f.byte_length).sum()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// One instruction of a compiled read plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipEntry {
    Keep { name: String, byte_length: usize },
    Skip(usize),
}

impl SkipEntry {
    pub fn byte_length(&self) -> usize {
        match self {
            SkipEntry::Keep { byte_length, .. } => *byte_length,
            SkipEntry::Skip(n) => *n,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SkipEntry::Skip(_))
    }
}

/// Names of the fields carrying the reading in each record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableLayout {
    pub date_field: String,
    pub time_field: String,
    pub value_field: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            date_field: "Date".to_string(),
            time_field: "Time".to_string(),
            value_field: "Value".to_string(),
        }
    }
}

impl TableLayout {
    pub fn required_fields(&self) -> Vec<&str> {
        vec![
            self.date_field.as_str(),
            self.time_field.as_str(),
            self.value_field.as_str(),
        ]
    }
}
