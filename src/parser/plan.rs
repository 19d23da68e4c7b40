//! Read planning for fixed-width records
//!
//! A record is described by its field descriptors. Only a few fields are ever
//! needed, so the plan turns the field list into alternating keep/skip runs
//! where consecutive unneeded fields collapse into one skip. The reader then
//! performs one seek per skip run instead of one per field.

use crate::types::{FieldDescriptor, SkipEntry};
use std::collections::HashSet;

/// Compiled per-file read plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPlan {
    entries: Vec<SkipEntry>,
    record_width: usize,
}

impl ReadPlan {
    /// Compile a plan keeping the fields whose names are in `required`
    pub fn compile<S: AsRef<str>>(fields: &[FieldDescriptor], required: &[S]) -> Self {
        let required: HashSet<&str> = required.iter().map(|s| s.as_ref()).collect();
        let mut entries: Vec<SkipEntry> = Vec::new();

        for field in fields {
            if required.contains(field.name.as_str()) {
                entries.push(SkipEntry::Keep {
                    name: field.name.clone(),
                    byte_length: field.byte_length,
                });
            } else if let Some(SkipEntry::Skip(run)) = entries.last_mut() {
                *run += field.byte_length;
            } else {
                entries.push(SkipEntry::Skip(field.byte_length));
            }
        }

        let record_width = fields.iter().map(|f| f.byte_length).sum();
        Self {
            entries,
            record_width,
        }
    }

    pub fn entries(&self) -> &[SkipEntry] {
        &self.entries
    }

    /// Field bytes per record, excluding the marker byte
    pub fn record_width(&self) -> usize {
        self.record_width
    }

    pub fn kept_fields(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_skip()).count()
    }

    /// Seeks performed for one active record
    pub fn seek_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_skip()).count()
    }
}
