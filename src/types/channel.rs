use crate::error::{Result, TranscribeError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ordered list of every channel name known to a job.
///
/// A channel's index is its position here and fixes its output column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelCatalog {
    names: Vec<String>,
}

impl ChannelCatalog {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|n| n.as_str())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl<S: Into<String>> FromIterator<S> for ChannelCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Keeps the positions of a repeating cycle whose slot is listed.
///
/// Holds only the kept slots, so the cycle may be arbitrarily long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleFilter {
    slots: Vec<usize>,
    cycle_len: usize,
}

impl CycleFilter {
    pub fn new(mut slots: Vec<usize>, cycle_len: usize) -> Self {
        slots.sort_unstable();
        slots.dedup();
        Self {
            slots,
            cycle_len: cycle_len.max(1),
        }
    }

    pub fn cycle_len(&self) -> usize {
        self.cycle_len
    }

    /// Whether zero-based stream position `position` falls on a kept slot
    pub fn keeps(&self, position: usize) -> bool {
        self.slots.binary_search(&(position % self.cycle_len)).is_ok()
    }
}

/// Channels chosen for one job, resolved against a catalog.
///
/// Indices are kept in ascending catalog order regardless of the order the
/// caller listed the names in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
    names: Vec<String>,
    total_tags: usize,
}

impl Selection {
    /// Resolve requested channel names against the catalog.
    ///
    /// `total_tags` defaults to the catalog size when not given.
    pub fn resolve<S: AsRef<str>>(
        catalog: &ChannelCatalog,
        requested: &[S],
        total_tags: Option<usize>,
    ) -> Result<Self> {
        if requested.is_empty() {
            return Err(TranscribeError::configuration("no channels selected"));
        }

        let total_tags = total_tags.unwrap_or(catalog.len());
        if total_tags < 1 {
            return Err(TranscribeError::configuration(
                "total tags per cycle must be at least 1",
            ));
        }

        let mut indices = Vec::with_capacity(requested.len());
        for name in requested {
            let name = name.as_ref();
            let index = catalog.index_of(name).ok_or_else(|| {
                TranscribeError::configuration(format!("channel '{}' is not in the catalog", name))
            })?;
            if index >= total_tags {
                return Err(TranscribeError::configuration(format!(
                    "channel '{}' has index {} but a cycle only holds {} tags",
                    name, index, total_tags
                )));
            }
            indices.push(index);
        }
        indices.sort_unstable();
        indices.dedup();

        let names = indices
            .iter()
            .filter_map(|&i| catalog.name(i).map(str::to_string))
            .collect();

        Ok(Self {
            indices,
            names,
            total_tags,
        })
    }

    /// Selected catalog indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selected channel names in catalog order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn total_tags(&self) -> usize {
        self.total_tags
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether the record at zero-based stream position `position` is selected
    pub fn keeps_position(&self, position: usize) -> bool {
        self.indices
            .binary_search(&(position % self.total_tags))
            .is_ok()
    }

    /// Position filter handed to record readers
    pub fn cycle_filter(&self) -> CycleFilter {
        CycleFilter::new(self.indices.clone(), self.total_tags)
    }

    /// Output header columns: `Date,Time,<selected names>`
    pub fn header(&self) -> Vec<&str> {
        let mut header = vec!["Date", "Time"];
        header.extend(self.names.iter().map(|n| n.as_str()));
        header
    }
}
