use crate::error::Result;
use crate::types::ChannelReading;

/// Produces the selected single-channel readings of one input, in stream order.
///
/// Implementations apply the cyclic selection themselves, so every reading
/// returned belongs to a selected channel and readings arrive in ascending
/// catalog order within each cycle.
pub trait ChannelSource {
    /// Next selected reading, `Ok(None)` once the input is exhausted
    fn next_reading(&mut self) -> Result<Option<ChannelReading>>;
}

impl<T: ChannelSource + ?Sized> ChannelSource for Box<T> {
    fn next_reading(&mut self) -> Result<Option<ChannelReading>> {
        (**self).next_reading()
    }
}
