pub mod channel;
pub mod event;
pub mod record;
pub mod table;

pub use channel::*;
pub use event::*;
pub use record::*;
pub use table::*;
