pub mod catalog;
pub mod decoder;
pub mod header;
pub mod legacy;
pub mod plan;
pub mod source;
pub mod stream;

pub use catalog::*;
pub use decoder::*;
pub use header::*;
pub use legacy::*;
pub use plan::*;
pub use source::*;
pub use stream::*;
