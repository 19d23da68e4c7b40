//! Transcriber Library
//!
//! Converts data-logger float tables (dBASE-family `.DAT` files) and their
//! legacy flat text exports into CSV files holding only the selected channels.
//!
//! Loggers record one channel per record and cycle through every channel for
//! each timestamp. The transcriber reads only the fields it needs from each
//! record, keeps the records of the selected channels and folds each cycle
//! back into a single wide row: `Date,Time,<channel>...`.
//!
//! # Features
//!
//! - **`cli`** (default): Build the `transcriber` command-line binary
//! - **`json`** (default): Serialize batch summaries as JSON
//! - **`serde`**: Derive serialization for the public data types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use transcriber::{convert_files, load_catalog, ConversionEvent, ConversionJob, PoolConfig};
//! use std::path::{Path, PathBuf};
//!
//! let catalog = load_catalog(Path::new("2026 10 19 0000 (Tagname).DAT")).unwrap();
//! let job = ConversionJob::new(catalog, &["Line1\\Speed", "Line1\\Temp"], None).unwrap();
//! let files = vec![PathBuf::from("2026 10 19 0000 (Float).DAT")];
//!
//! let summary = convert_files(&files, &job, &PoolConfig::default(), |event| {
//!     if let ConversionEvent::FileFailed { input, error } = event {
//!         eprintln!("{}: {}", input.display(), error);
//!     }
//! })
//! .unwrap();
//! println!("{} of {} files converted", summary.completed.len(), summary.total_files);
//! ```
//!
//! # Public API
//!
//! ## Conversion
//! - [`convert_files`] - Convert a batch of files on a bounded worker pool
//! - [`run_batch`] - Same, with any [`FileConverter`]
//! - [`ConversionJob`] - Validated per-job settings; converts single files
//!
//! ## Reading
//! - [`decode_table_header`] - Field layout of a binary table
//! - [`ReadPlan`] - Keep/skip plan with merged skip runs
//! - [`RecordStream`] - Seeking record reader over a table
//! - [`TableChannelSource`] / [`TextChannelSource`] - Selected channel readings
//! - [`Demultiplexer`] - Folds readings into output rows
//! - [`load_catalog`] - Channel catalog from a tag table or text list

pub mod coordinator;
pub mod demux;
pub mod error;
pub mod export;
pub mod parser;
pub mod types;
pub mod worker;

pub use coordinator::*;
pub use demux::*;
pub use error::*;
pub use export::*;
pub use parser::*;
pub use types::*;
pub use worker::*;
