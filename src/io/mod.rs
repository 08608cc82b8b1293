//! Types and methods for reading site tracks and writing smoothed output.

pub mod file;
#[cfg(feature = "npy")]
pub mod npy;
pub mod tsv;

pub use file::{read_seqlens, InputFile, OutputFile};
pub use tsv::{read_series_tsv, write_smoothed_tsv, SiteRecord, TsvRecordIterator, SITE_TSV};
