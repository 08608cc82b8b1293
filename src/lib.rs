
pub mod commands;
pub mod error;
pub mod io;
pub mod reporting;
pub mod sequences;
pub mod series;
pub mod smooth;
pub mod test_utilities;

pub type Position = u32;

pub mod prelude {
    pub use crate::error::GSmoothError;
    pub use crate::io::file::{read_seqlens, InputFile, OutputFile};
    pub use crate::io::tsv::{read_series_tsv, write_smoothed_tsv, SiteRecord, SITE_TSV};
    pub use crate::sequences::SeriesMap;
    pub use crate::series::Series;
    pub use crate::smooth::{running_average, SmoothedSeries, DEFAULT_MIN_VALID_FRACTION};
    pub use crate::Position;
}
