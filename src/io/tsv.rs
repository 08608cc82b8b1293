//! TSV reading and writing of per-site numeric tracks.
//!
//! Site tracks are tab-delimited rows of sequence name, 0-based position,
//! and value, where the value column may hold the missing marker (`.` by
//! default) for a masked site. Deserialization wraps the blazingly-fast
//! [`csv`] crate's [`serde`] support.

use csv::{DeserializeRecordsIntoIter, Reader, ReaderBuilder};
use flate2::read::GzDecoder;
use genomap::GenomeMap;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::GSmoothError;
use crate::io::file::{is_gzipped_file, OutputFile};
use crate::sequences::SeriesMap;
use crate::series::Series;
use crate::smooth::SmoothedSeries;
use crate::Position;

lazy_static! {
    /// The standard site-track TSV configuration.
    pub static ref SITE_TSV: TsvConfig = TsvConfig {
        no_value_string: ".".to_string(),
    };
}

/// Common TSV output configuration, e.g. what to print at a site whose
/// smoothed value is invalid.
pub struct TsvConfig {
    pub no_value_string: String,
}

/// A single per-site observation row: sequence name, 0-based position, and
/// an optional value, where `None` (the missing marker in TSV) marks a
/// masked site.
#[derive(Debug, Deserialize, PartialEq)]
pub struct SiteRecord {
    pub seqname: String,
    pub pos: Position,
    #[serde(deserialize_with = "deserialize_missing_value")]
    pub value: Option<f64>,
}

fn deserialize_missing_value<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_option_generic(deserializer, &["."])
}

/// Deserializes some value of type `t` with some possible missing
/// character `missing_chars` into [`Option<T>`].
pub fn deserialize_option_generic<'de, D, T>(
    deserializer: D,
    missing_chars: &'de [&'de str],
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if missing_chars.contains(&s.as_str()) {
        Ok(None)
    } else {
        s.parse::<T>()
            .map(Some)
            .map_err(|e| DeError::custom(format!("parsing error: {}", e)))
    }
}

/// Build a TSV reader which ignores comment lines, works on gzip-compressed
/// files, etc.
pub fn build_tsv_reader(
    filepath: impl Into<PathBuf>,
) -> Result<Reader<Box<dyn Read>>, GSmoothError> {
    let filepath = filepath.into();
    let file = File::open(&filepath)?;
    let is_gzipped = is_gzipped_file(&filepath)?;
    let stream: Box<dyn Read> = if is_gzipped {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .from_reader(stream);
    Ok(reader)
}

/// An iterator over deserialized TSV records, e.g. [`SiteRecord`] rows.
pub struct TsvRecordIterator<T> {
    inner: DeserializeRecordsIntoIter<Box<dyn std::io::Read>, T>,
}

impl<T> std::fmt::Debug for TsvRecordIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsvRecordIterator").finish_non_exhaustive()
    }
}

impl<T> TsvRecordIterator<T>
where
    for<'de> T: Deserialize<'de>,
{
    /// Create a new TSV reader. Lines beginning with `'#'` are skipped,
    /// since a pseudo-standard is that these indicate metadata or column
    /// headers.
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self, GSmoothError> {
        let filepath = filepath.into();
        let reader = build_tsv_reader(filepath)?;
        let inner = reader.into_deserialize();

        Ok(Self { inner })
    }
}

impl<T> Iterator for TsvRecordIterator<T>
where
    for<'de> T: Deserialize<'de>,
{
    type Item = Result<T, GSmoothError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|res| res.map_err(GSmoothError::CsvError))
    }
}

/// Read a site-track TSV into a dense [`SeriesMap`], with one masked series
/// per sequence in `seqlens`.
///
/// Every site absent from the file, and every site carrying the missing
/// marker, is masked. A row on an unknown sequence, a position at or beyond
/// the sequence length, or a repeated (sequence, position) pair is an
/// error.
pub fn read_series_tsv(
    filepath: impl Into<PathBuf>,
    seqlens: &IndexMap<String, Position>,
) -> Result<SeriesMap<f64>, GSmoothError> {
    let mut values: IndexMap<String, Vec<Option<f64>>> = seqlens
        .iter()
        .map(|(seqname, length)| (seqname.clone(), vec![None; *length as usize]))
        .collect();
    let mut seen: IndexMap<String, Vec<bool>> = seqlens
        .iter()
        .map(|(seqname, length)| (seqname.clone(), vec![false; *length as usize]))
        .collect();

    let iter = TsvRecordIterator::<SiteRecord>::new(filepath)?;
    for record in iter {
        let record = record?;
        let length = *seqlens
            .get(&record.seqname)
            .ok_or_else(|| GSmoothError::MissingSequence(record.seqname.clone()))?;
        if record.pos >= length {
            return Err(GSmoothError::InvalidSitePosition(
                record.seqname,
                record.pos,
                length,
            ));
        }
        let site = record.pos as usize;
        let seen_sites = seen
            .get_mut(&record.seqname)
            .ok_or_else(|| GSmoothError::MissingSequence(record.seqname.clone()))?;
        if seen_sites[site] {
            return Err(GSmoothError::DuplicateSitePosition(
                record.seqname,
                record.pos,
            ));
        }
        seen_sites[site] = true;
        let buffer = values
            .get_mut(&record.seqname)
            .ok_or_else(|| GSmoothError::MissingSequence(record.seqname.clone()))?;
        buffer[site] = record.value;
    }

    let mut series_map = SeriesMap::new();
    for (seqname, buffer) in values {
        series_map.insert(&seqname, Series::from_options(&buffer))?;
    }
    Ok(series_map)
}

/// Write smoothed per-site values as a TSV of sequence name, position, and
/// value rows, with `config.no_value_string` at invalid sites.
///
/// Output goes to `output` (gzip-compressed if the path ends in `.gz`), or
/// standard output if `None`.
pub fn write_smoothed_tsv(
    smoothed: &GenomeMap<SmoothedSeries<f64>>,
    output: Option<impl Into<PathBuf>>,
    config: &TsvConfig,
) -> Result<(), GSmoothError> {
    let output_stream = output.map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    });
    let mut writer = output_stream.writer()?;
    for seqname in smoothed.names() {
        let series = smoothed
            .get(&seqname)
            .ok_or_else(|| GSmoothError::MissingSequence(seqname.clone()))?;
        for (pos, (value, flag)) in series.iter().enumerate() {
            if flag {
                writeln!(writer, "{}\t{}\t{}", seqname, pos, value)?;
            } else {
                writeln!(writer, "{}\t{}\t{}", seqname, pos, config.no_value_string)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use std::io::Write as IoWrite;
    use tempfile::NamedTempFile;

    fn write_track(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_series_tsv() {
        let file = write_track(&[
            "# a comment",
            "chr1\t0\t1.5",
            "chr1\t1\t.",
            "chr1\t3\t2.5",
        ]);
        let seqlens = indexmap! { "chr1".to_string() => 4 };
        let series_map = read_series_tsv(file.path(), &seqlens).unwrap();
        let series = series_map.get_series("chr1").unwrap();
        assert_eq!(series.len(), 4);
        // site 1 is the missing marker; site 2 is absent from the file
        assert_eq!(series.n_valid(), 2);
        let valid = series.validity().unwrap();
        assert_eq!(valid.to_vec(), vec![true, false, false, true]);
        assert_eq!(series.values()[0], 1.5);
        assert_eq!(series.values()[3], 2.5);
    }

    #[test]
    fn test_read_series_tsv_unknown_sequence() {
        let file = write_track(&["chrX\t0\t1.0"]);
        let seqlens = indexmap! { "chr1".to_string() => 4 };
        let result = read_series_tsv(file.path(), &seqlens);
        assert!(matches!(result, Err(GSmoothError::MissingSequence(_))));
    }

    #[test]
    fn test_read_series_tsv_out_of_range() {
        let file = write_track(&["chr1\t4\t1.0"]);
        let seqlens = indexmap! { "chr1".to_string() => 4 };
        let result = read_series_tsv(file.path(), &seqlens);
        assert!(matches!(
            result,
            Err(GSmoothError::InvalidSitePosition(_, 4, 4))
        ));
    }

    #[test]
    fn test_read_series_tsv_duplicate_site() {
        // a repeated site is rejected even when one row is the missing marker
        let file = write_track(&["chr1\t2\t1.0", "chr1\t2\t."]);
        let seqlens = indexmap! { "chr1".to_string() => 4 };
        let result = read_series_tsv(file.path(), &seqlens);
        assert!(matches!(
            result,
            Err(GSmoothError::DuplicateSitePosition(_, 2))
        ));
    }
}
