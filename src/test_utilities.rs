//! Test cases and test utility functions.
//!

use indexmap::IndexMap;
use ndarray::Array1;
use rand::{thread_rng, Rng};
use std::io::Write;
use tempfile::NamedTempFile;

use crate::error::GSmoothError;
use crate::sequences::SeriesMap;
use crate::series::Series;
use crate::Position;

// Stochastic test series defaults
//
// The tradeoff is catching stochastic errors vs test time.
pub const NRANDOM_SITES: usize = 1000;

// default fraction of sites to mask
pub const MASKED_FRACTION: f64 = 0.1;

/// Build a random uniformly-valid series of `n` sites.
pub fn random_plain_series(n: usize) -> Series<f64> {
    let mut rng = thread_rng();
    let values: Vec<f64> = (0..n).map(|_| rng.gen()).collect();
    Series::from_vec(values)
}

/// Build a random masked series of `n` sites, with each site independently
/// masked with probability `masked_fraction`.
pub fn random_masked_series(n: usize, masked_fraction: f64) -> Series<f64> {
    let mut rng = thread_rng();
    let values: Array1<f64> = (0..n).map(|_| rng.gen()).collect();
    let valid: Array1<bool> = (0..n).map(|_| rng.gen::<f64>() >= masked_fraction).collect();
    Series::Masked { values, valid }
}

/// Build a random [`SeriesMap`] over the sequences in `seqlens`.
pub fn random_series_map(
    seqlens: &IndexMap<String, Position>,
    masked_fraction: f64,
) -> Result<SeriesMap<f64>, GSmoothError> {
    let mut series_map = SeriesMap::new();
    for (seqname, length) in seqlens.iter() {
        let series = random_masked_series(*length as usize, masked_fraction);
        series_map.insert(seqname, series)?;
    }
    Ok(series_map)
}

/// Write a random dense site track over the sequences in `seqlens` to a
/// temporary TSV file.
pub fn random_trackfile(
    seqlens: &IndexMap<String, Position>,
    masked_fraction: f64,
) -> Result<NamedTempFile, GSmoothError> {
    let mut rng = thread_rng();
    let mut file = NamedTempFile::new()?;
    for (seqname, length) in seqlens.iter() {
        for pos in 0..*length {
            if rng.gen::<f64>() < masked_fraction {
                writeln!(file, "{}\t{}\t.", seqname, pos)?;
            } else {
                writeln!(file, "{}\t{}\t{}", seqname, pos, rng.gen::<f64>())?;
            }
        }
    }
    file.flush()?;
    Ok(file)
}
