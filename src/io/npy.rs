//! Optional `.npy` output of smoothed arrays.
//!
//! This module is only loaded with the crate `npy` feature, since it
//! requires [ndarray-npy](https://crates.io/crates/ndarray-npy).

use ndarray::Array1;
use std::path::PathBuf;

use crate::error::GSmoothError;
use crate::smooth::SmoothedSeries;

/// Write the smoothed values of one sequence to a `.npy` file, with NaN at
/// invalid sites.
pub fn write_npy_values(
    filepath: impl Into<PathBuf>,
    smoothed: &SmoothedSeries<f64>,
) -> Result<(), GSmoothError> {
    let masked: Array1<f64> = smoothed
        .iter()
        .map(|(value, flag)| if flag { value } else { f64::NAN })
        .collect();
    ndarray_npy::write_npy(filepath.into(), &masked)?;
    Ok(())
}

/// Write the per-site validity flags of one sequence to a `.npy` file.
pub fn write_npy_validity(
    filepath: impl Into<PathBuf>,
    smoothed: &SmoothedSeries<f64>,
) -> Result<(), GSmoothError> {
    ndarray_npy::write_npy(filepath.into(), smoothed.valid())?;
    Ok(())
}
