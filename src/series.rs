//! Per-site observation series, with optional per-site validity flags.
//!
//! A [`Series`] is the input type of the smoothing core in [`smooth`]. It is a
//! tagged variant: either every observation is valid ([`Series::Plain`]), or
//! observations carry a parallel boolean flag ([`Series::Masked`]) where
//! `false` marks a *masked* (invalid or missing) site. The smoothing core
//! dispatches on the variant, not on the flag contents, so an all-valid
//! [`Series::Masked`] is still normalized by per-window valid counts.
//!
//! [`smooth`]: crate::smooth

use ndarray::Array1;
use num_traits::Float;

use crate::error::GSmoothError;

/// An ordered series of per-site observations, e.g. one value per basepair
/// of a chromosome.
#[derive(Clone, Debug, PartialEq)]
pub enum Series<F: Float> {
    /// A uniformly-valid series.
    Plain(Array1<F>),
    /// A series with a parallel validity flag; `false` marks a masked site.
    Masked {
        values: Array1<F>,
        valid: Array1<bool>,
    },
}

impl<F: Float> Series<F> {
    /// Create a uniformly-valid [`Series`] from a vector of observations.
    pub fn from_vec(values: Vec<F>) -> Self {
        Series::Plain(Array1::from_vec(values))
    }

    /// Create a masked [`Series`] from observations and a parallel validity
    /// flag vector.
    ///
    /// Returns [`GSmoothError::SeriesLengthMismatch`] if the two vectors
    /// differ in length.
    pub fn from_parts(values: Vec<F>, valid: Vec<bool>) -> Result<Self, GSmoothError> {
        if values.len() != valid.len() {
            return Err(GSmoothError::SeriesLengthMismatch(
                values.len(),
                valid.len(),
            ));
        }
        Ok(Series::Masked {
            values: Array1::from_vec(values),
            valid: Array1::from_vec(valid),
        })
    }

    /// Create a masked [`Series`] from optional observations, where `None`
    /// marks a masked site.
    ///
    /// Masked sites are stored as zero; the smoothing core never lets them
    /// contribute to a window sum or a valid count.
    pub fn from_options(values: &[Option<F>]) -> Self {
        let valid: Array1<bool> = values.iter().map(|value| value.is_some()).collect();
        let values: Array1<F> = values
            .iter()
            .map(|value| value.unwrap_or_else(F::zero))
            .collect();
        Series::Masked { values, valid }
    }

    /// The number of sites in the series, masked or not.
    pub fn len(&self) -> usize {
        match self {
            Series::Plain(values) => values.len(),
            Series::Masked { values, .. } => values.len(),
        }
    }

    /// Return whether this series has no sites.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw observation values, including any at masked sites.
    pub fn values(&self) -> &Array1<F> {
        match self {
            Series::Plain(values) => values,
            Series::Masked { values, .. } => values,
        }
    }

    /// The per-site validity flags; `None` for a [`Series::Plain`].
    pub fn validity(&self) -> Option<&Array1<bool>> {
        match self {
            Series::Plain(_) => None,
            Series::Masked { valid, .. } => Some(valid),
        }
    }

    /// The number of valid sites.
    pub fn n_valid(&self) -> usize {
        match self {
            Series::Plain(values) => values.len(),
            Series::Masked { valid, .. } => valid.iter().filter(|flag| **flag).count(),
        }
    }
}
