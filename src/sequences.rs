//! Per-sequence (e.g. per-chromosome) collections of observation series.
//!
//! A [`SeriesMap`] holds one [`Series`] per sequence name, e.g. a per-site
//! diversity track for each chromosome, and can smooth all of them with the
//! same window settings. Per-sequence smoothing is independent, so callers
//! with many sequences can also fan the work out themselves with
//! [`running_average()`] directly.

use genomap::GenomeMap;
use num_traits::{Float, FromPrimitive};

use crate::error::GSmoothError;
use crate::series::Series;
use crate::smooth::{running_average, SmoothedSeries};

/// A container of per-site observation series keyed by sequence name.
pub struct SeriesMap<F: Float> {
    data: GenomeMap<Series<F>>,
}

impl<F: Float> SeriesMap<F> {
    /// Create an empty [`SeriesMap`].
    pub fn new() -> Self {
        Self {
            data: GenomeMap::new(),
        }
    }

    /// Insert a [`Series`] under a sequence name.
    pub fn insert(&mut self, seqname: &str, series: Series<F>) -> Result<(), GSmoothError> {
        self.data.insert(seqname, series)?;
        Ok(())
    }

    /// The names of all sequences in the container.
    pub fn seqnames(&self) -> Vec<String> {
        self.data.names()
    }

    /// Get the series for a sequence name.
    pub fn get_series(&self, seqname: &str) -> Result<&Series<F>, GSmoothError> {
        self.data
            .get(seqname)
            .ok_or(GSmoothError::MissingSequence(seqname.to_string()))
    }

    /// The number of sequences in the container.
    pub fn len(&self) -> usize {
        self.data.values().count()
    }

    /// Return whether this container has no sequences.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<F: Float> Default for SeriesMap<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float + FromPrimitive> SeriesMap<F> {
    /// Smooth every sequence's series with the same window size and
    /// validity threshold, returning the results keyed by sequence name in
    /// the container's order.
    pub fn smooth(
        &self,
        window_size: usize,
        min_valid_fraction: f64,
    ) -> Result<GenomeMap<SmoothedSeries<F>>, GSmoothError> {
        let mut smoothed = GenomeMap::new();
        for seqname in self.seqnames() {
            let series = self.get_series(&seqname)?;
            let result = running_average(series, window_size, min_valid_fraction)?;
            smoothed.insert(&seqname, result)?;
        }
        Ok(smoothed)
    }
}
