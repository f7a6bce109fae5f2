//! Histogram binning
//!
//! Counts raw values into the bins delimited by an edge array. Bin `i`
//! covers the half-open interval `[edges[i], edges[i + 1])` for
//! `i < nbins - 1`; the last bin has no interval of its own and only
//! receives overflow when outliers are included.
//!
//! By default a value of exactly `0.0` ends the data, so a zero data point
//! is indistinguishable from the end of the data. Set
//! [`HistogramOptions::zero_terminates`] to `false` to count zeros.

use crate::error::{PlotError, Result};

/// Binning options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramOptions {
    /// Fold values at or below `edges[0]` into the first bin and values at
    /// or above `edges[nbins - 1]` into the last bin
    pub include_outliers: bool,
    /// Stop scanning at the first value equal to `0.0`
    pub zero_terminates: bool,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            include_outliers: false,
            zero_terminates: true,
        }
    }
}

impl HistogramOptions {
    pub fn with_outliers(include_outliers: bool) -> Self {
        Self {
            include_outliers,
            ..Default::default()
        }
    }
}

/// Count `values` into `nbins` bins
///
/// Returns `InvalidInput` when `nbins` is zero or `edges` holds fewer than
/// `nbins` entries. Nothing outside the returned vector is touched.
pub fn bin_counts(
    edges: &[f64],
    values: &[f64],
    nbins: usize,
    options: HistogramOptions,
) -> Result<Vec<f64>> {
    if nbins == 0 {
        return Err(PlotError::InvalidInput(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if edges.len() < nbins {
        return Err(PlotError::InvalidInput(format!(
            "histogram with {} bins needs at least {} edges, got {}",
            nbins,
            nbins,
            edges.len()
        )));
    }

    let edges = &edges[..nbins];
    let mut counts = vec![0.0; nbins];

    let data = values
        .iter()
        .copied()
        .take_while(|v| !(options.zero_terminates && *v == 0.0));

    for value in data {
        if let Some(bin) = bin_index(edges, value, options.include_outliers) {
            counts[bin] += 1.0;
        }
    }

    Ok(counts)
}

fn bin_index(edges: &[f64], value: f64, include_outliers: bool) -> Option<usize> {
    let last = edges.len() - 1;
    if include_outliers {
        if value <= edges[0] {
            return Some(0);
        }
        if value >= edges[last] {
            return Some(last);
        }
    }
    edges
        .windows(2)
        .position(|w| value >= w[0] && value < w[1])
}
