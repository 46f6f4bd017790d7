// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! In-memory visibility data and its partitioning into time bins.
//!
//! The data layout matches what an external measurement-set loader
//! produces: a flat stream of baseline rows, each row carrying per-channel
//! observed visibilities, per-channel-per-direction model visibilities and
//! per-channel weights, plus the two antenna indices forming the baseline.

mod error;

pub use error::VisError;

use std::ops::Range;

use itertools::izip;
use ndarray::prelude::*;
use vec1::Vec1;

use crate::{c64, gains::GainShape};

/// A contiguous group of visibility rows sharing one estimation time step.
#[derive(Debug, Clone)]
pub struct TimeBin {
    /// The time bin index; 0 is the earliest bin.
    pub index: usize,

    /// The range of row indices into the flat visibility stream belonging to
    /// this bin.
    pub range: Range<usize>,
}

/// Build [`TimeBin`]s from the (start row, row count) pairs a loader
/// provides. The pairs must be in time order, contiguous, non-empty and
/// cover `num_rows` exactly; the filter's sequential recursion depends on
/// that.
pub fn time_bins(
    tbin_indices: &[usize],
    tbin_counts: &[usize],
    num_rows: usize,
) -> Result<Vec1<TimeBin>, VisError> {
    if tbin_indices.len() != tbin_counts.len() {
        return Err(VisError::TimeBinArrayLengths {
            indices: tbin_indices.len(),
            counts: tbin_counts.len(),
        });
    }

    let mut bins = Vec::with_capacity(tbin_indices.len());
    let mut expected_start = 0;
    for (index, (&start, &count)) in izip!(tbin_indices, tbin_counts).enumerate() {
        if count == 0 {
            return Err(VisError::EmptyTimeBin { index });
        }
        if start != expected_start {
            return Err(VisError::NonContiguousTimeBins {
                index,
                expected_start,
                got_start: start,
            });
        }
        bins.push(TimeBin {
            index,
            range: start..start + count,
        });
        expected_start = start + count;
    }
    if expected_start != num_rows {
        return Err(VisError::TimeBinCoverage {
            covered: expected_start,
            num_rows,
        });
    }

    Vec1::try_from_vec(bins).map_err(|_| VisError::NoTimeBins)
}

/// Observed data, model data and weights for every baseline row, aligned by
/// row. Only cross-correlations are accepted.
pub struct VisData {
    shape: GainShape,

    /// The first antenna of each row's baseline.
    ant1: Vec<usize>,

    /// The second antenna of each row's baseline.
    ant2: Vec<usize>,

    /// Observed visibilities, row × channel.
    vis: Array2<c64>,

    /// Model visibilities, row × channel × direction.
    model: Array3<c64>,

    /// Weights, row × channel. A zero weight excludes that visibility from
    /// the measurement update.
    weight: Array2<f64>,
}

impl VisData {
    pub fn new(
        shape: GainShape,
        ant1: Vec<usize>,
        ant2: Vec<usize>,
        vis: Array2<c64>,
        model: Array3<c64>,
        weight: Array2<f64>,
    ) -> Result<VisData, VisError> {
        let num_rows = ant1.len();
        if ant2.len() != num_rows
            || vis.len_of(Axis(0)) != num_rows
            || model.len_of(Axis(0)) != num_rows
            || weight.len_of(Axis(0)) != num_rows
        {
            return Err(VisError::RowCountMismatch {
                ant1: num_rows,
                ant2: ant2.len(),
                vis: vis.len_of(Axis(0)),
                model: model.len_of(Axis(0)),
                weight: weight.len_of(Axis(0)),
            });
        }

        for (row, (&a1, &a2)) in izip!(&ant1, &ant2).enumerate() {
            if a1 >= shape.num_ants || a2 >= shape.num_ants {
                return Err(VisError::AntennaOutOfBounds {
                    row,
                    ant1: a1,
                    ant2: a2,
                    num_ants: shape.num_ants,
                });
            }
            if a1 == a2 {
                return Err(VisError::Autocorrelation { row, ant: a1 });
            }
        }

        if vis.len_of(Axis(1)) != shape.num_chans
            || model.len_of(Axis(1)) != shape.num_chans
            || weight.len_of(Axis(1)) != shape.num_chans
        {
            return Err(VisError::ChannelCountMismatch {
                vis: vis.len_of(Axis(1)),
                model: model.len_of(Axis(1)),
                weight: weight.len_of(Axis(1)),
                num_chans: shape.num_chans,
            });
        }
        if model.len_of(Axis(2)) != shape.num_dirs {
            return Err(VisError::DirectionCountMismatch {
                model: model.len_of(Axis(2)),
                num_dirs: shape.num_dirs,
            });
        }

        Ok(VisData {
            shape,
            ant1,
            ant2,
            vis,
            model,
            weight,
        })
    }

    pub fn shape(&self) -> GainShape {
        self.shape
    }

    pub fn num_rows(&self) -> usize {
        self.ant1.len()
    }

    /// Borrow the rows belonging to one time bin.
    ///
    /// # Panics
    ///
    /// Panics if the bin's range lies outside the data; [`time_bins`] built
    /// against this data's row count never does.
    pub fn bin(&self, bin: &TimeBin) -> BinView {
        let r = bin.range.clone();
        BinView {
            ant1: &self.ant1[r.clone()],
            ant2: &self.ant2[r.clone()],
            vis: self.vis.slice(s![r.clone(), ..]),
            model: self.model.slice(s![r.clone(), .., ..]),
            weight: self.weight.slice(s![r, ..]),
        }
    }
}

/// One time bin's slice of [`VisData`].
pub struct BinView<'a> {
    pub ant1: &'a [usize],
    pub ant2: &'a [usize],
    pub vis: ArrayView2<'a, c64>,
    pub model: ArrayView3<'a, c64>,
    pub weight: ArrayView2<'a, f64>,
}

impl BinView<'_> {
    pub fn num_rows(&self) -> usize {
        self.ant1.len()
    }

    pub fn num_chans(&self) -> usize {
        self.vis.len_of(Axis(1))
    }

    /// The augmented measurement length for this bin: one entry per
    /// (row, channel) and one for its conjugate.
    pub fn measurement_len(&self) -> usize {
        2 * self.num_rows() * self.num_chans()
    }
}
