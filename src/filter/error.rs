// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for the extended Kalman filter.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("The innovation covariance at time bin {bin} is singular; inflating the measurement noise may help")]
    SingularInnovationCovariance { bin: usize },

    #[error("Prior has mean length {mean} and covariance {cov_rows}×{cov_cols}, but the state length is {expected}")]
    PriorDimensionMismatch {
        expected: usize,
        mean: usize,
        cov_rows: usize,
        cov_cols: usize,
    },

    #[error("Process noise is {rows}×{cols}, but the state length is {expected}")]
    ProcessNoiseDimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Time bins cover {covered} rows, but the visibility data has {num_rows}")]
    BinRowMismatch { covered: usize, num_rows: usize },

    #[error("{0}")]
    Measurement(#[from] crate::measurement::MeasurementError),
}
