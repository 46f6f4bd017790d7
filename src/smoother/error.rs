// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for the extended Kalman smoother.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmootherError {
    #[error("The predicted covariance out of time bin {bin} is singular; inflating the process noise may help")]
    SingularPredictedCovariance { bin: usize },

    #[error("The trajectory is empty")]
    EmptyTrajectory,

    #[error("Trajectory has {means} means but {covariances} covariances")]
    TrajectoryLengthMismatch { means: usize, covariances: usize },

    #[error("Process noise is {rows}×{cols}, but the trajectory's state length is {expected}")]
    ProcessNoiseDimensionMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
}
