// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The CPU implementation of the extended Kalman smoother.

use log::trace;
use nalgebra::DMatrix;

use super::{Direction, Smoothed, Smoother, SmootherError};
use crate::{
    c64,
    filter::Trajectory,
    math::{hermitian_part, solve_xa_eq_b, trace_re},
};

pub struct CpuSmoother;

impl Smoother for CpuSmoother {
    fn run(
        &self,
        filtered: &Trajectory,
        process: &DMatrix<c64>,
        direction: Direction,
    ) -> Result<Smoothed, SmootherError> {
        let num_bins = filtered.len();
        if num_bins == 0 {
            return Err(SmootherError::EmptyTrajectory);
        }
        if filtered.covariances.len() != num_bins {
            return Err(SmootherError::TrajectoryLengthMismatch {
                means: num_bins,
                covariances: filtered.covariances.len(),
            });
        }
        let state_len = filtered.means[0].len();
        if process.nrows() != state_len || process.ncols() != state_len {
            return Err(SmootherError::ProcessNoiseDimensionMismatch {
                expected: state_len,
                rows: process.nrows(),
                cols: process.ncols(),
            });
        }

        // The anchor bin's smoothed state is its filtered state; everything
        // else is refined from its already-smoothed neighbour.
        let mut means = filtered.means.clone();
        let mut covariances = filtered.covariances.clone();
        let mut gains = Vec::with_capacity(num_bins.saturating_sub(1));

        let steps: Box<dyn Iterator<Item = usize>> = match direction {
            Direction::Backward => Box::new((0..num_bins.saturating_sub(1)).rev()),
            Direction::Forward => Box::new(1..num_bins),
        };

        for cur in steps {
            let prev = match direction {
                Direction::Backward => cur + 1,
                Direction::Forward => cur - 1,
            };

            // Predict out of the current bin's filtered state; the process
            // model is an identity random walk.
            let cov_pred = hermitian_part(&(&filtered.covariances[cur] + process));

            // Smoother gain C = P (P⁻)⁻¹.
            let gain = solve_xa_eq_b(cov_pred.clone(), &filtered.covariances[cur])
                .ok_or(SmootherError::SingularPredictedCovariance { bin: cur })?;

            let mean = &filtered.means[cur] + &gain * (&means[prev] - &filtered.means[cur]);
            let cov = hermitian_part(
                &(&filtered.covariances[cur]
                    + &gain * (&covariances[prev] - &cov_pred) * gain.adjoint()),
            );

            trace!(
                "smoothed bin {cur} from bin {prev}: tr(Ps) = {:e}",
                trace_re(&cov)
            );

            means[cur] = mean;
            covariances[cur] = cov;
            gains.push(gain);
        }

        // Keep the gains in ascending time order regardless of the
        // processing direction.
        if direction == Direction::Backward {
            gains.reverse();
        }

        Ok(Smoothed {
            trajectory: Trajectory { means, covariances },
            gains,
        })
    }
}
