// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The extended Kalman filter: the forward recursion over time bins.

mod cpu;
mod error;

pub use cpu::CpuFilter;
pub use error::FilterError;

use nalgebra::{DMatrix, DVector};
use vec1::Vec1;

use crate::{
    c64,
    gains::{unit_gains_vector, GainShape},
    noise::NoiseModel,
    vis::{TimeBin, VisData},
};

/// The initial state supplied to the filter.
#[derive(Debug, Clone)]
pub struct Prior {
    /// The prior mean m₀.
    pub mean: DVector<c64>,

    /// The prior covariance P₀.
    pub covariance: DMatrix<c64>,
}

impl Prior {
    /// Unit gains with a scaled-identity covariance; the usual
    /// uninformative starting point.
    pub fn unit(shape: GainShape, covariance_scale: f64) -> Prior {
        let n = shape.state_len();
        Prior {
            mean: unit_gains_vector(shape),
            covariance: DMatrix::from_diagonal_element(n, n, c64::new(covariance_scale, 0.0)),
        }
    }
}

/// A sequence of (mean, covariance) pairs, one per time bin, in the input
/// bins' time order. Produced by the filter, consumed and refined by the
/// smoother.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub means: Vec<DVector<c64>>,
    pub covariances: Vec<DMatrix<c64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

/// The "forward estimation" capability. One concrete implementation per
/// compute backend; callers pick an implementation rather than patching
/// algorithms at runtime.
pub trait Filter: Send + Sync {
    /// Run the forward recursion over all bins, in input order. The first
    /// failing bin aborts the run; later bins would depend on its output,
    /// so no partial trajectory is returned.
    fn run(
        &self,
        prior: &Prior,
        data: &VisData,
        bins: &Vec1<TimeBin>,
        noise: &NoiseModel,
    ) -> Result<Trajectory, FilterError>;
}
