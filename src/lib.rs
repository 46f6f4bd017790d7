// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Kalman filtering and smoothing for radio interferometric gain calibration.

Per-antenna complex gains ("Jones terms") drift over time; this crate
estimates them from observed and model visibilities with an extended Kalman
filter running forward over time bins, then refines the filtered trajectory
with a fixed-interval extended Kalman smoother. Repeated smoothing passes
with alternating direction squeeze out additional variance.

The crate is the estimation engine only. Reading measurement sets,
simulating data and plotting solutions are left to external collaborators;
everything here operates on in-memory tensors.
 */

pub mod error;
pub mod filter;
pub mod gains;
pub(crate) mod math;
pub mod measurement;
pub mod noise;
pub mod smoother;
pub mod vis;

// Re-exports.
pub use error::KalcalError;
pub use filter::{CpuFilter, Filter, Prior, Trajectory};
pub use gains::{gains_tensor, gains_vector, GainShape};
pub use measurement::MeasurementModel;
pub use noise::{NoiseModel, NoiseSettings};
pub use smoother::{smooth_passes, CpuSmoother, Direction, SmoothSettings, Smoothed, Smoother};
pub use vis::{time_bins, TimeBin, VisData};

/// A convenient type alias for a double-precision complex number.
#[allow(non_camel_case_types)]
pub type c64 = num_complex::Complex<f64>;
