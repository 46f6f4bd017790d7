// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Process and measurement noise.
//!
//! Both covariances are scaled identities: the process
//! noise Q = σ_f² I models the random-walk drift of the gains between time
//! bins, and the measurement noise R = 2 σ_n² I models the visibility
//! error (the factor of 2 accounts for the conjugate measurements carrying
//! the same underlying noise).

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::c64;

/// Scalar noise parameters, as an external configuration layer would load
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// The process noise scale σ_f.
    pub sigma_f: f64,

    /// The measurement noise scale σ_n.
    pub sigma_n: f64,
}

/// The noise model used by the filter and smoother. The process covariance
/// is an explicit matrix so callers can pin state entries (e.g. a reference
/// antenna) by zeroing their rows and columns.
#[derive(Debug, Clone)]
pub struct NoiseModel {
    /// The process noise covariance Q, state length × state length.
    pub process: DMatrix<c64>,

    /// The measurement noise scale σ_n.
    pub sigma_n: f64,
}

impl NoiseModel {
    /// Q = σ_f² I for the given state length.
    pub fn isotropic(state_len: usize, settings: NoiseSettings) -> NoiseModel {
        NoiseModel {
            process: DMatrix::from_diagonal_element(
                state_len,
                state_len,
                c64::new(settings.sigma_f * settings.sigma_f, 0.0),
            ),
            sigma_n: settings.sigma_n,
        }
    }

    /// R = 2 σ_n² I sized to a bin's augmented measurement length.
    pub(crate) fn measurement(&self, measurement_len: usize) -> DMatrix<c64> {
        DMatrix::from_diagonal_element(
            measurement_len,
            measurement_len,
            c64::new(2.0 * self.sigma_n * self.sigma_n, 0.0),
        )
    }
}
