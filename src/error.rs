// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The crate-wide error type. Each module keeps its own error enum; this one
//! wraps them so callers can use a single `Result` type end to end.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KalcalError {
    #[error("{0}")]
    Gains(#[from] crate::gains::GainsError),

    #[error("{0}")]
    Vis(#[from] crate::vis::VisError),

    #[error("{0}")]
    Measurement(#[from] crate::measurement::MeasurementError),

    #[error("{0}")]
    Filter(#[from] crate::filter::FilterError),

    #[error("{0}")]
    Smoother(#[from] crate::smoother::SmootherError),
}
