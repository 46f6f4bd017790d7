// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Conversions between per-antenna gain tensors and the flat state vectors
//! used by the filter and smoother.
//!
//! The state is augmented-complex: for every (antenna, channel, direction)
//! the tensor carries the gain *and* its conjugate as a trailing axis of
//! size 2, and both halves are estimated. This is what makes the bilinear
//! measurement model differentiable as a function of the state alone.

mod error;
#[cfg(test)]
mod tests;

pub use error::GainsError;

use nalgebra::DVector;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};

use crate::c64;

/// The dimensions of a single time bin's gain tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainShape {
    /// The number of antennas in the array.
    pub num_ants: usize,

    /// The number of fine-frequency channels.
    pub num_chans: usize,

    /// The number of sky directions being solved for.
    pub num_dirs: usize,
}

impl GainShape {
    pub fn new(num_ants: usize, num_chans: usize, num_dirs: usize) -> GainShape {
        GainShape {
            num_ants,
            num_chans,
            num_dirs,
        }
    }

    /// The length of the flattened state vector: antennas × channels ×
    /// directions × 2 (the gain and its conjugate).
    pub fn state_len(&self) -> usize {
        self.num_ants * self.num_chans * self.num_dirs * 2
    }

    /// The tensor dimensions as understood by `ndarray`.
    pub fn tensor_dim(&self) -> (usize, usize, usize, usize) {
        (self.num_ants, self.num_chans, self.num_dirs, 2)
    }

    /// The flat state index of a gain entry. `aug` is 0 for the gain, 1 for
    /// its conjugate. This ordering is the codec's contract; the measurement
    /// model's Jacobian columns depend on it.
    #[inline]
    pub fn state_index(&self, ant: usize, chan: usize, dir: usize, aug: usize) -> usize {
        ((ant * self.num_chans + chan) * self.num_dirs + dir) * 2 + aug
    }
}

/// Flatten a per-time-bin gain tensor into a state vector. The inverse of
/// [`gains_tensor`].
pub fn gains_vector(gains: ArrayView4<c64>, shape: GainShape) -> Result<DVector<c64>, GainsError> {
    if gains.dim() != shape.tensor_dim() {
        return Err(GainsError::ShapeMismatch {
            expected: shape.tensor_dim(),
            got: gains.dim(),
        });
    }
    Ok(DVector::from_iterator(
        shape.state_len(),
        gains.iter().copied(),
    ))
}

/// Reshape a state vector back into a gain tensor. The inverse of
/// [`gains_vector`].
pub fn gains_tensor(state: &DVector<c64>, shape: GainShape) -> Result<Array4<c64>, GainsError> {
    if state.len() != shape.state_len() {
        return Err(GainsError::VectorLengthMismatch {
            expected: shape.state_len(),
            got: state.len(),
        });
    }
    Array4::from_shape_vec(shape.tensor_dim(), state.iter().copied().collect())
        .map_err(|_| GainsError::VectorLengthMismatch {
            expected: shape.state_len(),
            got: state.len(),
        })
}

/// The state vector corresponding to unit gains everywhere; the usual prior
/// mean.
pub fn unit_gains_vector(shape: GainShape) -> DVector<c64> {
    DVector::from_element(shape.state_len(), c64::new(1.0, 0.0))
}
