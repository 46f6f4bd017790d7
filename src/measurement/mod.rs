// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The nonlinear measurement model linking pairwise visibilities to
//! per-antenna gains.
//!
//! A baseline (p, q) predicts, per channel c,
//!
//! ```text
//! v[p,q,c] = Σ_d g[p,c,d] · model[p,q,c,d] · conj(g[q,c,d])
//! ```
//!
//! The state is augmented with the gain conjugates, so the conjugate of
//! every visibility is also a (separately differentiable) measurement; a
//! bin's measurement vector stacks all (row, channel) visibilities followed
//! by their conjugates. The model is bilinear in the state, which makes the
//! Jacobian rows sparse: only the columns of the two antennas forming the
//! baseline are non-zero.

mod error;
#[cfg(test)]
mod tests;

pub use error::MeasurementError;

use nalgebra::{DMatrix, DVector};
use num_traits::Zero;
use rayon::prelude::*;

use crate::{c64, gains::GainShape, vis::BinView};

/// Predicted visibilities and their Jacobian with respect to the gain
/// state, for one time bin at a time.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementModel {
    shape: GainShape,
}

impl MeasurementModel {
    pub fn new(shape: GainShape) -> MeasurementModel {
        MeasurementModel { shape }
    }

    pub fn shape(&self) -> GainShape {
        self.shape
    }

    fn check(&self, state: &DVector<c64>, bin: &BinView) -> Result<(), MeasurementError> {
        if state.len() != self.shape.state_len() {
            return Err(MeasurementError::StateLength {
                expected: self.shape.state_len(),
                got: state.len(),
            });
        }
        if bin.model.dim().2 != self.shape.num_dirs {
            return Err(MeasurementError::DirectionCount {
                model: bin.model.dim().2,
                num_dirs: self.shape.num_dirs,
            });
        }
        for (row, (&a1, &a2)) in bin.ant1.iter().zip(bin.ant2.iter()).enumerate() {
            if a1 >= self.shape.num_ants || a2 >= self.shape.num_ants {
                return Err(MeasurementError::AntennaOutOfBounds {
                    row,
                    ant1: a1,
                    ant2: a2,
                    num_ants: self.shape.num_ants,
                });
            }
        }
        Ok(())
    }

    /// Predict the bin's augmented measurement vector at the given state.
    /// The first half holds the visibilities in (row, channel) order, the
    /// second half their conjugate counterparts.
    pub fn predict(
        &self,
        state: &DVector<c64>,
        bin: &BinView,
    ) -> Result<DVector<c64>, MeasurementError> {
        self.check(state, bin)?;

        let shape = self.shape;
        let num_chans = bin.num_chans();
        let half = bin.num_rows() * num_chans;
        let mut h = DVector::zeros(2 * half);
        for k in 0..half {
            let row = k / num_chans;
            let chan = k % num_chans;
            let a1 = bin.ant1[row];
            let a2 = bin.ant2[row];
            let mut v = c64::zero();
            let mut v_conj = c64::zero();
            for dir in 0..shape.num_dirs {
                let m = bin.model[(row, chan, dir)];
                let g1 = state[shape.state_index(a1, chan, dir, 0)];
                let g1c = state[shape.state_index(a1, chan, dir, 1)];
                let g2 = state[shape.state_index(a2, chan, dir, 0)];
                let g2c = state[shape.state_index(a2, chan, dir, 1)];
                v += g1 * m * g2c;
                v_conj += g1c * m.conj() * g2;
            }
            h[k] = v;
            h[half + k] = v_conj;
        }
        Ok(h)
    }

    /// The Jacobian of [`MeasurementModel::predict`] with respect to every
    /// state entry, evaluated at `state`. Dimensions: bin measurement
    /// length × state length.
    pub fn jacobian(
        &self,
        state: &DVector<c64>,
        bin: &BinView,
    ) -> Result<DMatrix<c64>, MeasurementError> {
        self.check(state, bin)?;

        let shape = self.shape;
        let num_chans = bin.num_chans();
        let half = bin.num_rows() * num_chans;

        // Each measurement row touches only the two antennas of its
        // baseline, i.e. 2 × num_dirs entries. Rows are independent, so
        // assemble them in parallel as sparse (column, value) lists.
        #[allow(clippy::type_complexity)]
        let rows: Vec<(Vec<(usize, c64)>, Vec<(usize, c64)>)> = (0..half)
            .into_par_iter()
            .map(|k| {
                let row = k / num_chans;
                let chan = k % num_chans;
                let a1 = bin.ant1[row];
                let a2 = bin.ant2[row];
                let mut direct = Vec::with_capacity(2 * shape.num_dirs);
                let mut conjugate = Vec::with_capacity(2 * shape.num_dirs);
                for dir in 0..shape.num_dirs {
                    let m = bin.model[(row, chan, dir)];
                    let g1 = state[shape.state_index(a1, chan, dir, 0)];
                    let g1c = state[shape.state_index(a1, chan, dir, 1)];
                    let g2 = state[shape.state_index(a2, chan, dir, 0)];
                    let g2c = state[shape.state_index(a2, chan, dir, 1)];

                    // v = g1 m g2c: linear in g1 and in g2c.
                    direct.push((shape.state_index(a1, chan, dir, 0), m * g2c));
                    direct.push((shape.state_index(a2, chan, dir, 1), g1 * m));
                    // conj(v) = g1c conj(m) g2.
                    conjugate.push((shape.state_index(a1, chan, dir, 1), m.conj() * g2));
                    conjugate.push((shape.state_index(a2, chan, dir, 0), g1c * m.conj()));
                }
                (direct, conjugate)
            })
            .collect();

        let mut j = DMatrix::zeros(2 * half, shape.state_len());
        for (k, (direct, conjugate)) in rows.into_iter().enumerate() {
            for (col, val) in direct {
                j[(k, col)] += val;
            }
            for (col, val) in conjugate {
                j[(half + k, col)] += val;
            }
        }
        Ok(j)
    }
}
