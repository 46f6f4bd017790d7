// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The CPU implementation of the extended Kalman filter.

use log::{debug, info, trace};
use nalgebra::{DMatrix, DVector};
use vec1::Vec1;

use super::{Filter, FilterError, Prior, Trajectory};
use crate::{
    c64,
    gains::GainShape,
    math::{hermitian_part, solve_xa_eq_b, trace_re},
    measurement::MeasurementModel,
    noise::NoiseModel,
    vis::{BinView, TimeBin, VisData},
};

pub struct CpuFilter {
    model: MeasurementModel,
}

impl CpuFilter {
    pub fn new(shape: GainShape) -> CpuFilter {
        CpuFilter {
            model: MeasurementModel::new(shape),
        }
    }
}

impl Filter for CpuFilter {
    fn run(
        &self,
        prior: &Prior,
        data: &VisData,
        bins: &Vec1<TimeBin>,
        noise: &NoiseModel,
    ) -> Result<Trajectory, FilterError> {
        let n = self.model.shape().state_len();
        if prior.mean.len() != n || prior.covariance.nrows() != n || prior.covariance.ncols() != n
        {
            return Err(FilterError::PriorDimensionMismatch {
                expected: n,
                mean: prior.mean.len(),
                cov_rows: prior.covariance.nrows(),
                cov_cols: prior.covariance.ncols(),
            });
        }
        if noise.process.nrows() != n || noise.process.ncols() != n {
            return Err(FilterError::ProcessNoiseDimensionMismatch {
                expected: n,
                rows: noise.process.nrows(),
                cols: noise.process.ncols(),
            });
        }
        if bins.last().range.end != data.num_rows() {
            return Err(FilterError::BinRowMismatch {
                covered: bins.last().range.end,
                num_rows: data.num_rows(),
            });
        }

        info!(
            "Filtering {} time bins ({} state elements, {} rows)",
            bins.len(),
            n,
            data.num_rows()
        );

        let mut mean = prior.mean.clone();
        let mut cov = hermitian_part(&prior.covariance);
        let mut means = Vec::with_capacity(bins.len());
        let mut covariances = Vec::with_capacity(bins.len());

        for bin in bins.iter() {
            let view = data.bin(bin);

            // Predict. The process model is an identity random walk, so the
            // predicted mean is the previous mean.
            let cov_pred = &cov + &noise.process;

            // Measurement update.
            let h = self.model.predict(&mean, &view)?;
            let mut jacobian = self.model.jacobian(&mean, &view)?;
            let (observed, weights) = augmented_observations(&view);
            let mut innovation = observed - h;
            apply_weights(&mut innovation, &mut jacobian, &weights);

            let m_len = innovation.len();
            let pjh = &cov_pred * jacobian.adjoint();
            let s = hermitian_part(&(&jacobian * &pjh + noise.measurement(m_len)));
            let gain = solve_xa_eq_b(s, &pjh)
                .ok_or(FilterError::SingularInnovationCovariance { bin: bin.index })?;

            mean += &gain * &innovation;
            cov = hermitian_part(&((DMatrix::identity(n, n) - &gain * &jacobian) * &cov_pred));

            trace!(
                "bin {}: {} rows, |innovation| = {:e}, tr(P) = {:e}",
                bin.index,
                view.num_rows(),
                innovation.norm(),
                trace_re(&cov)
            );

            means.push(mean.clone());
            covariances.push(cov.clone());
        }

        debug!("Filtered all {} time bins", bins.len());
        Ok(Trajectory { means, covariances })
    }
}

/// Stack a bin's observed visibilities with their conjugates, and the
/// matching per-entry weights (conjugates carry the same weight).
fn augmented_observations(view: &BinView) -> (DVector<c64>, Vec<f64>) {
    let num_chans = view.num_chans();
    let half = view.num_rows() * num_chans;
    let mut observed = DVector::zeros(2 * half);
    let mut weights = vec![0.0; 2 * half];
    for k in 0..half {
        let row = k / num_chans;
        let chan = k % num_chans;
        let v = view.vis[(row, chan)];
        observed[k] = v;
        observed[half + k] = v.conj();
        let w = view.weight[(row, chan)];
        weights[k] = w;
        weights[half + k] = w;
    }
    (observed, weights)
}

/// Scale each measurement row of the innovation and Jacobian by √weight.
/// This is the R → R/w weighting without dividing by zero: a zero-weight
/// row contributes nothing to the update.
fn apply_weights(innovation: &mut DVector<c64>, jacobian: &mut DMatrix<c64>, weights: &[f64]) {
    for (k, &w) in weights.iter().enumerate() {
        let sqrt_w = c64::new(w.sqrt(), 0.0);
        innovation[k] *= sqrt_w;
        let mut row = jacobian.row_mut(k);
        row *= sqrt_w;
    }
}
