// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper linear algebra shared by the filter and smoother.


use nalgebra::DMatrix;

use crate::c64;

/// The Hermitian part of a square matrix, i.e. (M + Mᴴ) / 2.
///
/// Covariance matrices are Hermitian by contract, but the Joseph-less update
/// forms used by the filter and smoother let asymmetry creep in over many
/// bins. Taking the Hermitian part after every update arrests the drift.
pub(crate) fn hermitian_part(m: &DMatrix<c64>) -> DMatrix<c64> {
    (m + m.adjoint()) * c64::new(0.5, 0.0)
}

/// Solve X A = B for X, where A is Hermitian, via an LU decomposition with
/// full pivoting. A is never explicitly inverted. Returns `None` when A is
/// singular.
///
/// Both the Kalman gain (K = P⁻ Jᴴ S⁻¹) and the smoother gain
/// (C = P (P⁻)⁻¹) have this right-division shape.
pub(crate) fn solve_xa_eq_b(a: DMatrix<c64>, b: &DMatrix<c64>) -> Option<DMatrix<c64>> {
    // X A = B  ⇔  Aᴴ Xᴴ = Bᴴ, and Aᴴ = A here.
    a.full_piv_lu().solve(&b.adjoint()).map(|x| x.adjoint())
}

/// The real part of the trace. The imaginary part of a Hermitian matrix's
/// trace is zero up to rounding.
pub(crate) fn trace_re(m: &DMatrix<c64>) -> f64 {
    m.diagonal().iter().map(|z| z.re).sum()
}
