// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Measurement model tests.

use nalgebra::DVector;
use ndarray::prelude::*;

use super::{MeasurementError, MeasurementModel};
use crate::{
    c64,
    gains::{gains_vector, GainShape},
    vis::BinView,
};

/// A bin with a single baseline (0, 1) and arbitrary model visibilities.
struct OneBaseline {
    ant1: Vec<usize>,
    ant2: Vec<usize>,
    vis: Array2<c64>,
    model: Array3<c64>,
    weight: Array2<f64>,
}

impl OneBaseline {
    fn new(num_chans: usize, num_dirs: usize) -> OneBaseline {
        OneBaseline {
            ant1: vec![0],
            ant2: vec![1],
            vis: Array2::zeros((1, num_chans)),
            model: Array3::from_shape_fn((1, num_chans, num_dirs), |(_, c, d)| {
                c64::new(1.0 + c as f64, 0.5 - d as f64)
            }),
            weight: Array2::ones((1, num_chans)),
        }
    }

    fn view(&self) -> BinView {
        BinView {
            ant1: &self.ant1,
            ant2: &self.ant2,
            vis: self.vis.view(),
            model: self.model.view(),
            weight: self.weight.view(),
        }
    }
}

/// A deterministic, well-scattered gain state with consistent conjugate
/// halves.
fn scattered_state(shape: GainShape) -> DVector<c64> {
    let (a, c, d, _) = shape.tensor_dim();
    let gains = Array4::from_shape_fn((a, c, d, 2), |(i, j, k, l)| {
        let g = c64::new(
            1.0 + 0.1 * (i as f64) - 0.05 * (j as f64),
            0.2 * (k as f64) - 0.07 * (i as f64),
        );
        if l == 0 {
            g
        } else {
            g.conj()
        }
    });
    gains_vector(gains.view(), shape).unwrap()
}

#[test]
fn predict_matches_hand_computation() {
    let shape = GainShape::new(2, 1, 2);
    let bin = OneBaseline::new(1, 2);
    let state = scattered_state(shape);
    let h = MeasurementModel::new(shape)
        .predict(&state, &bin.view())
        .unwrap();
    assert_eq!(h.len(), 2);

    let mut expected = c64::new(0.0, 0.0);
    for dir in 0..2 {
        let g1 = state[shape.state_index(0, 0, dir, 0)];
        let g2c = state[shape.state_index(1, 0, dir, 1)];
        expected += g1 * bin.model[(0, 0, dir)] * g2c;
    }
    assert!((h[0] - expected).norm() < 1e-14);
    // The conjugate half really is the conjugate when the state is
    // conjugate-consistent.
    assert!((h[1] - expected.conj()).norm() < 1e-14);
}

#[test]
fn predict_unit_gains_sums_model_over_directions() {
    let shape = GainShape::new(2, 2, 3);
    let bin = OneBaseline::new(2, 3);
    let state = DVector::from_element(shape.state_len(), c64::new(1.0, 0.0));
    let h = MeasurementModel::new(shape)
        .predict(&state, &bin.view())
        .unwrap();
    for chan in 0..2 {
        let summed: c64 = (0..3).map(|d| bin.model[(0, chan, d)]).sum();
        assert!((h[chan] - summed).norm() < 1e-14);
        assert!((h[2 + chan] - summed.conj()).norm() < 1e-14);
    }
}

#[test]
fn jacobian_matches_finite_differences() {
    let shape = GainShape::new(3, 2, 2);
    let rows = OneBaseline {
        ant1: vec![0, 0, 1],
        ant2: vec![1, 2, 2],
        vis: Array2::zeros((3, 2)),
        model: Array3::from_shape_fn((3, 2, 2), |(r, c, d)| {
            c64::new(1.0 + (r + c) as f64 * 0.3, 0.4 - d as f64 * 0.2)
        }),
        weight: Array2::ones((3, 2)),
    };
    let model = MeasurementModel::new(shape);
    let state = scattered_state(shape);

    let j = model.jacobian(&state, &rows.view()).unwrap();
    let h0 = model.predict(&state, &rows.view()).unwrap();
    assert_eq!(j.nrows(), h0.len());
    assert_eq!(j.ncols(), shape.state_len());

    // The measurement is holomorphic in each augmented state entry, so a
    // real finite-difference step recovers each Jacobian column.
    let eps = 1e-7;
    for col in 0..shape.state_len() {
        let mut perturbed = state.clone();
        perturbed[col] += c64::new(eps, 0.0);
        let h1 = model.predict(&perturbed, &rows.view()).unwrap();
        for row in 0..h0.len() {
            let fd = (h1[row] - h0[row]) / eps;
            assert!(
                (j[(row, col)] - fd).norm() < 1e-5,
                "J[({row}, {col})] = {}, finite difference = {fd}",
                j[(row, col)]
            );
        }
    }
}

#[test]
fn jacobian_is_sparse_outside_the_baseline() {
    let shape = GainShape::new(4, 1, 1);
    // Only baseline (1, 3); antennas 0 and 2 are untouched.
    let rows = OneBaseline {
        ant1: vec![1],
        ant2: vec![3],
        vis: Array2::zeros((1, 1)),
        model: Array3::from_elem((1, 1, 1), c64::new(2.0, 1.0)),
        weight: Array2::ones((1, 1)),
    };
    let state = scattered_state(shape);
    let j = MeasurementModel::new(shape)
        .jacobian(&state, &rows.view())
        .unwrap();

    for ant in [0, 2] {
        for aug in 0..2 {
            let col = shape.state_index(ant, 0, 0, aug);
            assert!(j.column(col).iter().all(|z| z.norm() == 0.0));
        }
    }
    // Each measurement row has exactly 2 × num_dirs non-zeros.
    for row in 0..j.nrows() {
        let nonzero = j.row(row).iter().filter(|z| z.norm() > 0.0).count();
        assert_eq!(nonzero, 2);
    }
}

#[test]
fn bad_state_length_is_rejected() {
    let shape = GainShape::new(2, 1, 1);
    let bin = OneBaseline::new(1, 1);
    let state = DVector::from_element(6, c64::new(1.0, 0.0));
    let result = MeasurementModel::new(shape).predict(&state, &bin.view());
    assert!(matches!(
        result,
        Err(MeasurementError::StateLength { expected: 4, got: 6 })
    ));
}

#[test]
fn out_of_range_antenna_is_rejected() {
    let shape = GainShape::new(2, 1, 1);
    let rows = OneBaseline {
        ant1: vec![0],
        ant2: vec![7],
        vis: Array2::zeros((1, 1)),
        model: Array3::from_elem((1, 1, 1), c64::new(1.0, 0.0)),
        weight: Array2::ones((1, 1)),
    };
    let state = DVector::from_element(shape.state_len(), c64::new(1.0, 0.0));
    let result = MeasurementModel::new(shape).jacobian(&state, &rows.view());
    assert!(matches!(
        result,
        Err(MeasurementError::AntennaOutOfBounds { row: 0, .. })
    ));
}

#[test]
fn direction_mismatch_is_rejected() {
    let shape = GainShape::new(2, 1, 2);
    let bin = OneBaseline::new(1, 1);
    let state = DVector::from_element(shape.state_len(), c64::new(1.0, 0.0));
    let result = MeasurementModel::new(shape).predict(&state, &bin.view());
    assert!(matches!(
        result,
        Err(MeasurementError::DirectionCount { model: 1, num_dirs: 2 })
    ));
}
