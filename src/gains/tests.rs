// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gain codec tests.

use ndarray::prelude::*;

use super::{gains_tensor, gains_vector, unit_gains_vector, GainShape, GainsError};
use crate::c64;

/// A tensor where every element encodes its own indices, so any ordering
/// mistake in the codec shows up immediately.
fn indexed_tensor(shape: GainShape) -> Array4<c64> {
    let (a, c, d, p) = shape.tensor_dim();
    Array4::from_shape_fn((a, c, d, p), |(i, j, k, l)| {
        c64::new((i * 1000 + j * 100 + k * 10 + l) as f64, (i + j) as f64)
    })
}

#[test]
fn round_trip_is_exact() {
    let shape = GainShape::new(3, 2, 2);
    let gains = indexed_tensor(shape);
    let v = gains_vector(gains.view(), shape).unwrap();
    assert_eq!(v.len(), shape.state_len());
    let back = gains_tensor(&v, shape).unwrap();
    // Bitwise equality, not approximate: the codec is a pure reshape.
    assert_eq!(gains, back);
}

#[test]
fn flatten_ordering_is_ant_chan_dir_aug() {
    let shape = GainShape::new(2, 3, 2);
    let gains = indexed_tensor(shape);
    let v = gains_vector(gains.view(), shape).unwrap();
    for ant in 0..2 {
        for chan in 0..3 {
            for dir in 0..2 {
                for aug in 0..2 {
                    let i = shape.state_index(ant, chan, dir, aug);
                    assert_eq!(v[i], gains[(ant, chan, dir, aug)]);
                }
            }
        }
    }
}

#[test]
fn flatten_rejects_wrong_tensor_shape() {
    let shape = GainShape::new(3, 2, 1);
    let gains = Array4::<c64>::zeros((2, 2, 1, 2));
    let result = gains_vector(gains.view(), shape);
    assert!(matches!(result, Err(GainsError::ShapeMismatch { .. })));
}

#[test]
fn unflatten_rejects_wrong_vector_length() {
    let shape = GainShape::new(2, 1, 1);
    let v = unit_gains_vector(GainShape::new(3, 1, 1));
    let result = gains_tensor(&v, shape);
    assert!(matches!(
        result,
        Err(GainsError::VectorLengthMismatch { expected: 4, got: 6 })
    ));
}

#[test]
fn unit_gains_are_ones() {
    let shape = GainShape::new(2, 2, 1);
    let v = unit_gains_vector(shape);
    assert_eq!(v.len(), 8);
    assert!(v.iter().all(|&g| g == c64::new(1.0, 0.0)));
}
