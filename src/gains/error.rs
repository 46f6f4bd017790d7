// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for gain codec errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainsError {
    #[error("Gain tensor has dimensions {got:?}, but the gain shape implies {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize, usize),
        got: (usize, usize, usize, usize),
    },

    #[error("State vector has length {got}, but the gain shape implies {expected}")]
    VectorLengthMismatch { expected: usize, got: usize },
}
