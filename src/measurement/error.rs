// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for measurement-model dimension contracts.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeasurementError {
    #[error("State vector has length {got}, but the gain shape implies {expected}")]
    StateLength { expected: usize, got: usize },

    #[error("Model visibilities carry {model} directions, but the state carries {num_dirs}")]
    DirectionCount { model: usize, num_dirs: usize },

    #[error("Bin row {row} refers to antennas ({ant1}, {ant2}), but only {num_ants} antennas are configured")]
    AntennaOutOfBounds {
        row: usize,
        ant1: usize,
        ant2: usize,
        num_ants: usize,
    },
}
