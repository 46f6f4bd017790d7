// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for visibility-data and time-bin contract violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisError {
    #[error("tbin_indices has {indices} entries but tbin_counts has {counts}")]
    TimeBinArrayLengths { indices: usize, counts: usize },

    #[error("Time bin {index} is empty")]
    EmptyTimeBin { index: usize },

    #[error("Time bin {index} starts at row {got_start}, but the previous bin ends at row {expected_start}; bins must be contiguous and in time order")]
    NonContiguousTimeBins {
        index: usize,
        expected_start: usize,
        got_start: usize,
    },

    #[error("Time bins cover {covered} rows, but the visibility stream has {num_rows}")]
    TimeBinCoverage { covered: usize, num_rows: usize },

    #[error("No time bins were supplied")]
    NoTimeBins,

    #[error("Row counts disagree: ant1 {ant1}, ant2 {ant2}, vis {vis}, model {model}, weight {weight}")]
    RowCountMismatch {
        ant1: usize,
        ant2: usize,
        vis: usize,
        model: usize,
        weight: usize,
    },

    #[error("Row {row} refers to antennas ({ant1}, {ant2}), but only {num_ants} antennas are configured")]
    AntennaOutOfBounds {
        row: usize,
        ant1: usize,
        ant2: usize,
        num_ants: usize,
    },

    #[error("Row {row} is an auto-correlation of antenna {ant}; only cross-correlations are usable")]
    Autocorrelation { row: usize, ant: usize },

    #[error("Channel counts disagree: vis {vis}, model {model}, weight {weight}, configured {num_chans}")]
    ChannelCountMismatch {
        vis: usize,
        model: usize,
        weight: usize,
        num_chans: usize,
    },

    #[error("Model has {model} directions, but {num_dirs} are configured")]
    DirectionCountMismatch { model: usize, num_dirs: usize },
}
