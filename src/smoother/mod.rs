// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The extended Kalman smoother: the fixed-interval (Rauch-Tung-Striebel)
//! recursion over a filtered trajectory, and the driver that applies it
//! repeatedly with alternating direction.

mod cpu;
mod error;

pub use cpu::CpuSmoother;
pub use error::SmootherError;

use std::num::NonZeroUsize;

use log::{debug, info};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::{c64, filter::Trajectory};

/// Which end of the trajectory anchors the recursion.
///
/// `Backward` is the classic fixed-interval smoother: the last bin is left
/// unchanged and the recursion walks down the time index. `Forward` anchors
/// at the first bin and walks up; it is what smoothing a time-reversed
/// trajectory backward would compute, without any array reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn flipped(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A smoothed trajectory plus the smoother gain matrices, kept for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct Smoothed {
    /// The smoothed means and covariances, in the input's time order.
    pub trajectory: Trajectory,

    /// One gain matrix per non-anchor bin, in ascending time order: entry i
    /// belongs to bin i for a backward run, and to bin i + 1 for a forward
    /// run.
    pub gains: Vec<DMatrix<c64>>,
}

/// The "backward refinement" capability, mirroring [`crate::filter::Filter`].
pub trait Smoother: Send + Sync {
    /// Smooth a filtered trajectory with the same process noise Q the
    /// filter used. The anchor bin is passed through unchanged.
    fn run(
        &self,
        filtered: &Trajectory,
        process: &DMatrix<c64>,
        direction: Direction,
    ) -> Result<Smoothed, SmootherError>;
}

/// Settings for the smoothing driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothSettings {
    /// How many smoothing passes to run. More passes squeeze out a little
    /// more variance at a linear cost in runtime; there is no known
    /// optimality argument for any particular count.
    pub passes: NonZeroUsize,
}

impl Default for SmoothSettings {
    fn default() -> SmoothSettings {
        SmoothSettings {
            // An empirical choice, not a tuned one.
            passes: NonZeroUsize::new(3).expect("3 is non-zero"),
        }
    }
}

/// Apply the smoother `passes` times, alternating direction each pass
/// starting backward. Each pass consumes the previous pass's smoothed
/// output as its filtered input, with the same Q throughout. The returned
/// gains are those of the final pass.
pub fn smooth_passes(
    smoother: &dyn Smoother,
    filtered: &Trajectory,
    process: &DMatrix<c64>,
    settings: SmoothSettings,
) -> Result<Smoothed, SmootherError> {
    info!(
        "Smoothing {} time bins over {} passes",
        filtered.len(),
        settings.passes
    );

    let mut direction = Direction::Backward;
    let mut smoothed = smoother.run(filtered, process, direction)?;
    for pass in 1..settings.passes.get() {
        direction = direction.flipped();
        debug!("Smoothing pass {}/{} ({direction:?})", pass + 1, settings.passes);
        smoothed = smoother.run(&smoothed.trajectory, process, direction)?;
    }
    Ok(smoothed)
}
