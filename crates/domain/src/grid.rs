use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Slack applied when counting grid cells so that a last tap sitting on a grid
/// point is not lost to rounding in `last / step`.
const CELL_EPSILON: f64 = 1e-9;

/// Largest grid a performance may ask for. A stray pair of nearly coincident
/// taps would otherwise demand an unbounded pattern.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Uniform time grid `0, step, 2*step, ...` covering `0..=span`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuantizationGrid {
    /// Seconds between consecutive grid points.
    step: f64,
    cells: usize,
}

impl QuantizationGrid {
    pub fn new(step: f64, span: f64) -> Result<Self, DomainError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(DomainError::validation(
                "grid step must be a positive finite number of seconds",
            ));
        }
        if !(span.is_finite() && span >= 0.0) {
            return Err(DomainError::validation(
                "grid span must be a non-negative finite number of seconds",
            ));
        }
        let ratio = (span / step + CELL_EPSILON).floor();
        let cells = if ratio.is_finite() && ratio < MAX_GRID_CELLS as f64 {
            (ratio as usize).checked_add(1)
        } else {
            None
        };
        match cells {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(Self { step, cells }),
            _ => Err(DomainError::validation(format!(
                "grid of step {step}s over {span}s exceeds {MAX_GRID_CELLS} cells"
            ))),
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn cells(&self) -> usize {
        self.cells
    }

    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 * self.step
    }

    /// Index of the grid point closest to `time`. Equidistant points resolve
    /// to the lower index; times past the grid clamp to the last cell.
    pub fn nearest_cell(&self, time: f64) -> usize {
        let last = self.cells - 1;
        let lower = ((time / self.step).floor().max(0.0) as usize).min(last);
        if lower == last {
            return last;
        }
        let upper = lower + 1;
        let below = (time - self.time_at(lower)).abs();
        let above = (self.time_at(upper) - time).abs();
        if above < below {
            upper
        } else {
            lower
        }
    }
}
