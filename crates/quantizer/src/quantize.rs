use tapbeat_domain::{BeatPattern, QuantizationGrid, QuantizedBeat, TapTimestamps};
use tracing::{debug, warn};

/// Snaps taps onto a grid whose resolution is the finest gap in the
/// performance.
///
/// One accidental double tap forces a very fine, and possibly very long,
/// grid. That sensitivity is part of the policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinGapQuantizer;

impl MinGapQuantizer {
    pub fn quantize(&self, taps: &TapTimestamps) -> QuantizedBeat {
        let (Some(step), Some(last)) = (taps.min_positive_gap(), taps.last()) else {
            debug!(tap_count = taps.len(), "no usable rhythm in taps");
            return QuantizedBeat::no_rhythm();
        };
        let grid = match QuantizationGrid::new(step, last) {
            Ok(grid) => grid,
            Err(err) => {
                warn!(%err, step, last, "taps do not fit a playable grid");
                return QuantizedBeat::no_rhythm();
            }
        };

        let mut steps = vec![false; grid.cells()];
        for &tap in taps.as_slice() {
            steps[grid.nearest_cell(tap)] = true;
        }
        debug!(
            tap_count = taps.len(),
            step,
            cells = grid.cells(),
            "quantized taps"
        );
        QuantizedBeat::new(BeatPattern::from_steps(steps), step)
    }
}

pub fn quantize(taps: &TapTimestamps) -> QuantizedBeat {
    MinGapQuantizer.quantize(taps)
}
