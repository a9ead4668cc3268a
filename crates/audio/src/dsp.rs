#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakLevel {
    pub max: f32,
    pub min: f32,
}

impl PeakLevel {
    pub fn silence() -> Self {
        Self { max: 0.0, min: 0.0 }
    }

    pub fn measure(buffer: &[f32]) -> Self {
        buffer.iter().fold(Self::silence(), |peak, sample| Self {
            max: peak.max.max(*sample),
            min: peak.min.min(*sample),
        })
    }

    pub fn magnitude(&self) -> f32 {
        self.max.abs().max(self.min.abs())
    }
}

/// Scales `buffer` so its loudest sample sits at `target` and returns the
/// level measured before scaling. Silent buffers are left untouched.
pub fn normalize_to(buffer: &mut [f32], target: f32) -> PeakLevel {
    let peak = PeakLevel::measure(buffer);
    let magnitude = peak.magnitude();
    if magnitude > 1e-6 {
        let gain = target / magnitude;
        for sample in buffer.iter_mut() {
            *sample *= gain;
        }
    }
    peak
}

/// Squared linear fade from 1 at `position` 0 to 0 at `length`.
pub fn decay_envelope(position: usize, length: usize) -> f32 {
    if length == 0 {
        return 0.0;
    }
    (length.saturating_sub(position) as f32 / length as f32).powi(2)
}
