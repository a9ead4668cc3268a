use std::f32::consts::TAU;

use tapbeat_domain::SoundRole;

use crate::dsp::{decay_envelope, normalize_to};

/// Headroom left when several voices overlap in the mixer.
const VOICE_PEAK: f32 = 0.8;

/// xorshift32, seeded per voice so renders are reproducible.
struct Noise(u32);

impl Noise {
    fn next(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Renders a mono one-shot drum voice for `role`.
pub fn render_voice(role: SoundRole, sample_rate: u32, length_ms: u32) -> Vec<f32> {
    let sr = sample_rate as f32;
    let full = (length_ms as f32 * sr / 1000.0) as usize;
    let mut samples = match role {
        SoundRole::Kick => render_kick(sr, full),
        SoundRole::Snare => render_snare(sr, full),
        // hats ring much shorter than the drums
        SoundRole::Hihat => render_hihat(full / 3),
    };
    normalize_to(&mut samples, VOICE_PEAK);
    samples
}

fn render_kick(sr: f32, length: usize) -> Vec<f32> {
    let mut phase = 0.0f32;
    (0..length)
        .map(|n| {
            let t = n as f32 / sr;
            // pitch sweeps from 110 Hz down towards 50 Hz
            let freq = 50.0 + 60.0 * (-t * 30.0).exp();
            phase = (phase + freq / sr).fract();
            (TAU * phase).sin() * decay_envelope(n, length)
        })
        .collect()
}

fn render_snare(sr: f32, length: usize) -> Vec<f32> {
    let mut noise = Noise(0x1234_5678);
    (0..length)
        .map(|n| {
            let body = (TAU * 180.0 * n as f32 / sr).sin() * 0.4;
            let rattle = noise.next() * 0.6;
            (body + rattle) * decay_envelope(n, length)
        })
        .collect()
}

fn render_hihat(length: usize) -> Vec<f32> {
    let mut noise = Noise(0x9e37_79b9);
    let mut previous = 0.0f32;
    (0..length)
        .map(|n| {
            let white = noise.next();
            // first difference keeps the top end
            let bright = white - previous;
            previous = white;
            bright * decay_envelope(n, length)
        })
        .collect()
}
