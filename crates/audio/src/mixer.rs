use std::sync::{Arc, Mutex};

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use tapbeat_domain::{DrumSoundSet, Playable, SoundRole};
use tracing::warn;

/// Upper bound on simultaneously sounding voices; later hits are dropped.
pub const MAX_VOICES: usize = 32;

type TriggerQueue = Arc<Mutex<HeapProducer<Arc<[f32]>>>>;

/// A rendered drum voice. Triggering queues it for the mixer and returns
/// immediately.
#[derive(Clone)]
pub struct VoiceHandle {
    role: SoundRole,
    samples: Arc<[f32]>,
    queue: TriggerQueue,
}

impl std::fmt::Debug for VoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceHandle")
            .field("role", &self.role)
            .field("samples", &self.samples.len())
            .finish()
    }
}

impl Playable for VoiceHandle {
    fn trigger(&self) {
        let Ok(mut queue) = self.queue.lock() else {
            warn!(role = self.role.name(), "trigger queue poisoned; dropping hit");
            return;
        };
        if queue.push(self.samples.clone()).is_err() {
            warn!(role = self.role.name(), "trigger queue full; dropping hit");
        }
    }
}

struct PlayingVoice {
    samples: Arc<[f32]>,
    position: usize,
}

/// Sums triggered voices into a mono signal. Lives on the audio thread.
pub struct Mixer {
    queue: HeapConsumer<Arc<[f32]>>,
    voices: Vec<PlayingVoice>,
    gain: f32,
}

impl Mixer {
    /// Moves queued triggers into the set of sounding voices.
    pub fn accept_triggers(&mut self) {
        while let Some(samples) = self.queue.pop() {
            if self.voices.len() < MAX_VOICES {
                self.voices.push(PlayingVoice {
                    samples,
                    position: 0,
                });
            }
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        for voice in &mut self.voices {
            if let Some(sample) = voice.samples.get(voice.position) {
                sum += sample;
                voice.position += 1;
            }
        }
        (sum * self.gain).clamp(-1.0, 1.0)
    }

    pub fn retire_finished(&mut self) {
        self.voices.retain(|voice| voice.position < voice.samples.len());
    }

    /// Fills an interleaved buffer, writing the mono mix to every channel.
    pub fn render<T: Copy>(
        &mut self,
        out: &mut [T],
        channels: usize,
        convert: impl Fn(f32) -> T,
    ) {
        self.accept_triggers();
        for frame in out.chunks_mut(channels.max(1)) {
            frame.fill(convert(self.next_sample()));
        }
        self.retire_finished();
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }
}

/// Wires three rendered voices to one mixer through a bounded trigger queue.
pub fn voice_bank(
    kick: Vec<f32>,
    snare: Vec<f32>,
    hihat: Vec<f32>,
    queue_capacity: usize,
    gain: f32,
) -> (DrumSoundSet<VoiceHandle>, Mixer) {
    let (producer, consumer) = HeapRb::<Arc<[f32]>>::new(queue_capacity.max(1)).split();
    let queue: TriggerQueue = Arc::new(Mutex::new(producer));
    let handle = |role, samples: Vec<f32>| VoiceHandle {
        role,
        samples: samples.into(),
        queue: queue.clone(),
    };
    let sounds = DrumSoundSet::new(
        handle(SoundRole::Kick, kick),
        handle(SoundRole::Snare, snare),
        handle(SoundRole::Hihat, hihat),
    );
    let mixer = Mixer {
        queue: consumer,
        voices: Vec::with_capacity(MAX_VOICES),
        gain: gain.clamp(0.0, 1.0),
    };
    (sounds, mixer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggered_voices_are_summed() {
        let (sounds, mut mixer) = voice_bank(vec![0.5; 4], vec![0.25; 2], vec![0.1; 1], 8, 1.0);
        sounds.trigger(SoundRole::Kick);
        sounds.trigger(SoundRole::Snare);
        let mut out = vec![0.0; 8];
        mixer.render(&mut out, 2, |s| s);
        assert_eq!(out, vec![0.75, 0.75, 0.75, 0.75, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn voices_continue_across_buffers() {
        let (sounds, mut mixer) = voice_bank(vec![0.5; 6], vec![], vec![], 8, 0.5);
        sounds.trigger(SoundRole::Kick);
        let mut out = vec![0.0; 4];
        mixer.render(&mut out, 1, |s| s);
        assert_eq!(mixer.active_voices(), 1);
        mixer.render(&mut out, 1, |s| s);
        assert_eq!(out, vec![0.25, 0.25, 0.0, 0.0]);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn mix_is_clamped() {
        let (sounds, mut mixer) = voice_bank(vec![0.8; 2], vec![0.8; 2], vec![0.8; 2], 8, 1.0);
        for role in SoundRole::ALL {
            sounds.trigger(role);
        }
        let mut out = vec![0.0; 2];
        mixer.render(&mut out, 1, |s| s);
        assert_eq!(out, vec![1.0, 1.0]);
    }

    #[test]
    fn full_queue_drops_triggers() {
        let (sounds, mut mixer) = voice_bank(vec![0.1; 10], vec![], vec![], 2, 1.0);
        for _ in 0..5 {
            sounds.trigger(SoundRole::Kick);
        }
        mixer.accept_triggers();
        assert_eq!(mixer.active_voices(), 2);
    }

    #[test]
    fn silence_without_triggers() {
        let (_sounds, mut mixer) = voice_bank(vec![0.5; 4], vec![], vec![], 4, 1.0);
        let mut out = vec![1.0; 6];
        mixer.render(&mut out, 3, |s| s);
        assert!(out.iter().all(|s| *s == 0.0));
    }
}
