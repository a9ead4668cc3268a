use std::sync::{Arc, Mutex};
use std::time::Duration;

use tapbeat_domain::{DrumSoundSet, Playable, SoundRole};
use tokio::time::Instant;

/// Shared record of every trigger, in firing order.
#[derive(Clone, Default)]
pub struct TriggerLog {
    hits: Arc<Mutex<Vec<(SoundRole, Instant)>>>,
}

impl TriggerLog {
    pub fn len(&self) -> usize {
        self.hits.lock().unwrap().len()
    }

    pub fn roles(&self) -> Vec<SoundRole> {
        self.hits.lock().unwrap().iter().map(|(role, _)| *role).collect()
    }

    pub fn hits_since(&self, start: Instant) -> Vec<(SoundRole, Duration)> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .map(|(role, at)| (*role, at.duration_since(start)))
            .collect()
    }
}

pub struct RecordingSound {
    role: SoundRole,
    log: TriggerLog,
}

impl Playable for RecordingSound {
    fn trigger(&self) {
        self.log.hits.lock().unwrap().push((self.role, Instant::now()));
    }
}

pub fn recording_set(log: &TriggerLog) -> Arc<DrumSoundSet<RecordingSound>> {
    let sound = |role| RecordingSound {
        role,
        log: log.clone(),
    };
    Arc::new(DrumSoundSet::new(
        sound(SoundRole::Kick),
        sound(SoundRole::Snare),
        sound(SoundRole::Hihat),
    ))
}
