use crate::roles::SoundRole;

/// A sound that can be started without blocking the caller.
///
/// Playback failures stay inside the implementation; callers never observe
/// them.
pub trait Playable: Send + Sync {
    fn trigger(&self);
}

/// The three drum voices a sequencer routes steps to.
#[derive(Clone, Debug)]
pub struct DrumSoundSet<S> {
    pub kick: S,
    pub snare: S,
    pub hihat: S,
}

impl<S: Playable> DrumSoundSet<S> {
    pub fn new(kick: S, snare: S, hihat: S) -> Self {
        Self { kick, snare, hihat }
    }

    pub fn get(&self, role: SoundRole) -> &S {
        match role {
            SoundRole::Kick => &self.kick,
            SoundRole::Snare => &self.snare,
            SoundRole::Hihat => &self.hihat,
        }
    }

    pub fn trigger(&self, role: SoundRole) {
        self.get(role).trigger();
    }
}
