use std::sync::Arc;

use tapbeat_domain::{BeatPattern, DrumSoundSet, Playable, QuantizedBeat};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::SequencerConfig;
use crate::error::SequencerError;
use crate::session::PlaybackSession;

/// Owns at most one playback loop at a time.
///
/// Starting playback stops whatever was playing before; concurrent start and
/// stop requests are serialized on the active-session slot.
#[derive(Debug, Default)]
pub struct Sequencer {
    config: SequencerConfig,
    active: Mutex<Option<PlaybackSession>>,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            active: Mutex::new(None),
        }
    }

    pub async fn start_playback<S>(
        &self,
        pattern: BeatPattern,
        sounds: Arc<DrumSoundSet<S>>,
        step_seconds: f64,
    ) -> Result<(), SequencerError>
    where
        S: Playable + 'static,
    {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.stop().await;
        }
        let session = PlaybackSession::start(pattern, sounds, step_seconds, self.config.timing)?;
        info!(step_seconds, timing = ?self.config.timing, "playback started");
        *active = Some(session);
        Ok(())
    }

    pub async fn play<S>(
        &self,
        beat: &QuantizedBeat,
        sounds: Arc<DrumSoundSet<S>>,
    ) -> Result<(), SequencerError>
    where
        S: Playable + 'static,
    {
        self.start_playback(beat.pattern.clone(), sounds, beat.step_seconds)
            .await
    }

    /// Returns whether a loop was running.
    pub async fn stop_playback(&self) -> bool {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(session) => {
                session.stop().await;
                info!("playback stopped");
                true
            }
            None => false,
        }
    }

    pub async fn is_playing(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .is_some_and(|session| !session.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tapbeat_domain::{SoundRole, TapTimestamps};
    use tokio::time::sleep;

    use super::*;
    use crate::testing::{recording_set, TriggerLog};

    fn pattern_with(len: usize, active: &[usize]) -> BeatPattern {
        let mut steps = vec![false; len];
        for &index in active {
            steps[index] = true;
        }
        BeatPattern::from_steps(steps)
    }

    #[tokio::test(start_paused = true)]
    async fn routes_roles_by_measure_position() {
        let sequencer = Sequencer::default();
        let log = TriggerLog::default();
        sequencer
            .start_playback(pattern_with(32, &[0, 3, 8, 16, 24]), recording_set(&log), 0.01)
            .await
            .unwrap();
        sleep(Duration::from_millis(315)).await;
        assert!(sequencer.stop_playback().await);
        assert_eq!(
            log.roles(),
            vec![
                SoundRole::Kick,
                SoundRole::Hihat,
                SoundRole::Snare,
                SoundRole::Kick,
                SoundRole::Snare,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn refuses_degenerate_beat() {
        let sequencer = Sequencer::default();
        let log = TriggerLog::default();
        let degenerate = QuantizedBeat::no_rhythm();
        let err = sequencer
            .play(&degenerate, recording_set(&log))
            .await
            .unwrap_err();
        assert_eq!(err, SequencerError::InvalidStepDuration(0.0));
        let err = sequencer
            .start_playback(BeatPattern::default(), recording_set(&log), 0.5)
            .await
            .unwrap_err();
        assert_eq!(err, SequencerError::EmptyPattern);
        assert!(!sequencer.is_playing().await);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(log.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_loop() {
        let sequencer = Sequencer::default();
        let first = TriggerLog::default();
        let second = TriggerLog::default();
        sequencer
            .start_playback(pattern_with(2, &[0, 1]), recording_set(&first), 0.1)
            .await
            .unwrap();
        sleep(Duration::from_millis(250)).await;
        sequencer
            .start_playback(pattern_with(2, &[0]), recording_set(&second), 0.1)
            .await
            .unwrap();
        let first_count = first.len();
        assert!(sequencer.is_playing().await);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(first.len(), first_count);
        assert!(second.len() > 1);
        assert!(sequencer.stop_playback().await);
        assert!(!sequencer.stop_playback().await);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_stop_and_start_leave_one_loop() {
        let sequencer = Sequencer::default();
        let log = TriggerLog::default();
        sequencer
            .start_playback(pattern_with(1, &[0]), recording_set(&log), 0.1)
            .await
            .unwrap();
        sleep(Duration::from_millis(250)).await;
        let kicks = log.len();

        let (stopped, started) = tokio::join!(
            sequencer.stop_playback(),
            sequencer.start_playback(pattern_with(2, &[1]), recording_set(&log), 0.1),
        );
        assert!(stopped);
        started.unwrap();
        assert!(sequencer.is_playing().await);

        sleep(Duration::from_secs(1)).await;
        let roles = log.roles();
        assert!(roles[..kicks].iter().all(|role| *role == SoundRole::Kick));
        assert!(roles.len() > kicks);
        assert!(roles[kicks..].iter().all(|role| *role == SoundRole::Hihat));
        assert!(sequencer.stop_playback().await);
    }

    #[tokio::test(start_paused = true)]
    async fn plays_a_quantized_performance() {
        let taps = TapTimestamps::new(vec![0.0, 0.5, 1.5]).unwrap();
        let steps = vec![true, true, false, true];
        let beat = QuantizedBeat::new(BeatPattern::from_steps(steps), 0.5);
        assert_eq!(taps.min_positive_gap(), Some(beat.step_seconds));

        let sequencer = Sequencer::default();
        let log = TriggerLog::default();
        sequencer.play(&beat, recording_set(&log)).await.unwrap();
        sleep(Duration::from_millis(2100)).await;
        sequencer.stop_playback().await;
        assert_eq!(
            log.roles(),
            vec![
                SoundRole::Kick,
                SoundRole::Hihat,
                SoundRole::Hihat,
                SoundRole::Kick,
            ]
        );
    }
}
