use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tapbeat_domain::{BeatPattern, DrumSoundSet, Playable, SoundRoleMap};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, trace, warn};

use crate::config::TimingPolicy;
use crate::error::SequencerError;

/// Checks the caller contract before any task exists.
pub fn step_duration(pattern: &BeatPattern, step_seconds: f64) -> Result<Duration, SequencerError> {
    if pattern.is_empty() {
        return Err(SequencerError::EmptyPattern);
    }
    if !(step_seconds.is_finite() && step_seconds > 0.0) {
        return Err(SequencerError::InvalidStepDuration(step_seconds));
    }
    Duration::try_from_secs_f64(step_seconds)
        .ok()
        .filter(|step| !step.is_zero())
        .ok_or(SequencerError::InvalidStepDuration(step_seconds))
}

#[derive(Debug, Default)]
struct StopSignal {
    stopped: AtomicBool,
    wake: Notify,
}

impl StopSignal {
    fn request(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    fn is_requested(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// A running playback loop.
///
/// The loop stops when [`PlaybackSession::stop`] is awaited or when the
/// session is dropped. Once `stop` returns, no further triggers fire.
#[derive(Debug)]
pub struct PlaybackSession {
    signal: Arc<StopSignal>,
    task: Option<JoinHandle<()>>,
}

impl PlaybackSession {
    /// Spawns the loop on the current tokio runtime.
    pub fn start<S>(
        pattern: BeatPattern,
        sounds: Arc<DrumSoundSet<S>>,
        step_seconds: f64,
        timing: TimingPolicy,
    ) -> Result<Self, SequencerError>
    where
        S: Playable + 'static,
    {
        let step = step_duration(&pattern, step_seconds)?;
        debug!(
            cells = pattern.len(),
            active = pattern.active_count(),
            step_ms = step.as_secs_f64() * 1000.0,
            ?timing,
            "starting playback loop"
        );
        let signal = Arc::new(StopSignal::default());
        let task = tokio::spawn(run_loop(pattern, sounds, step, timing, signal.clone()));
        Ok(Self {
            signal,
            task: Some(task),
        })
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub async fn stop(mut self) {
        self.signal.request();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    warn!(?err, "playback loop panicked");
                }
            }
        }
        debug!("playback loop stopped");
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.signal.request();
            task.abort();
        }
    }
}

async fn run_loop<S: Playable>(
    pattern: BeatPattern,
    sounds: Arc<DrumSoundSet<S>>,
    step: Duration,
    timing: TimingPolicy,
    signal: Arc<StopSignal>,
) {
    let roles = SoundRoleMap;
    let mut index = 0;
    let mut due = Instant::now();
    loop {
        if signal.is_requested() {
            break;
        }
        if pattern.is_active(index) {
            let role = roles.role_for(index);
            trace!(index, role = role.name(), "trigger");
            sounds.trigger(role);
        }
        let wait = match timing {
            TimingPolicy::Accumulate => sleep(step),
            TimingPolicy::FixedSchedule => {
                due += step;
                sleep_until(due)
            }
        };
        tokio::select! {
            _ = wait => {}
            _ = signal.wake.notified() => break,
        }
        index = (index + 1) % pattern.len();
    }
}
