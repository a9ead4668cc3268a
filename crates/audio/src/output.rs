use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample};
use serde::{Deserialize, Serialize};
use tapbeat_domain::{DrumSoundSet, SoundRole};
use tracing::{debug, info, warn};

use crate::mixer::{voice_bank, Mixer, VoiceHandle};
use crate::voice::render_voice;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Output device name; the host default when absent.
    pub device: Option<String>,
    /// Master gain applied to the mix, 0..=1.
    pub gain: f32,
    /// Length of the kick and snare voices. Hi-hats are a third of this.
    pub voice_ms: u32,
    /// Triggers that may wait for the audio thread before hits are dropped.
    pub queue_capacity: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            device: None,
            gain: 0.8,
            voice_ms: 300,
            queue_capacity: 64,
        }
    }
}

/// An open output stream and the drum voices that play through it.
///
/// Dropping the environment closes the stream; handles that outlive it
/// still accept triggers but nothing is heard.
pub struct PlaybackEnvironment {
    stream: cpal::Stream,
    sounds: Arc<DrumSoundSet<VoiceHandle>>,
    device_name: String,
    sample_rate: u32,
}

impl PlaybackEnvironment {
    pub fn open(config: &OutputConfig) -> Result<Self> {
        let device = find_output_device(config.device.as_deref())?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".into());
        let supported = device
            .default_output_config()
            .with_context(|| format!("query output config of {device_name}"))?;
        let sample_rate = supported.sample_rate().0;
        let stream_config = supported.config();
        debug!(
            device = %device_name,
            sample_rate,
            channels = stream_config.channels,
            format = ?supported.sample_format(),
            "opening output stream"
        );

        let voice = |role| render_voice(role, sample_rate, config.voice_ms);
        let (sounds, mixer) = voice_bank(
            voice(SoundRole::Kick),
            voice(SoundRole::Snare),
            voice(SoundRole::Hihat),
            config.queue_capacity,
            config.gain,
        );

        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer),
            other => bail!("unsupported output sample format {other:?}"),
        }?;
        stream.play().context("start output stream")?;
        info!(device = %device_name, sample_rate, "playback environment ready");

        Ok(Self {
            stream,
            sounds: Arc::new(sounds),
            device_name,
            sample_rate,
        })
    }

    pub fn sounds(&self) -> Arc<DrumSoundSet<VoiceHandle>> {
        self.sounds.clone()
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn close(self) {
        if let Err(err) = self.stream.pause() {
            warn!(%err, "failed to pause output stream");
        }
        info!(device = %self.device_name, "playback environment closed");
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            mixer.render(data, channels, |sample| T::from_sample(sample));
        },
        |err| warn!(%err, "output stream error"),
        None,
    )?;
    Ok(stream)
}

/// Names of output devices across every available host.
pub fn list_output_devices() -> Vec<String> {
    let mut names = Vec::new();
    for host_id in cpal::available_hosts() {
        let Ok(host) = cpal::host_from_id(host_id) else {
            continue;
        };
        if let Ok(devices) = host.output_devices() {
            names.extend(devices.filter_map(|device| device.name().ok()));
        }
    }
    names
}

fn find_output_device(target: Option<&str>) -> Result<cpal::Device> {
    if let Some(name) = target {
        for host_id in cpal::available_hosts() {
            let Ok(host) = cpal::host_from_id(host_id) else {
                continue;
            };
            if let Ok(mut devices) = host.output_devices() {
                if let Some(device) = devices.find(|d| d.name().is_ok_and(|n| n == name)) {
                    return Ok(device);
                }
            }
        }
        bail!("output device {name:?} not found");
    }
    cpal::default_host()
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_fills_missing_fields() {
        let config: OutputConfig = serde_yaml::from_str("gain: 0.5").unwrap();
        assert_eq!(config.gain, 0.5);
        assert_eq!(config.voice_ms, 300);
        assert_eq!(config.device, None);
    }

    #[test]
    fn list_devices_does_not_panic() {
        // device availability varies by environment
        let _ = list_output_devices();
    }

    #[test]
    fn unknown_device_is_an_error() {
        let config = OutputConfig {
            device: Some("no-such-device-tapbeat".into()),
            ..Default::default()
        };
        assert!(PlaybackEnvironment::open(&config).is_err());
    }
}
