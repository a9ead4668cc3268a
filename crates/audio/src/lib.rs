pub mod dsp;
pub mod mixer;
pub mod output;
pub mod voice;

pub use dsp::{normalize_to, PeakLevel};
pub use mixer::{voice_bank, Mixer, VoiceHandle};
pub use output::{list_output_devices, OutputConfig, PlaybackEnvironment};
pub use voice::render_voice;
