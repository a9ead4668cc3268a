pub mod error;
pub mod grid;
pub mod io;
pub mod pattern;
pub mod roles;
pub mod sound;
pub mod taps;

pub use crate::error::DomainError;
pub use crate::grid::{QuantizationGrid, MAX_GRID_CELLS};
pub use crate::io::{BeatReport, ExportFormat, ReportExporter, SerdeExporter};
pub use crate::pattern::{BeatPattern, QuantizedBeat, DEFAULT_MEASURE_CELLS};
pub use crate::roles::{SoundRole, SoundRoleMap};
pub use crate::sound::{DrumSoundSet, Playable};
pub use crate::taps::TapTimestamps;
