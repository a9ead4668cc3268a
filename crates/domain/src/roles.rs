use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SoundRole {
    Kick,
    Snare,
    Hihat,
}

impl SoundRole {
    pub const ALL: [SoundRole; 3] = [SoundRole::Kick, SoundRole::Snare, SoundRole::Hihat];

    pub fn name(self) -> &'static str {
        match self {
            SoundRole::Kick => "kick",
            SoundRole::Snare => "snare",
            SoundRole::Hihat => "hihat",
        }
    }
}

/// Static role-by-position policy: within every 16-cell measure the first cell
/// is the kick, the ninth the snare, and every other active cell a hi-hat.
///
/// The policy ignores the performance's actual grid length. Making roles data
/// driven would be a fidelity improvement, not a compatibility change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoundRoleMap;

impl SoundRoleMap {
    pub const MEASURE_CELLS: usize = 16;
    pub const KICK_CELL: usize = 0;
    pub const SNARE_CELL: usize = 8;

    pub fn role_for(&self, index: usize) -> SoundRole {
        match index % Self::MEASURE_CELLS {
            Self::KICK_CELL => SoundRole::Kick,
            Self::SNARE_CELL => SoundRole::Snare,
            _ => SoundRole::Hihat,
        }
    }
}
