use super::error::MachineError;

/// Driver-side step subdivision factor.
///
/// Only the eight factors representable here are legal; any other requested
/// value is rejected by [`MicrostepMode::try_from_factor`] without mutating
/// anything. The factor scales both the steps-per-revolution count and the
/// wheel's maximum step rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum MicrostepMode {
    Full = 1,
    Half = 2,
    Quarter = 4,
    Eighth = 8,
    #[default]
    Sixteenth = 16,
    X32 = 32,
    X64 = 64,
    X128 = 128,
}

/// All legal modes in ascending factor order, used for menu cycling.
pub const MICROSTEP_MODES: [MicrostepMode; MicrostepMode::COUNT] = [
    MicrostepMode::Full,
    MicrostepMode::Half,
    MicrostepMode::Quarter,
    MicrostepMode::Eighth,
    MicrostepMode::Sixteenth,
    MicrostepMode::X32,
    MicrostepMode::X64,
    MicrostepMode::X128,
];

impl MicrostepMode {
    /// Number of legal modes.
    pub const COUNT: usize = 8;

    /// The numeric subdivision factor.
    pub fn factor(self) -> u16 {
        self as u16
    }

    /// Validate a raw factor.
    ///
    /// Returns [`MachineError::InvalidMicrostep`] for anything outside the
    /// legal set.
    pub fn try_from_factor(factor: u16) -> Result<Self, MachineError> {
        match factor {
            1 => Ok(MicrostepMode::Full),
            2 => Ok(MicrostepMode::Half),
            4 => Ok(MicrostepMode::Quarter),
            8 => Ok(MicrostepMode::Eighth),
            16 => Ok(MicrostepMode::Sixteenth),
            32 => Ok(MicrostepMode::X32),
            64 => Ok(MicrostepMode::X64),
            128 => Ok(MicrostepMode::X128),
            _ => Err(MachineError::InvalidMicrostep),
        }
    }

    /// Position of this mode in [`MICROSTEP_MODES`].
    pub fn index(self) -> usize {
        MICROSTEP_MODES.iter().position(|&m| m == self).unwrap_or(0)
    }

    /// Mode at `index` in [`MICROSTEP_MODES`], wrapping out-of-range indices.
    pub fn from_index(index: usize) -> Self {
        MICROSTEP_MODES[index % Self::COUNT]
    }
}
