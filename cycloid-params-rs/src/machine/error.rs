/// Errors that can occur when mutating machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineError {
    /// Wheel index is out of bounds (must be < WHEEL_COUNT).
    InvalidWheelIndex,
    /// Requested microstep factor is not one of the 8 legal values.
    InvalidMicrostep,
    /// Ratio preset index is out of bounds (must be < NUM_RATIO_PRESETS).
    InvalidPreset,
}
