use super::axis::{LfoPolarity, MotorAxis};
use super::clock::GlobalClock;
use super::error::MachineError;
use super::microstep::MicrostepMode;
use super::{NUM_RATIO_PRESETS, RATIO_PRESETS, WHEEL_COUNT};

/// Central machine state shared by the menu, synthesizer, and serial paths.
///
/// Created once at boot with fixed defaults and mutated in place for the
/// process's whole run. A full reset reinitializes every field rather than
/// replacing the allocation, so `'static` references stay valid.
///
/// # Validation
///
/// Continuous values clamp silently; callers observe the effective value
/// through the matching getter. Discrete values (wheel index, microstep
/// factor, preset index) return [`MachineError`] and leave the state
/// untouched on rejection.
///
/// # Examples
///
/// ```
/// use cycloid::machine::{MachineState, MicrostepMode};
///
/// let mut machine = MachineState::new();
/// machine.set_wheel_speed(0, 2.0).unwrap();
///
/// // Out-of-range values clamp; illegal discrete values are rejected.
/// machine.set_wheel_speed(0, 1000.0).unwrap();
/// assert_eq!(machine.wheel_speed(0).unwrap(), 256.0);
/// assert!(machine.set_microstep(48).is_err());
/// assert_eq!(machine.microstep(), MicrostepMode::Sixteenth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineState {
    /// Per-wheel motion parameters, indexed 0 to `WHEEL_COUNT - 1`.
    pub wheels: [MotorAxis; WHEEL_COUNT],
    /// The global time scale.
    pub clock: GlobalClock,
    /// Committed microstepping mode. Only ever one of the 8 legal values.
    pub microstep: MicrostepMode,
    paused: bool,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Create a new machine with every parameter at its boot default.
    pub fn new() -> Self {
        Self {
            wheels: [MotorAxis::default(); WHEEL_COUNT],
            clock: GlobalClock::default(),
            microstep: MicrostepMode::default(),
            paused: false,
        }
    }

    // ── Wheel parameter access ───────────────────────────────────────

    /// Immutable access to one wheel, validating the index.
    pub fn wheel(&self, wheel: usize) -> Result<&MotorAxis, MachineError> {
        self.wheels.get(wheel).ok_or(MachineError::InvalidWheelIndex)
    }

    fn wheel_mut(&mut self, wheel: usize) -> Result<&mut MotorAxis, MachineError> {
        self.wheels
            .get_mut(wheel)
            .ok_or(MachineError::InvalidWheelIndex)
    }

    /// Set a wheel's speed ratio (clamped).
    pub fn set_wheel_speed(&mut self, wheel: usize, value: f32) -> Result<(), MachineError> {
        self.wheel_mut(wheel)?.set_speed_ratio(value);
        Ok(())
    }

    /// Current speed ratio of a wheel.
    pub fn wheel_speed(&self, wheel: usize) -> Result<f32, MachineError> {
        Ok(self.wheel(wheel)?.speed_ratio)
    }

    /// Set a wheel's LFO depth in percent (clamped).
    pub fn set_lfo_depth(&mut self, wheel: usize, value: f32) -> Result<(), MachineError> {
        self.wheel_mut(wheel)?.set_lfo_depth(value);
        Ok(())
    }

    /// Current LFO depth of a wheel.
    pub fn lfo_depth(&self, wheel: usize) -> Result<f32, MachineError> {
        Ok(self.wheel(wheel)?.lfo_depth)
    }

    /// Set a wheel's LFO rate (clamped).
    pub fn set_lfo_rate(&mut self, wheel: usize, value: f32) -> Result<(), MachineError> {
        self.wheel_mut(wheel)?.set_lfo_rate(value);
        Ok(())
    }

    /// Current LFO rate of a wheel.
    pub fn lfo_rate(&self, wheel: usize) -> Result<f32, MachineError> {
        Ok(self.wheel(wheel)?.lfo_rate)
    }

    /// Set a wheel's LFO polarity.
    pub fn set_lfo_polarity(
        &mut self,
        wheel: usize,
        polarity: LfoPolarity,
    ) -> Result<(), MachineError> {
        self.wheel_mut(wheel)?.lfo_polarity = polarity;
        Ok(())
    }

    /// Current LFO polarity of a wheel.
    pub fn lfo_polarity(&self, wheel: usize) -> Result<LfoPolarity, MachineError> {
        Ok(self.wheel(wheel)?.lfo_polarity)
    }

    // ── Global clock ─────────────────────────────────────────────────

    /// Set the global time scale in seconds (clamped).
    pub fn set_time_scale(&mut self, value: f32) {
        self.clock.set_time_scale(value);
    }

    /// Current global time scale in seconds.
    pub fn time_scale(&self) -> f32 {
        self.clock.time_scale
    }

    // ── Microstepping ────────────────────────────────────────────────

    /// Commit a new microstep factor.
    ///
    /// Illegal factors are rejected with [`MachineError::InvalidMicrostep`]
    /// and the committed mode stays unchanged.
    pub fn set_microstep(&mut self, factor: u16) -> Result<(), MachineError> {
        let mode = MicrostepMode::try_from_factor(factor)?;
        self.microstep = mode;
        #[cfg(feature = "defmt")]
        defmt::info!("microstep mode set to {}x", factor);
        Ok(())
    }

    /// Committed microstepping mode.
    pub fn microstep(&self) -> MicrostepMode {
        self.microstep
    }

    // ── Presets ──────────────────────────────────────────────────────

    /// Apply a ratio preset's per-wheel speed ratios.
    ///
    /// Values pass through the normal speed-ratio clamp, so a preset can
    /// reverse a wheel but never produce an illegal magnitude.
    pub fn apply_ratio_preset(&mut self, preset: usize) -> Result<(), MachineError> {
        if preset >= NUM_RATIO_PRESETS {
            return Err(MachineError::InvalidPreset);
        }
        for (wheel, &ratio) in self.wheels.iter_mut().zip(RATIO_PRESETS[preset].iter()) {
            wheel.set_speed_ratio(ratio);
        }
        #[cfg(feature = "defmt")]
        defmt::info!("applied ratio preset {}", preset + 1);
        Ok(())
    }

    // ── Pause ────────────────────────────────────────────────────────

    /// Stop speed synthesis for all wheels. The synthesizer observes this
    /// flag on its next tick and commands every driver to stop.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume speed synthesis.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether synthesis is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Reinitialize every field to its boot default, in place.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::new();
        #[cfg(feature = "defmt")]
        defmt::info!("machine state reset to defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{
        DEFAULT_LFO_DEPTH, DEFAULT_LFO_RATE, DEFAULT_SPEED_RATIO, DEFAULT_TIME_SCALE,
        SPEED_RATIO_MAX, SPEED_RATIO_MIN,
    };

    #[test]
    fn boot_defaults() {
        let machine = MachineState::new();
        for wheel in 0..WHEEL_COUNT {
            assert_eq!(machine.wheel_speed(wheel).unwrap(), DEFAULT_SPEED_RATIO);
            assert_eq!(machine.lfo_depth(wheel).unwrap(), DEFAULT_LFO_DEPTH);
            assert_eq!(machine.lfo_rate(wheel).unwrap(), DEFAULT_LFO_RATE);
            assert_eq!(machine.lfo_polarity(wheel).unwrap(), LfoPolarity::Unipolar);
        }
        assert_eq!(machine.time_scale(), DEFAULT_TIME_SCALE);
        assert_eq!(machine.microstep(), MicrostepMode::Sixteenth);
        assert!(!machine.is_paused());
    }

    #[test]
    fn wheel_index_validated() {
        let mut machine = MachineState::new();
        assert_eq!(
            machine.set_wheel_speed(WHEEL_COUNT, 2.0),
            Err(MachineError::InvalidWheelIndex)
        );
        assert_eq!(
            machine.wheel_speed(100),
            Err(MachineError::InvalidWheelIndex)
        );
        // Nothing mutated.
        assert_eq!(machine, MachineState::new());
    }

    #[test]
    fn wheel_speed_set_and_clamp() {
        let mut machine = MachineState::new();
        machine.set_wheel_speed(1, 12.5).unwrap();
        assert_eq!(machine.wheel_speed(1).unwrap(), 12.5);
        machine.set_wheel_speed(1, 1000.0).unwrap();
        assert_eq!(machine.wheel_speed(1).unwrap(), SPEED_RATIO_MAX);
        machine.set_wheel_speed(1, 0.0).unwrap();
        assert_eq!(machine.wheel_speed(1).unwrap(), SPEED_RATIO_MIN);
    }

    #[test]
    fn microstep_commit_and_reject() {
        let mut machine = MachineState::new();
        machine.set_microstep(64).unwrap();
        assert_eq!(machine.microstep(), MicrostepMode::X64);

        // Rejected: committed mode untouched.
        assert_eq!(
            machine.set_microstep(48),
            Err(MachineError::InvalidMicrostep)
        );
        assert_eq!(machine.microstep(), MicrostepMode::X64);
    }

    #[test]
    fn apply_preset_sets_all_wheels() {
        let mut machine = MachineState::new();
        machine.apply_ratio_preset(1).unwrap();
        assert_eq!(machine.wheel_speed(0).unwrap(), 1.0);
        assert_eq!(machine.wheel_speed(1).unwrap(), 2.0);
        assert_eq!(machine.wheel_speed(2).unwrap(), 3.0);
        assert_eq!(machine.wheel_speed(3).unwrap(), 4.0);
    }

    #[test]
    fn alternating_preset_keeps_reversed_wheels() {
        let mut machine = MachineState::new();
        machine.apply_ratio_preset(2).unwrap();
        assert_eq!(machine.wheel_speed(0).unwrap(), 1.0);
        assert_eq!(machine.wheel_speed(1).unwrap(), -1.0);
        assert_eq!(machine.wheel_speed(2).unwrap(), 1.0);
        assert_eq!(machine.wheel_speed(3).unwrap(), -1.0);
    }

    #[test]
    fn invalid_preset_rejected_without_mutation() {
        let mut machine = MachineState::new();
        machine.set_wheel_speed(0, 7.0).unwrap();
        assert_eq!(
            machine.apply_ratio_preset(NUM_RATIO_PRESETS),
            Err(MachineError::InvalidPreset)
        );
        assert_eq!(machine.wheel_speed(0).unwrap(), 7.0);
    }

    #[test]
    fn pause_resume() {
        let mut machine = MachineState::new();
        machine.pause();
        assert!(machine.is_paused());
        machine.resume();
        assert!(!machine.is_paused());
    }

    #[test]
    fn reset_restores_every_default() {
        let mut machine = MachineState::new();
        machine.set_wheel_speed(0, 42.0).unwrap();
        machine.set_lfo_depth(2, 80.0).unwrap();
        machine.set_lfo_rate(3, 9.0).unwrap();
        machine.set_lfo_polarity(1, LfoPolarity::Bipolar).unwrap();
        machine.set_time_scale(500.0);
        machine.set_microstep(128).unwrap();
        machine.pause();
        machine.wheels[0].lfo_phase = 123;

        machine.reset_to_defaults();
        assert_eq!(machine, MachineState::new());
    }
}
