//! Step-rate computation and LFO phase advance.

use cycloid::machine::{
    LfoPolarity, MachineState, MicrostepMode, MotorAxis, LFO_RESOLUTION, STEPS_PER_WHEEL_REV,
    WHEEL_COUNT,
};

use crate::driver::StepperDriver;

/// Tuning for [`SpeedSynthesizer`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthConfig {
    /// Control tick interval in milliseconds. Default: 5.
    pub tick_interval_ms: u64,
    /// Step-rate ceiling at full step, steps per second; scales with the
    /// microstep factor. Default: 10 000.
    pub max_base_step_rate: f32,
    /// Step-rate floor magnitude; 0 disables the floor. Default: 0.
    pub min_step_rate: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5,
            max_base_step_rate: 10_000.0,
            min_step_rate: 0.0,
        }
    }
}

/// Per-tick speed synthesis for all wheels.
///
/// The computation itself is pure: base rate from the inverse ratio
/// relationship, optional LFO modulation, magnitude clamp. The only state
/// carried between ticks is a per-wheel fractional phase remainder, so slow
/// LFOs whose per-tick increment is below one phase unit keep advancing
/// instead of freezing at zero.
pub struct SpeedSynthesizer {
    config: SynthConfig,
    phase_carry: [f32; WHEEL_COUNT],
}

impl SpeedSynthesizer {
    pub fn new(config: SynthConfig) -> Self {
        Self {
            config,
            phase_carry: [0.0; WHEEL_COUNT],
        }
    }

    /// Steps for one wheel revolution under `mode`.
    pub fn steps_per_wheel_rev(mode: MicrostepMode) -> u32 {
        STEPS_PER_WHEEL_REV * mode.factor() as u32
    }

    /// Step-rate ceiling under `mode`, steps per second.
    pub fn max_step_rate(&self, mode: MicrostepMode) -> f32 {
        self.config.max_base_step_rate * mode.factor() as f32
    }

    /// Compute the commanded step rate for one wheel at the current LFO
    /// phase. Pure; does not advance the phase.
    ///
    /// The base rate is `steps_per_wheel_rev(mode) / (time_scale · ratio)`
    /// — larger ratio or time scale means slower rotation, higher
    /// microstepping means a proportionally higher rate for the same
    /// physical speed. Modulation applies only when both LFO depth and rate
    /// are nonzero:
    ///
    /// - **Bipolar** swings the rate symmetrically: `base · (1 + d·sin)`.
    /// - **Unipolar** only ever slows the wheel: `base · (1 − d·(sin+1)/2)`,
    ///   keeping the result between `base·(1−d)` and `base` so the wheel
    ///   never speeds past its base rate or reverses.
    pub fn step_rate(&self, axis: &MotorAxis, time_scale: f32, mode: MicrostepMode) -> f32 {
        let steps_per_rev = Self::steps_per_wheel_rev(mode) as f32;
        let base = steps_per_rev / (time_scale * axis.speed_ratio);

        let rate = if axis.lfo_active() {
            let phase =
                axis.lfo_phase as f32 / LFO_RESOLUTION as f32 * core::f32::consts::TAU;
            let sin = libm::sinf(phase);
            let depth = axis.lfo_depth / 100.0;
            match axis.lfo_polarity {
                LfoPolarity::Bipolar => base * (1.0 + depth * sin),
                LfoPolarity::Unipolar => base * (1.0 - depth * (sin + 1.0) * 0.5),
            }
        } else {
            base
        };

        clamp_magnitude(rate, self.config.min_step_rate, self.max_step_rate(mode))
    }

    /// Run one control tick: command every wheel's step rate and advance
    /// its LFO phase.
    ///
    /// While paused, every driver is stopped and nothing else changes —
    /// parameters and phases stay where they were for a clean resume.
    pub fn tick<D: StepperDriver>(&mut self, machine: &mut MachineState, driver: &mut D) {
        if machine.is_paused() {
            for wheel in 0..WHEEL_COUNT {
                driver.stop(wheel);
            }
            return;
        }

        let time_scale = machine.time_scale();
        let mode = machine.microstep();

        for wheel in 0..WHEEL_COUNT {
            let rate = self.step_rate(&machine.wheels[wheel], time_scale, mode);
            let axis = &mut machine.wheels[wheel];
            axis.last_step_rate = rate;
            driver.set_step_rate(wheel, rate);

            // One LFO cycle spans `time_scale · lfo_rate` seconds; convert
            // this tick's share into phase units, carrying the fraction.
            if axis.lfo_rate > 0.0 {
                let increment = (self.config.tick_interval_ms as f32 * LFO_RESOLUTION as f32)
                    / (1000.0 * time_scale * axis.lfo_rate)
                    + self.phase_carry[wheel];
                let whole = increment as u32;
                self.phase_carry[wheel] = increment - whole as f32;
                axis.advance_lfo_phase(whole);
            }
        }
    }
}

/// Clamp a signed rate's magnitude into `[min, max]`, preserving sign.
fn clamp_magnitude(rate: f32, min: f32, max: f32) -> f32 {
    let clamped = rate.clamp(-max, max);
    if min > 0.0 && clamped.abs() < min {
        if clamped >= 0.0 {
            min
        } else {
            -min
        }
    } else {
        clamped
    }
}
