use super::{
    DEFAULT_LFO_DEPTH, DEFAULT_LFO_RATE, DEFAULT_SPEED_RATIO, LFO_DEPTH_MAX, LFO_RATE_MAX,
    LFO_RESOLUTION, SPEED_RATIO_MAX, SPEED_RATIO_MIN,
};

/// LFO polarity mode.
///
/// Unipolar modulation only ever slows the wheel below its base speed;
/// bipolar modulation swings the step rate symmetrically around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LfoPolarity {
    #[default]
    Unipolar,
    Bipolar,
}

impl LfoPolarity {
    /// Returns the other polarity.
    pub fn toggled(self) -> Self {
        match self {
            LfoPolarity::Unipolar => LfoPolarity::Bipolar,
            LfoPolarity::Bipolar => LfoPolarity::Unipolar,
        }
    }

    /// Two/three-letter label used on the character display.
    pub fn label(self) -> &'static str {
        match self {
            LfoPolarity::Unipolar => "UNI",
            LfoPolarity::Bipolar => "BI",
        }
    }
}

/// Motion parameters for one driven wheel.
///
/// `speed_ratio` is an inverse multiplier on the global time scale: a larger
/// magnitude means slower rotation, a negative sign means reversed rotation.
/// The setters clamp, so a stored ratio magnitude is always within
/// `[SPEED_RATIO_MIN, SPEED_RATIO_MAX]` and the step-rate denominator can
/// never reach zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorAxis {
    /// Signed inverse speed multiplier (larger magnitude ⇒ slower).
    pub speed_ratio: f32,
    /// LFO depth, percent of base ratio (0–100).
    pub lfo_depth: f32,
    /// LFO rate, cycles per time-scale unit (0–256).
    pub lfo_rate: f32,
    /// LFO polarity mode.
    pub lfo_polarity: LfoPolarity,
    /// LFO phase in `[0, LFO_RESOLUTION)`.
    pub lfo_phase: u32,
    /// Last step rate commanded for this wheel, steps per second.
    /// Updated by the synthesizer each tick; diagnostic only.
    pub last_step_rate: f32,
}

impl Default for MotorAxis {
    fn default() -> Self {
        Self {
            speed_ratio: DEFAULT_SPEED_RATIO,
            lfo_depth: DEFAULT_LFO_DEPTH,
            lfo_rate: DEFAULT_LFO_RATE,
            lfo_polarity: LfoPolarity::default(),
            lfo_phase: 0,
            last_step_rate: 0.0,
        }
    }
}

impl MotorAxis {
    /// Set the speed ratio, clamping the magnitude into the legal band.
    ///
    /// The sign is preserved so presets can reverse a wheel; a value of
    /// exactly zero snaps to the minimum forward ratio.
    pub fn set_speed_ratio(&mut self, value: f32) {
        self.speed_ratio = clamp_speed_ratio(value);
    }

    /// Set the LFO depth, clamped to `[0, LFO_DEPTH_MAX]`.
    pub fn set_lfo_depth(&mut self, value: f32) {
        self.lfo_depth = value.clamp(0.0, LFO_DEPTH_MAX);
    }

    /// Set the LFO rate, clamped to `[0, LFO_RATE_MAX]`.
    pub fn set_lfo_rate(&mut self, value: f32) {
        self.lfo_rate = value.clamp(0.0, LFO_RATE_MAX);
    }

    /// Advance the LFO phase by `units`, wrapping modulo [`LFO_RESOLUTION`].
    pub fn advance_lfo_phase(&mut self, units: u32) {
        self.lfo_phase = (self.lfo_phase + units) % LFO_RESOLUTION;
    }

    /// Returns `true` when the LFO should modulate this wheel.
    ///
    /// Both depth and rate must be nonzero; otherwise the base rate is used
    /// unchanged and the phase does not advance.
    pub fn lfo_active(&self) -> bool {
        self.lfo_depth > 0.0 && self.lfo_rate > 0.0
    }
}

/// Clamp a requested speed ratio into the legal signed band.
///
/// Magnitudes clamp into `[SPEED_RATIO_MIN, SPEED_RATIO_MAX]` with the sign
/// preserved; zero maps to the minimum forward ratio.
pub fn clamp_speed_ratio(value: f32) -> f32 {
    if value > 0.0 {
        value.clamp(SPEED_RATIO_MIN, SPEED_RATIO_MAX)
    } else if value < 0.0 {
        value.clamp(-SPEED_RATIO_MAX, -SPEED_RATIO_MIN)
    } else {
        SPEED_RATIO_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let axis = MotorAxis::default();
        assert_eq!(axis.speed_ratio, DEFAULT_SPEED_RATIO);
        assert_eq!(axis.lfo_depth, DEFAULT_LFO_DEPTH);
        assert_eq!(axis.lfo_rate, DEFAULT_LFO_RATE);
        assert_eq!(axis.lfo_polarity, LfoPolarity::Unipolar);
        assert_eq!(axis.lfo_phase, 0);
        assert_eq!(axis.last_step_rate, 0.0);
    }

    #[test]
    fn ratio_clamps_positive() {
        let mut axis = MotorAxis::default();
        axis.set_speed_ratio(500.0);
        assert_eq!(axis.speed_ratio, SPEED_RATIO_MAX);
        axis.set_speed_ratio(0.05);
        assert_eq!(axis.speed_ratio, SPEED_RATIO_MIN);
    }

    #[test]
    fn ratio_clamps_negative_preserving_sign() {
        let mut axis = MotorAxis::default();
        axis.set_speed_ratio(-500.0);
        assert_eq!(axis.speed_ratio, -SPEED_RATIO_MAX);
        axis.set_speed_ratio(-0.05);
        assert_eq!(axis.speed_ratio, -SPEED_RATIO_MIN);
        axis.set_speed_ratio(-1.0);
        assert_eq!(axis.speed_ratio, -1.0);
    }

    #[test]
    fn ratio_zero_snaps_to_minimum_forward() {
        let mut axis = MotorAxis::default();
        axis.set_speed_ratio(0.0);
        assert_eq!(axis.speed_ratio, SPEED_RATIO_MIN);
    }

    #[test]
    fn depth_and_rate_clamp() {
        let mut axis = MotorAxis::default();
        axis.set_lfo_depth(150.0);
        assert_eq!(axis.lfo_depth, LFO_DEPTH_MAX);
        axis.set_lfo_depth(-5.0);
        assert_eq!(axis.lfo_depth, 0.0);
        axis.set_lfo_rate(300.0);
        assert_eq!(axis.lfo_rate, LFO_RATE_MAX);
        axis.set_lfo_rate(-1.0);
        assert_eq!(axis.lfo_rate, 0.0);
    }

    #[test]
    fn phase_wraps() {
        let mut axis = MotorAxis::default();
        axis.lfo_phase = LFO_RESOLUTION - 1;
        axis.advance_lfo_phase(1);
        assert_eq!(axis.lfo_phase, 0);
        axis.advance_lfo_phase(LFO_RESOLUTION + 5);
        assert_eq!(axis.lfo_phase, 5);
    }

    #[test]
    fn lfo_active_requires_both_depth_and_rate() {
        let mut axis = MotorAxis::default();
        // Default: depth 0, rate 1 — inactive.
        assert!(!axis.lfo_active());
        axis.set_lfo_depth(50.0);
        assert!(axis.lfo_active());
        axis.set_lfo_rate(0.0);
        assert!(!axis.lfo_active());
    }

    #[test]
    fn polarity_toggle_round_trips() {
        assert_eq!(LfoPolarity::Unipolar.toggled(), LfoPolarity::Bipolar);
        assert_eq!(LfoPolarity::Bipolar.toggled(), LfoPolarity::Unipolar);
        assert_eq!(LfoPolarity::Unipolar.label(), "UNI");
        assert_eq!(LfoPolarity::Bipolar.label(), "BI");
    }
}
