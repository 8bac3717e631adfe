//! Machine state management for the cycloid drawing machine.
//!
//! This module provides the [`MachineState`] data structure that holds the
//! motion parameters for all four wheels, the global clock, and the
//! microstepping mode. It is the central shared state accessed by the menu
//! state machine, the speed synthesizer, and the serial command task.
//!
//! # Architecture
//!
//! Each wheel is a [`MotorAxis`] with its own speed ratio and LFO settings.
//! The wheels share one [`GlobalClock`] (the master time scale) and one
//! [`MicrostepMode`]. Both input paths — encoder menu and serial commands —
//! mutate state only through the methods on [`MachineState`], so clamping
//! and validation live in exactly one place.
//!
//! ```text
//! Wheel X: [ratio] [depth] [rate] [polarity] [phase]
//! Wheel Y: [ratio] [depth] [rate] [polarity] [phase]   GlobalClock
//! Wheel Z: [ratio] [depth] [rate] [polarity] [phase]   MicrostepMode
//! Wheel A: [ratio] [depth] [rate] [polarity] [phase]   paused
//! ```
//!
//! # Validation Rules
//!
//! Continuous parameters (speed ratio, LFO depth/rate, time scale) clamp
//! silently to their bounds. Discrete selections (microstep factor, ratio
//! preset, wheel index) are rejected with a [`MachineError`] and leave the
//! state untouched.
//!
//! # `no_std` Compatibility
//!
//! No heap allocation; all storage is fixed-size arrays sized by
//! [`WHEEL_COUNT`]. The optional `defmt` feature enables structured logging
//! for embedded targets.

mod axis;
mod clock;
mod error;
mod microstep;
mod state;

pub use axis::{LfoPolarity, MotorAxis};
pub use clock::GlobalClock;
pub use error::MachineError;
pub use microstep::{MicrostepMode, MICROSTEP_MODES};
pub use state::MachineState;

/// Number of driven wheels (motor axes) in the machine.
pub const WHEEL_COUNT: usize = 4;

/// Human-readable wheel names for UI display, indexed by wheel number.
pub const WHEEL_LABELS: [&str; WHEEL_COUNT] = ["X", "Y", "Z", "A"];

/// Full steps for one motor shaft revolution (1.8° steppers).
pub const STEPS_PER_MOTOR_REV: u32 = 200;

/// Mechanical reduction between motor shaft and wheel.
pub const GEAR_RATIO: u32 = 3;

/// Full steps for one wheel revolution, before microstepping.
pub const STEPS_PER_WHEEL_REV: u32 = STEPS_PER_MOTOR_REV * GEAR_RATIO;

/// LFO phase units per cycle. Phase always stays in `[0, LFO_RESOLUTION)`.
pub const LFO_RESOLUTION: u32 = 1000;

/// Smallest legal speed-ratio magnitude. Keeps the step-rate denominator
/// away from zero.
pub const SPEED_RATIO_MIN: f32 = 0.1;

/// Largest legal speed-ratio magnitude.
pub const SPEED_RATIO_MAX: f32 = 256.0;

/// Maximum LFO depth, percent of base ratio.
pub const LFO_DEPTH_MAX: f32 = 100.0;

/// Maximum LFO rate, cycles per time-scale unit.
pub const LFO_RATE_MAX: f32 = 256.0;

/// Time-scale bounds in seconds per wheel revolution at ratio 1.0.
pub const TIME_SCALE_MIN: f32 = 0.01;
pub const TIME_SCALE_MAX: f32 = 999.99;

/// Default values applied at boot and on reset.
pub const DEFAULT_SPEED_RATIO: f32 = 1.0;
pub const DEFAULT_LFO_DEPTH: f32 = 0.0;
pub const DEFAULT_LFO_RATE: f32 = 1.0;
pub const DEFAULT_TIME_SCALE: f32 = 1.0;

/// Number of ratio presets in [`RATIO_PRESETS`].
pub const NUM_RATIO_PRESETS: usize = 4;

/// Per-wheel speed-ratio vectors selectable from the Ratio menu.
///
/// Negative entries reverse the wheel's rotation direction; magnitudes are
/// still clamped into `[SPEED_RATIO_MIN, SPEED_RATIO_MAX]` when applied.
pub const RATIO_PRESETS: [[f32; WHEEL_COUNT]; NUM_RATIO_PRESETS] = [
    [1.0, 1.0, 1.0, 1.0],     // all equal
    [1.0, 2.0, 3.0, 4.0],     // linear progression
    [1.0, -1.0, 1.0, -1.0],   // alternating directions
    [1.0, 1.5, 2.25, 3.375],  // geometric progression
];
