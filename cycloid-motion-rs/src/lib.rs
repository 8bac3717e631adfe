//! Speed synthesis for the cycloid machine's stepper wheels.
//!
//! [`SpeedSynthesizer`] converts each wheel's ratio parameters, the global
//! time scale, the LFO state, and the microstepping factor into a step-rate
//! command on every control tick, advancing the LFO phase as it goes.
//! Computed rates are forwarded through the [`StepperDriver`] trait; the
//! driver's pin-level timing and acceleration ramps are out of scope here.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].

#![no_std]

pub mod driver;
pub mod synth;

pub use driver::StepperDriver;
pub use synth::{SpeedSynthesizer, SynthConfig};
