//! Interface to the external stepper-driver layer.

/// Rate-command sink for the stepper drivers.
///
/// The synthesizer calls this once per wheel per tick. A negative rate
/// means reversed rotation; implementations translate sign into the
/// direction pin. Ramping and step timing live behind this trait.
pub trait StepperDriver {
    /// Command a step rate in steps per second (signed).
    fn set_step_rate(&mut self, wheel: usize, steps_per_second: f32);

    /// Stop stepping one wheel immediately.
    fn stop(&mut self, wheel: usize);
}
