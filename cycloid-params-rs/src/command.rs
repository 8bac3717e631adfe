//! Text-command adapter for the serial channel.
//!
//! Translates newline-terminated command lines (`SPEED X 1.5`,
//! `LFO Y DEPTH 50`, `MICROSTEP 16`, ...) into calls on the same
//! [`MachineState`] setter surface the menu uses. No validation happens
//! here beyond tokenizing: clamping and rejection come from the setters,
//! so the two input paths can never drift apart.
//!
//! `HELP` and `STATUS` parse to plain variants; the serial task renders
//! their output from the state getters.

use crate::machine::{LfoPolarity, MachineError, MachineState, WHEEL_LABELS};

/// A parsed command line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Help,
    Status,
    Pause,
    Resume,
    Reset,
    /// Set the microstep factor (validated on apply).
    Microstep(u16),
    /// Set one wheel's speed ratio.
    Speed { wheel: usize, value: f32 },
    /// Set one wheel's LFO depth in percent.
    LfoDepth { wheel: usize, value: f32 },
    /// Set one wheel's LFO rate.
    LfoRate { wheel: usize, value: f32 },
    /// Set one wheel's LFO polarity.
    LfoPolarity { wheel: usize, polarity: LfoPolarity },
    /// Set the global time scale in seconds.
    Master(f32),
    /// Apply a ratio preset, 1-based as typed by the operator.
    Ratio(usize),
}

/// Errors from parsing or applying a command line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// First token is not a known verb.
    UnknownCommand,
    /// The verb needs more tokens than the line provides.
    MissingArgument,
    /// A numeric argument failed to parse.
    InvalidNumber,
    /// Wheel identifier is not one of X/Y/Z/A.
    UnknownWheel,
    /// Polarity argument is neither UNI nor BI.
    InvalidPolarity,
    /// The setter rejected the value.
    Machine(MachineError),
}

impl From<MachineError> for CommandError {
    fn from(e: MachineError) -> Self {
        CommandError::Machine(e)
    }
}

impl Command {
    /// Parse one command line. Verbs and arguments are case-insensitive;
    /// surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(CommandError::UnknownCommand)?;

        if verb.eq_ignore_ascii_case("HELP") {
            Ok(Command::Help)
        } else if verb.eq_ignore_ascii_case("STATUS") {
            Ok(Command::Status)
        } else if verb.eq_ignore_ascii_case("PAUSE") {
            Ok(Command::Pause)
        } else if verb.eq_ignore_ascii_case("RESUME") {
            Ok(Command::Resume)
        } else if verb.eq_ignore_ascii_case("RESET") {
            Ok(Command::Reset)
        } else if verb.eq_ignore_ascii_case("MICROSTEP") {
            let factor = parse_number::<u16>(tokens.next())?;
            Ok(Command::Microstep(factor))
        } else if verb.eq_ignore_ascii_case("SPEED") {
            let wheel = parse_wheel(tokens.next())?;
            let value = parse_number::<f32>(tokens.next())?;
            Ok(Command::Speed { wheel, value })
        } else if verb.eq_ignore_ascii_case("LFO") {
            let wheel = parse_wheel(tokens.next())?;
            let param = tokens.next().ok_or(CommandError::MissingArgument)?;
            if param.eq_ignore_ascii_case("DEPTH") {
                let value = parse_number::<f32>(tokens.next())?;
                Ok(Command::LfoDepth { wheel, value })
            } else if param.eq_ignore_ascii_case("RATE") {
                let value = parse_number::<f32>(tokens.next())?;
                Ok(Command::LfoRate { wheel, value })
            } else if param.eq_ignore_ascii_case("POL") {
                let polarity = parse_polarity(tokens.next())?;
                Ok(Command::LfoPolarity { wheel, polarity })
            } else {
                Err(CommandError::UnknownCommand)
            }
        } else if verb.eq_ignore_ascii_case("MASTER") {
            let value = parse_number::<f32>(tokens.next())?;
            Ok(Command::Master(value))
        } else if verb.eq_ignore_ascii_case("RATIO") {
            let preset = parse_number::<usize>(tokens.next())?;
            Ok(Command::Ratio(preset))
        } else {
            Err(CommandError::UnknownCommand)
        }
    }

    /// Apply this command to the machine.
    ///
    /// `Help` and `Status` are query commands and leave the state alone.
    pub fn apply(&self, machine: &mut MachineState) -> Result<(), CommandError> {
        match *self {
            Command::Help | Command::Status => Ok(()),
            Command::Pause => {
                machine.pause();
                Ok(())
            }
            Command::Resume => {
                machine.resume();
                Ok(())
            }
            Command::Reset => {
                machine.reset_to_defaults();
                Ok(())
            }
            Command::Microstep(factor) => Ok(machine.set_microstep(factor)?),
            Command::Speed { wheel, value } => Ok(machine.set_wheel_speed(wheel, value)?),
            Command::LfoDepth { wheel, value } => Ok(machine.set_lfo_depth(wheel, value)?),
            Command::LfoRate { wheel, value } => Ok(machine.set_lfo_rate(wheel, value)?),
            Command::LfoPolarity { wheel, polarity } => {
                Ok(machine.set_lfo_polarity(wheel, polarity)?)
            }
            Command::Master(value) => {
                machine.set_time_scale(value);
                Ok(())
            }
            Command::Ratio(preset) => {
                let index = preset.checked_sub(1).ok_or(MachineError::InvalidPreset)?;
                Ok(machine.apply_ratio_preset(index)?)
            }
        }
    }
}

fn parse_wheel(token: Option<&str>) -> Result<usize, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument)?;
    WHEEL_LABELS
        .iter()
        .position(|label| token.eq_ignore_ascii_case(label))
        .ok_or(CommandError::UnknownWheel)
}

fn parse_polarity(token: Option<&str>) -> Result<LfoPolarity, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument)?;
    if token.eq_ignore_ascii_case("UNI") {
        Ok(LfoPolarity::Unipolar)
    } else if token.eq_ignore_ascii_case("BI") {
        Ok(LfoPolarity::Bipolar)
    } else {
        Err(CommandError::InvalidPolarity)
    }
}

fn parse_number<T: core::str::FromStr>(token: Option<&str>) -> Result<T, CommandError> {
    token
        .ok_or(CommandError::MissingArgument)?
        .parse()
        .map_err(|_| CommandError::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{MicrostepMode, LFO_DEPTH_MAX, SPEED_RATIO_MAX};

    #[test]
    fn parse_simple_verbs() {
        assert_eq!(Command::parse("HELP"), Ok(Command::Help));
        assert_eq!(Command::parse("status"), Ok(Command::Status));
        assert_eq!(Command::parse("Pause"), Ok(Command::Pause));
        assert_eq!(Command::parse("RESUME"), Ok(Command::Resume));
        assert_eq!(Command::parse("reset"), Ok(Command::Reset));
    }

    #[test]
    fn parse_speed() {
        assert_eq!(
            Command::parse("SPEED X 1.5"),
            Ok(Command::Speed {
                wheel: 0,
                value: 1.5
            })
        );
        assert_eq!(
            Command::parse("speed a -2"),
            Ok(Command::Speed {
                wheel: 3,
                value: -2.0
            })
        );
    }

    #[test]
    fn parse_lfo_variants() {
        assert_eq!(
            Command::parse("LFO Y DEPTH 50"),
            Ok(Command::LfoDepth {
                wheel: 1,
                value: 50.0
            })
        );
        assert_eq!(
            Command::parse("LFO Z RATE 2.5"),
            Ok(Command::LfoRate {
                wheel: 2,
                value: 2.5
            })
        );
        assert_eq!(
            Command::parse("LFO X POL BI"),
            Ok(Command::LfoPolarity {
                wheel: 0,
                polarity: LfoPolarity::Bipolar
            })
        );
        assert_eq!(
            Command::parse("lfo x pol uni"),
            Ok(Command::LfoPolarity {
                wheel: 0,
                polarity: LfoPolarity::Unipolar
            })
        );
    }

    #[test]
    fn parse_master_ratio_microstep() {
        assert_eq!(Command::parse("MASTER 2.0"), Ok(Command::Master(2.0)));
        assert_eq!(Command::parse("RATIO 3"), Ok(Command::Ratio(3)));
        assert_eq!(Command::parse("MICROSTEP 16"), Ok(Command::Microstep(16)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Command::parse(""), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("FROB 1"), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("SPEED"), Err(CommandError::MissingArgument));
        assert_eq!(Command::parse("SPEED Q 1"), Err(CommandError::UnknownWheel));
        assert_eq!(
            Command::parse("SPEED X fast"),
            Err(CommandError::InvalidNumber)
        );
        assert_eq!(
            Command::parse("LFO X POL MAYBE"),
            Err(CommandError::InvalidPolarity)
        );
        assert_eq!(
            Command::parse("LFO X PHASE 1"),
            Err(CommandError::UnknownCommand)
        );
        assert_eq!(
            Command::parse("MICROSTEP -4"),
            Err(CommandError::InvalidNumber)
        );
    }

    #[test]
    fn apply_observes_setter_clamping() {
        let mut machine = MachineState::new();
        Command::parse("SPEED X 9999")
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.wheel_speed(0).unwrap(), SPEED_RATIO_MAX);

        Command::parse("LFO Y DEPTH 500")
            .unwrap()
            .apply(&mut machine)
            .unwrap();
        assert_eq!(machine.lfo_depth(1).unwrap(), LFO_DEPTH_MAX);
    }

    #[test]
    fn apply_microstep_rejects_illegal_factor() {
        let mut machine = MachineState::new();
        let err = Command::Microstep(12).apply(&mut machine);
        assert_eq!(
            err,
            Err(CommandError::Machine(MachineError::InvalidMicrostep))
        );
        assert_eq!(machine.microstep(), MicrostepMode::Sixteenth);

        Command::Microstep(32).apply(&mut machine).unwrap();
        assert_eq!(machine.microstep(), MicrostepMode::X32);
    }

    #[test]
    fn apply_ratio_uses_one_based_numbering() {
        let mut machine = MachineState::new();
        Command::Ratio(2).apply(&mut machine).unwrap();
        assert_eq!(machine.wheel_speed(3).unwrap(), 4.0);

        assert_eq!(
            Command::Ratio(0).apply(&mut machine),
            Err(CommandError::Machine(MachineError::InvalidPreset))
        );
        assert_eq!(
            Command::Ratio(5).apply(&mut machine),
            Err(CommandError::Machine(MachineError::InvalidPreset))
        );
    }

    #[test]
    fn apply_pause_resume_reset() {
        let mut machine = MachineState::new();
        Command::Pause.apply(&mut machine).unwrap();
        assert!(machine.is_paused());
        Command::Resume.apply(&mut machine).unwrap();
        assert!(!machine.is_paused());

        machine.set_time_scale(9.0);
        Command::Reset.apply(&mut machine).unwrap();
        assert_eq!(machine, MachineState::new());
    }
}
