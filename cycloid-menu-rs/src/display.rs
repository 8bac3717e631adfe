//! 16×2 display-line snapshot.
//!
//! [`DisplayLines`] is an immutable snapshot of what the external character
//! display should show for the current screen and machine state. Building
//! it is cheap and allocation-free; rendering it to real hardware is the
//! display collaborator's responsibility. The snapshot is comparable, so
//! callers can skip unchanged frames.

use core::fmt::{self, Write};

use cycloid::machine::{MachineState, NUM_RATIO_PRESETS, WHEEL_LABELS};
use heapless::String;

use crate::menu::MenuStateMachine;
use crate::screen::{Confirm, MenuScreen, PauseChoice, MAIN_ENTRIES};

/// Width of the character display in columns.
pub const DISPLAY_COLS: usize = 16;

/// Two formatted lines, each at most [`DISPLAY_COLS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayLines {
    pub line1: String<DISPLAY_COLS>,
    pub line2: String<DISPLAY_COLS>,
}

/// Build a line, silently truncating anything past [`DISPLAY_COLS`].
fn fmt_line(args: fmt::Arguments) -> String<DISPLAY_COLS> {
    let mut line = String::new();
    let _ = line.write_fmt(args);
    line
}

/// Marker appended to a title while its value is being edited.
fn edit_marker(editing: bool) -> &'static str {
    if editing {
        "#"
    } else {
        ""
    }
}

/// The Yes/No confirmation row with the current choice marked.
fn confirm_row(choice: Confirm) -> String<DISPLAY_COLS> {
    match choice {
        Confirm::No => fmt_line(format_args!(">NO    YES")),
        Confirm::Yes => fmt_line(format_args!(" NO   >YES")),
    }
}

impl DisplayLines {
    /// Snapshot the display content for the current menu screen.
    pub fn from_state(menu: &MenuStateMachine, machine: &MachineState) -> Self {
        // The pause banner overrides the top-level screen; sub-screens stay
        // visible so the operator can still navigate to Pause → Off.
        if machine.is_paused() {
            if let MenuScreen::Main { .. } = menu.screen() {
                return Self {
                    line1: fmt_line(format_args!("** SYSTEM **")),
                    line2: fmt_line(format_args!("*** PAUSED ***")),
                };
            }
        }

        match menu.screen() {
            MenuScreen::Main { selected } => {
                let count = MAIN_ENTRIES.len();
                let prev = MAIN_ENTRIES[(selected + count - 1) % count];
                let next = MAIN_ENTRIES[(selected + 1) % count];
                let next2 = MAIN_ENTRIES[(selected + 2) % count];
                Self {
                    line1: fmt_line(format_args!(">{}", MAIN_ENTRIES[selected])),
                    line2: fmt_line(format_args!(" {} {} {}", prev, next, next2)),
                }
            }

            MenuScreen::Speed { wheel, editing } => Self {
                line1: fmt_line(format_args!(
                    "SPEED: {}{}",
                    WHEEL_LABELS[wheel],
                    edit_marker(editing)
                )),
                line2: fmt_line(format_args!(
                    "Value: {:05.1}",
                    machine.wheels[wheel].speed_ratio
                )),
            },

            MenuScreen::Lfo { param, editing } => {
                let wheel = param / 3;
                let label = WHEEL_LABELS[wheel];
                let axis = &machine.wheels[wheel];
                let (name, value_line) = match param % 3 {
                    0 => (
                        "DPT",
                        fmt_line(format_args!("Value: {:05.1}%", axis.lfo_depth)),
                    ),
                    1 => (
                        "RTE",
                        fmt_line(format_args!("Value: {:05.1}", axis.lfo_rate)),
                    ),
                    _ => (
                        "POL",
                        fmt_line(format_args!("Value: {}", axis.lfo_polarity.label())),
                    ),
                };
                Self {
                    line1: fmt_line(format_args!(
                        "LFO: {} {}{}",
                        label,
                        name,
                        edit_marker(editing)
                    )),
                    line2: value_line,
                }
            }

            MenuScreen::Ratio { preset, confirm } => match confirm {
                None => Self {
                    line1: fmt_line(format_args!("Select Ratio")),
                    line2: fmt_line(format_args!(
                        "Preset {} of {}",
                        preset + 1,
                        NUM_RATIO_PRESETS
                    )),
                },
                Some(choice) => Self {
                    line1: fmt_line(format_args!("Apply Preset?")),
                    line2: confirm_row(choice),
                },
            },

            MenuScreen::Master { editing } => Self {
                line1: fmt_line(format_args!("MASTER TIME:{}", edit_marker(editing))),
                line2: fmt_line(format_args!("Value: {:06.2} S", machine.time_scale())),
            },

            MenuScreen::Microstep { pending, editing } => {
                // While editing, show the staged value; otherwise the
                // committed one.
                let shown = if editing {
                    pending
                } else {
                    machine.microstep()
                };
                Self {
                    line1: fmt_line(format_args!("MICROSTEP:{}", edit_marker(editing))),
                    line2: fmt_line(format_args!("Value: {}x", shown.factor())),
                }
            }

            MenuScreen::Reset { choice } => Self {
                line1: fmt_line(format_args!("RESET TO DEFLT?")),
                line2: confirm_row(choice),
            },

            MenuScreen::Pause { choice } => Self {
                line1: fmt_line(format_args!("PAUSE:")),
                line2: match choice {
                    PauseChoice::On => fmt_line(format_args!(">ON  OFF  EXIT")),
                    PauseChoice::Off => fmt_line(format_args!(" ON >OFF  EXIT")),
                    PauseChoice::Exit => fmt_line(format_args!(" ON  OFF >EXIT")),
                },
            },
        }
    }
}
