//! Screen definitions and index-cycling arithmetic.

use cycloid::machine::{MachineState, MicrostepMode};

/// Labels of the Main screen entries, in selection order. Each entry opens
/// the corresponding sub-screen.
pub const MAIN_ENTRIES: [&str; 7] = ["SPEED", "LFO", "RATIO", "MASTER", "STEP", "RESET", "PAUSE"];

/// Yes/No choice used by the Ratio and Reset confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Confirm {
    #[default]
    No,
    Yes,
}

impl Confirm {
    pub fn toggled(self) -> Self {
        match self {
            Confirm::No => Confirm::Yes,
            Confirm::Yes => Confirm::No,
        }
    }
}

/// Options on the Pause screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PauseChoice {
    #[default]
    On,
    Off,
    Exit,
}

impl PauseChoice {
    pub const COUNT: usize = 3;

    pub const ALL: [PauseChoice; Self::COUNT] =
        [PauseChoice::On, PauseChoice::Off, PauseChoice::Exit];

    pub fn index(self) -> usize {
        match self {
            PauseChoice::On => 0,
            PauseChoice::Off => 1,
            PauseChoice::Exit => 2,
        }
    }
}

/// One menu screen with its embedded sub-state.
///
/// The `editing` flags live inside the variants, so the old failure mode of
/// parallel boolean arrays drifting out of sync cannot occur: whichever
/// screen is current is the only one that can possibly be editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuScreen {
    /// Top-level selection over [`MAIN_ENTRIES`].
    Main { selected: usize },
    /// Per-wheel speed ratio. Cycles wheels when not editing.
    Speed { wheel: usize, editing: bool },
    /// Per-wheel LFO parameters; `param` indexes wheel × {depth, rate, pol}.
    Lfo { param: usize, editing: bool },
    /// Ratio preset selection with a Yes/No apply confirmation.
    Ratio {
        preset: usize,
        confirm: Option<Confirm>,
    },
    /// Global time scale.
    Master { editing: bool },
    /// Microstep factor; `pending` is staged and only committed on leaving
    /// edit mode.
    Microstep {
        pending: MicrostepMode,
        editing: bool,
    },
    /// Reset-to-defaults confirmation.
    Reset { choice: Confirm },
    /// Pause / resume synthesis.
    Pause { choice: PauseChoice },
}

impl MenuScreen {
    /// The boot screen: Main with the first entry selected.
    pub fn main() -> Self {
        MenuScreen::Main { selected: 0 }
    }

    /// Build the sub-screen for a Main entry, freshly initialized.
    ///
    /// The Microstep screen stages the currently committed mode.
    pub fn enter(entry: usize, machine: &MachineState) -> Self {
        match entry {
            0 => MenuScreen::Speed {
                wheel: 0,
                editing: false,
            },
            1 => MenuScreen::Lfo {
                param: 0,
                editing: false,
            },
            2 => MenuScreen::Ratio {
                preset: 0,
                confirm: None,
            },
            3 => MenuScreen::Master { editing: false },
            4 => MenuScreen::Microstep {
                pending: machine.microstep(),
                editing: false,
            },
            5 => MenuScreen::Reset {
                choice: Confirm::No,
            },
            _ => MenuScreen::Pause {
                choice: PauseChoice::On,
            },
        }
    }

    /// Whether this screen is in active edit mode.
    pub fn editing(&self) -> bool {
        matches!(
            self,
            MenuScreen::Speed { editing: true, .. }
                | MenuScreen::Lfo { editing: true, .. }
                | MenuScreen::Master { editing: true }
                | MenuScreen::Microstep { editing: true, .. }
        )
    }
}

/// Cycle `current` through `count` options by a signed `delta`, wrapping in
/// both directions for any delta magnitude.
pub fn cycle_index(current: usize, count: usize, delta: i32) -> usize {
    (current as i64 + delta as i64).rem_euclid(count as i64) as usize
}
