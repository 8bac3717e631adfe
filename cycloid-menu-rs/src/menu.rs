//! The menu state machine.

use cycloid::machine::{MachineState, MicrostepMode, NUM_RATIO_PRESETS, WHEEL_COUNT};

use crate::screen::{cycle_index, Confirm, MenuScreen, PauseChoice, MAIN_ENTRIES};

/// LFO parameters per wheel: depth, rate, polarity.
const LFO_PARAMS_PER_WHEEL: usize = 3;
/// Total selectable LFO parameters across all wheels.
const LFO_PARAM_COUNT: usize = WHEEL_COUNT * LFO_PARAMS_PER_WHEEL;

/// Speed-ratio change per encoder detent while editing.
const SPEED_STEP: f32 = 0.1;
/// LFO depth/rate change per encoder detent while editing.
const LFO_STEP: f32 = 0.1;
/// Time-scale change per encoder detent while editing, seconds.
const MASTER_STEP: f32 = 0.01;

/// Hierarchical menu over the machine state.
///
/// Consumes the signed deltas and press events produced by the encoder
/// sampler. Every input mutates exactly one thing: either a parameter
/// (through the [`MachineState`] setters, which clamp) or the navigation
/// state itself. Accelerated deltas scale value edits naturally, since the
/// per-detent step is multiplied by the delta magnitude.
pub struct MenuStateMachine {
    screen: MenuScreen,
}

impl Default for MenuStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuStateMachine {
    /// Start at Main with the first entry selected.
    pub fn new() -> Self {
        Self {
            screen: MenuScreen::main(),
        }
    }

    /// The current screen and its sub-state.
    pub fn screen(&self) -> MenuScreen {
        self.screen
    }

    /// Return to Main with the first entry selected. Used when a machine
    /// reset must also reinitialize the menu.
    pub fn reset(&mut self) {
        self.screen = MenuScreen::main();
    }

    // ── Encoder delta ────────────────────────────────────────────────

    /// Dispatch a signed encoder delta into the current screen.
    pub fn handle_delta(&mut self, delta: i32, machine: &mut MachineState) {
        if delta == 0 {
            return;
        }

        self.screen = match self.screen {
            MenuScreen::Main { selected } => MenuScreen::Main {
                selected: cycle_index(selected, MAIN_ENTRIES.len(), delta),
            },

            MenuScreen::Speed { wheel, editing } => {
                if editing {
                    let axis = &mut machine.wheels[wheel];
                    axis.set_speed_ratio(axis.speed_ratio + delta as f32 * SPEED_STEP);
                    MenuScreen::Speed { wheel, editing }
                } else {
                    MenuScreen::Speed {
                        wheel: cycle_index(wheel, WHEEL_COUNT, delta),
                        editing,
                    }
                }
            }

            MenuScreen::Lfo { param, editing } => {
                if editing {
                    let wheel = param / LFO_PARAMS_PER_WHEEL;
                    let axis = &mut machine.wheels[wheel];
                    match param % LFO_PARAMS_PER_WHEEL {
                        0 => axis.set_lfo_depth(axis.lfo_depth + delta as f32 * LFO_STEP),
                        1 => axis.set_lfo_rate(axis.lfo_rate + delta as f32 * LFO_STEP),
                        // Any nonzero delta toggles the polarity.
                        _ => axis.lfo_polarity = axis.lfo_polarity.toggled(),
                    }
                    MenuScreen::Lfo { param, editing }
                } else {
                    MenuScreen::Lfo {
                        param: cycle_index(param, LFO_PARAM_COUNT, delta),
                        editing,
                    }
                }
            }

            MenuScreen::Ratio { preset, confirm } => match confirm {
                None => MenuScreen::Ratio {
                    preset: cycle_index(preset, NUM_RATIO_PRESETS, delta),
                    confirm,
                },
                Some(choice) => MenuScreen::Ratio {
                    preset,
                    confirm: Some(choice.toggled()),
                },
            },

            MenuScreen::Master { editing } => {
                if editing {
                    machine.set_time_scale(machine.time_scale() + delta as f32 * MASTER_STEP);
                }
                MenuScreen::Master { editing }
            }

            MenuScreen::Microstep { pending, editing } => {
                if editing {
                    MenuScreen::Microstep {
                        pending: MicrostepMode::from_index(cycle_index(
                            pending.index(),
                            MicrostepMode::COUNT,
                            delta,
                        )),
                        editing,
                    }
                } else {
                    // The committed value only changes on confirm.
                    MenuScreen::Microstep { pending, editing }
                }
            }

            MenuScreen::Reset { choice } => MenuScreen::Reset {
                choice: choice.toggled(),
            },

            MenuScreen::Pause { choice } => MenuScreen::Pause {
                choice: PauseChoice::ALL
                    [cycle_index(choice.index(), PauseChoice::COUNT, delta)],
            },
        };
    }

    // ── Short press ──────────────────────────────────────────────────

    /// Dispatch a short press: enter sub-screens, toggle edit mode, and
    /// drive the confirmation flows.
    pub fn handle_short_press(&mut self, machine: &mut MachineState) {
        self.screen = match self.screen {
            MenuScreen::Main { selected } => MenuScreen::enter(selected, machine),

            MenuScreen::Speed { wheel, editing } => MenuScreen::Speed {
                wheel,
                editing: !editing,
            },

            MenuScreen::Lfo { param, editing } => MenuScreen::Lfo {
                param,
                editing: !editing,
            },

            MenuScreen::Ratio { preset, confirm } => match confirm {
                None => MenuScreen::Ratio {
                    preset,
                    confirm: Some(Confirm::No),
                },
                Some(Confirm::Yes) => {
                    // The preset index is cycled modulo the table, so this
                    // cannot fail.
                    let _ = machine.apply_ratio_preset(preset);
                    MenuScreen::main()
                }
                Some(Confirm::No) => MenuScreen::Ratio {
                    preset,
                    confirm: None,
                },
            },

            MenuScreen::Master { editing } => MenuScreen::Master { editing: !editing },

            MenuScreen::Microstep { pending, editing } => {
                if editing {
                    MenuScreen::Microstep {
                        pending: commit_microstep(pending, machine),
                        editing: false,
                    }
                } else {
                    // Re-stage the committed value on entering edit mode.
                    MenuScreen::Microstep {
                        pending: machine.microstep(),
                        editing: true,
                    }
                }
            }

            MenuScreen::Reset { choice } => {
                if choice == Confirm::Yes {
                    machine.reset_to_defaults();
                }
                MenuScreen::main()
            }

            MenuScreen::Pause { choice } => {
                match choice {
                    PauseChoice::On => machine.pause(),
                    PauseChoice::Off => machine.resume(),
                    PauseChoice::Exit => {}
                }
                MenuScreen::main()
            }
        };
    }

    // ── Long press ───────────────────────────────────────────────────

    /// Dispatch a long press.
    ///
    /// Inside an active edit it leaves edit mode, keeping the change (and
    /// committing the staged microstep value). Anywhere else it returns to
    /// Main and clears any confirmation in progress.
    pub fn handle_long_press(&mut self, machine: &mut MachineState) {
        self.screen = match self.screen {
            MenuScreen::Speed {
                wheel,
                editing: true,
            } => MenuScreen::Speed {
                wheel,
                editing: false,
            },

            MenuScreen::Lfo {
                param,
                editing: true,
            } => MenuScreen::Lfo {
                param,
                editing: false,
            },

            MenuScreen::Master { editing: true } => MenuScreen::Master { editing: false },

            MenuScreen::Microstep {
                pending,
                editing: true,
            } => MenuScreen::Microstep {
                pending: commit_microstep(pending, machine),
                editing: false,
            },

            // Already at the top: keep the selection.
            MenuScreen::Main { selected } => MenuScreen::Main { selected },

            _ => MenuScreen::main(),
        };
    }
}

/// Commit a staged microstep value through the validated setter.
///
/// On rejection the committed mode is untouched and the returned pending
/// value reverts to match it.
fn commit_microstep(pending: MicrostepMode, machine: &mut MachineState) -> MicrostepMode {
    match machine.set_microstep(pending.factor()) {
        Ok(()) => pending,
        Err(_) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("staged microstep value rejected; reverting");
            machine.microstep()
        }
    }
}
