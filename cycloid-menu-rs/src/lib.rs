//! Menu navigation for the cycloid machine's rotary-encoder interface.
//!
//! [`MenuStateMachine`] consumes the deltas and press events produced by
//! the encoder sampler and mutates exactly one target per input: an axis
//! parameter, the global time scale, the microstepping mode, or its own
//! navigation state. Each screen is a variant of [`MenuScreen`] carrying
//! its own sub-state, so only one screen can ever be editing or confirming.
//!
//! The [`display`] module builds the two 16-character lines the external
//! character-display collaborator renders.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].

#![no_std]

pub mod display;
pub mod menu;
pub mod screen;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use display::DisplayLines;
pub use menu::MenuStateMachine;
pub use screen::{cycle_index, Confirm, MenuScreen, PauseChoice, MAIN_ENTRIES};
