//! Shared machine state for the cycloid drawing machine.
//!
//! This crate is the central data model accessed by the menu state machine,
//! the speed synthesizer, and the serial command channel. It owns the
//! per-wheel motion parameters, the global clock, the microstepping mode,
//! and the pause flag, and exposes the single validated setter/getter
//! surface both input paths share.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging via [`defmt`].

#![no_std]

pub mod command;
pub mod machine;
