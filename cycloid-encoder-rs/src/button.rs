//! Debounce and press classification for the encoder's momentary switch.

/// Tuning for [`ButtonSampler`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// A raw level change must persist this long to be accepted. Default: 50 ms.
    pub debounce_ms: u64,
    /// Holding past this threshold fires a long press. Default: 1000 ms.
    pub long_press_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50,
            long_press_ms: 1000,
        }
    }
}

/// A classified button event. Short and long press are mutually exclusive
/// for a single physical press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Released before the long-press threshold.
    ShortPress,
    /// Held past the long-press threshold. Fires once, while still held.
    LongPress,
}

/// Debounced press/release tracker.
///
/// Call [`poll()`](Self::poll) once per control-loop iteration with the
/// logical pressed level (active-low inversion is the caller's concern).
/// A long press fires as soon as the hold time passes the threshold — the
/// operator gets feedback without releasing — and the eventual release
/// produces nothing further.
pub struct ButtonSampler {
    config: ButtonConfig,
    /// Debounced state: `true` while the press is accepted.
    stable: bool,
    last_raw: bool,
    last_edge_ms: u64,
    press_start_ms: u64,
    long_fired: bool,
}

impl ButtonSampler {
    pub fn new(config: ButtonConfig) -> Self {
        Self {
            config,
            stable: false,
            last_raw: false,
            last_edge_ms: 0,
            press_start_ms: 0,
            long_fired: false,
        }
    }

    /// Sample the raw button level.
    pub fn poll(&mut self, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        if pressed != self.last_raw {
            self.last_raw = pressed;
            self.last_edge_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_edge_ms) >= self.config.debounce_ms
            && pressed != self.stable
        {
            self.stable = pressed;
            if pressed {
                self.press_start_ms = now_ms;
                self.long_fired = false;
            } else if !self.long_fired {
                return Some(ButtonEvent::ShortPress);
            }
        }

        if self.stable
            && !self.long_fired
            && now_ms.saturating_sub(self.press_start_ms) >= self.config.long_press_ms
        {
            self.long_fired = true;
            return Some(ButtonEvent::LongPress);
        }

        None
    }
}
