//! Quadrature decode with noise rejection and turn acceleration.

/// Direction lookup for quadrature transitions, indexed by
/// `(previous_bits << 2) | current_bits`.
///
/// `0` entries are either no-ops or invalid two-bit jumps; both are ignored.
pub const QUAD_DECODE_TABLE: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Tuning for [`EncoderSampler`].
///
/// Defaults suit a detented panel encoder polled at roughly 1 kHz.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplerConfig {
    /// Accumulated transitions required per emitted detent. Default: 4
    /// (one full quadrature cycle per mechanical detent).
    pub counts_per_detent: u16,
    /// Consecutive quiet polls (no raw transition) required before an
    /// accumulated detent is emitted. Default: 2.
    pub stable_polls: u8,
    /// A direction reversal arriving sooner than this after the last
    /// accepted transition is treated as contact bounce. Default: 5 ms.
    pub reversal_guard_ms: u64,
    /// Emissions closer together than this raise the acceleration level;
    /// a longer gap resets it. Default: 120 ms.
    pub accel_timeout_ms: u64,
    /// Acceleration level cap. Default: 8.
    pub accel_max: u8,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            counts_per_detent: 4,
            stable_polls: 2,
            reversal_guard_ms: 5,
            accel_timeout_ms: 120,
            accel_max: 8,
        }
    }
}

/// Debounced, accelerated quadrature sampler.
///
/// Call [`poll()`](Self::poll) once per control-loop iteration with the raw
/// pin levels and the current time. Raw transitions accumulate internally;
/// a signed delta is returned only once a full detent has accumulated *and*
/// the line has been quiet for [`SamplerConfig::stable_polls`] polls. Fast
/// consecutive detents are multiplied by a growing acceleration level so a
/// quick spin covers a large parameter range.
///
/// # Example
///
/// ```
/// use encoder_sampler::{EncoderSampler, SamplerConfig};
///
/// let mut sampler = EncoderSampler::new(SamplerConfig::default());
/// // First poll establishes the baseline and never emits.
/// assert_eq!(sampler.poll(false, false, 0), None);
/// ```
pub struct EncoderSampler {
    config: SamplerConfig,
    /// `false` until the first poll has seeded `prev_bits`.
    primed: bool,
    prev_bits: u8,
    /// Accepted transitions not yet emitted, signed.
    pending: i16,
    /// Direction of the pending accumulation (−1, 0, +1).
    pending_dir: i8,
    /// Consecutive polls since the last raw transition.
    quiet_polls: u8,
    last_accepted_ms: u64,
    last_emit_ms: u64,
    accel_level: u8,
}

impl EncoderSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            primed: false,
            prev_bits: 0,
            pending: 0,
            pending_dir: 0,
            quiet_polls: 0,
            last_accepted_ms: 0,
            last_emit_ms: 0,
            accel_level: 0,
        }
    }

    /// Current acceleration level (diagnostic).
    pub fn acceleration_level(&self) -> u8 {
        self.accel_level
    }

    /// Sample the two quadrature pins.
    ///
    /// Returns a signed delta once a detent has accumulated and stabilized;
    /// the magnitude may exceed one when acceleration is active or several
    /// detents were backlogged.
    pub fn poll(&mut self, a: bool, b: bool, now_ms: u64) -> Option<i32> {
        let bits = ((a as u8) << 1) | (b as u8);

        if !self.primed {
            self.primed = true;
            self.prev_bits = bits;
            return None;
        }

        if bits != self.prev_bits {
            let index = ((self.prev_bits << 2) | bits) as usize;
            let dir = QUAD_DECODE_TABLE[index & 0x0f];
            self.prev_bits = bits;
            self.quiet_polls = 0;

            if dir == 0 {
                return None;
            }

            if self.pending_dir != 0 && dir != self.pending_dir {
                if now_ms.saturating_sub(self.last_accepted_ms) < self.config.reversal_guard_ms {
                    // Contact bounce: too soon after the last accepted
                    // transition to be a real change of direction.
                    return None;
                }
                // Genuine reversal: drop the stale accumulation.
                self.pending = 0;
            }

            self.pending_dir = dir;
            self.pending += dir as i16;
            self.last_accepted_ms = now_ms;
            return None;
        }

        // Quiet poll: see whether the accumulation is ready to emit.
        if self.pending_dir == 0 {
            return None;
        }
        self.quiet_polls = self.quiet_polls.saturating_add(1);
        if self.quiet_polls < self.config.stable_polls {
            return None;
        }
        if self.pending.unsigned_abs() < self.config.counts_per_detent {
            return None;
        }

        let detents = self.pending / self.config.counts_per_detent as i16;
        self.pending -= detents * self.config.counts_per_detent as i16;
        if self.pending == 0 {
            self.pending_dir = 0;
        }

        if now_ms.saturating_sub(self.last_emit_ms) <= self.config.accel_timeout_ms {
            self.accel_level = (self.accel_level + 1).min(self.config.accel_max);
        } else {
            self.accel_level = 1;
        }
        self.last_emit_ms = now_ms;

        let delta = detents as i32 * self.accel_level as i32;
        #[cfg(feature = "defmt")]
        defmt::debug!("encoder delta {} (accel {})", delta, self.accel_level);
        Some(delta)
    }
}
