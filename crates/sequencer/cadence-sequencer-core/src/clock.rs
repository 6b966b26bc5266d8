//! Virtual time. The host advances the clock; nothing here reads wall time.

use serde::{Deserialize, Serialize};

/// Milliseconds of virtual time.
pub type Millis = u64;

/// Monotonic virtual clock owned by one sequencer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    now: Millis,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move time forward by `dt` and return the new instant. Saturates rather
    /// than wrapping.
    #[inline]
    pub fn advance(&mut self, dt: Millis) -> Millis {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}

/// Converts fractional frame deltas (for example `requestAnimationFrame`
/// timestamps differences in milliseconds) into whole milliseconds, carrying
/// the remainder into the next frame so long runs do not drift.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    carry: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate `dt_ms` and return the whole milliseconds to feed into
    /// `Sequencer::update`. Negative or non-finite deltas count as zero.
    pub fn tick(&mut self, dt_ms: f64) -> Millis {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        let total = self.carry + dt_ms;
        let whole = total.floor();
        self.carry = total - whole;
        whole as Millis
    }

    /// Fractional milliseconds not yet handed out.
    pub fn carry(&self) -> f64 {
        self.carry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_and_saturates() {
        let mut c = Clock::new();
        assert_eq!(c.advance(16), 16);
        assert_eq!(c.advance(4), 20);
        c.now = Millis::MAX - 1;
        assert_eq!(c.advance(10), Millis::MAX);
    }

    #[test]
    fn frame_clock_carries_fractions() {
        let mut fc = FrameClock::new();
        // 60 Hz frames: 16.666.. ms each
        let total: Millis = (0..60).map(|_| fc.tick(1000.0 / 60.0)).sum();
        assert!(total == 999 || total == 1000, "total={total}");
        assert!(fc.carry() < 1.0);
    }

    #[test]
    fn frame_clock_ignores_garbage() {
        let mut fc = FrameClock::new();
        assert_eq!(fc.tick(f64::NAN), 0);
        assert_eq!(fc.tick(-5.0), 0);
        assert_eq!(fc.tick(f64::INFINITY), 0);
        assert_eq!(fc.tick(2.5), 2);
        assert_eq!(fc.tick(0.5), 1);
    }
}
