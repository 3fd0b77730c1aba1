//! Rotation statistics
//!
//! Rolling view of the last few measured rotation periods, used for
//! logging rotation speed. Periods are in capture ticks, which are
//! microseconds on every supported board.

use heapless::HistoryBuffer;

/// Number of rotations averaged
pub const HISTORY_LEN: usize = 8;

/// Microseconds per minute
const US_PER_MINUTE: u32 = 60_000_000;

/// Recent rotation periods
#[derive(Debug, Clone)]
pub struct RotationStats {
    periods: HistoryBuffer<u32, HISTORY_LEN>,
    rotations: u32,
}

impl Default for RotationStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStats {
    /// Empty history
    pub const fn new() -> Self {
        Self {
            periods: HistoryBuffer::new(),
            rotations: 0,
        }
    }

    /// Record one measured rotation
    ///
    /// Zero periods carry no speed information and are skipped.
    pub fn record(&mut self, period_us: u32) {
        if period_us == 0 {
            return;
        }
        self.periods.write(period_us);
        self.rotations = self.rotations.wrapping_add(1);
    }

    /// Rotations recorded since creation (wraps)
    pub fn rotations(&self) -> u32 {
        self.rotations
    }

    /// Most recent period
    pub fn latest(&self) -> Option<u32> {
        self.periods.recent().copied()
    }

    /// Mean of the recorded periods
    pub fn average_period(&self) -> Option<u32> {
        let periods = self.periods.as_slice();
        if periods.is_empty() {
            return None;
        }
        let sum: u64 = periods.iter().map(|&p| p as u64).sum();
        Some((sum / periods.len() as u64) as u32)
    }

    /// Spread between slowest and fastest recorded rotation
    pub fn jitter(&self) -> Option<u32> {
        let periods = self.periods.as_slice();
        let max = periods.iter().max()?;
        let min = periods.iter().min()?;
        Some(max - min)
    }

    /// Rotation speed from the average period
    pub fn rpm(&self) -> Option<u32> {
        self.average_period().map(|period| US_PER_MINUTE / period)
    }

    /// Forget the period history; the rotation count is kept
    pub fn clear(&mut self) {
        self.periods.clear();
    }
}
