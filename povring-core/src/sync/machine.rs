//! Rotation sync state machine
//!
//! Every sensor pulse restarts the revolution at column 0 and re-derives
//! the column interval from the measured rotation period. Between pulses
//! the column-advance timer steps through the framebuffer one column per
//! interval until the revolution is complete.

use povring_hal::{CaptureChannel, PixelLines, TimerId, TimingPort};

use super::events::TimerEvent;
use crate::config::TimingConfig;
use crate::framebuffer::Framebuffer;

/// Sync states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// No rotation period measured yet; output may be stale
    Idle,
    /// The column interval follows the last measured rotation
    Synchronized,
}

/// What a handled event did, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// A rotation was measured and column 0 shown
    Measured {
        /// Rotation period in capture ticks
        period: u32,
        /// Column interval programmed into the column-advance timer
        interval: u16,
        /// The interval had to be clamped into the timer's range
        clamped: bool,
    },
    /// Column shown after a column-advance tick
    Column(u16),
    /// The capture timer wrapped; total wraps in this rotation
    Overflow(u32),
    /// Revolution complete, nothing shown until the next pulse
    Idle,
}

/// Rotation timing state
#[derive(Debug, Clone)]
pub struct RotationSync<const RESOLUTION: usize> {
    state: SyncState,
    config: TimingConfig,
    /// Capture timer wraps since the last pulse
    overflow_count: u32,
    /// Raw counter latched at the last pulse
    latest_capture: u16,
    /// Last measured rotation period in capture ticks
    rotation_period: u32,
    /// Column shown (or about to be), saturates at RESOLUTION
    column_index: u16,
    /// Capture ticks per column
    column_interval: u16,
}

impl<const RESOLUTION: usize> RotationSync<RESOLUTION> {
    /// Capture channel wired to the rotation sensor
    pub const SENSOR_CHANNEL: CaptureChannel = CaptureChannel::CH1;

    /// The column index is a u16 and must reach RESOLUTION
    const INDEX_FITS: () = assert!(
        RESOLUTION <= u16::MAX as usize,
        "RESOLUTION must fit the u16 column index"
    );

    /// Create an idle state machine
    pub const fn new(config: TimingConfig) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::INDEX_FITS;
        Self {
            state: SyncState::Idle,
            config,
            overflow_count: 0,
            latest_capture: 0,
            rotation_period: 0,
            column_index: 0,
            column_interval: 0,
        }
    }

    /// Back to the power-on baseline, keeping the configuration
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Swap the timing configuration; takes effect at the next pulse
    pub fn set_config(&mut self, config: TimingConfig) {
        self.config = config;
    }

    /// Active timing configuration
    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    /// Current sync state
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Capture timer wraps counted since the last pulse
    pub fn overflow_count(&self) -> u32 {
        self.overflow_count
    }

    /// Counter value latched at the last pulse
    pub fn latest_capture(&self) -> u16 {
        self.latest_capture
    }

    /// Last measured rotation period in capture ticks
    pub fn rotation_period(&self) -> u32 {
        self.rotation_period
    }

    /// Column currently shown, `RESOLUTION` once the revolution is done
    pub fn column_index(&self) -> u16 {
        self.column_index
    }

    /// Interval programmed at the last pulse
    pub fn column_interval(&self) -> u16 {
        self.column_interval
    }

    /// Dispatch a timing event
    pub fn handle<T: TimingPort, L: PixelLines>(
        &mut self,
        event: TimerEvent,
        port: &mut T,
        lines: &mut L,
        framebuffer: &Framebuffer<RESOLUTION>,
    ) -> SyncOutcome {
        match event {
            TimerEvent::Capture => self.on_capture(port, lines, framebuffer),
            TimerEvent::PeriodElapsed(timer) => self.on_period_elapsed(timer, lines, framebuffer),
        }
    }

    /// Rotation sensor pulse
    ///
    /// Column 0 goes out before anything else so the image origin is
    /// locked to the pulse. The column-advance counter is reset so the new
    /// interval applies from this instant.
    pub fn on_capture<T: TimingPort, L: PixelLines>(
        &mut self,
        port: &mut T,
        lines: &mut L,
        framebuffer: &Framebuffer<RESOLUTION>,
    ) -> SyncOutcome {
        self.column_index = 0;
        lines.show_column(framebuffer.read_column(0));

        self.latest_capture = port.read_captured_value(Self::SENSOR_CHANNEL);
        self.rotation_period = (self.latest_capture as u32)
            .saturating_add(self.overflow_count.saturating_mul(self.config.wrap_modulus));

        let raw_interval = self
            .rotation_period
            .checked_div(RESOLUTION as u32)
            .unwrap_or(0);
        let (interval, clamped) = self.config.clamp_interval(raw_interval);
        self.column_interval = interval;

        port.set_period(TimerId::ColumnAdvance, interval);
        port.reset_counter(TimerId::ColumnAdvance);
        self.overflow_count = 0;
        port.reset_counter(TimerId::Capture);

        self.state = SyncState::Synchronized;

        SyncOutcome::Measured {
            period: self.rotation_period,
            interval,
            clamped,
        }
    }

    /// Timer period elapsed
    pub fn on_period_elapsed<L: PixelLines>(
        &mut self,
        timer: TimerId,
        lines: &mut L,
        framebuffer: &Framebuffer<RESOLUTION>,
    ) -> SyncOutcome {
        match timer {
            TimerId::Capture => {
                self.overflow_count = self.overflow_count.saturating_add(1);
                SyncOutcome::Overflow(self.overflow_count)
            }
            TimerId::ColumnAdvance => {
                if (self.column_index as usize) < RESOLUTION {
                    self.column_index += 1;
                }
                let index = self.column_index as usize;
                if index < RESOLUTION {
                    lines.show_column(framebuffer.read_column(index));
                    lines.strobe();
                    SyncOutcome::Column(self.column_index)
                } else {
                    SyncOutcome::Idle
                }
            }
        }
    }
}

impl<const RESOLUTION: usize> Default for RotationSync<RESOLUTION> {
    fn default() -> Self {
        Self::new(TimingConfig::DEFAULT)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use super::*;
    use heapless::Vec;
    use povring_hal::Level;

    /// Calls made on the timing port, in order
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum TimingCall {
        StartBase,
        StartCapture(CaptureChannel),
        StartColumn,
        SetPeriod(TimerId, u16),
        Reset(TimerId),
        Read(CaptureChannel),
    }

    /// Mock timing port returning a fixed capture value
    pub(crate) struct MockTiming {
        pub capture: u16,
        pub wrap: u32,
        pub calls: Vec<TimingCall, 32>,
    }

    impl Default for MockTiming {
        fn default() -> Self {
            Self::with_capture(0)
        }
    }

    impl MockTiming {
        pub fn with_capture(capture: u16) -> Self {
            Self {
                capture,
                wrap: 1 << 16,
                calls: Vec::new(),
            }
        }

        fn record(&mut self, call: TimingCall) {
            // Tests only look at the first few calls
            let _ = self.calls.push(call);
        }
    }

    impl TimingPort for MockTiming {
        fn start_base_timer(&mut self) {
            self.record(TimingCall::StartBase);
        }

        fn start_capture(&mut self, channel: CaptureChannel) {
            self.record(TimingCall::StartCapture(channel));
        }

        fn start_column_timer(&mut self) {
            self.record(TimingCall::StartColumn);
        }

        fn set_period(&mut self, timer: TimerId, ticks: u16) {
            self.record(TimingCall::SetPeriod(timer, ticks));
        }

        fn reset_counter(&mut self, timer: TimerId) {
            self.record(TimingCall::Reset(timer));
        }

        fn read_captured_value(&mut self, channel: CaptureChannel) -> u16 {
            self.record(TimingCall::Read(channel));
            self.capture
        }

        fn capture_wrap(&self) -> u32 {
            self.wrap
        }
    }

    /// Mock pixel lines recording every column shown
    #[derive(Default)]
    pub(crate) struct MockLines {
        pub levels: [bool; 8],
        pub shown: Vec<u8, 128>,
        pub strobes: u32,
    }

    impl PixelLines for MockLines {
        const LINES: u8 = 8;

        fn set_line(&mut self, index: u8, level: Level) {
            if let Some(line) = self.levels.get_mut(index as usize) {
                *line = level == Level::High;
            }
        }

        fn show_column(&mut self, bits: u8) {
            for line in 0..Self::LINES {
                self.set_line(line, Level::of_bit(bits, line));
            }
            let _ = self.shown.push(bits);
        }

        fn strobe(&mut self) {
            self.strobes += 1;
        }
    }

    const RES: usize = 60;

    /// Framebuffer whose column `i` holds `i + 1`
    fn numbered() -> Framebuffer<RES> {
        let mut fb = Framebuffer::new();
        for i in 0..RES {
            fb.write_column(i, i as u8 + 1).unwrap();
        }
        fb
    }

    #[test]
    fn test_starts_idle() {
        let sync = RotationSync::<RES>::default();
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.column_index(), 0);
        assert_eq!(sync.overflow_count(), 0);
    }

    #[test]
    fn test_capture_scenario() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(1000);
        let mut lines = MockLines::default();
        let fb = numbered();

        let outcome = sync.on_capture(&mut port, &mut lines, &fb);

        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period: 1000,
                interval: 16,
                clamped: false
            }
        );
        assert_eq!(sync.rotation_period(), 1000);
        assert_eq!(sync.column_interval(), 16);
        assert_eq!(sync.latest_capture(), 1000);
        assert_eq!(sync.column_index(), 0);
        assert_eq!(sync.overflow_count(), 0);
        assert_eq!(sync.state(), SyncState::Synchronized);

        // Column 0 shown straight away
        assert_eq!(lines.shown.as_slice(), &[1]);
        assert!(lines.levels[0]);
        assert!(!lines.levels[1]);

        assert_eq!(
            port.calls.as_slice(),
            &[
                TimingCall::Read(CaptureChannel::CH1),
                TimingCall::SetPeriod(TimerId::ColumnAdvance, 16),
                TimingCall::Reset(TimerId::ColumnAdvance),
                TimingCall::Reset(TimerId::Capture),
            ]
        );
    }

    #[test]
    fn test_full_revolution() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(1000);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_capture(&mut port, &mut lines, &fb);

        for expected in 1..RES as u16 {
            let outcome = sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb);
            assert_eq!(outcome, SyncOutcome::Column(expected));
            assert_eq!(sync.column_index(), expected);
        }

        // 60th tick: past the last column, nothing shown
        let outcome = sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb);
        assert_eq!(outcome, SyncOutcome::Idle);
        assert_eq!(sync.column_index(), RES as u16);

        // Further ticks stay quiet and the index does not move
        for _ in 0..5 {
            assert_eq!(
                sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb),
                SyncOutcome::Idle
            );
        }
        assert_eq!(sync.column_index(), RES as u16);

        // Every column shown exactly once, in order
        assert_eq!(lines.shown.len(), RES);
        for (i, bits) in lines.shown.iter().enumerate() {
            assert_eq!(*bits, i as u8 + 1);
        }
        assert_eq!(lines.strobes, RES as u32 - 1);
    }

    #[test]
    fn test_capture_restarts_revolution() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(1000);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_capture(&mut port, &mut lines, &fb);
        for _ in 0..25 {
            sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb);
        }
        assert_eq!(sync.column_index(), 25);

        sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(sync.column_index(), 0);
        assert_eq!(lines.shown.last(), Some(&1));

        sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb);
        assert_eq!(lines.shown.last(), Some(&2));
    }

    #[test]
    fn test_overflow_extends_period() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(1000);
        let mut lines = MockLines::default();
        let fb = numbered();

        assert_eq!(
            sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb),
            SyncOutcome::Overflow(1)
        );
        assert_eq!(
            sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb),
            SyncOutcome::Overflow(2)
        );
        // Overflows never touch the column
        assert!(lines.shown.is_empty());

        let outcome = sync.on_capture(&mut port, &mut lines, &fb);
        let period = 1000 + 2 * 65536;
        assert_eq!(sync.rotation_period(), period);
        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period,
                interval: (period / RES as u32) as u16,
                clamped: false
            }
        );
        assert_eq!(sync.overflow_count(), 0);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(0);
        let mut lines = MockLines::default();
        let fb = numbered();

        let outcome = sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period: 0,
                interval: 2,
                clamped: true
            }
        );
        assert!(port
            .calls
            .contains(&TimingCall::SetPeriod(TimerId::ColumnAdvance, 2)));
    }

    #[test]
    fn test_one_wrap_rotation_fits_column_timer() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(0);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        let outcome = sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period: 65536,
                interval: 1092,
                clamped: false
            }
        );

        // The column timer runs exactly the interval that was reported
        let config = sync.config();
        let reload = config.auto_reload(sync.column_interval()) as u32;
        assert_eq!((reload + 1) / config.ticks_per_us as u32, 1092);
    }

    #[test]
    fn test_unprescaled_column_timer_reports_clamp() {
        let config = TimingConfig {
            ticks_per_us: 72,
            ..TimingConfig::DEFAULT
        };
        let mut sync = RotationSync::<RES>::new(config);
        let mut port = MockTiming::with_capture(0);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        let outcome = sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period: 65536,
                interval: 910,
                clamped: true
            }
        );
        let reload = config.auto_reload(sync.column_interval()) as u32;
        assert_eq!((reload + 1) / 72, 910);
    }

    #[test]
    fn test_largest_resolution_saturates() {
        const BIG: usize = u16::MAX as usize;
        let mut sync = RotationSync::<BIG>::default();
        let mut port = MockTiming::with_capture(0);
        let mut lines = MockLines::default();
        let fb = std::boxed::Box::new(Framebuffer::<BIG>::new());

        sync.on_capture(&mut port, &mut lines, &fb);
        for _ in 0..BIG + 3 {
            sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb);
        }
        assert_eq!(sync.column_index(), u16::MAX);
        assert_eq!(
            sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb),
            SyncOutcome::Idle
        );
    }

    #[test]
    fn test_slow_rotation_is_clamped_to_register() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(0);
        let mut lines = MockLines::default();
        let fb = numbered();

        // 100 wraps: about 6.5 s per rotation
        for _ in 0..100 {
            sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        }
        let outcome = sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(
            outcome,
            SyncOutcome::Measured {
                period: 100 * 65536,
                interval: u16::MAX,
                clamped: true
            }
        );
    }

    #[test]
    fn test_overflow_count_saturates() {
        let mut sync = RotationSync::<RES>::default();
        sync.overflow_count = u32::MAX - 1;
        let mut port = MockTiming::with_capture(500);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        assert_eq!(sync.overflow_count(), u32::MAX);

        sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(sync.rotation_period(), u32::MAX);
        assert_eq!(sync.column_interval(), u16::MAX);
    }

    #[test]
    fn test_idle_ticks_before_first_pulse() {
        let mut sync = RotationSync::<RES>::default();
        let mut lines = MockLines::default();
        let fb = numbered();

        // The column timer free-runs before the first pulse
        assert_eq!(
            sync.on_period_elapsed(TimerId::ColumnAdvance, &mut lines, &fb),
            SyncOutcome::Column(1)
        );
        assert_eq!(sync.state(), SyncState::Idle);
    }

    #[test]
    fn test_handle_dispatch() {
        let mut sync = RotationSync::<RES>::default();
        let mut port = MockTiming::with_capture(6000);
        let mut lines = MockLines::default();
        let fb = numbered();

        assert_eq!(
            sync.handle(
                TimerEvent::PeriodElapsed(TimerId::Capture),
                &mut port,
                &mut lines,
                &fb
            ),
            SyncOutcome::Overflow(1)
        );
        assert!(matches!(
            sync.handle(TimerEvent::Capture, &mut port, &mut lines, &fb),
            SyncOutcome::Measured { .. }
        ));
        assert_eq!(
            sync.handle(
                TimerEvent::PeriodElapsed(TimerId::ColumnAdvance),
                &mut port,
                &mut lines,
                &fb
            ),
            SyncOutcome::Column(1)
        );
    }

    #[test]
    fn test_min_interval_from_config() {
        let config = TimingConfig {
            min_interval_ticks: 50,
            ..TimingConfig::DEFAULT
        };
        let mut sync = RotationSync::<RES>::new(config);
        let mut port = MockTiming::with_capture(1000);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(sync.column_interval(), 50);
    }

    #[test]
    fn test_reset_keeps_config() {
        let config = TimingConfig {
            wrap_modulus: 256,
            ..TimingConfig::DEFAULT
        };
        let mut sync = RotationSync::<RES>::new(config);
        let mut port = MockTiming::with_capture(10);
        let mut lines = MockLines::default();
        let fb = numbered();

        sync.on_period_elapsed(TimerId::Capture, &mut lines, &fb);
        sync.on_capture(&mut port, &mut lines, &fb);
        assert_eq!(sync.rotation_period(), 266);

        sync.reset();
        assert_eq!(sync.state(), SyncState::Idle);
        assert_eq!(sync.rotation_period(), 0);
        assert_eq!(sync.config().wrap_modulus, 256);
    }
}
