//! Timing port for STM32F1
//!
//! - TIM2 is the capture timer: prescaled to 1 MHz, free-running over its
//!   full 16-bit range, channel 1 (PA0) latching on the sensor edge.
//! - TIM3 is the column-advance timer, auto-reload set from the column
//!   interval on every pulse.
//!
//! Register access goes through the PAC so the port can be rebuilt inside
//! an interrupt handler without owning the embassy peripherals.

use embassy_stm32::pac;
use embassy_stm32::pac::timer::{vals, TimGp16};
use povring_hal::{auto_reload, CaptureChannel, CaptureFlags, TimerId, TimingPort};

/// Capture timer wrap modulus (16-bit counter)
pub const CAPTURE_WRAP: u32 = 1 << 16;

/// Input filter on the sensor channel: f_CK_INT, N = 8
const SENSOR_FILTER: u8 = 0b0011;

/// Clock setup for [`Stm32TimingPort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerClocks {
    /// Timer kernel clock in MHz (APB1 timer clock)
    pub timer_clock_mhz: u16,
    /// Column-advance timer ticks per microsecond
    pub column_ticks_per_us: u16,
}

impl TimerClocks {
    /// Blue Pill at 72 MHz, column timer unprescaled
    pub const BLUE_PILL: Self = Self {
        timer_clock_mhz: 72,
        column_ticks_per_us: 1,
    };

    /// TIM2 prescaler for a 1 µs tick
    pub fn capture_prescaler(&self) -> u16 {
        self.timer_clock_mhz.saturating_sub(1)
    }

    /// TIM3 prescaler for `column_ticks_per_us`
    ///
    /// Falls back to the unprescaled clock if the rate does not divide it.
    pub fn column_prescaler(&self) -> u16 {
        match self.timer_clock_mhz.checked_div(self.column_ticks_per_us) {
            Some(div) if div > 0 && div * self.column_ticks_per_us == self.timer_clock_mhz => {
                div - 1
            }
            _ => 0,
        }
    }
}

/// TIM2/TIM3 timing port
///
/// Holds no peripheral state; any number of copies address the same
/// registers. Callers serialise access (the display lock does).
#[derive(Debug, Clone, Copy)]
pub struct Stm32TimingPort {
    clocks: TimerClocks,
}

impl Stm32TimingPort {
    const CAPTURE: TimGp16 = pac::TIM2;
    const COLUMN: TimGp16 = pac::TIM3;

    pub const fn new(clocks: TimerClocks) -> Self {
        Self { clocks }
    }

    pub fn clocks(&self) -> TimerClocks {
        self.clocks
    }

    /// Enable the timer clocks and program prescalers
    ///
    /// Call once before [`TimingPort::start_base_timer`]. Leaves both
    /// counters stopped.
    pub fn configure(&mut self) {
        pac::RCC.apb1enr().modify(|w| {
            w.set_tim2en(true);
            w.set_tim3en(true);
        });

        let capture = Self::CAPTURE;
        capture.cr1().modify(|w| {
            w.set_cen(false);
            w.set_urs(vals::Urs::COUNTER_ONLY);
        });
        capture.psc().write_value(self.clocks.capture_prescaler());
        capture.arr().write(|w| w.set_arr(u16::MAX));

        // CC1 as input mapped to TI1, rising edge
        capture.ccmr_input(0).modify(|w| {
            w.set_ccs(0, vals::CcmrInputCcs::from_bits(0b01));
            w.set_icf(0, vals::FilterValue::from_bits(SENSOR_FILTER));
        });
        capture.ccer().modify(|w| w.set_ccp(0, false));

        let column = Self::COLUMN;
        column.cr1().modify(|w| {
            w.set_cen(false);
            w.set_urs(vals::Urs::COUNTER_ONLY);
        });
        column.psc().write_value(self.clocks.column_prescaler());
        column.arr().write(|w| w.set_arr(u16::MAX));

        // Load the prescalers now rather than at the first wrap
        capture.egr().write(|w| w.set_ug(true));
        column.egr().write(|w| w.set_ug(true));
        capture.sr().write_value(Default::default());
        column.sr().write_value(Default::default());
    }

    /// Read and clear the capture timer's pending flags
    pub fn take_capture_flags(&mut self) -> CaptureFlags {
        let sr = Self::CAPTURE.sr().read();
        let flags = CaptureFlags {
            capture: sr.ccif(0),
            overflow: sr.uif(),
        };
        Self::CAPTURE.sr().modify(|w| {
            w.set_uif(false);
            w.set_ccif(0, false);
        });
        flags
    }

    /// Read and clear the column timer's update flag
    pub fn take_column_flag(&mut self) -> bool {
        let pending = Self::COLUMN.sr().read().uif();
        Self::COLUMN.sr().modify(|w| w.set_uif(false));
        pending
    }

    fn regs(timer: TimerId) -> TimGp16 {
        match timer {
            TimerId::Capture => Self::CAPTURE,
            TimerId::ColumnAdvance => Self::COLUMN,
        }
    }

    fn channel_index(channel: CaptureChannel) -> usize {
        // CH1..CH4 map to register index 0..3
        channel.0.saturating_sub(1).min(3) as usize
    }
}

impl TimingPort for Stm32TimingPort {
    fn start_base_timer(&mut self) {
        let capture = Self::CAPTURE;
        capture.cnt().write(|w| w.set_cnt(0));
        capture.dier().modify(|w| w.set_uie(true));
        capture.cr1().modify(|w| w.set_cen(true));
    }

    fn start_capture(&mut self, channel: CaptureChannel) {
        let index = Self::channel_index(channel);
        let capture = Self::CAPTURE;
        capture.ccer().modify(|w| w.set_cce(index, true));
        capture.dier().modify(|w| w.set_ccie(index, true));
    }

    fn start_column_timer(&mut self) {
        let column = Self::COLUMN;
        column.cnt().write(|w| w.set_cnt(0));
        column.dier().modify(|w| w.set_uie(true));
        column.cr1().modify(|w| w.set_cen(true));
    }

    fn set_period(&mut self, timer: TimerId, ticks: u16) {
        let reload = match timer {
            TimerId::Capture => ticks.saturating_sub(1).max(1),
            TimerId::ColumnAdvance => auto_reload(ticks, self.clocks.column_ticks_per_us),
        };
        Self::regs(timer).arr().write(|w| w.set_arr(reload));
    }

    fn reset_counter(&mut self, timer: TimerId) {
        Self::regs(timer).cnt().write(|w| w.set_cnt(0));
    }

    fn read_captured_value(&mut self, channel: CaptureChannel) -> u16 {
        Self::CAPTURE.ccr(Self::channel_index(channel)).read().ccr()
    }

    fn capture_wrap(&self) -> u32 {
        CAPTURE_WRAP
    }
}
