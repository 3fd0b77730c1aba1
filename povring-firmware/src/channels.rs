//! Inter-task communication channels
//!
//! Interrupt handlers publish here; Embassy tasks consume.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Channel capacity for measured rotation periods
const ROTATION_CHANNEL_SIZE: usize = 8;

/// Rotation periods in microseconds, one per sensor pulse
///
/// Written from the capture interrupt with `try_send`; periods are dropped
/// while the channel is full.
pub static ROTATION_PERIODS: Channel<CriticalSectionRawMutex, u32, ROTATION_CHANNEL_SIZE> =
    Channel::new();
