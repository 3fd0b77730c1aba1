//! Rotation statistics task
//!
//! Collects the periods measured by the capture interrupt and logs the
//! rotation speed at a fixed interval. Warns once when the pulses stop.

use defmt::*;
use embassy_time::{with_timeout, Duration, Instant};
use povring_core::sync::RotationStats;

use crate::channels::ROTATION_PERIODS;

/// Report interval in milliseconds
pub const REPORT_INTERVAL_MS: u64 = 2000;

/// No pulse for this long counts as stopped
pub const STALL_TIMEOUT_MS: u64 = 1000;

/// Stats task - logs RPM from measured rotation periods
#[embassy_executor::task]
pub async fn stats_task() {
    info!("Stats task started");

    let mut stats = RotationStats::new();
    let mut stalled = true;
    let mut next_report = Instant::now() + Duration::from_millis(REPORT_INTERVAL_MS);

    loop {
        match with_timeout(
            Duration::from_millis(STALL_TIMEOUT_MS),
            ROTATION_PERIODS.receive(),
        )
        .await
        {
            Ok(period_us) => {
                if stalled {
                    info!("Rotation detected ({} us)", period_us);
                    stalled = false;
                }
                stats.record(period_us);
            }
            Err(_) => {
                if !stalled {
                    warn!("No rotation pulse for {} ms", STALL_TIMEOUT_MS);
                    stalled = true;
                    stats.clear();
                }
                continue;
            }
        }

        if Instant::now() >= next_report {
            next_report = Instant::now() + Duration::from_millis(REPORT_INTERVAL_MS);
            if let (Some(rpm), Some(period), Some(jitter)) =
                (stats.rpm(), stats.average_period(), stats.jitter())
            {
                info!(
                    "{} RPM (avg period {} us, jitter {} us, {} rotations)",
                    rpm,
                    period,
                    jitter,
                    stats.rotations()
                );
            }
        }
    }
}
