use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_FEE: u64 = 20;
pub const DEFAULT_HOURLY_RATE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub base_fee: u64,
    pub hourly_rate: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee: DEFAULT_BASE_FEE,
            hourly_rate: DEFAULT_HOURLY_RATE,
        }
    }
}

impl FeeSchedule {
    pub fn fee_for(&self, elapsed_hours: f64) -> u64 {
        calculate_fee(elapsed_hours, self.base_fee, self.hourly_rate)
    }
}

/// Hours billed for a stay: partial hours round up, and every stay (including
/// zero or negative durations from clock skew) bills at least one hour.
pub fn billable_hours(elapsed_hours: f64) -> u64 {
    if elapsed_hours.is_nan() || elapsed_hours <= 1.0 {
        return 1;
    }
    // f64 -> u64 `as` saturates
    elapsed_hours.ceil() as u64
}

/// `max(base_fee, ceil(hours) * hourly_rate)`
pub fn calculate_fee(elapsed_hours: f64, base_fee: u64, hourly_rate: u64) -> u64 {
    let metered = billable_hours(elapsed_hours).saturating_mul(hourly_rate);
    base_fee.max(metered)
}

pub fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}
