//! Time helpers

use chrono::{Datelike, Local};

/// Weekday index of today in local time, 0 = Sunday.
pub fn today_weekday_index() -> usize {
    Local::now().weekday().num_days_from_sunday() as usize
}
