pub mod seat;
pub mod table;

use chrono::{DateTime, Utc};

pub use seat::{Seat, SeatStatus, MAX_BUY_IN_TOTAL, SEATS_PER_TABLE};
pub use table::{Table, TableStatus};

/// Milliseconds from `since` to `now`; zero without a reference instant or
/// when the clock went backwards.
pub(crate) fn elapsed_ms(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    since
        .map(|since| (now - since).num_milliseconds().max(0) as u64)
        .unwrap_or(0)
}
