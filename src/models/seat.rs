use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::i18n::MessageKey;

use super::elapsed_ms;

pub const SEATS_PER_TABLE: u8 = 9;

/// Upper bound on one seat's buy-in total. Keeps every total exact to the
/// cent when stored as a JSON float.
pub const MAX_BUY_IN_TOTAL: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SeatStatus {
    #[default]
    Idle,
    Seated,
    Resting,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Idle => "Idle",
            SeatStatus::Seated => "Seated",
            SeatStatus::Resting => "Resting",
        }
    }

    pub fn label_key(&self) -> MessageKey {
        match self {
            SeatStatus::Idle => MessageKey::StatusIdle,
            SeatStatus::Seated => MessageKey::StatusSeated,
            SeatStatus::Resting => MessageKey::StatusResting,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub number: u8,
    #[serde(default)]
    pub member_id: String,
    pub status: SeatStatus,
    pub active_ms: u64,
    pub rest_ms: u64,
    pub buy_in: Decimal,
    pub join_count: u32,
    pub last_tick_at: Option<DateTime<Utc>>,
    /// Batch-operation mark; lives only as long as the process.
    #[serde(skip)]
    pub selected: bool,
}

impl Seat {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            member_id: String::new(),
            status: SeatStatus::Idle,
            active_ms: 0,
            rest_ms: 0,
            buy_in: Decimal::ZERO,
            join_count: 0,
            last_tick_at: None,
            selected: false,
        }
    }

    pub fn active_secs(&self) -> u64 {
        self.active_ms / 1000
    }

    pub fn rest_secs(&self) -> u64 {
        self.rest_ms / 1000
    }

    pub fn resync(&mut self, now: DateTime<Utc>) {
        self.last_tick_at = Some(now);
    }

    /// Credits the time since the last tick to the accumulator matching the
    /// current status. Only called while the owning table runs.
    pub fn accrue(&mut self, now: DateTime<Utc>) -> u64 {
        let delta = elapsed_ms(self.last_tick_at, now);
        match self.status {
            SeatStatus::Seated => self.active_ms = self.active_ms.saturating_add(delta),
            SeatStatus::Resting => self.rest_ms = self.rest_ms.saturating_add(delta),
            SeatStatus::Idle => {}
        }
        self.last_tick_at = Some(now);
        delta
    }

    /// Moves the seat into `status`, settling time owed to the previous status
    /// first. Returns false when the seat was already there.
    pub fn enter(&mut self, status: SeatStatus, now: DateTime<Utc>, table_running: bool) -> bool {
        if self.status == status {
            return false;
        }
        if table_running {
            self.accrue(now);
        }
        if status == SeatStatus::Seated {
            self.join_count = self.join_count.saturating_add(1);
        }
        self.status = status;
        self.resync(now);
        true
    }

    /// Adds `amount` unless the new total would exceed [`MAX_BUY_IN_TOTAL`].
    /// Returns whether the amount was added.
    pub fn add_buy_in(&mut self, amount: Decimal) -> bool {
        match self.buy_in.checked_add(amount) {
            Some(total) if total <= MAX_BUY_IN_TOTAL => {
                self.buy_in = total;
                true
            }
            _ => false,
        }
    }
}
