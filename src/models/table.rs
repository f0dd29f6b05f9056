use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::i18n::MessageKey;

use super::{elapsed_ms, Seat, SeatStatus, SEATS_PER_TABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    NotOpened,
    Running,
    Paused,
    Closed,
}

impl TableStatus {
    pub fn label_key(&self) -> MessageKey {
        match self {
            TableStatus::NotOpened => MessageKey::TableNotOpened,
            TableStatus::Running => MessageKey::TableRunning,
            TableStatus::Paused => MessageKey::TablePaused,
            TableStatus::Closed => MessageKey::TableClosed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub number: u8,
    pub is_running: bool,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub table_ms: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_id: Option<String>,
    pub seats: Vec<Seat>,
}

impl Table {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            is_running: false,
            opened_at: None,
            closed_at: None,
            table_ms: 0,
            last_tick_at: None,
            session_id: None,
            seats: (1..=SEATS_PER_TABLE).map(Seat::new).collect(),
        }
    }

    pub fn status(&self) -> TableStatus {
        if self.is_running {
            TableStatus::Running
        } else if self.closed_at.is_some() {
            TableStatus::Closed
        } else if self.opened_at.is_some() {
            TableStatus::Paused
        } else {
            TableStatus::NotOpened
        }
    }

    pub fn table_secs(&self) -> u64 {
        self.table_ms / 1000
    }

    pub fn seat(&self, number: u8) -> Option<&Seat> {
        self.seats.iter().find(|seat| seat.number == number)
    }

    pub fn seat_mut(&mut self, number: u8) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|seat| seat.number == number)
    }

    pub fn selected_seats(&self) -> Vec<u8> {
        self.seats
            .iter()
            .filter(|seat| seat.selected)
            .map(|seat| seat.number)
            .collect()
    }

    pub fn total_active_ms(&self) -> u64 {
        self.seats.iter().map(|seat| seat.active_ms).sum()
    }

    /// Sum of the per-seat whole seconds, so it always equals the exported rows.
    pub fn total_active_secs(&self) -> u64 {
        self.seats.iter().map(Seat::active_secs).sum()
    }

    pub fn seated_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|seat| seat.status == SeatStatus::Seated)
            .count()
    }

    /// Moves every reference instant to `now` without crediting anything.
    pub fn resync(&mut self, now: DateTime<Utc>) {
        self.last_tick_at = Some(now);
        for seat in &mut self.seats {
            seat.resync(now);
        }
    }

    /// One accounting step. A stopped table only refreshes its reference
    /// instants so a later resume never sees the stopped interval.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.is_running {
            self.resync(now);
            return;
        }

        let delta = elapsed_ms(self.last_tick_at, now);
        self.table_ms = self.table_ms.saturating_add(delta);
        self.last_tick_at = Some(now);

        for seat in &mut self.seats {
            seat.accrue(now);
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.is_running = true;
        if self.opened_at.is_none() {
            self.opened_at = Some(now);
        }
        if self.session_id.is_none() {
            self.session_id = Some(Uuid::new_v4().to_string());
        }
        self.closed_at = None;
        self.resync(now);
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.is_running {
            self.tick(now);
        }
        self.is_running = false;
    }

    pub fn close(&mut self, now: DateTime<Utc>) {
        self.pause(now);
        self.closed_at = Some(now);
    }

    pub fn reset(&mut self) {
        *self = Table::new(self.number);
    }

    /// Nine seats numbered 1..=9 in order.
    pub fn is_well_formed(&self) -> bool {
        self.seats.len() == SEATS_PER_TABLE as usize
            && self
                .seats
                .iter()
                .zip(1..=SEATS_PER_TABLE)
                .all(|(seat, expected)| seat.number == expected && !seat.buy_in.is_sign_negative())
    }
}
