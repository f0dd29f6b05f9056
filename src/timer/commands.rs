//! Operator commands against the floor.
//!
//! Each command is checked in full before anything is written, so a rejected
//! command leaves the floor exactly as it found it.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{FloorError, FloorResult},
    i18n::{Language, MessageKey},
    models::{Seat, SeatStatus, Table},
};

use super::FloorState;

#[derive(Debug, Clone, PartialEq)]
pub enum FloorCommand {
    SelectTable { index: usize },
    StartTable,
    PauseTable,
    CloseTable,
    ResetTable,
    Sit { seat: u8 },
    Rest { seat: u8 },
    Leave { seat: u8 },
    BuyIn { seat: u8, input: String },
    BatchSit,
    BatchLeave,
    SetMemberId { seat: u8, member_id: String },
    ToggleSelection { seat: u8 },
    SetLanguage { language: Language },
    ToggleLanguage,
}

impl FloorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            FloorCommand::SelectTable { .. } => "select_table",
            FloorCommand::StartTable => "start_table",
            FloorCommand::PauseTable => "pause_table",
            FloorCommand::CloseTable => "close_table",
            FloorCommand::ResetTable => "reset_table",
            FloorCommand::Sit { .. } => "sit",
            FloorCommand::Rest { .. } => "rest",
            FloorCommand::Leave { .. } => "leave",
            FloorCommand::BuyIn { .. } => "buy_in",
            FloorCommand::BatchSit => "batch_sit",
            FloorCommand::BatchLeave => "batch_leave",
            FloorCommand::SetMemberId { .. } => "set_member_id",
            FloorCommand::ToggleSelection { .. } => "toggle_selection",
            FloorCommand::SetLanguage { .. } => "set_language",
            FloorCommand::ToggleLanguage => "toggle_language",
        }
    }
}

/// Parses operator input for a buy-in, rounded half-up to the cent. Only
/// amounts that are still above zero after rounding pass.
pub fn parse_buy_in(input: &str) -> FloorResult<Decimal> {
    let amount = input
        .trim()
        .parse::<Decimal>()
        .map_err(|_| FloorError::InvalidBuyIn(input.to_string()))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if amount <= Decimal::ZERO {
        return Err(FloorError::InvalidBuyIn(input.to_string()));
    }
    Ok(amount)
}

/// Applies `command` to the floor at instant `now`. On success returns the
/// notice worth showing the operator, if any.
pub fn apply(
    state: &mut FloorState,
    command: &FloorCommand,
    now: DateTime<Utc>,
) -> FloorResult<Option<MessageKey>> {
    match command {
        FloorCommand::SelectTable { index } => {
            if state.select(*index) {
                Ok(None)
            } else {
                Err(FloorError::UnknownTable(*index))
            }
        }
        FloorCommand::SetLanguage { language } => {
            state.set_language(*language);
            Ok(None)
        }
        FloorCommand::ToggleLanguage => {
            let next = state.language().toggled();
            state.set_language(next);
            Ok(None)
        }
        table_command => apply_to_table(state.current_table_mut(), table_command, now),
    }
}

fn apply_to_table(
    table: &mut Table,
    command: &FloorCommand,
    now: DateTime<Utc>,
) -> FloorResult<Option<MessageKey>> {
    match command {
        FloorCommand::StartTable => {
            if table.is_running {
                return Err(FloorError::TableAlreadyRunning(table.number));
            }
            table.start(now);
            Ok(Some(MessageKey::NoticeTableStarted))
        }
        FloorCommand::PauseTable => {
            table.pause(now);
            Ok(Some(MessageKey::NoticeTablePaused))
        }
        FloorCommand::CloseTable => {
            table.close(now);
            Ok(Some(MessageKey::NoticeTableClosed))
        }
        FloorCommand::ResetTable => {
            table.reset();
            Ok(Some(MessageKey::NoticeTableReset))
        }
        FloorCommand::Sit { seat } => {
            require_running(table)?;
            let running = table.is_running;
            seat_mut(table, *seat)?.enter(SeatStatus::Seated, now, running);
            Ok(None)
        }
        FloorCommand::Rest { seat } => {
            require_running(table)?;
            let running = table.is_running;
            seat_mut(table, *seat)?.enter(SeatStatus::Resting, now, running);
            Ok(None)
        }
        FloorCommand::Leave { seat } => {
            let running = table.is_running;
            leave(table, *seat, now, running)?;
            Ok(None)
        }
        FloorCommand::BuyIn { seat, input } => {
            let amount = parse_buy_in(input)?;
            if !seat_mut(table, *seat)?.add_buy_in(amount) {
                return Err(FloorError::InvalidBuyIn(input.clone()));
            }
            Ok(None)
        }
        FloorCommand::BatchSit => {
            require_running(table)?;
            for seat in table.seats.iter_mut().filter(|seat| seat.selected) {
                seat.enter(SeatStatus::Seated, now, true);
            }
            Ok(None)
        }
        FloorCommand::BatchLeave => {
            let running = table.is_running;
            for number in table.selected_seats() {
                leave(table, number, now, running)?;
            }
            Ok(None)
        }
        FloorCommand::SetMemberId { seat, member_id } => {
            seat_mut(table, *seat)?.member_id = member_id.clone();
            Ok(None)
        }
        FloorCommand::ToggleSelection { seat } => {
            let seat = seat_mut(table, *seat)?;
            seat.selected = !seat.selected;
            Ok(None)
        }
        FloorCommand::SelectTable { .. }
        | FloorCommand::SetLanguage { .. }
        | FloorCommand::ToggleLanguage => Ok(None),
    }
}

fn require_running(table: &Table) -> FloorResult<()> {
    if table.is_running {
        Ok(())
    } else {
        Err(FloorError::TableNotRunning(table.number))
    }
}

fn seat_mut(table: &mut Table, number: u8) -> FloorResult<&mut Seat> {
    table
        .seat_mut(number)
        .ok_or(FloorError::UnknownSeat(number))
}

fn leave(table: &mut Table, number: u8, now: DateTime<Utc>, running: bool) -> FloorResult<()> {
    let seat = seat_mut(table, number)?;
    seat.enter(SeatStatus::Idle, now, running);
    seat.resync(now);
    seat.selected = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_BUY_IN_TOTAL;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn running_floor() -> FloorState {
        let mut floor = FloorState::default();
        apply(&mut floor, &FloorCommand::StartTable, t0()).unwrap();
        floor
    }

    #[test]
    fn start_sets_opened_once_and_rejects_double_start() {
        let mut floor = running_floor();
        assert_eq!(floor.current_table().opened_at, Some(t0()));

        let err = apply(&mut floor, &FloorCommand::StartTable, at(5)).unwrap_err();
        assert_eq!(err, FloorError::TableAlreadyRunning(1));

        apply(&mut floor, &FloorCommand::PauseTable, at(10)).unwrap();
        apply(&mut floor, &FloorCommand::StartTable, at(20)).unwrap();
        assert_eq!(floor.current_table().opened_at, Some(t0()));
    }

    #[test]
    fn seat_commands_require_a_running_table() {
        let mut floor = FloorState::default();
        let before = floor.clone();

        for command in [
            FloorCommand::Sit { seat: 1 },
            FloorCommand::Rest { seat: 1 },
            FloorCommand::BatchSit,
        ] {
            let err = apply(&mut floor, &command, t0()).unwrap_err();
            assert_eq!(err, FloorError::TableNotRunning(1));
        }
        assert_eq!(floor, before);
    }

    #[test]
    fn join_count_rises_once_per_entry_into_seated() {
        let mut floor = running_floor();
        apply(&mut floor, &FloorCommand::Sit { seat: 2 }, at(1)).unwrap();
        apply(&mut floor, &FloorCommand::Sit { seat: 2 }, at(2)).unwrap();
        assert_eq!(floor.current_table().seat(2).unwrap().join_count, 1);

        apply(&mut floor, &FloorCommand::Rest { seat: 2 }, at(3)).unwrap();
        assert_eq!(floor.current_table().seat(2).unwrap().join_count, 1);
        apply(&mut floor, &FloorCommand::Sit { seat: 2 }, at(4)).unwrap();
        assert_eq!(floor.current_table().seat(2).unwrap().join_count, 2);

        apply(&mut floor, &FloorCommand::Leave { seat: 2 }, at(5)).unwrap();
        apply(&mut floor, &FloorCommand::Sit { seat: 2 }, at(6)).unwrap();
        assert_eq!(floor.current_table().seat(2).unwrap().join_count, 3);
    }

    #[test]
    fn rejected_buy_in_leaves_amount_unchanged() {
        let mut floor = running_floor();
        apply(
            &mut floor,
            &FloorCommand::BuyIn {
                seat: 1,
                input: "200".into(),
            },
            at(1),
        )
        .unwrap();

        for input in ["-5", "abc", "0", "", "NaN", "inf"] {
            let err = apply(
                &mut floor,
                &FloorCommand::BuyIn {
                    seat: 1,
                    input: input.into(),
                },
                at(2),
            )
            .unwrap_err();
            assert_eq!(err, FloorError::InvalidBuyIn(input.to_string()));
        }
        assert_eq!(floor.current_table().seat(1).unwrap().buy_in, Decimal::from(200));

        apply(
            &mut floor,
            &FloorCommand::BuyIn {
                seat: 1,
                input: " 50.5 ".into(),
            },
            at(3),
        )
        .unwrap();
        assert_eq!(floor.current_table().seat(1).unwrap().buy_in, Decimal::new(2505, 1));
    }

    fn buy_in(floor: &mut FloorState, input: &str) -> FloorResult<Option<MessageKey>> {
        apply(
            floor,
            &FloorCommand::BuyIn {
                seat: 1,
                input: input.into(),
            },
            at(1),
        )
    }

    #[test]
    fn buy_in_total_is_capped_without_changing_state() {
        let mut floor = running_floor();
        buy_in(&mut floor, "999999999").unwrap();
        let before = floor.clone();

        assert_eq!(
            buy_in(&mut floor, "2"),
            Err(FloorError::InvalidBuyIn("2".into()))
        );
        assert_eq!(
            buy_in(&mut floor, "1e308"),
            Err(FloorError::InvalidBuyIn("1e308".into()))
        );
        assert_eq!(
            buy_in(&mut floor, "79228162514264337593543950335"),
            Err(FloorError::InvalidBuyIn("79228162514264337593543950335".into()))
        );
        assert_eq!(floor, before);

        buy_in(&mut floor, "1").unwrap();
        assert_eq!(floor.current_table().seat(1).unwrap().buy_in, MAX_BUY_IN_TOTAL);
    }

    #[test]
    fn buy_in_amounts_are_exact_to_the_cent() {
        let mut floor = running_floor();
        for _ in 0..10 {
            buy_in(&mut floor, "0.1").unwrap();
        }
        assert_eq!(floor.current_table().seat(1).unwrap().buy_in, Decimal::ONE);

        buy_in(&mut floor, "0.005").unwrap();
        assert_eq!(floor.current_table().seat(1).unwrap().buy_in, Decimal::new(101, 2));
        assert_eq!(
            buy_in(&mut floor, "0.004"),
            Err(FloorError::InvalidBuyIn("0.004".into()))
        );
    }

    #[test]
    fn batch_sit_without_selection_is_a_no_op() {
        let mut floor = running_floor();
        let before = floor.clone();
        apply(&mut floor, &FloorCommand::BatchSit, at(1)).unwrap();
        assert_eq!(floor, before);
    }

    #[test]
    fn batch_sit_touches_only_selected_seats() {
        let mut floor = running_floor();
        apply(&mut floor, &FloorCommand::ToggleSelection { seat: 3 }, at(1)).unwrap();
        apply(&mut floor, &FloorCommand::ToggleSelection { seat: 5 }, at(1)).unwrap();
        apply(&mut floor, &FloorCommand::BatchSit, at(2)).unwrap();

        let table = floor.current_table();
        for seat in &table.seats {
            if seat.number == 3 || seat.number == 5 {
                assert_eq!(seat.status, SeatStatus::Seated);
                assert_eq!(seat.join_count, 1);
            } else {
                assert_eq!(seat.status, SeatStatus::Idle);
                assert_eq!(seat.join_count, 0);
            }
        }
    }

    #[test]
    fn batch_leave_idles_and_clears_selection() {
        let mut floor = running_floor();
        for seat in [1, 2, 7] {
            apply(&mut floor, &FloorCommand::Sit { seat }, at(1)).unwrap();
        }
        apply(&mut floor, &FloorCommand::ToggleSelection { seat: 1 }, at(2)).unwrap();
        apply(&mut floor, &FloorCommand::ToggleSelection { seat: 7 }, at(2)).unwrap();
        apply(&mut floor, &FloorCommand::BatchLeave, at(3)).unwrap();

        let table = floor.current_table();
        assert_eq!(table.seat(1).unwrap().status, SeatStatus::Idle);
        assert_eq!(table.seat(2).unwrap().status, SeatStatus::Seated);
        assert_eq!(table.seat(7).unwrap().status, SeatStatus::Idle);
        assert!(table.selected_seats().is_empty());
        assert_eq!(table.seat(1).unwrap().active_secs(), 2);
    }

    #[test]
    fn leave_works_on_a_stopped_table() {
        let mut floor = running_floor();
        apply(&mut floor, &FloorCommand::Sit { seat: 4 }, at(1)).unwrap();
        apply(&mut floor, &FloorCommand::PauseTable, at(2)).unwrap();
        apply(&mut floor, &FloorCommand::Leave { seat: 4 }, at(100)).unwrap();

        let seat = floor.current_table().seat(4).unwrap();
        assert_eq!(seat.status, SeatStatus::Idle);
        assert_eq!(seat.active_secs(), 1);
    }

    #[test]
    fn unknown_seat_is_rejected() {
        let mut floor = running_floor();
        let err = apply(&mut floor, &FloorCommand::Sit { seat: 10 }, at(1)).unwrap_err();
        assert_eq!(err, FloorError::UnknownSeat(10));
        let err = apply(&mut floor, &FloorCommand::ToggleSelection { seat: 0 }, at(1)).unwrap_err();
        assert_eq!(err, FloorError::UnknownSeat(0));
    }

    #[test]
    fn commands_target_the_selected_table() {
        let mut floor = FloorState::default();
        apply(&mut floor, &FloorCommand::SelectTable { index: 2 }, t0()).unwrap();
        apply(&mut floor, &FloorCommand::StartTable, t0()).unwrap();

        assert!(floor.tables()[2].is_running);
        assert!(!floor.tables()[0].is_running);

        let err = apply(&mut floor, &FloorCommand::SelectTable { index: 9 }, t0()).unwrap_err();
        assert_eq!(err, FloorError::UnknownTable(9));
    }

    #[test]
    fn reset_returns_table_to_zero_state() {
        let mut floor = running_floor();
        apply(&mut floor, &FloorCommand::Sit { seat: 1 }, at(1)).unwrap();
        apply(
            &mut floor,
            &FloorCommand::SetMemberId {
                seat: 1,
                member_id: "A\"1".into(),
            },
            at(1),
        )
        .unwrap();
        floor.tick(at(60));
        apply(&mut floor, &FloorCommand::CloseTable, at(61)).unwrap();

        let notice = apply(&mut floor, &FloorCommand::ResetTable, at(62)).unwrap();
        assert_eq!(notice, Some(MessageKey::NoticeTableReset));
        assert_eq!(floor.current_table(), &Table::new(1));
    }

    #[test]
    fn language_commands_switch_language() {
        let mut floor = FloorState::default();
        apply(&mut floor, &FloorCommand::ToggleLanguage, t0()).unwrap();
        assert_eq!(floor.language(), Language::Chinese);
        apply(
            &mut floor,
            &FloorCommand::SetLanguage {
                language: Language::English,
            },
            t0(),
        )
        .unwrap();
        assert_eq!(floor.language(), Language::English);
    }
}
