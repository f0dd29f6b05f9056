use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
    i18n::{Language, MessageKey},
    models::Table,
};

use super::format::{format_amount, format_duration, format_share, occupancy_share};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Quotes one field, doubling any embedded quote.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields
        .iter()
        .map(|field| quote(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

fn format_instant<Tz>(instant: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant
        .map(|at| at.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Builds the session report for one table: a summary block, a blank line, and
/// one row per seat. Timestamps are rendered in `tz`.
pub fn render_table_csv<Tz>(table: &Table, language: Language, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let label = |key| language.label(key);
    let table_name = language.table_name(table.number);
    let date = now.with_timezone(tz).format(DATE_FORMAT).to_string();
    let table_active_ms = table.total_active_ms();

    let mut out = String::new();
    push_row(&mut out, &[label(MessageKey::Table), table_name.as_str()]);
    push_row(
        &mut out,
        &[label(MessageKey::OpenedAt).to_string(), format_instant(table.opened_at, tz)],
    );
    push_row(
        &mut out,
        &[label(MessageKey::ClosedAt).to_string(), format_instant(table.closed_at, tz)],
    );
    push_row(
        &mut out,
        &[
            label(MessageKey::SessionDurationSeconds).to_string(),
            table.table_secs().to_string(),
        ],
    );
    push_row(
        &mut out,
        &[
            label(MessageKey::SessionDuration).to_string(),
            format_duration(table.table_secs()),
        ],
    );
    push_row(
        &mut out,
        &[
            label(MessageKey::TotalActiveSeconds).to_string(),
            table.total_active_secs().to_string(),
        ],
    );
    out.push('\n');

    push_row(
        &mut out,
        &[
            label(MessageKey::Date),
            label(MessageKey::Table),
            label(MessageKey::Seat),
            label(MessageKey::MemberId),
            label(MessageKey::Status),
            label(MessageKey::ActiveSeconds),
            label(MessageKey::ActiveTime),
            label(MessageKey::RestSeconds),
            label(MessageKey::BuyIn),
            label(MessageKey::Joins),
            label(MessageKey::Share),
        ],
    );

    for seat in &table.seats {
        push_row(
            &mut out,
            &[
                date.clone(),
                table_name.clone(),
                seat.number.to_string(),
                seat.member_id.clone(),
                label(seat.status.label_key()).to_string(),
                seat.active_secs().to_string(),
                format_duration(seat.active_secs()),
                seat.rest_secs().to_string(),
                format_amount(seat.buy_in),
                seat.join_count.to_string(),
                format_share(occupancy_share(seat.active_ms, table_active_ms)),
            ],
        );
    }

    out
}

/// `PokerSessions_<TableName>_<YYYYMMDD>.csv`, with anything outside
/// alphanumerics, `-` and `_` in the table name replaced by `_`.
pub fn export_file_name<Tz>(table: &Table, language: Language, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let table_name: String = language
        .table_name(table.number)
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stamp = now.with_timezone(tz).format("%Y%m%d");
    format!("PokerSessions_{table_name}_{stamp}.csv")
}

/// Writes the report for `table` into `dir` using local time, returning the
/// file path.
pub fn write_table_csv(dir: &Path, table: &Table, language: Language, now: DateTime<Utc>) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let path = dir.join(export_file_name(table, language, now, &Local));
    let document = render_table_csv(table, language, now, &Local);
    fs::write(&path, document)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    Ok(path)
}
