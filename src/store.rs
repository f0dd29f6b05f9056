//! Persisted floor layout on top of the key-value table.
//!
//! Three keys hold the whole floor: the language code, the table collection as
//! JSON, and the index of the table on screen. Anything unreadable falls back
//! to defaults instead of being partially accepted.

use anyhow::{Context, Result};
use log::warn;

use crate::{
    db::Database,
    i18n::Language,
    models::Table,
    timer::FloorState,
};

pub const LANGUAGE_KEY: &str = "language";
pub const TABLES_KEY: &str = "tables";
pub const CURRENT_TABLE_KEY: &str = "currentTable";

#[derive(Clone)]
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Loads the floor, or a fresh one with `table_count` tables when nothing
    /// usable is stored. Read failures are logged, not returned.
    pub async fn load(&self, table_count: usize, default_language: Language) -> FloorState {
        let language = self.read(LANGUAGE_KEY).await;
        let tables = self.read(TABLES_KEY).await;
        let current = self.read(CURRENT_TABLE_KEY).await;
        decode_floor(
            language.as_deref(),
            tables.as_deref(),
            current.as_deref(),
            table_count,
            default_language,
        )
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.db.get_value(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!("Failed to read stored {key}: {err:?}");
                None
            }
        }
    }

    /// Writes the floor and waits for the commit.
    pub async fn save(&self, state: &FloorState) -> Result<()> {
        self.db.put_values(encode_floor(state)?).await
    }

    /// Queues a write of the floor. Failures are logged and dropped; the
    /// in-memory floor stays authoritative.
    pub fn save_detached(&self, state: &FloorState) {
        let result = encode_floor(state).and_then(|entries| self.db.submit_values(entries));
        if let Err(err) = result {
            warn!("Failed to persist floor state: {err:?}");
        }
    }
}

pub fn encode_floor(state: &FloorState) -> Result<Vec<(String, String)>> {
    let tables = serde_json::to_string(state.tables()).context("failed to serialize tables")?;
    Ok(vec![
        (LANGUAGE_KEY.to_string(), state.language().as_str().to_string()),
        (TABLES_KEY.to_string(), tables),
        (CURRENT_TABLE_KEY.to_string(), state.current_index().to_string()),
    ])
}

pub fn decode_floor(
    language: Option<&str>,
    tables: Option<&str>,
    current: Option<&str>,
    table_count: usize,
    default_language: Language,
) -> FloorState {
    let language = match language {
        Some(raw) => Language::parse(raw).unwrap_or_else(|| {
            warn!("Ignoring unknown stored language {raw:?}");
            default_language
        }),
        None => default_language,
    };

    let current = match current {
        Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
            warn!("Ignoring malformed stored table index {raw:?}");
            0
        }),
        None => 0,
    };

    let Some(raw_tables) = tables else {
        return FloorState::new(table_count, language);
    };

    let parsed = match serde_json::from_str::<Vec<Table>>(raw_tables) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("Stored tables are unreadable, starting fresh: {err}");
            return FloorState::new(table_count, language);
        }
    };

    FloorState::from_parts(parsed, current, language).unwrap_or_else(|| {
        warn!("Stored tables are malformed, starting fresh");
        FloorState::new(table_count, language)
    })
}
