use chrono::{DateTime, Utc};

use crate::{
    i18n::Language,
    models::{Table, TableStatus},
};

pub const DEFAULT_TABLE_COUNT: usize = 4;

/// Everything the floor tracks: the tables, which one the operator is looking
/// at, and the display language.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorState {
    tables: Vec<Table>,
    current: usize,
    language: Language,
}

impl Default for FloorState {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_COUNT, Language::default())
    }
}

impl FloorState {
    pub fn new(table_count: usize, language: Language) -> Self {
        let count = table_count.clamp(1, u8::MAX as usize) as u8;
        Self {
            tables: (1..=count).map(Table::new).collect(),
            current: 0,
            language,
        }
    }

    /// Rebuilds a floor from stored parts. Returns `None` when the table list
    /// is empty, misnumbered, or holds a malformed table. An out-of-range
    /// index falls back to the first table.
    pub fn from_parts(tables: Vec<Table>, current: usize, language: Language) -> Option<Self> {
        if tables.is_empty() || tables.len() > u8::MAX as usize {
            return None;
        }
        let numbered = tables
            .iter()
            .zip(1u8..)
            .all(|(table, expected)| table.number == expected && table.is_well_formed());
        if !numbered {
            return None;
        }
        let current = if current < tables.len() { current } else { 0 };
        Some(Self {
            tables,
            current,
            language,
        })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn current_table(&self) -> &Table {
        &self.tables[self.current]
    }

    pub(crate) fn current_table_mut(&mut self) -> &mut Table {
        &mut self.tables[self.current]
    }

    /// Returns false when `index` does not name a table.
    pub(crate) fn select(&mut self, index: usize) -> bool {
        if index < self.tables.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// One engine step across the whole floor.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        for table in &mut self.tables {
            table.tick(now);
        }
    }

    /// Re-anchors every table without crediting time.
    pub fn resync_all(&mut self, now: DateTime<Utc>) {
        for table in &mut self.tables {
            table.resync(now);
        }
    }

    pub fn running_count(&self) -> usize {
        self.tables
            .iter()
            .filter(|table| table.status() == TableStatus::Running)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatStatus;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 20, 0, 0).unwrap()
    }

    #[test]
    fn default_floor_has_four_tables() {
        let floor = FloorState::default();
        assert_eq!(floor.tables().len(), 4);
        assert_eq!(floor.current_index(), 0);
        assert_eq!(
            floor.tables().iter().map(|t| t.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn zero_tables_is_clamped_to_one() {
        assert_eq!(FloorState::new(0, Language::English).tables().len(), 1);
    }

    #[test]
    fn tick_only_advances_running_tables() {
        let mut floor = FloorState::default();
        floor.tick(t0());
        floor.current_table_mut().start(t0());
        floor
            .current_table_mut()
            .seat_mut(1)
            .unwrap()
            .enter(SeatStatus::Seated, t0(), true);

        floor.tick(t0() + Duration::seconds(5));

        assert_eq!(floor.tables()[0].table_secs(), 5);
        assert_eq!(floor.tables()[0].seat(1).unwrap().active_secs(), 5);
        assert!(floor.tables()[1..].iter().all(|t| t.table_ms == 0));
        assert_eq!(floor.running_count(), 1);
    }

    #[test]
    fn from_parts_rejects_misnumbered_tables() {
        let tables = vec![Table::new(1), Table::new(3)];
        assert!(FloorState::from_parts(tables, 0, Language::English).is_none());
        assert!(FloorState::from_parts(Vec::new(), 0, Language::English).is_none());
    }

    #[test]
    fn from_parts_clamps_out_of_range_index() {
        let tables = vec![Table::new(1), Table::new(2)];
        let floor = FloorState::from_parts(tables, 7, Language::Chinese).unwrap();
        assert_eq!(floor.current_index(), 0);
        assert_eq!(floor.language(), Language::Chinese);
    }

    #[test]
    fn select_rejects_unknown_index() {
        let mut floor = FloorState::default();
        assert!(floor.select(2));
        assert_eq!(floor.current_table().number, 3);
        assert!(!floor.select(4));
        assert_eq!(floor.current_index(), 2);
    }
}
