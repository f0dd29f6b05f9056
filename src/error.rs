//! Rejections raised by floor commands.
//!
//! A command that fails leaves the floor state untouched. Each variant maps to a
//! localized notice for the operator.

use crate::i18n::{Language, MessageKey};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FloorError {
    #[error("table {0} is not running")]
    TableNotRunning(u8),

    #[error("table {0} is already running")]
    TableAlreadyRunning(u8),

    #[error("invalid buy-in amount: {0:?}")]
    InvalidBuyIn(String),

    #[error("no seat {0} at this table")]
    UnknownSeat(u8),

    #[error("no table at index {0}")]
    UnknownTable(usize),
}

impl FloorError {
    pub fn notice_key(&self) -> MessageKey {
        match self {
            FloorError::TableNotRunning(_) => MessageKey::NoticeTableNotRunning,
            FloorError::TableAlreadyRunning(_) => MessageKey::NoticeTableAlreadyRunning,
            FloorError::InvalidBuyIn(_) => MessageKey::NoticeInvalidBuyIn,
            FloorError::UnknownSeat(_) => MessageKey::NoticeUnknownSeat,
            FloorError::UnknownTable(_) => MessageKey::NoticeUnknownTable,
        }
    }

    pub fn notice(&self, language: Language) -> &'static str {
        language.label(self.notice_key())
    }
}

pub type FloorResult<T> = std::result::Result<T, FloorError>;
