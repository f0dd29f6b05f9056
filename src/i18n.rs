//! Display labels for the two supported languages.
//!
//! Every [`MessageKey`] is matched exhaustively for each [`Language`], so adding a
//! key without translating it fails to compile.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "en" => Some(Language::English),
            "zh" => Some(Language::Chinese),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Chinese,
            Language::Chinese => Language::English,
        }
    }

    pub fn label(self, key: MessageKey) -> &'static str {
        match self {
            Language::English => english(key),
            Language::Chinese => chinese(key),
        }
    }

    pub fn table_name(self, number: u8) -> String {
        match self {
            Language::English => format!("Table {number}"),
            Language::Chinese => format!("{number}号桌"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    AppTitle,
    LanguageName,

    // Table state
    TableRunning,
    TablePaused,
    TableClosed,
    TableNotOpened,
    OpenedAt,
    ClosedAt,
    SessionDuration,
    SessionDurationSeconds,
    TotalActiveSeconds,

    // Seat columns
    Date,
    Table,
    Seat,
    MemberId,
    Status,
    ActiveSeconds,
    ActiveTime,
    RestSeconds,
    RestTime,
    BuyIn,
    Joins,
    Share,

    // Seat status
    StatusIdle,
    StatusSeated,
    StatusResting,

    // Notices
    NoticeTableNotRunning,
    NoticeTableAlreadyRunning,
    NoticeInvalidBuyIn,
    NoticeUnknownSeat,
    NoticeUnknownTable,
    NoticeTableStarted,
    NoticeTablePaused,
    NoticeTableClosed,
    NoticeTableReset,
    NoticeExported,
    NoticeExportFailed,

    // Prompts
    ConfirmClose,
    ConfirmReset,
    PromptBuyIn,
    PromptMemberId,

    // Key help
    HelpTables,
    HelpSeats,
    HelpStart,
    HelpPause,
    HelpClose,
    HelpReset,
    HelpSit,
    HelpRest,
    HelpLeave,
    HelpBuyIn,
    HelpMember,
    HelpSelect,
    HelpBatchSit,
    HelpBatchLeave,
    HelpExport,
    HelpLanguage,
    HelpQuit,
}

fn english(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        AppTitle => "Poker Floor Clock",
        LanguageName => "English",

        TableRunning => "Running",
        TablePaused => "Paused",
        TableClosed => "Closed",
        TableNotOpened => "Not opened",
        OpenedAt => "Opened At",
        ClosedAt => "Closed At",
        SessionDuration => "Session Duration",
        SessionDurationSeconds => "Session Duration (s)",
        TotalActiveSeconds => "Total Active (s)",

        Date => "Date",
        Table => "Table",
        Seat => "Seat",
        MemberId => "Member ID",
        Status => "Status",
        ActiveSeconds => "Active (s)",
        ActiveTime => "Active",
        RestSeconds => "Rest (s)",
        RestTime => "Rest",
        BuyIn => "Buy-in",
        Joins => "Joins",
        Share => "Share",

        StatusIdle => "Idle",
        StatusSeated => "Seated",
        StatusResting => "Resting",

        NoticeTableNotRunning => "Start the table first",
        NoticeTableAlreadyRunning => "Table is already running",
        NoticeInvalidBuyIn => "Enter a positive amount",
        NoticeUnknownSeat => "No such seat",
        NoticeUnknownTable => "No such table",
        NoticeTableStarted => "Table started",
        NoticeTablePaused => "Table paused",
        NoticeTableClosed => "Table closed",
        NoticeTableReset => "Table reset",
        NoticeExported => "Exported to",
        NoticeExportFailed => "Export failed",

        ConfirmClose => "Close this table? (y/n)",
        ConfirmReset => "Reset this table and erase its data? (y/n)",
        PromptBuyIn => "Buy-in amount",
        PromptMemberId => "Member ID",

        HelpTables => "Table",
        HelpSeats => "Seat",
        HelpStart => "Start",
        HelpPause => "Pause",
        HelpClose => "Close",
        HelpReset => "Reset",
        HelpSit => "Sit",
        HelpRest => "Rest",
        HelpLeave => "Leave",
        HelpBuyIn => "Buy-in",
        HelpMember => "Member",
        HelpSelect => "Select",
        HelpBatchSit => "Sit all",
        HelpBatchLeave => "Leave all",
        HelpExport => "Export",
        HelpLanguage => "中文",
        HelpQuit => "Quit",
    }
}

fn chinese(key: MessageKey) -> &'static str {
    use MessageKey::*;
    match key {
        AppTitle => "扑克桌计时",
        LanguageName => "中文",

        TableRunning => "进行中",
        TablePaused => "已暂停",
        TableClosed => "已关闭",
        TableNotOpened => "未开桌",
        OpenedAt => "开桌时间",
        ClosedAt => "关桌时间",
        SessionDuration => "开桌时长",
        SessionDurationSeconds => "开桌时长(秒)",
        TotalActiveSeconds => "在座总时长(秒)",

        Date => "日期",
        Table => "桌号",
        Seat => "座位",
        MemberId => "会员编号",
        Status => "状态",
        ActiveSeconds => "在座(秒)",
        ActiveTime => "在座时长",
        RestSeconds => "休息(秒)",
        RestTime => "休息时长",
        BuyIn => "买入",
        Joins => "入座次数",
        Share => "占比",

        StatusIdle => "空位",
        StatusSeated => "在座",
        StatusResting => "休息",

        NoticeTableNotRunning => "请先开桌",
        NoticeTableAlreadyRunning => "该桌已在进行中",
        NoticeInvalidBuyIn => "请输入大于零的金额",
        NoticeUnknownSeat => "座位不存在",
        NoticeUnknownTable => "桌号不存在",
        NoticeTableStarted => "已开桌",
        NoticeTablePaused => "已暂停",
        NoticeTableClosed => "已关桌",
        NoticeTableReset => "已重置",
        NoticeExported => "已导出至",
        NoticeExportFailed => "导出失败",

        ConfirmClose => "确定关闭此桌？(y/n)",
        ConfirmReset => "确定重置此桌并清除数据？(y/n)",
        PromptBuyIn => "买入金额",
        PromptMemberId => "会员编号",

        HelpTables => "切换桌",
        HelpSeats => "选座",
        HelpStart => "开桌",
        HelpPause => "暂停",
        HelpClose => "关桌",
        HelpReset => "重置",
        HelpSit => "入座",
        HelpRest => "休息",
        HelpLeave => "离座",
        HelpBuyIn => "买入",
        HelpMember => "会员",
        HelpSelect => "勾选",
        HelpBatchSit => "批量入座",
        HelpBatchLeave => "批量离座",
        HelpExport => "导出",
        HelpLanguage => "English",
        HelpQuit => "退出",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_parse_back() {
        assert_eq!(Language::parse("en"), Some(Language::English));
        assert_eq!(Language::parse(" zh "), Some(Language::Chinese));
        assert_eq!(Language::parse("fr"), None);
        assert_eq!(Language::parse(Language::Chinese.as_str()), Some(Language::Chinese));
    }

    #[test]
    fn toggling_switches_between_both_languages() {
        assert_eq!(Language::English.toggled(), Language::Chinese);
        assert_eq!(Language::Chinese.toggled(), Language::English);
    }

    #[test]
    fn serde_uses_short_codes() {
        let json = serde_json::to_string(&Language::Chinese).unwrap();
        assert_eq!(json, "\"zh\"");
        let parsed: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Language::English);
    }

    #[test]
    fn table_names_are_localized() {
        assert_eq!(Language::English.table_name(2), "Table 2");
        assert_eq!(Language::Chinese.table_name(2), "2号桌");
        assert_eq!(Language::English.label(MessageKey::StatusSeated), "Seated");
        assert_eq!(Language::Chinese.label(MessageKey::StatusSeated), "在座");
    }
}
