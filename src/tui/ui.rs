use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table as SeatGrid, TableState, Tabs, Wrap},
    Frame,
};

use crate::{
    export::{format_amount, format_duration, format_duration_ms, format_share, occupancy_share},
    i18n::{Language, MessageKey},
    models::{SeatStatus, Table, TableStatus},
};

use super::app::{App, Confirm, Mode, PromptKind};

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let language = app.language();

    let main_block = Block::default()
        .title(Line::from(vec![
            Span::styled(" ◆ ", Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} ", language.label(MessageKey::AppTitle)),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({}) ", language.label(MessageKey::LanguageName)),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = main_block.inner(area);
    f.render_widget(main_block, area);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .split(inner);

    render_tabs(f, app, chunks[0]);
    render_summary(f, app.floor.current_table(), language, chunks[1]);
    render_seats(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn status_color(status: TableStatus) -> Color {
    match status {
        TableStatus::Running => Color::Green,
        TableStatus::Paused => Color::Yellow,
        TableStatus::Closed => Color::Red,
        TableStatus::NotOpened => Color::DarkGray,
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let language = app.language();
    let titles = app.floor.tables().iter().map(|table| {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(status_color(table.status()))),
            Span::raw(language.table_name(table.number)),
        ])
    });

    let tabs = Tabs::new(titles)
        .select(app.floor.current_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

fn local_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

fn render_summary(f: &mut Frame, table: &Table, language: Language, area: Rect) {
    let label = |key| Span::styled(format!("{}: ", language.label(key)), Style::default().fg(Color::DarkGray));
    let status = table.status();

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", language.table_name(table.number)),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                language.label(status.label_key()),
                Style::default().fg(status_color(status)),
            ),
            Span::styled(
                format!("   {} {}/{}", language.label(MessageKey::StatusSeated), table.seated_count(), table.seats.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::raw(" "),
            label(MessageKey::OpenedAt),
            Span::raw(local_time(table.opened_at)),
            Span::raw("   "),
            label(MessageKey::ClosedAt),
            Span::raw(local_time(table.closed_at)),
        ]),
        Line::from(vec![
            Span::raw(" "),
            label(MessageKey::SessionDuration),
            Span::styled(
                format_duration(table.table_secs()),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            label(MessageKey::TotalActiveSeconds),
            Span::raw(table.total_active_secs().to_string()),
        ]),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn seat_color(status: SeatStatus) -> Color {
    match status {
        SeatStatus::Idle => Color::DarkGray,
        SeatStatus::Seated => Color::Green,
        SeatStatus::Resting => Color::Yellow,
    }
}

fn render_seats(f: &mut Frame, app: &App, area: Rect) {
    let language = app.language();
    let table = app.floor.current_table();
    let table_active_ms = table.total_active_ms();

    let header = Row::new(
        [
            "",
            language.label(MessageKey::Seat),
            language.label(MessageKey::MemberId),
            language.label(MessageKey::Status),
            language.label(MessageKey::ActiveTime),
            language.label(MessageKey::RestTime),
            language.label(MessageKey::BuyIn),
            language.label(MessageKey::Joins),
            language.label(MessageKey::Share),
        ]
        .map(Cell::from),
    )
    .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let rows = table.seats.iter().map(|seat| {
        let marker = if seat.selected { "[x]" } else { "[ ]" };
        Row::new(vec![
            Cell::from(marker),
            Cell::from(seat.number.to_string()),
            Cell::from(seat.member_id.clone()),
            Cell::from(language.label(seat.status.label_key()))
                .style(Style::default().fg(seat_color(seat.status))),
            Cell::from(format_duration_ms(seat.active_ms)),
            Cell::from(format_duration_ms(seat.rest_ms)),
            Cell::from(format_amount(seat.buy_in)),
            Cell::from(seat.join_count.to_string()),
            Cell::from(format_share(occupancy_share(seat.active_ms, table_active_ms))),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(7),
    ];

    let grid = SeatGrid::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(usize::from(app.cursor.saturating_sub(1))));
    f.render_stateful_widget(grid, area, &mut state);
}

fn render_footer(f: &mut Frame, app: &mut App, area: Rect) {
    let language = app.language();
    let message = app.current_message().map(str::to_string);

    let content = match &app.mode {
        Mode::Confirm(confirm) => {
            let key = match confirm {
                Confirm::CloseTable => MessageKey::ConfirmClose,
                Confirm::ResetTable => MessageKey::ConfirmReset,
            };
            Line::from(Span::styled(
                format!(" {}", language.label(key)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        }
        Mode::Prompt(prompt) => {
            let key = match prompt.kind {
                PromptKind::BuyIn => MessageKey::PromptBuyIn,
                PromptKind::MemberId => MessageKey::PromptMemberId,
            };
            Line::from(vec![
                Span::styled(
                    format!(
                        " {} ({} {}): ",
                        language.label(key),
                        language.label(MessageKey::Seat),
                        prompt.seat
                    ),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("{}█", prompt.buffer), Style::default().fg(Color::White)),
            ])
        }
        Mode::Normal => match message {
            Some(msg) => Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Cyan))),
            None => default_footer(language),
        },
    };

    f.render_widget(Paragraph::new(content).wrap(Wrap { trim: true }), area);
}

fn default_footer(language: Language) -> Line<'static> {
    let keys = [
        ("[Tab/←→]", MessageKey::HelpTables),
        ("[↑↓/1-9]", MessageKey::HelpSeats),
        ("[s]", MessageKey::HelpStart),
        ("[p]", MessageKey::HelpPause),
        ("[c]", MessageKey::HelpClose),
        ("[r]", MessageKey::HelpReset),
        ("[Enter]", MessageKey::HelpSit),
        ("[z]", MessageKey::HelpRest),
        ("[l]", MessageKey::HelpLeave),
        ("[b]", MessageKey::HelpBuyIn),
        ("[m]", MessageKey::HelpMember),
        ("[Space]", MessageKey::HelpSelect),
        ("[A]", MessageKey::HelpBatchSit),
        ("[L]", MessageKey::HelpBatchLeave),
        ("[e]", MessageKey::HelpExport),
        ("[g]", MessageKey::HelpLanguage),
        ("[q]", MessageKey::HelpQuit),
    ];

    let spans = keys.into_iter().flat_map(|(key, help)| {
        [
            Span::styled(format!(" {key}"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!(" {} ", language.label(help)), Style::default().fg(Color::Gray)),
        ]
    });
    Line::from(spans.collect::<Vec<_>>())
}
