use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::{
    i18n::{Language, MessageKey},
    models::SEATS_PER_TABLE,
    timer::{FloorCommand, FloorState},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    CloseTable,
    ResetTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    BuyIn,
    MemberId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub seat: u8,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Confirm(Confirm),
    Prompt(Prompt),
}

/// What the run loop should do in response to a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Command(FloorCommand),
    Export,
    Quit,
}

pub struct App {
    pub floor: FloorState,
    /// Seat number under the cursor, 1..=9.
    pub cursor: u8,
    pub mode: Mode,
    pub message: Option<(String, Instant)>,
}

impl App {
    pub fn new(floor: FloorState) -> Self {
        Self {
            floor,
            cursor: 1,
            mode: Mode::Normal,
            message: None,
        }
    }

    pub fn language(&self) -> Language {
        self.floor.language()
    }

    pub fn set_message(&mut self, msg: String) {
        self.message = Some((msg, Instant::now() + Duration::from_secs(3)));
    }

    pub fn set_notice(&mut self, key: MessageKey) {
        let text = self.language().label(key).to_string();
        self.set_message(text);
    }

    /// Drops the message once it has been on screen long enough.
    pub fn current_message(&mut self) -> Option<&str> {
        if let Some((_, until)) = &self.message {
            if Instant::now() >= *until {
                self.message = None;
            }
        }
        self.message.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn on_key(&mut self, code: KeyCode) -> Option<Intent> {
        match self.mode.clone() {
            Mode::Normal => self.on_normal_key(code),
            Mode::Confirm(confirm) => {
                self.mode = Mode::Normal;
                match code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => Some(Intent::Command(match confirm {
                        Confirm::CloseTable => FloorCommand::CloseTable,
                        Confirm::ResetTable => FloorCommand::ResetTable,
                    })),
                    _ => None,
                }
            }
            Mode::Prompt(prompt) => self.on_prompt_key(prompt, code),
        }
    }

    fn on_normal_key(&mut self, code: KeyCode) -> Option<Intent> {
        let seat = self.cursor;
        let table_count = self.floor.tables().len();
        let current = self.floor.current_index();

        let command = match code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(Intent::Quit),
            KeyCode::Char('e') => return Some(Intent::Export),

            KeyCode::Tab | KeyCode::Right | KeyCode::Char(']') => FloorCommand::SelectTable {
                index: (current + 1) % table_count,
            },
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('[') => FloorCommand::SelectTable {
                index: (current + table_count - 1) % table_count,
            },

            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = if seat >= SEATS_PER_TABLE { 1 } else { seat + 1 };
                return None;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = if seat <= 1 { SEATS_PER_TABLE } else { seat - 1 };
                return None;
            }
            KeyCode::Char(digit @ '1'..='9') => {
                self.cursor = digit as u8 - b'0';
                return None;
            }

            KeyCode::Char('s') => FloorCommand::StartTable,
            KeyCode::Char('p') => FloorCommand::PauseTable,
            KeyCode::Char('c') => {
                self.mode = Mode::Confirm(Confirm::CloseTable);
                return None;
            }
            KeyCode::Char('r') => {
                self.mode = Mode::Confirm(Confirm::ResetTable);
                return None;
            }

            KeyCode::Enter | KeyCode::Char('a') => FloorCommand::Sit { seat },
            KeyCode::Char('z') => FloorCommand::Rest { seat },
            KeyCode::Char('l') => FloorCommand::Leave { seat },
            KeyCode::Char(' ') => FloorCommand::ToggleSelection { seat },
            KeyCode::Char('A') => FloorCommand::BatchSit,
            KeyCode::Char('L') => FloorCommand::BatchLeave,
            KeyCode::Char('g') => FloorCommand::ToggleLanguage,

            KeyCode::Char('b') => {
                self.mode = Mode::Prompt(Prompt {
                    kind: PromptKind::BuyIn,
                    seat,
                    buffer: String::new(),
                });
                return None;
            }
            KeyCode::Char('m') => {
                let buffer = self
                    .floor
                    .current_table()
                    .seat(seat)
                    .map(|s| s.member_id.clone())
                    .unwrap_or_default();
                self.mode = Mode::Prompt(Prompt {
                    kind: PromptKind::MemberId,
                    seat,
                    buffer,
                });
                return None;
            }
            _ => return None,
        };

        Some(Intent::Command(command))
    }

    fn on_prompt_key(&mut self, mut prompt: Prompt, code: KeyCode) -> Option<Intent> {
        match code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                None
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let command = match prompt.kind {
                    PromptKind::BuyIn => FloorCommand::BuyIn {
                        seat: prompt.seat,
                        input: prompt.buffer,
                    },
                    PromptKind::MemberId => FloorCommand::SetMemberId {
                        seat: prompt.seat,
                        member_id: prompt.buffer,
                    },
                };
                Some(Intent::Command(command))
            }
            KeyCode::Backspace => {
                prompt.buffer.pop();
                self.mode = Mode::Prompt(prompt);
                None
            }
            KeyCode::Char(c) => {
                prompt.buffer.push(c);
                self.mode = Mode::Prompt(prompt);
                None
            }
            _ => {
                self.mode = Mode::Prompt(prompt);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(FloorState::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            assert_eq!(app.on_key(KeyCode::Char(c)), None);
        }
    }

    #[test]
    fn cursor_wraps_around_the_nine_seats() {
        let mut app = app();
        app.on_key(KeyCode::Up);
        assert_eq!(app.cursor, 9);
        app.on_key(KeyCode::Down);
        assert_eq!(app.cursor, 1);
        app.on_key(KeyCode::Char('7'));
        assert_eq!(app.cursor, 7);
    }

    #[test]
    fn table_navigation_wraps() {
        let mut app = app();
        assert_eq!(
            app.on_key(KeyCode::Left),
            Some(Intent::Command(FloorCommand::SelectTable { index: 3 }))
        );
        assert_eq!(
            app.on_key(KeyCode::Tab),
            Some(Intent::Command(FloorCommand::SelectTable { index: 1 }))
        );
    }

    #[test]
    fn destructive_commands_need_confirmation() {
        let mut app = app();
        assert_eq!(app.on_key(KeyCode::Char('r')), None);
        assert_eq!(app.mode, Mode::Confirm(Confirm::ResetTable));
        assert_eq!(app.on_key(KeyCode::Char('n')), None);
        assert_eq!(app.mode, Mode::Normal);

        app.on_key(KeyCode::Char('c'));
        assert_eq!(
            app.on_key(KeyCode::Char('y')),
            Some(Intent::Command(FloorCommand::CloseTable))
        );
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn buy_in_prompt_collects_text_for_the_cursor_seat() {
        let mut app = app();
        app.on_key(KeyCode::Char('4'));
        app.on_key(KeyCode::Char('b'));
        type_text(&mut app, "2500");
        app.on_key(KeyCode::Backspace);

        assert_eq!(
            app.on_key(KeyCode::Enter),
            Some(Intent::Command(FloorCommand::BuyIn {
                seat: 4,
                input: "250".into(),
            }))
        );
    }

    #[test]
    fn prompt_keys_do_not_trigger_commands() {
        let mut app = app();
        app.on_key(KeyCode::Char('m'));
        type_text(&mut app, "sq");
        assert_eq!(app.on_key(KeyCode::Esc), None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn member_prompt_edits_existing_id_verbatim() {
        let mut floor = FloorState::default();
        crate::timer::commands::apply(
            &mut floor,
            &FloorCommand::SetMemberId {
                seat: 1,
                member_id: "M-1".into(),
            },
            chrono::Utc::now(),
        )
        .unwrap();
        let mut app = App::new(floor);
        app.on_key(KeyCode::Char('m'));
        type_text(&mut app, "0 ");

        assert_eq!(
            app.on_key(KeyCode::Enter),
            Some(Intent::Command(FloorCommand::SetMemberId {
                seat: 1,
                member_id: "M-10 ".into(),
            }))
        );
    }

    #[test]
    fn seat_keys_map_to_commands() {
        let mut app = app();
        app.on_key(KeyCode::Char('3'));
        assert_eq!(
            app.on_key(KeyCode::Enter),
            Some(Intent::Command(FloorCommand::Sit { seat: 3 }))
        );
        assert_eq!(
            app.on_key(KeyCode::Char(' ')),
            Some(Intent::Command(FloorCommand::ToggleSelection { seat: 3 }))
        );
        assert_eq!(
            app.on_key(KeyCode::Char('A')),
            Some(Intent::Command(FloorCommand::BatchSit))
        );
        assert_eq!(app.on_key(KeyCode::Char('e')), Some(Intent::Export));
        assert_eq!(app.on_key(KeyCode::Char('q')), Some(Intent::Quit));
    }

    #[test]
    fn notices_use_the_floor_language() {
        let mut app = app();
        app.set_notice(MessageKey::NoticeTableStarted);
        assert_eq!(app.current_message(), Some("Table started"));
    }
}
