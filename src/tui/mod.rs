//! Terminal dashboard. The loop runs on the calling thread and drives the
//! async controller through the runtime handle; the ticker keeps running on
//! the runtime's workers between redraws.

mod app;
mod ui;

use std::{
    io,
    path::Path,
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;

use crate::{i18n::MessageKey, timer::FloorController};

use app::{App, Intent};

const ENABLE_LOGS: bool = true;

use crate::log_error;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(runtime: &Handle, controller: &FloorController, export_dir: &Path) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    with_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            let mut app = App::new(runtime.block_on(controller.snapshot()));
            run_app(&mut terminal, &mut app, runtime, controller, export_dir)
        },
        restore_terminal,
    )
}

/// Runs `body`, then `restore` whether or not `body` failed. The body's
/// error wins over the restore error.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> Result<()> {
    let raw_mode = disable_raw_mode().context("failed to disable raw mode");
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    raw_mode
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    runtime: &Handle,
    controller: &FloorController,
    export_dir: &Path,
) -> Result<()> {
    loop {
        app.floor = runtime.block_on(controller.snapshot());
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(intent) = app.on_key(key.code) {
                        if !handle_intent(app, intent, runtime, controller, export_dir) {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

/// Carries out one intent. Returns `false` when the operator asked to quit.
fn handle_intent(
    app: &mut App,
    intent: Intent,
    runtime: &Handle,
    controller: &FloorController,
    export_dir: &Path,
) -> bool {
    match intent {
        Intent::Quit => return false,
        Intent::Command(command) => {
            let outcome = runtime.block_on(controller.dispatch(command));
            // Pick up a language switch before rendering the notice.
            app.floor = runtime.block_on(controller.snapshot());
            match outcome {
                Ok(Some(notice)) => app.set_notice(notice),
                Ok(None) => {}
                Err(err) => app.set_message(err.notice(app.language()).to_string()),
            }
        }
        Intent::Export => {
            let language = app.language();
            match runtime.block_on(controller.export_current(export_dir)) {
                Ok(path) => app.set_message(format!(
                    "{} {}",
                    language.label(MessageKey::NoticeExported),
                    path.display()
                )),
                Err(err) => {
                    log_error!("Export failed: {err:?}");
                    app.set_message(format!(
                        "{}: {err}",
                        language.label(MessageKey::NoticeExportFailed)
                    ));
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;

    #[test]
    fn restore_runs_when_setup_fails() {
        let restored = Cell::new(false);
        let result: Result<()> = with_restore(
            || Err(anyhow!("no alternate screen")),
            || {
                restored.set(true);
                Ok(())
            },
        );

        assert!(restored.get());
        assert_eq!(result.unwrap_err().to_string(), "no alternate screen");
    }

    #[test]
    fn body_error_wins_over_restore_error() {
        let result: Result<()> = with_restore(
            || Err(anyhow!("draw failed")),
            || Err(anyhow!("restore failed")),
        );
        assert_eq!(result.unwrap_err().to_string(), "draw failed");

        let result = with_restore(|| Ok(7), || Err(anyhow!("restore failed")));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");
    }
}
