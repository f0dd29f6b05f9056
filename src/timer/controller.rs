use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    error::FloorResult,
    export::write_table_csv,
    i18n::MessageKey,
    settings::FloorSettings,
    store::SessionStore,
};

use super::{commands, FloorCommand, FloorState};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

/// Owns the floor state and the background tick that advances it. Commands and
/// ticks each hold the lock for their whole mutation, then queue a save.
#[derive(Clone)]
pub struct FloorController {
    state: Arc<Mutex<FloorState>>,
    store: SessionStore,
    clock: Arc<dyn Clock>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
}

impl FloorController {
    pub fn new(
        state: FloorState,
        store: SessionStore,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            store,
            clock,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
        }
    }

    /// Restores the floor from the store. Tables left running keep counting
    /// across the downtime unless `accrue_downtime` is off.
    pub async fn load(store: SessionStore, clock: Arc<dyn Clock>, settings: &FloorSettings) -> Self {
        let mut state = store
            .load(settings.table_count, settings.default_language)
            .await;

        let now = clock.now();
        for table in state.tables().iter().filter(|table| table.is_running) {
            log_warn!(
                "Table {} was running at last shutdown (session {})",
                table.number,
                table.session_id.as_deref().unwrap_or("-")
            );
        }
        if !settings.accrue_downtime && state.running_count() > 0 {
            log_info!("Discarding downtime for running tables");
            state.resync_all(now);
        }

        Self::new(state, store, clock, settings.tick_interval())
    }

    pub async fn snapshot(&self) -> FloorState {
        self.state.lock().await.clone()
    }

    /// Applies one operator command. Rejected commands change nothing and are
    /// not persisted.
    pub async fn dispatch(&self, command: FloorCommand) -> FloorResult<Option<MessageKey>> {
        let now = self.clock.now();
        let mut guard = self.state.lock().await;
        let outcome = commands::apply(&mut guard, &command, now);

        match &outcome {
            Ok(_) => {
                let table = guard.current_table();
                log_info!(
                    "{} applied to table {} (session {})",
                    command.name(),
                    table.number,
                    table.session_id.as_deref().unwrap_or("-")
                );
                self.store.save_detached(&guard);
            }
            Err(err) => {
                log_warn!("{} rejected: {err}", command.name());
            }
        }

        outcome
    }

    /// Runs one accounting step immediately.
    pub async fn tick(&self) {
        let now = self.clock.now();
        let mut guard = self.state.lock().await;
        guard.tick(now);
        self.store.save_detached(&guard);
    }

    /// Writes the CSV report for the table on screen into `dir`.
    pub async fn export_current(&self, dir: &Path) -> Result<PathBuf> {
        let now = self.clock.now();
        let (table, language) = {
            let guard = self.state.lock().await;
            (guard.current_table().clone(), guard.language())
        };

        let dir = dir.to_path_buf();
        let path = tokio::task::spawn_blocking(move || write_table_csv(&dir, &table, language, now))
            .await
            .context("export task failed to join")??;

        log_info!("Exported session report to {}", path.display());
        Ok(path)
    }

    pub async fn start_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel_token.cancel();
            previous.handle.abort();
        }

        let state = self.state.clone();
        let store = self.store.clone();
        let clock = self.clock.clone();
        let tick_interval = self.tick_interval;
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log_info!("floor ticker shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let mut guard = state.lock().await;
                        guard.tick(clock.now());
                        store.save_detached(&guard);
                    }
                }
            }
        });

        log_info!("floor ticker started ({}ms interval)", tick_interval.as_millis());
        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }

    #[cfg(test)]
    pub async fn is_ticking(&self) -> bool {
        self.ticker.lock().await.is_some()
    }

    /// Stops the ticker, waits for it to exit, then writes a final snapshot.
    /// No tick mutates the floor once this returns.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel_token.cancel();
            if let Err(err) = ticker.handle.await {
                log_error!("floor ticker failed to join: {err}");
            }
        }

        let snapshot = self.snapshot().await;
        self.store
            .save(&snapshot)
            .await
            .context("failed to save floor on shutdown")
    }
}
