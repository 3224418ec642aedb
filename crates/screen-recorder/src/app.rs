use crate::{AppCommand, AppResult, MenuIds, TrayCommand};

use std::{path::PathBuf, sync::Arc, time::Duration};

use screen_recorder_core::{
    Notification, NotificationSink, RecorderCommand, RecorderStatus, TICK_INTERVAL, TimerTick,
    WorkTimer,
};
use tao::event_loop::EventLoopProxy;
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};
use tracing::{debug, error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Main application state.
///
/// Runs on the async runtime thread. Tray updates go back to the main thread
/// through `tray_proxy` because `TrayIcon` is `!Send` and must remain on the
/// UI thread. Recording commands go to the recorder controller's task.
pub struct App {
    pub(crate) tray_proxy: EventLoopProxy<TrayCommand>,
    pub(crate) recorder_tx: mpsc::Sender<RecorderCommand>,
    pub(crate) status_rx: watch::Receiver<RecorderStatus>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) menu_ids: MenuIds,
    pub(crate) timer: WorkTimer,
    pub(crate) sink: Arc<dyn NotificationSink>,
    pub(crate) config_path: PathBuf,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Screen Recorder starting");

        // MenuEvent::receiver() is a blocking crossbeam receiver, so forwarding
        // lives on one blocking task. It exits once tray_event_rx is dropped.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    let Some(command) = self.menu_ids.command_for(&event.id) else {
                        debug!(menu_id = ?event.id, "Unhandled menu event");
                        continue;
                    };
                    if !self.handle_command(command).await {
                        break;
                    }
                }

                Some(command) = self.command_rx.recv() => {
                    if !self.handle_command(command).await {
                        break;
                    }
                }

                changed = self.status_rx.changed() => {
                    if changed.is_err() {
                        warn!("Recorder controller stopped, shutting down");
                        break;
                    }
                    let status = self.status_rx.borrow_and_update().clone();
                    self.send_tray(TrayCommand::SetStatus(status));
                }

                _ = ticker.tick() => {
                    let tick = self.timer.tick();
                    self.apply_timer_tick(tick);
                }
            }
        }

        if let Err(e) = self.recorder_tx.send(RecorderCommand::Shutdown).await {
            debug!(error = %e, "Recorder controller already stopped");
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        info!("Screen Recorder shut down successfully");

        Ok(())
    }

    /// Applies one command. Returns `false` when the app should exit.
    #[instrument(skip(self))]
    async fn handle_command(&mut self, command: AppCommand) -> bool {
        match command {
            AppCommand::Recorder(recorder_command) => {
                if let Err(e) = self.recorder_tx.send(recorder_command).await {
                    error!(error = %e, "Failed to reach recorder controller");
                    return false;
                }
            }
            AppCommand::StartTimer => {
                let tick = self.timer.start();
                self.apply_timer_tick(tick);
            }
            AppCommand::PauseTimer => {
                let tick = self.timer.pause();
                self.apply_timer_tick(tick);
            }
            AppCommand::ResetTimer => {
                let tick = self.timer.reset();
                self.apply_timer_tick(tick);
            }
            AppCommand::OpenSettings => match open::that(&self.config_path) {
                Ok(()) => info!(config_path = ?self.config_path, "Opened settings"),
                Err(e) => error!(error = %e, "Failed to open settings"),
            },
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }

        true
    }

    fn apply_timer_tick(&self, tick: TimerTick) {
        match tick {
            TimerTick::Unchanged => return,
            TimerTick::Elapsed => self.sink.notify(Notification::TimeUp),
            TimerTick::Counting { .. } => {}
        }

        self.send_tray(TrayCommand::SetTimer {
            label: self.timer.display(),
            running: self.timer.is_running(),
        });
    }

    fn send_tray(&self, command: TrayCommand) {
        if let Err(e) = self.tray_proxy.send_event(command) {
            debug!(error = ?e, "Tray event loop closed");
        }
    }
}
