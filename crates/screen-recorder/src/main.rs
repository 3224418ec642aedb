//! Screen Recorder: camera + microphone recording from the system tray.

mod app;
mod app_command;
mod config;
mod desktop_notifier;
mod error;
mod hotkey_handler;
mod tray_command;
mod tray_icon_state;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    desktop_notifier::DesktopNotifier,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
    tray_command::TrayCommand,
    tray_icon_state::TrayIconState,
    tray_manager::{MenuIds, TrayManager},
};

use crate::config::Config;

use std::sync::Arc;

use global_hotkey::GlobalHotKeyManager;
use screen_recorder_core::{
    FfmpegBackend, FileDownloadSurface, NotificationSink, RecorderController, WorkTimer,
};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "screen_recorder=debug,screen_recorder_core=debug";

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let config_path = match Config::config_path() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to resolve config path: {:?}", e);
            std::process::exit(1);
        }
    };

    let timer = WorkTimer::new(config.timer.work_duration());

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new(&timer.display()) {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    // Dropping the manager unregisters the hotkey, so it lives in the closure.
    let mut hotkey_manager: Option<GlobalHotKeyManager> = None;
    let mut startup = Some((config, config_path, timer));

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetStatus(status) => {
                    if let Err(e) = tray_manager.update_status(&status) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::SetTimer { label, running } => {
                    tray_manager.update_timer(&label, running);
                }
                TrayCommand::Shutdown => {
                    info!("Exiting event loop");
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let Some((config, config_path, timer)) = startup.take() else {
                    return;
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                // Registered on the main thread - tao's event loop pumps the
                // Windows messages needed for WM_HOTKEY delivery.
                let (manager, hotkey_id) = match HotkeyHandler::register_hotkey() {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Failed to register hotkey: {:?}", e);
                        std::process::exit(1);
                    }
                };
                hotkey_manager = Some(manager);

                let tray_proxy = tray_proxy.clone();
                let menu_ids = tray_manager.menu_ids().clone();

                // Async runtime on its own thread; tray and hotkey manager stay here.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async move {
                        let sink: Arc<dyn NotificationSink> =
                            Arc::new(DesktopNotifier::new(config.notifications.desktop));

                        let controller = RecorderController::new(
                            Arc::new(FfmpegBackend::new(config.capture.ffmpeg_settings())),
                            config.capture.constraints(),
                            Arc::clone(&sink),
                            Arc::new(FileDownloadSurface::new(config.download.directory.clone())),
                        );

                        let (recorder_tx, recorder_rx) = mpsc::channel(32);
                        let (command_tx, command_rx) = mpsc::channel(32);
                        let (shutdown_tx, shutdown_rx) = watch::channel(false);

                        let hotkey_handler = HotkeyHandler::new(hotkey_id, command_tx);

                        let app = App {
                            tray_proxy: tray_proxy.clone(),
                            recorder_tx,
                            status_rx: controller.subscribe(),
                            command_rx,
                            shutdown_tx,
                            menu_ids,
                            timer,
                            sink,
                            config_path,
                        };

                        tokio::join!(
                            controller.run(recorder_rx),
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );

                        let _ = tray_proxy.send_event(TrayCommand::Shutdown);
                    });
                });
            }
            _ => {}
        }

        let _ = &hotkey_manager;
    });
}
