//! System tray icon and menu.
//!
//! Manages the tray icon (Idle, Acquiring, Recording) and a context menu for
//! recording, downloading, the work timer, Settings and Exit.

use crate::{AppCommand, AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use screen_recorder_core::{RecorderCommand, RecorderStatus};
use tracing::{debug, info, instrument};
use tray_icon::{
    Icon, TrayIcon, TrayIconBuilder,
    menu::{Menu, MenuId, MenuItem, PredefinedMenuItem},
};

/// Ids of the actionable menu items. `Send`, unlike the menu itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuIds {
    pub(crate) record: MenuId,
    pub(crate) download: MenuId,
    pub(crate) timer_start: MenuId,
    pub(crate) timer_pause: MenuId,
    pub(crate) timer_reset: MenuId,
    pub(crate) settings: MenuId,
    pub(crate) exit: MenuId,
}

impl MenuIds {
    /// Maps a clicked menu item to a command.
    pub fn command_for(&self, id: &MenuId) -> Option<AppCommand> {
        let command = if *id == self.record {
            AppCommand::Recorder(RecorderCommand::ToggleRecording)
        } else if *id == self.download {
            AppCommand::Recorder(RecorderCommand::Download)
        } else if *id == self.timer_start {
            AppCommand::StartTimer
        } else if *id == self.timer_pause {
            AppCommand::PauseTimer
        } else if *id == self.timer_reset {
            AppCommand::ResetTimer
        } else if *id == self.settings {
            AppCommand::OpenSettings
        } else if *id == self.exit {
            AppCommand::Shutdown
        } else {
            return None;
        };

        Some(command)
    }
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    icon_state: TrayIconState,
    record_item: MenuItem,
    download_item: MenuItem,
    timer_label_item: MenuItem,
    timer_start_item: MenuItem,
    timer_pause_item: MenuItem,
    ids: MenuIds,
}

impl TrayManager {
    /// Create a new tray manager in the idle state.
    #[track_caller]
    #[instrument]
    pub fn new(timer_label: &str) -> AppResult<Self> {
        let menu = Menu::new();

        let record_item = MenuItem::new(TrayIconState::Idle.record_label(), true, None);
        let download_item = MenuItem::new("Download Video", false, None);
        let timer_label_item = MenuItem::new(timer_text(timer_label), false, None);
        let timer_start_item = MenuItem::new("Start Timer", true, None);
        let timer_pause_item = MenuItem::new("Pause Timer", false, None);
        let timer_reset_item = MenuItem::new("Reset Timer", true, None);
        let settings_item = MenuItem::new("Settings", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let ids = MenuIds {
            record: record_item.id().clone(),
            download: download_item.id().clone(),
            timer_start: timer_start_item.id().clone(),
            timer_pause: timer_pause_item.id().clone(),
            timer_reset: timer_reset_item.id().clone(),
            settings: settings_item.id().clone(),
            exit: exit_item.id().clone(),
        };

        menu.append_items(&[
            &record_item,
            &download_item,
            &PredefinedMenuItem::separator(),
            &timer_label_item,
            &timer_start_item,
            &timer_pause_item,
            &timer_reset_item,
            &PredefinedMenuItem::separator(),
            &settings_item,
            &exit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(TrayIconState::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(TrayIconState::Idle.tooltip())
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            icon_state: TrayIconState::Idle,
            record_item,
            download_item,
            timer_label_item,
            timer_start_item,
            timer_pause_item,
            ids,
        })
    }

    /// Render a recorder status: icon, tooltip and recording/download items.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_status(&mut self, status: &RecorderStatus) -> AppResult<()> {
        let state = TrayIconState::from(status.session);

        self.record_item.set_text(state.record_label());
        self.record_item.set_enabled(state.record_enabled());
        self.download_item.set_enabled(status.can_download());

        if state == self.icon_state {
            return Ok(());
        }

        self.tray_icon
            .set_icon(Some(Self::load_icon(state)?))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(state.tooltip()))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.icon_state = state;
        debug!(state = ?state, "Tray icon updated");

        Ok(())
    }

    /// Show the remaining timer and enable start or pause accordingly.
    pub fn update_timer(&mut self, label: &str, running: bool) {
        self.timer_label_item.set_text(timer_text(label));
        self.timer_start_item.set_enabled(!running);
        self.timer_pause_item.set_enabled(running);
    }

    /// Ids of the actionable menu items.
    pub fn menu_ids(&self) -> &MenuIds {
        &self.ids
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Idle => include_bytes!("../resources/icons/idle.png"),
            TrayIconState::Acquiring => include_bytes!("../resources/icons/acquiring.png"),
            TrayIconState::Recording => include_bytes!("../resources/icons/recording.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

fn timer_text(label: &str) -> String {
    format!("Timer {}", label)
}
