mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod download_config;
mod notification_config;
mod timer_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, download_config::DownloadConfig,
    notification_config::NotificationConfig, timer_config::TimerConfig,
};

use std::path::PathBuf;

use directories::UserDirs;

pub(crate) const DEFAULT_CAPTURE_AUDIO: bool = true;
pub(crate) const DEFAULT_CAPTURE_VIDEO: bool = true;
pub(crate) const DEFAULT_WORK_MINUTES: u64 = 25;
pub(crate) const DEFAULT_DESKTOP_NOTIFICATIONS: bool = true;

pub(crate) fn default_capture_audio() -> bool {
    DEFAULT_CAPTURE_AUDIO
}

pub(crate) fn default_capture_video() -> bool {
    DEFAULT_CAPTURE_VIDEO
}

pub(crate) fn default_work_minutes() -> u64 {
    DEFAULT_WORK_MINUTES
}

pub(crate) fn default_desktop_notifications() -> bool {
    DEFAULT_DESKTOP_NOTIFICATIONS
}

/// The user's Downloads folder, falling back to `~/Downloads`.
pub(crate) fn default_download_directory() -> PathBuf {
    UserDirs::new()
        .map(|dirs| {
            dirs.download_dir()
                .map(|d| d.to_path_buf())
                .unwrap_or_else(|| dirs.home_dir().join("Downloads"))
        })
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}
