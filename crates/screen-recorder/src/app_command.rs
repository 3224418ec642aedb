use screen_recorder_core::RecorderCommand;

/// Commands sent from the hotkey handler and tray menu to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Forward to the recorder controller.
    Recorder(RecorderCommand),
    /// Resume the work timer.
    StartTimer,
    /// Pause the work timer.
    PauseTimer,
    /// Restore the full work interval.
    ResetTimer,
    /// Open the configuration file.
    OpenSettings,
    /// Request application shutdown.
    Shutdown,
}
