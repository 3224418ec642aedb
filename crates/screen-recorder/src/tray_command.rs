use screen_recorder_core::RecorderStatus;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Render a new recorder status.
    SetStatus(RecorderStatus),
    /// Update the timer clock and its start/pause items.
    SetTimer {
        /// Remaining time as `MM:SS`.
        label: String,
        /// Whether the countdown is running.
        running: bool,
    },
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
