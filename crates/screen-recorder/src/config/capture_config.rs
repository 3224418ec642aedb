use crate::config::{default_capture_audio, default_capture_video};

use std::path::PathBuf;

use screen_recorder_core::{CaptureConstraints, FfmpegSettings};
use serde::{Deserialize, Serialize};

/// Capture device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Record the microphone.
    #[serde(default = "default_capture_audio")]
    pub audio: bool,

    /// Record the camera.
    #[serde(default = "default_capture_video")]
    pub video: bool,

    /// Microphone name (None = default input device).
    #[serde(default)]
    pub audio_device: Option<String>,

    /// Camera name or device path (None = platform default).
    #[serde(default)]
    pub video_device: Option<String>,

    /// ffmpeg executable (None = resolved from PATH).
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            audio: default_capture_audio(),
            video: default_capture_video(),
            audio_device: None,
            video_device: None,
            ffmpeg_path: None,
        }
    }
}

impl CaptureConfig {
    /// Inputs to request on every recording.
    pub fn constraints(&self) -> CaptureConstraints {
        CaptureConstraints {
            audio: self.audio,
            video: self.video,
        }
    }

    /// Backend settings for ffmpeg.
    pub fn ffmpeg_settings(&self) -> FfmpegSettings {
        FfmpegSettings {
            ffmpeg_path: self.ffmpeg_path.clone(),
            audio_device: self.audio_device.clone(),
            video_device: self.video_device.clone(),
        }
    }
}
