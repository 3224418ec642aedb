//! Desktop capture backend driving an `ffmpeg` child process.
//!
//! Acquisition resolves the microphone through CPAL and the camera through the
//! platform's device naming, and checks that `ffmpeg` can be launched. The
//! recorder runs `ffmpeg` with the platform capture demuxer and streams a WebM
//! container on stdout; each stdout read becomes one `DataAvailable` chunk.

use crate::{
    CoreResult, RecorderError,
    media::{
        CaptureConstraints, MediaBackend, MediaRecorder, MediaStream, MediaTrack,
        RecorderEventSender, TrackKind,
    },
};

use std::{panic::Location, path::PathBuf, process::Stdio, time::Duration};

use cpal::traits::{DeviceTrait, HostTrait};
use error_location::ErrorLocation;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::Command,
    sync::oneshot,
};
use tracing::{debug, error, info, instrument, warn};

/// Container emitted by [`FfmpegRecorder`].
pub const WEBM_MIME_TYPE: &str = "video/webm";

/// Upper bound of a single `DataAvailable` chunk.
pub(crate) const READ_CHUNK_BYTES: usize = 64 * 1024;

/// How long ffmpeg gets to flush the container after `q` before it is killed.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Where to find ffmpeg and which devices to open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FfmpegSettings {
    /// ffmpeg executable. `None` resolves `ffmpeg` from `PATH`.
    pub ffmpeg_path: Option<PathBuf>,
    /// Microphone name as reported by the audio host. `None` = default input.
    pub audio_device: Option<String>,
    /// Camera name or path. `None` = platform default.
    pub video_device: Option<String>,
}

impl FfmpegSettings {
    fn program(&self) -> PathBuf {
        self.ffmpeg_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg"))
    }
}

/// [`MediaBackend`] for desktop platforms.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend {
    settings: FfmpegSettings,
}

impl FfmpegBackend {
    /// Creates a backend with the given device settings.
    pub fn new(settings: FfmpegSettings) -> Self {
        Self { settings }
    }

    async fn probe_ffmpeg(&self) -> CoreResult<()> {
        let program = self.settings.program();

        let status = Command::new(&program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| RecorderError::AcquisitionFailed {
                reason: format!("Failed to launch {}: {}", program.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if !status.success() {
            return Err(RecorderError::AcquisitionFailed {
                reason: format!("{} -version exited with {}", program.display(), status),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    async fn resolve_microphone(&self) -> CoreResult<String> {
        let preferred = self.settings.audio_device.clone();

        // Host enumeration is blocking on every CPAL backend.
        tokio::task::spawn_blocking(move || find_microphone(preferred.as_deref()))
            .await
            .map_err(|e| RecorderError::AcquisitionFailed {
                reason: format!("Microphone lookup task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
    }

    async fn resolve_camera(&self) -> CoreResult<String> {
        let device = match (&self.settings.video_device, default_camera()) {
            (Some(configured), _) => configured.clone(),
            (None, Some(default)) => default.to_string(),
            (None, None) => {
                return Err(RecorderError::NoCameraFound {
                    device: "default".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if cfg!(target_os = "linux") {
            let exists = tokio::fs::try_exists(&device).await.unwrap_or(false);
            if !exists {
                return Err(RecorderError::NoCameraFound {
                    device,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(device)
    }
}

fn find_microphone(preferred: Option<&str>) -> CoreResult<String> {
    let host = cpal::default_host();

    let device = match preferred {
        Some(wanted) => host
            .input_devices()
            .map_err(|e| RecorderError::AcquisitionFailed {
                reason: format!("Failed to enumerate input devices: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .find(|device| device_name(device).as_deref() == Some(wanted)),
        None => host.default_input_device(),
    }
    .ok_or_else(|| RecorderError::NoMicrophoneFound {
        location: ErrorLocation::from(Location::caller()),
    })?;

    let name = device_name(&device).ok_or_else(|| RecorderError::NoMicrophoneFound {
        location: ErrorLocation::from(Location::caller()),
    })?;

    debug!(device_id = ?device.id(), name = %name, "Microphone resolved");

    Ok(name)
}

#[allow(deprecated)]
fn device_name(device: &cpal::Device) -> Option<String> {
    device.name().ok()
}

fn default_camera() -> Option<&'static str> {
    if cfg!(target_os = "linux") {
        Some("/dev/video0")
    } else if cfg!(target_os = "macos") {
        Some("0")
    } else {
        // dshow has no default alias; the camera must be named in the config.
        None
    }
}

impl MediaBackend for FfmpegBackend {
    type Stream = FfmpegStream;
    type Recorder = FfmpegRecorder;

    #[instrument(skip(self))]
    async fn acquire(&self, constraints: CaptureConstraints) -> CoreResult<FfmpegStream> {
        if !constraints.audio && !constraints.video {
            return Err(RecorderError::AcquisitionFailed {
                reason: "Neither audio nor video was requested".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.probe_ffmpeg().await?;

        let mut tracks = Vec::with_capacity(2);
        if constraints.audio {
            tracks.push(MediaTrack::new(
                TrackKind::Audio,
                self.resolve_microphone().await?,
            ));
        }
        if constraints.video {
            tracks.push(MediaTrack::new(TrackKind::Video, self.resolve_camera().await?));
        }

        info!(
            tracks = ?tracks.iter().map(MediaTrack::label).collect::<Vec<_>>(),
            "Capture devices acquired"
        );

        Ok(FfmpegStream { tracks })
    }

    #[track_caller]
    fn create_recorder(
        &self,
        stream: &FfmpegStream,
        events: RecorderEventSender,
    ) -> CoreResult<FfmpegRecorder> {
        if stream.tracks.iter().all(|track| !track.is_live()) {
            return Err(RecorderError::RecorderFailed {
                reason: "Stream has no live tracks".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let audio = live_label(&stream.tracks, TrackKind::Audio);
        let video = live_label(&stream.tracks, TrackKind::Video);

        Ok(FfmpegRecorder {
            program: self.settings.program(),
            args: capture_args(audio, video),
            events,
            stop_tx: None,
        })
    }
}

fn live_label(tracks: &[MediaTrack], kind: TrackKind) -> Option<&str> {
    tracks
        .iter()
        .find(|track| track.kind() == kind && track.is_live())
        .map(MediaTrack::label)
}

/// Builds the ffmpeg command line for the current platform.
pub(crate) fn capture_args(audio: Option<&str>, video: Option<&str>) -> Vec<String> {
    let mut args: Vec<String> = ["-hide_banner", "-loglevel", "error", "-nostats"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    args.extend(input_args(audio, video));

    if video.is_some() {
        args.extend(
            [
                "-c:v", "libvpx", "-deadline", "realtime", "-cpu-used", "8", "-b:v", "1M",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
    }
    if audio.is_some() {
        args.extend(["-c:a", "libopus"].iter().map(|s| s.to_string()));
    }

    args.extend(["-f", "webm", "pipe:1"].iter().map(|s| s.to_string()));
    args
}

#[cfg(target_os = "linux")]
fn input_args(audio: Option<&str>, video: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(video) = video {
        args.extend(["-f".to_string(), "v4l2".to_string(), "-i".to_string(), video.to_string()]);
    }
    if let Some(audio) = audio {
        args.extend(["-f".to_string(), "alsa".to_string(), "-i".to_string(), audio.to_string()]);
    }
    args
}

#[cfg(target_os = "macos")]
fn input_args(audio: Option<&str>, video: Option<&str>) -> Vec<String> {
    vec![
        "-f".to_string(),
        "avfoundation".to_string(),
        "-i".to_string(),
        format!("{}:{}", video.unwrap_or("none"), audio.unwrap_or("none")),
    ]
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn input_args(audio: Option<&str>, video: Option<&str>) -> Vec<String> {
    let input = match (video, audio) {
        (Some(v), Some(a)) => format!("video={}:audio={}", v, a),
        (Some(v), None) => format!("video={}", v),
        (None, Some(a)) => format!("audio={}", a),
        (None, None) => String::new(),
    };
    vec!["-f".to_string(), "dshow".to_string(), "-i".to_string(), input]
}

/// Acquired microphone and camera.
#[derive(Debug)]
pub struct FfmpegStream {
    tracks: Vec<MediaTrack>,
}

impl FfmpegStream {
    #[cfg(test)]
    pub(crate) fn with_tracks(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }
}

impl MediaStream for FfmpegStream {
    fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    fn stop_tracks(&mut self) {
        for track in self.tracks.iter_mut().filter(|t| t.is_live()) {
            track.stop();
            debug!(kind = %track.kind(), label = track.label(), "Track stopped");
        }
    }
}

/// Recorder backed by an `ffmpeg` child process.
#[derive(Debug)]
pub struct FfmpegRecorder {
    program: PathBuf,
    args: Vec<String>,
    events: RecorderEventSender,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl FfmpegRecorder {
    /// Command line passed to ffmpeg.
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl MediaRecorder for FfmpegRecorder {
    fn mime_type(&self) -> &str {
        WEBM_MIME_TYPE
    }

    #[track_caller]
    #[instrument(skip(self), fields(recording_id = %self.events.recording_id()))]
    fn start(&mut self) -> CoreResult<()> {
        if self.stop_tx.is_some() {
            return Ok(());
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RecorderError::RecorderFailed {
                reason: format!("Failed to spawn {}: {}", self.program.display(), e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut stdout = child.stdout.take().ok_or_else(|| RecorderError::RecorderFailed {
            reason: "ffmpeg stdout was not captured".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let mut stdin = child.stdin.take();

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut buf = vec![0u8; READ_CHUNK_BYTES];
            let mut stop_requested = false;
            let grace = tokio::time::sleep(Duration::MAX);
            tokio::pin!(grace);

            loop {
                tokio::select! {
                    read = stdout.read(&mut buf) => match read {
                        Ok(0) => break,
                        Ok(n) => events.data_available(buf[..n].to_vec()),
                        Err(e) => {
                            events.failed(format!("Failed to read ffmpeg output: {}", e));
                            break;
                        }
                    },
                    // A dropped sender also lands here, so an abandoned
                    // recorder still shuts ffmpeg down.
                    _ = &mut stop_rx, if !stop_requested => {
                        stop_requested = true;
                        if let Some(mut pipe) = stdin.take() {
                            if let Err(e) = pipe.write_all(b"q").await {
                                warn!(error = %e, "Failed to ask ffmpeg to quit");
                            }
                            let _ = pipe.flush().await;
                        }
                        grace.as_mut().reset(tokio::time::Instant::now() + STOP_GRACE);
                    }
                    _ = &mut grace, if stop_requested => {
                        warn!("ffmpeg did not finish within grace period, killing");
                        if let Err(e) = child.start_kill() {
                            error!(error = %e, "Failed to kill ffmpeg");
                        }
                        grace.as_mut().reset(tokio::time::Instant::now() + Duration::from_secs(3600));
                    }
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => debug!("ffmpeg exited cleanly"),
                Ok(status) => events.failed(format!("ffmpeg exited with {}", status)),
                Err(e) => events.failed(format!("Failed to wait for ffmpeg: {}", e)),
            }

            events.stopped();
        });

        self.stop_tx = Some(stop_tx);
        info!(program = %self.program.display(), "ffmpeg recorder started");

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}
