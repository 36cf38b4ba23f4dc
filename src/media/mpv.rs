//! mpv media backend
//!
//! Drives an mpv subprocess over its JSON IPC socket and narrows its
//! event/property firehose down to the `MediaEvent` set the playback adapter
//! consumes. The handle owns the child process, the socket, and the reader
//! task; `shutdown` (or drop) releases all three.

use crate::media::{MediaCommand, MediaError, MediaEvent};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::UnixStream;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Default player binary name
pub const MPV_COMMAND: &str = "mpv";

// Observe ids for the properties backing Progress and Waiting
const OBSERVE_CACHE: u64 = 1;
const OBSERVE_DURATION: u64 = 2;
const OBSERVE_STALLED: u64 = 3;

// =============================================================================
// Handle
// =============================================================================

/// Exclusive handle on one mpv instance.
///
/// Owned by at most one playback view at a time; events flow out through the
/// receiver returned by [`MpvHandle::spawn`], commands flow in via
/// [`MpvHandle::send`].
pub struct MpvHandle {
    child: Child,
    writer: OwnedWriteHalf,
    reader: JoinHandle<()>,
    socket_path: PathBuf,
}

impl MpvHandle {
    /// Spawn mpv idle with an IPC socket and start the event pump.
    ///
    /// The process is detached from the controlling terminal so it cannot
    /// disturb the TUI.
    pub async fn spawn(
        mpv_path: Option<&str>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<MediaEvent>), MediaError> {
        let binary = mpv_path.unwrap_or(MPV_COMMAND).to_string();
        let socket_path =
            std::env::temp_dir().join(format!("animestream-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new(&binary);
        cmd.arg("--idle=yes")
            .arg(format!("--input-ipc-server={}", socket_path.display()))
            .arg("--force-window=immediate")
            .arg("--keep-open=yes")
            .arg("--no-terminal")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // New session: the player must not share the TUI's terminal
        #[cfg(unix)]
        unsafe {
            cmd.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MediaError::PlayerNotFound(binary.clone())
            } else {
                MediaError::StartFailed(e)
            }
        })?;

        let stream = Self::connect(&socket_path).await?;
        let (read_half, mut writer) = stream.into_split();

        // Subscribe to the properties this adapter consumes; everything else
        // mpv exposes stays unobserved.
        for (id, name) in [
            (OBSERVE_CACHE, "demuxer-cache-time"),
            (OBSERVE_DURATION, "duration"),
            (OBSERVE_STALLED, "paused-for-cache"),
        ] {
            write_line(&mut writer, &json!({ "command": ["observe_property", id, name] }))
                .await?;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(async move {
            let mut pump = EventPump::default();
            let mut lines = BufReader::new(read_half).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let Ok(value) = serde_json::from_str::<Value>(&line) else {
                    continue;
                };
                if let Some(event) = pump.map(&value) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Ok((
            Self {
                child,
                writer,
                reader,
                socket_path,
            },
            rx,
        ))
    }

    /// Connect to the IPC socket, retrying while mpv starts up
    async fn connect(path: &Path) -> Result<UnixStream, MediaError> {
        for _ in 0..50 {
            match UnixStream::connect(path).await {
                Ok(stream) => return Ok(stream),
                Err(_) => sleep(Duration::from_millis(100)).await,
            }
        }
        Err(MediaError::SocketUnavailable(path.display().to_string()))
    }

    /// Issue a command to the player
    pub async fn send(&mut self, command: &MediaCommand) -> Result<(), MediaError> {
        write_line(&mut self.writer, &command_json(command)).await
    }

    /// Release the player: quit, kill, detach the reader, drop the socket.
    ///
    /// Called on every unmount path; safe to call on an already-dead player.
    pub async fn shutdown(mut self) {
        let _ = self.send(&MediaCommand::Stop).await;
        let _ = self.child.kill().await;
        self.reader.abort();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

impl Drop for MpvHandle {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
        self.reader.abort();
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn write_line(writer: &mut OwnedWriteHalf, value: &Value) -> Result<(), MediaError> {
    let mut line = value.to_string();
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    Ok(())
}

// =============================================================================
// Command Serialization
// =============================================================================

/// Translate an adapter command into an mpv IPC command line
pub fn command_json(command: &MediaCommand) -> Value {
    match command {
        MediaCommand::Load(uri) => json!({ "command": ["loadfile", uri, "replace"] }),
        MediaCommand::Play => json!({ "command": ["set_property", "pause", false] }),
        MediaCommand::Pause => json!({ "command": ["set_property", "pause", true] }),
        MediaCommand::SeekBy(secs) => json!({ "command": ["seek", secs, "relative"] }),
        MediaCommand::SetRate(rate) => json!({ "command": ["set_property", "speed", rate] }),
        MediaCommand::Stop => json!({ "command": ["quit"] }),
    }
}

// =============================================================================
// Event Pump
// =============================================================================

/// Maps raw mpv IPC messages to `MediaEvent`s.
///
/// Holds the last-seen duration and cache extent so each property change can
/// be reported as a complete Progress pair.
#[derive(Debug, Default)]
pub struct EventPump {
    duration: f64,
    buffered_to: f64,
    /// A file has started and not yet ended; gates cache-resume CanPlay so
    /// the initial observe replies are not mistaken for readiness.
    file_active: bool,
}

impl EventPump {
    pub fn map(&mut self, value: &Value) -> Option<MediaEvent> {
        let event = value.get("event").and_then(Value::as_str)?;
        match event {
            "start-file" => {
                self.file_active = true;
                Some(MediaEvent::LoadStart)
            }
            "file-loaded" | "playback-restart" => Some(MediaEvent::CanPlay),
            "seek" => Some(MediaEvent::Waiting),
            "end-file" => {
                self.file_active = false;
                match value.get("reason").and_then(Value::as_str) {
                    Some("error") => {
                        let detail = value
                            .get("file_error")
                            .and_then(Value::as_str)
                            .unwrap_or("playback failed")
                            .to_string();
                        Some(MediaEvent::Error(detail))
                    }
                    _ => None,
                }
            }
            "property-change" => self.map_property(value),
            // Everything else mpv emits is outside the consumed contract
            _ => None,
        }
    }

    fn map_property(&mut self, value: &Value) -> Option<MediaEvent> {
        let name = value.get("name").and_then(Value::as_str)?;
        match name {
            "demuxer-cache-time" => {
                self.buffered_to = value.get("data").and_then(Value::as_f64)?;
                Some(self.progress())
            }
            "duration" => {
                self.duration = value.get("data").and_then(Value::as_f64)?;
                Some(self.progress())
            }
            "paused-for-cache" => match value.get("data").and_then(Value::as_bool)? {
                true => Some(MediaEvent::Waiting),
                false if self.file_active => Some(MediaEvent::CanPlay),
                false => None,
            },
            _ => None,
        }
    }

    fn progress(&self) -> MediaEvent {
        MediaEvent::Progress {
            buffered_to: self.buffered_to,
            duration: self.duration,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Command Serialization Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_command_json_load() {
        assert_eq!(
            command_json(&MediaCommand::Load("media/eps_1.mp4".into())),
            json!({ "command": ["loadfile", "media/eps_1.mp4", "replace"] })
        );
    }

    #[test]
    fn test_command_json_play_pause() {
        assert_eq!(
            command_json(&MediaCommand::Play),
            json!({ "command": ["set_property", "pause", false] })
        );
        assert_eq!(
            command_json(&MediaCommand::Pause),
            json!({ "command": ["set_property", "pause", true] })
        );
    }

    #[test]
    fn test_command_json_seek_signed() {
        assert_eq!(
            command_json(&MediaCommand::SeekBy(10.0)),
            json!({ "command": ["seek", 10.0, "relative"] })
        );
        assert_eq!(
            command_json(&MediaCommand::SeekBy(-10.0)),
            json!({ "command": ["seek", -10.0, "relative"] })
        );
    }

    #[test]
    fn test_command_json_rate_and_stop() {
        assert_eq!(
            command_json(&MediaCommand::SetRate(1.5)),
            json!({ "command": ["set_property", "speed", 1.5] })
        );
        assert_eq!(command_json(&MediaCommand::Stop), json!({ "command": ["quit"] }));
    }

    // -------------------------------------------------------------------------
    // Event Pump Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_pump_start_file() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({ "event": "start-file" })),
            Some(MediaEvent::LoadStart)
        );
    }

    #[test]
    fn test_pump_data_ready_variants() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({ "event": "file-loaded" })),
            Some(MediaEvent::CanPlay)
        );
        assert_eq!(
            pump.map(&json!({ "event": "playback-restart" })),
            Some(MediaEvent::CanPlay)
        );
    }

    #[test]
    fn test_pump_seek_is_waiting() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({ "event": "seek" })),
            Some(MediaEvent::Waiting)
        );
    }

    #[test]
    fn test_pump_end_file_error() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({ "event": "end-file", "reason": "error", "file_error": "no such file" })),
            Some(MediaEvent::Error("no such file".into()))
        );
    }

    #[test]
    fn test_pump_end_file_error_without_detail() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({ "event": "end-file", "reason": "error" })),
            Some(MediaEvent::Error("playback failed".into()))
        );
    }

    #[test]
    fn test_pump_end_file_eof_ignored() {
        let mut pump = EventPump::default();
        assert_eq!(pump.map(&json!({ "event": "end-file", "reason": "eof" })), None);
    }

    #[test]
    fn test_pump_progress_pairs_cache_and_duration() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 2, "name": "duration", "data": 60.0
            })),
            Some(MediaEvent::Progress {
                buffered_to: 0.0,
                duration: 60.0
            })
        );
        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 1, "name": "demuxer-cache-time", "data": 30.0
            })),
            Some(MediaEvent::Progress {
                buffered_to: 30.0,
                duration: 60.0
            })
        );
    }

    #[test]
    fn test_pump_null_property_data_ignored() {
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 2, "name": "duration", "data": null
            })),
            None
        );
    }

    #[test]
    fn test_pump_stall_and_recovery() {
        let mut pump = EventPump::default();
        pump.map(&json!({ "event": "start-file" }));

        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 3, "name": "paused-for-cache", "data": true
            })),
            Some(MediaEvent::Waiting)
        );
        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 3, "name": "paused-for-cache", "data": false
            })),
            Some(MediaEvent::CanPlay)
        );
    }

    #[test]
    fn test_pump_cache_resume_gated_before_file_start() {
        // The initial observe reply arrives before any load; it must not
        // read as readiness.
        let mut pump = EventPump::default();
        assert_eq!(
            pump.map(&json!({
                "event": "property-change", "id": 3, "name": "paused-for-cache", "data": false
            })),
            None
        );
    }

    #[test]
    fn test_pump_unconsumed_events_ignored() {
        let mut pump = EventPump::default();
        for event in ["tracks-changed", "audio-reconfig", "video-reconfig", "idle"] {
            assert_eq!(pump.map(&json!({ "event": event })), None);
        }
        // Command replies have no "event" key at all
        assert_eq!(pump.map(&json!({ "error": "success", "request_id": 0 })), None);
    }

    // -------------------------------------------------------------------------
    // Spawn Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_spawn_missing_binary_reports_not_found() {
        let result = MpvHandle::spawn(Some("definitely-not-a-real-player")).await;
        match result {
            Err(MediaError::PlayerNotFound(binary)) => {
                assert_eq!(binary, "definitely-not-a-real-player");
            }
            other => panic!("expected PlayerNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
