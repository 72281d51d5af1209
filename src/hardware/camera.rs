//! Still-image capture.
//!
//! The camera is a success/failure boundary: the orchestrator never consumes
//! the image itself, it only needs to know the shot was taken. The concrete
//! implementation shells out to a platform capture command (e.g.
//! `libcamera-still`) with the snapshot path appended.

use std::path::PathBuf;
use std::process::Command;

use crate::config::CameraSettings;
use crate::hardware::HardwareError;

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// Takes one still image per call.
pub trait Camera: Send {
    fn capture_still(&mut self) -> Result<(), HardwareError>;
}

// ---------------------------------------------------------------------------
// CommandCamera
// ---------------------------------------------------------------------------

/// Spawns a configured capture command, writing to a fixed snapshot path
/// that is overwritten on every shot.
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    snapshot_path: PathBuf,
}

impl CommandCamera {
    /// Build from settings and the snapshot target path.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::NoCommand`] when the configured command is
    /// empty.
    pub fn new(
        settings: &CameraSettings,
        snapshot_path: impl Into<PathBuf>,
    ) -> Result<Self, HardwareError> {
        let mut parts = settings.command.iter();
        let program = parts.next().cloned().ok_or(HardwareError::NoCommand)?;
        Ok(Self {
            program,
            args: parts.cloned().collect(),
            snapshot_path: snapshot_path.into(),
        })
    }
}

impl Camera for CommandCamera {
    fn capture_still(&mut self) -> Result<(), HardwareError> {
        if let Some(parent) = self.snapshot_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.snapshot_path)
            .status()?;

        if !status.success() {
            return Err(HardwareError::CommandFailed(status.to_string()));
        }

        log::debug!("snapshot written to {}", self.snapshot_path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_rejected() {
        let settings = CameraSettings {
            command: vec![],
            interval_secs: 5,
        };
        assert!(matches!(
            CommandCamera::new(&settings, "/tmp/snap.jpg"),
            Err(HardwareError::NoCommand)
        ));
    }

    #[test]
    fn successful_command_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CameraSettings {
            // `true` ignores its arguments and exits 0 — stands in for a
            // capture binary on development machines.
            command: vec!["true".into()],
            interval_secs: 5,
        };
        let mut camera = CommandCamera::new(&settings, dir.path().join("snap.jpg")).unwrap();
        assert!(camera.capture_still().is_ok());
    }

    #[test]
    fn failing_command_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CameraSettings {
            command: vec!["false".into()],
            interval_secs: 5,
        };
        let mut camera = CommandCamera::new(&settings, dir.path().join("snap.jpg")).unwrap();
        assert!(matches!(
            camera.capture_still(),
            Err(HardwareError::CommandFailed(_))
        ));
    }

    #[test]
    fn missing_binary_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CameraSettings {
            command: vec!["robovoice-no-such-binary".into()],
            interval_secs: 5,
        };
        let mut camera = CommandCamera::new(&settings, dir.path().join("snap.jpg")).unwrap();
        assert!(matches!(
            camera.capture_still(),
            Err(HardwareError::Io(_))
        ));
    }
}
