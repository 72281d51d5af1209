//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Linux:   ~/.config/robovoice/
//!   macOS:   ~/Library/Application Support/robovoice/
//!
//! Data dir (audio scratch files + camera snapshots):
//!   Linux:   ~/.local/share/robovoice/
//!   macOS:   ~/Library/Application Support/robovoice/
//!
//! The recording and reply files are single well-known paths that get
//! overwritten on every cycle; nothing under the data dir is precious.

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct RobotPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for audio scratch files.
    pub audio_dir: PathBuf,
    /// Most recent finalized microphone recording (WAV, overwritten per cycle).
    pub recording_file: PathBuf,
    /// Most recent synthesized reply (MP3, overwritten per utterance).
    pub reply_file: PathBuf,
    /// Most recent camera snapshot (overwritten per shot).
    pub snapshot_file: PathBuf,
}

impl RobotPaths {
    const APP_NAME: &'static str = "robovoice";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let audio_dir = data_dir.join("audio");
        let recording_file = audio_dir.join("recording.wav");
        let reply_file = audio_dir.join("reply.mp3");
        let snapshot_file = data_dir.join("snapshot.jpg");

        Self {
            config_dir,
            settings_file,
            audio_dir,
            recording_file,
            reply_file,
            snapshot_file,
        }
    }
}

impl Default for RobotPaths {
    fn default() -> Self {
        Self::new()
    }
}
