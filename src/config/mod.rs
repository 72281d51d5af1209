//! Configuration module for robovoice.
//!
//! Provides `RobotConfig` (top-level settings), sub-configs for each
//! subsystem, `RobotPaths` for cross-platform data directories, and TOML
//! persistence via `RobotConfig::load` / `RobotConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::RobotPaths;
pub use settings::{
    CameraSettings, CaptureSettings, ChatSettings, EyesSettings, FilterSettings, HistorySettings,
    RobotConfig, SpeechSettings, TranscribeSettings,
};
