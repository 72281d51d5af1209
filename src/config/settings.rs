//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::RobotPaths;

// ---------------------------------------------------------------------------
// CaptureSettings
// ---------------------------------------------------------------------------

/// Settings for microphone capture and end-of-speech detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Recording sample rate in Hz.
    pub sample_rate: u32,
    /// Number of recorded channels (the pipeline is mono end to end).
    pub channels: u16,
    /// Duration of one capture chunk in seconds.
    pub chunk_secs: f32,
    /// Maximum number of chunks per capture cycle; recording stops
    /// unconditionally once this many chunks have been taken.
    pub max_chunks: usize,
    /// A chunk whose mean absolute amplitude falls below the accumulated
    /// average divided by this value ends the capture cycle.
    pub silence_divisor: f64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: 11_025,
            channels: 1,
            chunk_secs: 1.0,
            max_chunks: 5,
            silence_divisor: 3.0,
        }
    }
}

impl CaptureSettings {
    /// Number of samples in one chunk at the configured rate.
    pub fn chunk_samples(&self) -> usize {
        (self.sample_rate as f32 * self.chunk_secs) as usize
    }
}

// ---------------------------------------------------------------------------
// FilterSettings
// ---------------------------------------------------------------------------

/// Settings for the notch-filter chain that gives replies a robotic timbre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Band-stop center frequencies in Hz, applied in order.
    pub center_frequencies: Vec<f32>,
    /// Bandwidth factor `q`: each stop band spans `f - f/q .. f + f/q`.
    pub bandwidth_factor: f32,
    /// Length of one streaming playback window in seconds (filtered path).
    pub window_secs: u32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            center_frequencies: vec![500.0, 1000.0, 2000.0, 3000.0, 4000.0],
            bandwidth_factor: 2.0,
            window_secs: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// TranscribeSettings
// ---------------------------------------------------------------------------

/// Settings for the hosted transcription service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeSettings {
    /// Base URL of the API endpoint (OpenAI-compatible).
    pub base_url: String,
    /// Model identifier sent with the upload (e.g. `"whisper-1"`).
    pub model: String,
    /// Optional ISO-639-1 language hint; `None` lets the service detect.
    pub language: Option<String>,
    /// Maximum seconds to wait for a transcript before timing out.
    pub timeout_secs: u64,
}

impl Default for TranscribeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "whisper-1".into(),
            language: None,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatSettings
// ---------------------------------------------------------------------------

/// Settings for the hosted reply-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Base URL of the API endpoint (OpenAI-compatible).
    pub base_url: String,
    /// Model identifier (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Optional system prompt that sets the robot's persona.
    pub persona: Option<String>,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a reply before timing out.
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
            persona: None,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSettings
// ---------------------------------------------------------------------------

/// Settings for the hosted speech-synthesis service and playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Base URL of the API endpoint (OpenAI-compatible).
    pub base_url: String,
    /// Synthesis model identifier (e.g. `"tts-1-hd"`).
    pub model: String,
    /// Voice name sent to the service.
    pub voice: String,
    /// Playback speed multiplier.
    pub speed: f32,
    /// Route decoded audio through the notch-filter chain in streaming
    /// windows instead of playing it back unmodified.
    pub filtered_playback: bool,
    /// Maximum seconds to wait for synthesized audio before timing out.
    pub timeout_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "tts-1-hd".into(),
            voice: "onyx".into(),
            speed: 1.0,
            filtered_playback: false,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// HistorySettings
// ---------------------------------------------------------------------------

/// Settings for the bounded conversation memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Maximum number of turns kept; the oldest turn is evicted one at a
    /// time once the cap is exceeded.
    pub max_turns: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_turns: 10 }
    }
}

// ---------------------------------------------------------------------------
// CameraSettings
// ---------------------------------------------------------------------------

/// Settings for the periodic still-image loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Capture command; the snapshot path is appended as the last argument.
    pub command: Vec<String>,
    /// Seconds between shots.
    pub interval_secs: u64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            command: vec!["libcamera-still".into(), "-n".into(), "-o".into()],
            interval_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// EyesSettings
// ---------------------------------------------------------------------------

/// Settings for the pan-servo eye loop, including the single canonical
/// PWM calibration for the mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyesSettings {
    /// Discrete target positions in duty-cycle-equivalent units.
    pub presets: Vec<f32>,
    /// Neutral position the servo returns to after each glance.
    /// 0.0 stops the PWM pulses entirely and lets the servo relax.
    pub rest: f32,
    /// Milliseconds to hold a glance before returning to neutral.
    pub hold_ms: u64,
    /// Lower bound of the random pause between glances, in seconds.
    pub min_pause_secs: u64,
    /// Upper bound of the random pause between glances, in seconds.
    pub max_pause_secs: u64,
    /// sysfs PWM chip index.
    pub pwm_chip: u32,
    /// sysfs PWM channel index on that chip.
    pub pwm_channel: u32,
    /// PWM period in nanoseconds (10 ms = 100 Hz).
    pub pwm_period_ns: u64,
}

impl Default for EyesSettings {
    fn default() -> Self {
        Self {
            presets: vec![5.0, 7.5, 10.0],
            rest: 0.0,
            hold_ms: 500,
            min_pause_secs: 1,
            max_pause_secs: 4,
            pwm_chip: 0,
            pwm_channel: 0,
            pwm_period_ns: 10_000_000,
        }
    }
}

// ---------------------------------------------------------------------------
// RobotConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use robovoice::config::RobotConfig;
///
/// // Load (returns Default when file is missing)
/// let config = RobotConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// API key shared by all hosted collaborators. `None` falls back to the
    /// `OPENAI_API_KEY` environment variable at startup.
    pub api_key: Option<String>,
    /// Microphone capture / end-of-speech settings.
    pub capture: CaptureSettings,
    /// Notch-filter chain settings.
    pub filter: FilterSettings,
    /// Transcription service settings.
    pub transcribe: TranscribeSettings,
    /// Reply-generation service settings.
    pub chat: ChatSettings,
    /// Speech-synthesis / playback settings.
    pub speech: SpeechSettings,
    /// Conversation memory settings.
    pub history: HistorySettings,
    /// Still-image loop settings.
    pub camera: CameraSettings,
    /// Pan-servo eye loop settings.
    pub eyes: EyesSettings,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            capture: CaptureSettings::default(),
            filter: FilterSettings::default(),
            transcribe: TranscribeSettings::default(),
            chat: ChatSettings::default(),
            speech: SpeechSettings::default(),
            history: HistorySettings::default(),
            camera: CameraSettings::default(),
            eyes: EyesSettings::default(),
        }
    }
}

impl RobotConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(RobotConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&RobotPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&RobotPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `RobotConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = RobotConfig::default();
        original.save_to(&path).expect("save");

        let loaded = RobotConfig::load_from(&path).expect("load");

        assert_eq!(original.api_key, loaded.api_key);

        // CaptureSettings
        assert_eq!(original.capture.sample_rate, loaded.capture.sample_rate);
        assert_eq!(original.capture.channels, loaded.capture.channels);
        assert_eq!(original.capture.max_chunks, loaded.capture.max_chunks);
        assert_eq!(
            original.capture.silence_divisor,
            loaded.capture.silence_divisor
        );

        // FilterSettings
        assert_eq!(
            original.filter.center_frequencies,
            loaded.filter.center_frequencies
        );
        assert_eq!(
            original.filter.bandwidth_factor,
            loaded.filter.bandwidth_factor
        );

        // Collaborators
        assert_eq!(original.transcribe.model, loaded.transcribe.model);
        assert_eq!(original.chat.base_url, loaded.chat.base_url);
        assert_eq!(original.chat.model, loaded.chat.model);
        assert_eq!(original.speech.voice, loaded.speech.voice);
        assert_eq!(
            original.speech.filtered_playback,
            loaded.speech.filtered_playback
        );

        // Loops
        assert_eq!(original.history.max_turns, loaded.history.max_turns);
        assert_eq!(original.camera.interval_secs, loaded.camera.interval_secs);
        assert_eq!(original.eyes.presets, loaded.eyes.presets);
        assert_eq!(original.eyes.pwm_period_ns, loaded.eyes.pwm_period_ns);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = RobotConfig::load_from(&path).expect("should not error");
        let default = RobotConfig::default();

        assert_eq!(config.capture.sample_rate, default.capture.sample_rate);
        assert_eq!(config.chat.model, default.chat.model);
        assert_eq!(config.history.max_turns, default.history.max_turns);
        assert_eq!(config.eyes.presets, default.eyes.presets);
    }

    /// Verify the hardware-facing defaults the rest of the pipeline assumes.
    #[test]
    fn default_values() {
        let cfg = RobotConfig::default();

        assert_eq!(cfg.capture.sample_rate, 11_025);
        assert_eq!(cfg.capture.channels, 1);
        assert_eq!(cfg.capture.max_chunks, 5);
        assert_eq!(cfg.capture.silence_divisor, 3.0);
        assert_eq!(cfg.capture.chunk_samples(), 11_025);

        assert_eq!(
            cfg.filter.center_frequencies,
            vec![500.0, 1000.0, 2000.0, 3000.0, 4000.0]
        );
        assert_eq!(cfg.filter.bandwidth_factor, 2.0);
        assert_eq!(cfg.filter.window_secs, 4);

        assert_eq!(cfg.history.max_turns, 10);
        assert_eq!(cfg.camera.interval_secs, 5);

        assert_eq!(cfg.eyes.presets, vec![5.0, 7.5, 10.0]);
        assert_eq!(cfg.eyes.rest, 0.0);
        assert_eq!(cfg.eyes.hold_ms, 500);
        assert_eq!(cfg.eyes.min_pause_secs, 1);
        assert_eq!(cfg.eyes.max_pause_secs, 4);
        assert_eq!(cfg.eyes.pwm_period_ns, 10_000_000);

        assert!(!cfg.speech.filtered_playback);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = RobotConfig::default();
        cfg.api_key = Some("sk-test".into());
        cfg.capture.max_chunks = 8;
        cfg.filter.center_frequencies = vec![600.0, 1200.0];
        cfg.transcribe.language = Some("uk".into());
        cfg.chat.persona = Some("You are a grumpy robot.".into());
        cfg.speech.filtered_playback = true;
        cfg.history.max_turns = 20;
        cfg.eyes.presets = vec![4.0, 6.0];

        cfg.save_to(&path).expect("save");
        let loaded = RobotConfig::load_from(&path).expect("load");

        assert_eq!(loaded.api_key, Some("sk-test".into()));
        assert_eq!(loaded.capture.max_chunks, 8);
        assert_eq!(loaded.filter.center_frequencies, vec![600.0, 1200.0]);
        assert_eq!(loaded.transcribe.language, Some("uk".into()));
        assert_eq!(loaded.chat.persona, Some("You are a grumpy robot.".into()));
        assert!(loaded.speech.filtered_playback);
        assert_eq!(loaded.history.max_turns, 20);
        assert_eq!(loaded.eyes.presets, vec![4.0, 6.0]);
    }
}
