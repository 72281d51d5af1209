//! Application entry point — robovoice daemon.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`RobotConfig`] from disk (returns default on first run).
//! 3. Resolve the API key (config, then `OPENAI_API_KEY`).
//! 4. Open the microphone (degrades to a stub when unavailable).
//! 5. Build the hosted collaborators and the configured playback path.
//! 6. Open the camera command and the pan servo (servo degrades to a stub).
//! 7. Create the tokio runtime, wire Ctrl-C to the shutdown token and run
//!    the three loops until the token flips.

use std::sync::Arc;
use std::time::Duration;

use robovoice::audio::{AudioChunk, CaptureError, ChunkSource, CpalChunkSource, VoiceRecorder};
use robovoice::chat::ChatApiResponder;
use robovoice::config::{RobotConfig, RobotPaths};
use robovoice::dialogue::ConversationHistory;
use robovoice::dsp::{FilterSpec, NotchChain};
use robovoice::hardware::{CommandCamera, DisconnectedPan, PanActuator, SysfsPanServo};
use robovoice::robot::{shutdown_channel, CameraLoop, EyeLoop, Robot, VoiceLoop};
use robovoice::speech::{
    CpalSink, DirectPlayback, FilteredPlayback, PlaybackPath, SpeechApiSynthesizer, SpeechPlayer,
};
use robovoice::transcribe::WhisperApiTranscriber;

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("robovoice starting up");

    // 2. Configuration
    let config = RobotConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        RobotConfig::default()
    });
    let paths = RobotPaths::new();

    // 3. API key: config first, environment second.
    let api_key = config
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok())
        .unwrap_or_default();
    if api_key.is_empty() {
        log::warn!("no API key configured; collaborator requests will be rejected");
    }

    // 4. Microphone — degrade gracefully so the daemon still launches (and
    //    the camera and eye loops still run) on a machine without one.
    let source: Box<dyn ChunkSource> = match CpalChunkSource::open(&config.capture) {
        Ok(source) => Box::new(source),
        Err(e) => {
            log::warn!("microphone unavailable ({e}); voice loop will report no input");
            Box::new(UnavailableMicrophone)
        }
    };
    let recorder = VoiceRecorder::new(source, config.capture.clone(), paths.recording_file.clone());

    // 5. Hosted collaborators + playback path.
    let transcriber = Arc::new(WhisperApiTranscriber::new(&config.transcribe, &api_key));
    let responder = Arc::new(ChatApiResponder::new(&config.chat, &api_key));
    let synthesizer = Arc::new(SpeechApiSynthesizer::new(&config.speech, &api_key));

    let playback: Box<dyn PlaybackPath> = if config.speech.filtered_playback {
        log::info!("filtered playback enabled");
        Box::new(FilteredPlayback::new(
            CpalSink::new(),
            NotchChain::new(FilterSpec::from(&config.filter)),
            config.filter.window_secs,
        ))
    } else {
        Box::new(DirectPlayback::new(CpalSink::new()))
    };

    let player = SpeechPlayer::new(synthesizer, playback, paths.reply_file.clone());
    let voice = VoiceLoop::new(
        recorder,
        transcriber,
        responder,
        player,
        ConversationHistory::new(config.history.max_turns),
    );

    // 6. Camera and pan servo.
    let camera = CommandCamera::new(&config.camera, paths.snapshot_file.clone())?;
    let camera_loop = CameraLoop::new(
        Box::new(camera),
        Duration::from_secs(config.camera.interval_secs),
    );

    let pan: Box<dyn PanActuator> = match SysfsPanServo::open(&config.eyes) {
        Ok(servo) => Box::new(servo),
        Err(e) => {
            log::warn!("pan servo unavailable ({e}); eye loop will idle");
            Box::new(DisconnectedPan::new(e.to_string()))
        }
    };
    let eye_loop = EyeLoop::new(pan, config.eyes.clone());

    // 7. Run everything until Ctrl-C.
    let robot = Robot::new(voice, camera_loop, eye_loop);
    let (handle, token) = shutdown_channel();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("shutdown requested");
                handle.shutdown();
            }
        });

        robot.run(token).await;
    });

    log::info!("robovoice stopped");
    Ok(())
}

// ---------------------------------------------------------------------------
// UnavailableMicrophone — fallback ChunkSource when no input device exists
// ---------------------------------------------------------------------------

struct UnavailableMicrophone;

impl ChunkSource for UnavailableMicrophone {
    fn record_chunk(&mut self) -> Result<AudioChunk, CaptureError> {
        Err(CaptureError::NoDevice)
    }
}
