//! Loop orchestration.
//!
//! [`Robot::run`] starts the three control loops — voice, camera, eyes — as
//! independent tokio tasks and supervises them for the lifetime of the
//! process. The loops share nothing: each owns its hardware resource
//! exclusively, so there is no locking across them and no ordering between
//! their iterations. A failure (or stall) inside one loop never delays the
//! other two beyond that loop's own blocking call.

pub mod motion;
pub mod shutdown;
pub mod voice;

pub use motion::{CameraLoop, EyeLoop};
pub use shutdown::{shutdown_channel, ShutdownHandle, ShutdownToken};
pub use voice::VoiceLoop;

// ---------------------------------------------------------------------------
// Robot
// ---------------------------------------------------------------------------

/// The three control loops, ready to start.
pub struct Robot {
    voice: VoiceLoop,
    camera: CameraLoop,
    eyes: EyeLoop,
}

impl Robot {
    pub fn new(voice: VoiceLoop, camera: CameraLoop, eyes: EyeLoop) -> Self {
        Self {
            voice,
            camera,
            eyes,
        }
    }

    /// Spawn every loop and wait for all of them to finish.
    ///
    /// The loops only finish once `token` flips; without a shutdown this
    /// runs for the lifetime of the process. A panicking task is logged and
    /// does not take the other loops down with it.
    pub async fn run(self, token: ShutdownToken) {
        let tasks = [
            ("voice", tokio::spawn(self.voice.run(token.clone()))),
            ("camera", tokio::spawn(self.camera.run(token.clone()))),
            ("eyes", tokio::spawn(self.eyes.run(token))),
        ];

        for (name, task) in tasks {
            if let Err(e) = task.await {
                log::error!("{name} loop task failed: {e}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
