//! Camera and eye loops.
//!
//! Both loops are simple period-driven cycles around one exclusively-owned
//! hardware interface. Hardware calls run on the blocking pool; failures
//! are logged and the loop moves on to its next iteration.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::EyesSettings;
use crate::hardware::{Camera, PanActuator};
use crate::robot::shutdown::ShutdownToken;

// ---------------------------------------------------------------------------
// CameraLoop
// ---------------------------------------------------------------------------

/// Takes a still image on a fixed period.
pub struct CameraLoop {
    /// Taken out while a shot runs on the blocking pool, then put back.
    camera: Option<Box<dyn Camera>>,
    interval: Duration,
}

impl CameraLoop {
    pub fn new(camera: Box<dyn Camera>, interval: Duration) -> Self {
        Self {
            camera: Some(camera),
            interval,
        }
    }

    pub async fn run(mut self, token: ShutdownToken) {
        log::info!("camera loop started ({:?} interval)", self.interval);
        while !token.is_shutdown() {
            self.take_snapshot().await;
            tokio::time::sleep(self.interval).await;
        }
        log::info!("camera loop stopped");
    }

    async fn take_snapshot(&mut self) {
        let Some(mut camera) = self.camera.take() else {
            return;
        };

        match tokio::task::spawn_blocking(move || {
            let result = camera.capture_still();
            (camera, result)
        })
        .await
        {
            Ok((camera, result)) => {
                self.camera = Some(camera);
                if let Err(e) = result {
                    log::warn!("snapshot failed: {e}");
                }
            }
            Err(e) => log::error!("camera task failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// EyeLoop
// ---------------------------------------------------------------------------

/// Glances at a random preset, holds, returns to neutral, pauses.
pub struct EyeLoop {
    /// Taken out while a move runs on the blocking pool, then put back.
    pan: Option<Box<dyn PanActuator>>,
    settings: EyesSettings,
}

impl EyeLoop {
    pub fn new(pan: Box<dyn PanActuator>, settings: EyesSettings) -> Self {
        Self {
            pan: Some(pan),
            settings,
        }
    }

    pub async fn run(mut self, token: ShutdownToken) {
        log::info!("eye loop started ({} presets)", self.settings.presets.len());
        while !token.is_shutdown() {
            // The RNG is not Send; pick everything before the first await.
            let (target, pause_secs) = {
                let mut rng = rand::thread_rng();
                let target = self
                    .settings
                    .presets
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or(self.settings.rest);
                let hi = self.settings.max_pause_secs.max(self.settings.min_pause_secs);
                let pause = rng.gen_range(self.settings.min_pause_secs..=hi);
                (target, pause)
            };

            self.move_to(target).await;
            tokio::time::sleep(Duration::from_millis(self.settings.hold_ms)).await;
            self.move_to(self.settings.rest).await;
            tokio::time::sleep(Duration::from_secs(pause_secs)).await;
        }
        log::info!("eye loop stopped");
    }

    async fn move_to(&mut self, duty_percent: f32) {
        let Some(mut pan) = self.pan.take() else {
            return;
        };

        match tokio::task::spawn_blocking(move || {
            let result = pan.set_position(duty_percent);
            (pan, result)
        })
        .await
        {
            Ok((pan, result)) => {
                self.pan = Some(pan);
                if let Err(e) = result {
                    log::warn!("pan move to {duty_percent} failed: {e}");
                }
            }
            Err(e) => log::error!("pan task failed: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::hardware::HardwareError;
    use crate::robot::shutdown_channel;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct CountingCamera {
        shots: Arc<AtomicUsize>,
    }

    impl Camera for CountingCamera {
        fn capture_still(&mut self) -> Result<(), HardwareError> {
            self.shots.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingCamera {
        shots: Arc<AtomicUsize>,
    }

    impl Camera for FailingCamera {
        fn capture_still(&mut self) -> Result<(), HardwareError> {
            self.shots.fetch_add(1, Ordering::SeqCst);
            Err(HardwareError::Unavailable("no camera".into()))
        }
    }

    struct RecordingPan {
        positions: Arc<Mutex<Vec<f32>>>,
    }

    impl PanActuator for RecordingPan {
        fn set_position(&mut self, duty_percent: f32) -> Result<(), HardwareError> {
            self.positions.lock().unwrap().push(duty_percent);
            Ok(())
        }
    }

    fn fast_eyes() -> EyesSettings {
        EyesSettings {
            hold_ms: 1,
            min_pause_secs: 0,
            max_pause_secs: 0,
            ..EyesSettings::default()
        }
    }

    // -----------------------------------------------------------------------
    // CameraLoop
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn camera_loop_takes_repeated_shots() {
        let shots = Arc::new(AtomicUsize::new(0));
        let camera_loop = CameraLoop::new(
            Box::new(CountingCamera {
                shots: Arc::clone(&shots),
            }),
            Duration::from_millis(5),
        );

        let (handle, token) = shutdown_channel();
        let task = tokio::spawn(camera_loop.run(token));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("camera loop must stop")
            .unwrap();

        assert!(shots.load(Ordering::SeqCst) >= 2);
    }

    /// A camera that fails on every shot must not stop the loop.
    #[tokio::test]
    async fn camera_failures_do_not_stop_the_loop() {
        let shots = Arc::new(AtomicUsize::new(0));
        let camera_loop = CameraLoop::new(
            Box::new(FailingCamera {
                shots: Arc::clone(&shots),
            }),
            Duration::from_millis(5),
        );

        let (handle, token) = shutdown_channel();
        let task = tokio::spawn(camera_loop.run(token));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("camera loop must stop")
            .unwrap();

        assert!(shots.load(Ordering::SeqCst) >= 2, "loop must keep retrying");
    }

    // -----------------------------------------------------------------------
    // EyeLoop
    // -----------------------------------------------------------------------

    /// Every glance is one of the configured presets followed by neutral.
    #[tokio::test]
    async fn eye_loop_alternates_preset_and_rest() {
        let positions = Arc::new(Mutex::new(Vec::new()));
        let settings = fast_eyes();
        let eye_loop = EyeLoop::new(
            Box::new(RecordingPan {
                positions: Arc::clone(&positions),
            }),
            settings.clone(),
        );

        let (handle, token) = shutdown_channel();
        let task = tokio::spawn(eye_loop.run(token));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("eye loop must stop")
            .unwrap();

        let positions = positions.lock().unwrap();
        assert!(positions.len() >= 4, "expected several moves");

        for (i, &p) in positions.iter().enumerate() {
            if i % 2 == 0 {
                assert!(
                    settings.presets.contains(&p),
                    "move {i} went to {p}, not a preset"
                );
            } else {
                assert_eq!(p, settings.rest, "move {i} should return to rest");
            }
        }
    }

    /// A disconnected actuator must not stop the loop.
    #[tokio::test]
    async fn eye_loop_survives_actuator_failures() {
        let eye_loop = EyeLoop::new(
            Box::new(crate::hardware::DisconnectedPan::new("no pwm chip")),
            fast_eyes(),
        );

        let (handle, token) = shutdown_channel();
        let task = tokio::spawn(eye_loop.run(token));

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown();
        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("eye loop must stop")
            .unwrap();
    }
}
