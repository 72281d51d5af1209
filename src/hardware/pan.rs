//! Pan servo control over Linux sysfs PWM.
//!
//! The eye mechanism is a hobby servo on a single PWM channel. Commands are
//! duty-cycle-equivalent positions: the useful sweep sits roughly between
//! 5.0 and 10.0 percent duty at a 100 Hz period, and 0.0 stops the pulses
//! entirely so the servo relaxes at neutral. No feedback is read back.
//!
//! One calibration is canonical and lives in [`EyesSettings`]; the driver
//! below has no second variant.

use std::fs;
use std::path::PathBuf;

use crate::config::EyesSettings;
use crate::hardware::HardwareError;

// ---------------------------------------------------------------------------
// PanActuator
// ---------------------------------------------------------------------------

/// Commands the pan mechanism to an absolute position.
pub trait PanActuator: Send {
    /// Move to `duty_percent` (duty-cycle-equivalent units). Values outside
    /// `0.0..=100.0` are clamped.
    fn set_position(&mut self, duty_percent: f32) -> Result<(), HardwareError>;
}

// ---------------------------------------------------------------------------
// SysfsPanServo
// ---------------------------------------------------------------------------

/// Drives `/sys/class/pwm/pwmchip<N>/pwm<M>`.
pub struct SysfsPanServo {
    duty_path: PathBuf,
    enable_path: PathBuf,
    period_ns: u64,
}

impl SysfsPanServo {
    /// Export the channel if needed, program the period and enable output.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::Unavailable`] when the PWM chip does not
    /// exist on this machine, and I/O errors for everything else.
    pub fn open(settings: &EyesSettings) -> Result<Self, HardwareError> {
        let chip_dir = PathBuf::from(format!("/sys/class/pwm/pwmchip{}", settings.pwm_chip));
        if !chip_dir.exists() {
            return Err(HardwareError::Unavailable(format!(
                "{} not present",
                chip_dir.display()
            )));
        }

        let channel_dir = chip_dir.join(format!("pwm{}", settings.pwm_channel));
        if !channel_dir.exists() {
            fs::write(chip_dir.join("export"), settings.pwm_channel.to_string())?;
        }

        let servo = Self {
            duty_path: channel_dir.join("duty_cycle"),
            enable_path: channel_dir.join("enable"),
            period_ns: settings.pwm_period_ns,
        };

        fs::write(channel_dir.join("period"), settings.pwm_period_ns.to_string())?;
        fs::write(&servo.enable_path, "1")?;
        log::info!(
            "pan servo ready on {} ({} ns period)",
            channel_dir.display(),
            settings.pwm_period_ns
        );
        Ok(servo)
    }
}

impl PanActuator for SysfsPanServo {
    fn set_position(&mut self, duty_percent: f32) -> Result<(), HardwareError> {
        let clamped = duty_percent.clamp(0.0, 100.0);
        let duty_ns = (self.period_ns as f64 * f64::from(clamped) / 100.0) as u64;
        fs::write(&self.duty_path, duty_ns.to_string())?;
        log::trace!("pan duty set to {clamped}% ({duty_ns} ns)");
        Ok(())
    }
}

impl Drop for SysfsPanServo {
    fn drop(&mut self) {
        // Leave the servo unpowered rather than frozen mid-sweep.
        let _ = fs::write(&self.duty_path, "0");
        let _ = fs::write(&self.enable_path, "0");
    }
}

// ---------------------------------------------------------------------------
// DisconnectedPan
// ---------------------------------------------------------------------------

/// Stand-in used when the PWM chip is absent (development machines).
///
/// Every command fails with the reason the real driver could not be opened,
/// so the eye loop logs the condition instead of crashing the process.
pub struct DisconnectedPan {
    reason: String,
}

impl DisconnectedPan {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PanActuator for DisconnectedPan {
    fn set_position(&mut self, _duty_percent: f32) -> Result<(), HardwareError> {
        Err(HardwareError::Unavailable(self.reason.clone()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnected_pan_always_fails() {
        let mut pan = DisconnectedPan::new("no pwm chip");
        assert!(matches!(
            pan.set_position(7.5),
            Err(HardwareError::Unavailable(_))
        ));
    }

    #[test]
    fn actuators_are_boxable() {
        let _pan: Box<dyn PanActuator> = Box::new(DisconnectedPan::new("test"));
    }

    /// Duty conversion covers the full sweep without overflow.
    #[test]
    fn duty_conversion_math() {
        let period_ns = 10_000_000_u64; // 100 Hz
        let duty = |percent: f32| (period_ns as f64 * f64::from(percent) / 100.0) as u64;
        assert_eq!(duty(0.0), 0);
        assert_eq!(duty(7.5), 750_000);
        assert_eq!(duty(100.0), period_ns);
    }
}
