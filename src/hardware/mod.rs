//! Hardware interfaces — camera and pan servo.
//!
//! Each physical resource sits behind a trait and is constructed once, then
//! handed to the loop that owns it exclusively. Tests substitute simulated
//! implementations; nothing in the crate reaches for a global handle.

pub mod camera;
pub mod pan;

use thiserror::Error;

pub use camera::{Camera, CommandCamera};
pub use pan::{DisconnectedPan, PanActuator, SysfsPanServo};

/// Errors from camera or actuator hardware.
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("hardware I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// An external capture command exited unsuccessfully.
    #[error("capture command failed with status {0}")]
    CommandFailed(String),

    /// No capture command is configured.
    #[error("capture command is empty")]
    NoCommand,

    /// The device is not present on this machine.
    #[error("hardware unavailable: {0}")]
    Unavailable(String),
}
