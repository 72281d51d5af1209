//! Cooperative shutdown signalling.
//!
//! Every control loop checks a [`ShutdownToken`] at the top of each
//! iteration, so the per-round algorithms never need to know how or when
//! the process ends. In production the token is flipped by Ctrl-C; in tests
//! it bounds otherwise-infinite loops.

use tokio::sync::watch;

/// Create a linked handle/token pair.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownToken { rx })
}

/// Flips all linked tokens to the shut-down state.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cheap-to-clone view of the shutdown state.
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }
}
