//! Cloneable handle for talking to the host actor

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::actor::HostActor;
use super::commands::HostCommand;
use super::listener::HostListener;
use super::readout::HostSnapshot;
use super::{PointerEvent, Side};
use crate::config::AppConfig;
use crate::input::geometry::Size;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host actor has stopped")]
    Closed,
}

/// Handle to the host actor
///
/// Cheap to clone. The actor stops when every handle is dropped or
/// [`HostHandle::shutdown`] is called.
#[derive(Clone)]
pub struct HostHandle {
    cmd_tx: mpsc::UnboundedSender<HostCommand>,
}

impl HostHandle {
    pub(super) fn new(cmd_tx: mpsc::UnboundedSender<HostCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Spawn a host on the current runtime
    pub fn spawn(config: &AppConfig, listener: Arc<dyn HostListener>) -> Self {
        HostActor::spawn(config, listener)
    }

    fn send(&self, cmd: HostCommand) -> Result<(), HostError> {
        self.cmd_tx.send(cmd).map_err(|_| HostError::Closed)
    }

    // ========== Fire-and-forget ==========

    /// Feed one pointer sample (screen coordinates)
    pub fn pointer(&self, event: PointerEvent) -> Result<(), HostError> {
        self.send(HostCommand::Pointer(event))
    }

    pub fn set_invert_y_axis(&self, side: Side, invert: bool) -> Result<(), HostError> {
        self.send(HostCommand::SetInvertY { side, invert })
    }

    pub fn resize(&self, size: Size) -> Result<(), HostError> {
        self.send(HostCommand::Resize(size))
    }

    pub fn apply_config(&self, config: AppConfig) -> Result<(), HostError> {
        self.send(HostCommand::ApplyConfig(Box::new(config)))
    }

    /// Ask the actor to stop. Does nothing if it already has.
    pub fn shutdown(&self) {
        let _ = self.send(HostCommand::Shutdown);
    }

    // ========== Queries ==========

    /// State of both sides once every earlier command has been handled
    pub async fn snapshot(&self) -> Result<HostSnapshot, HostError> {
        let (response, rx) = oneshot::channel();
        self.send(HostCommand::Snapshot { response })?;
        rx.await.map_err(|_| HostError::Closed)
    }
}
