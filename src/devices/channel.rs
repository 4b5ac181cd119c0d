//! Channel-backed sources
//!
//! Bridges push-style platform callbacks (a location watcher, an
//! orientation event listener) into the pull-style source traits. The
//! platform side holds the sender and pushes readings as they arrive; the
//! session pulls them through the trait. Receiving from a
//! `tokio::sync::mpsc` channel is cancel-safe.

use async_trait::async_trait;
use tokio::sync::mpsc;

use ghost_trail_core::sensors::{HeadingSample, PositionFix};

use crate::devices::heading::{
    HeadingCapability, HeadingError, HeadingSource, PermissionOutcome,
};
use crate::devices::position::{PositionError, PositionSource};

/// Producer half of a [`ChannelPositionSource`]
pub type PositionSender = mpsc::Sender<Result<PositionFix, PositionError>>;

/// Producer half of a [`ChannelHeadingSource`]
pub type HeadingSender = mpsc::Sender<Result<HeadingSample, HeadingError>>;

/// Position source fed through an mpsc channel
pub struct ChannelPositionSource {
    name: String,
    rx: mpsc::Receiver<Result<PositionFix, PositionError>>,
    active: bool,
}

impl ChannelPositionSource {
    /// Create a source and the sender that feeds it.
    ///
    /// # Arguments
    ///
    /// * `name` - Name used in logs
    /// * `capacity` - Readings buffered before the producer waits
    pub fn new(name: &str, capacity: usize) -> (Self, PositionSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let source = Self {
            name: name.to_string(),
            rx,
            active: false,
        };
        (source, tx)
    }
}

#[async_trait]
impl PositionSource for ChannelPositionSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self) -> Result<(), PositionError> {
        self.active = true;
        Ok(())
    }

    async fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError> {
        if !self.active {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(Ok(fix)) => Ok(Some(fix)),
            Some(Err(e)) => Err(e),
            None => {
                self.active = false;
                Ok(None)
            }
        }
    }

    async fn stop(&mut self) {
        self.active = false;
        self.rx.close();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Heading source fed through an mpsc channel
pub struct ChannelHeadingSource {
    name: String,
    capability: HeadingCapability,
    prompt_answer: PermissionOutcome,
    granted: bool,
    rx: mpsc::Receiver<Result<HeadingSample, HeadingError>>,
    active: bool,
}

impl ChannelHeadingSource {
    /// Create a source and the sender that feeds it.
    ///
    /// For `RequiresPermission`, `prompt_answer` is what the platform
    /// prompt answers when asked. It is ignored for other capabilities.
    pub fn new(
        name: &str,
        capacity: usize,
        capability: HeadingCapability,
        prompt_answer: PermissionOutcome,
    ) -> (Self, HeadingSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let source = Self {
            name: name.to_string(),
            capability,
            prompt_answer,
            granted: capability == HeadingCapability::Available,
            rx,
            active: false,
        };
        (source, tx)
    }
}

#[async_trait]
impl HeadingSource for ChannelHeadingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn capability(&self) -> HeadingCapability {
        self.capability
    }

    async fn request_permission(&mut self) -> PermissionOutcome {
        match self.capability {
            HeadingCapability::Available => PermissionOutcome::Granted,
            HeadingCapability::RequiresPermission => {
                self.granted = self.prompt_answer == PermissionOutcome::Granted;
                self.prompt_answer
            }
            HeadingCapability::Unsupported => PermissionOutcome::Denied,
        }
    }

    async fn start(&mut self) -> Result<(), HeadingError> {
        if self.capability == HeadingCapability::Unsupported {
            return Err(HeadingError::Unsupported);
        }
        if !self.granted {
            return Err(HeadingError::PermissionDenied);
        }
        self.active = true;
        Ok(())
    }

    async fn next_sample(&mut self) -> Result<Option<HeadingSample>, HeadingError> {
        if !self.active {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(Ok(sample)) => Ok(Some(sample)),
            Some(Err(e)) => Err(e),
            None => {
                self.active = false;
                Ok(None)
            }
        }
    }

    async fn stop(&mut self) {
        self.active = false;
        self.rx.close();
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
