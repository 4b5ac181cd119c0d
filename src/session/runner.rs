//! Session runner
//!
//! Drives a [`GameSession`] from two independent sensor streams and a
//! command channel on a single task. Each notification is handled to
//! completion before the next one is polled, so the session needs no
//! locking.
//!
//! # Architecture
//!
//! - Commands (`Start`, `Reset`, `Stop`) arrive over `tokio::sync::mpsc`
//! - Every handled event publishes a fresh [`SessionView`] over
//!   `tokio::sync::watch`, so the presentation layer always reads the
//!   latest state and never blocks the runner
//! - The position and heading sources are polled with `tokio::select!` and
//!   stop independently: losing the compass never affects position
//!   handling or progress, and vice versa
//! - A heading source that needs permission is asked when the hunt starts

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::devices::heading::{HeadingCapability, HeadingSource, PermissionOutcome};
use crate::devices::position::PositionSource;
use crate::error::GameError;
use crate::session::{GameSession, HeadingStatus, SessionView};

/// Command buffer size for [`SessionRunner::spawn`]
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Commands from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Begin the hunt (idempotent)
    Start,
    /// Discard progress and return to the start screen
    Reset,
    /// Stop both sources and end the runner
    Stop,
}

/// Async driver for a [`GameSession`]
pub struct SessionRunner<P, H> {
    session: GameSession,
    position: P,
    heading: H,
    position_active: bool,
    heading_active: bool,
}

impl<P, H> SessionRunner<P, H>
where
    P: PositionSource,
    H: HeadingSource,
{
    /// Wrap a session and its sources; nothing is started until [`run`](Self::run)
    pub fn new(session: GameSession, position: P, heading: H) -> Self {
        Self {
            session,
            position,
            heading,
            position_active: false,
            heading_active: false,
        }
    }

    /// Run on a new tokio task and return a handle for commands and views
    pub fn spawn(self) -> SessionHandle
    where
        P: 'static,
        H: 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (view_tx, view_rx) = watch::channel(self.session.view());
        let task = tokio::spawn(self.run(command_rx, view_tx));
        SessionHandle {
            commands: command_tx,
            views: view_rx,
            task,
        }
    }

    /// Run until `Stop` arrives or the command channel closes.
    ///
    /// Both sources are stopped on exit. Returns the session so callers can
    /// inspect the final state.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        views: watch::Sender<SessionView>,
    ) -> GameSession {
        crate::log_info!(
            position = self.position.name(),
            heading = self.heading.name(),
            "Session: runner starting"
        );

        self.start_position().await;
        self.start_heading().await;
        views.send_replace(self.session.view());

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(SessionCommand::Start) => self.on_start().await,
                    Some(SessionCommand::Reset) => self.session.reset(),
                    Some(SessionCommand::Stop) | None => break,
                },

                result = self.position.next_fix(), if self.position_active => match result {
                    Ok(Some(fix)) => {
                        if let Err(e) = self.session.handle_fix(fix) {
                            crate::log_debug!("Session: fix not applied, {}", e);
                        }
                    }
                    Ok(None) => {
                        crate::log_info!("Session: position stream ended");
                        self.position_active = false;
                    }
                    Err(e) => {
                        self.session.handle_position_error(e);
                        if !e.is_transient() {
                            self.position.stop().await;
                            self.position_active = false;
                        }
                    }
                },

                result = self.heading.next_sample(), if self.heading_active => match result {
                    Ok(Some(sample)) => self.session.handle_heading(sample),
                    Ok(None) => {
                        crate::log_info!("Session: heading stream ended");
                        self.heading_active = false;
                        self.session.set_heading_status(HeadingStatus::Lost);
                    }
                    Err(e) => {
                        crate::log_warn!("Session: {}", GameError::HeadingUnavailable(e));
                        self.heading.stop().await;
                        self.heading_active = false;
                        self.session.set_heading_status(e.into());
                    }
                },
            }

            views.send_replace(self.session.view());
        }

        self.position.stop().await;
        self.heading.stop().await;
        crate::log_info!("Session: runner stopped");
        views.send_replace(self.session.view());
        self.session
    }

    async fn start_position(&mut self) {
        match self.position.start().await {
            Ok(()) => self.position_active = true,
            Err(e) => {
                self.session.handle_position_error(e);
            }
        }
    }

    async fn start_heading(&mut self) {
        match self.heading.capability() {
            HeadingCapability::Available => self.activate_heading().await,
            HeadingCapability::RequiresPermission => {
                crate::log_debug!("Session: heading waits for permission at start");
                self.session.set_heading_status(HeadingStatus::Pending);
            }
            HeadingCapability::Unsupported => {
                crate::log_info!("Session: no compass, guidance is north-up");
                self.session.set_heading_status(HeadingStatus::Unsupported);
            }
        }
    }

    async fn activate_heading(&mut self) {
        match self.heading.start().await {
            Ok(()) => {
                self.heading_active = true;
                self.session.set_heading_status(HeadingStatus::Active);
            }
            Err(e) => {
                crate::log_warn!("Session: {}", GameError::HeadingUnavailable(e));
                self.session.set_heading_status(e.into());
            }
        }
    }

    async fn on_start(&mut self) {
        let needs_prompt = self.heading.capability() == HeadingCapability::RequiresPermission
            && self.session.heading_status() == HeadingStatus::Pending;
        if needs_prompt {
            match self.heading.request_permission().await {
                PermissionOutcome::Granted => self.activate_heading().await,
                PermissionOutcome::Denied => {
                    crate::log_info!("Session: compass permission denied, guidance is north-up");
                    self.session.set_heading_status(HeadingStatus::Denied);
                }
            }
        }
        // Playable on distance alone, whatever the compass answer
        self.session.start();
    }
}

/// Handle to a spawned [`SessionRunner`]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    views: watch::Receiver<SessionView>,
    task: JoinHandle<GameSession>,
}

impl SessionHandle {
    /// Send a command to the runner
    pub async fn send(&self, command: SessionCommand) -> Result<(), GameError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| GameError::SessionClosed)
    }

    /// Begin the hunt
    pub async fn start(&self) -> Result<(), GameError> {
        self.send(SessionCommand::Start).await
    }

    /// Discard progress
    pub async fn reset(&self) -> Result<(), GameError> {
        self.send(SessionCommand::Reset).await
    }

    /// Receiver for published views
    pub fn views(&self) -> watch::Receiver<SessionView> {
        self.views.clone()
    }

    /// Latest published view
    pub fn latest(&self) -> SessionView {
        self.views.borrow().clone()
    }

    /// Stop the runner and return the final session
    pub async fn stop(self) -> Result<GameSession, GameError> {
        // Runner may already be gone; the join below reports that
        let _ = self.commands.send(SessionCommand::Stop).await;
        self.task.await.map_err(|_| GameError::SessionClosed)
    }
}
