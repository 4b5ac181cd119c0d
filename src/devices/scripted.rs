//! Scripted sources
//!
//! Replay a fixed sequence of readings, optionally paced by a delay before
//! each one. Useful for demos, replaying a recorded walk, and tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use ghost_trail_core::sensors::{HeadingSample, PositionFix};

use crate::devices::heading::{
    HeadingCapability, HeadingError, HeadingSource, PermissionOutcome,
};
use crate::devices::position::{PositionError, PositionSource};

/// Position source that replays a script
#[derive(Debug)]
pub struct ScriptedPositionSource {
    script: VecDeque<Result<PositionFix, PositionError>>,
    interval: Option<Duration>,
    next_at: Option<Instant>,
    start_error: Option<PositionError>,
    active: bool,
}

impl ScriptedPositionSource {
    /// Replay `script` without delays
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<PositionFix, PositionError>>,
    {
        Self {
            script: script.into_iter().collect(),
            interval: None,
            next_at: None,
            start_error: None,
            active: false,
        }
    }

    /// Wait `interval` before delivering each entry
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Make `start()` fail, as a denied location prompt would
    pub fn failing_start(mut self, error: PositionError) -> Self {
        self.start_error = Some(error);
        self
    }

    /// Entries not yet delivered
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

#[async_trait]
impl PositionSource for ScriptedPositionSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn start(&mut self) -> Result<(), PositionError> {
        if let Some(e) = self.start_error {
            return Err(e);
        }
        self.active = true;
        Ok(())
    }

    async fn next_fix(&mut self) -> Result<Option<PositionFix>, PositionError> {
        if !self.active || self.script.is_empty() {
            return Ok(None);
        }
        wait_for_entry(self.interval, &mut self.next_at).await;
        match self.script.pop_front() {
            Some(Ok(fix)) => Ok(Some(fix)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn stop(&mut self) {
        self.active = false;
        self.next_at = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Wait out the pacing delay for the next entry.
///
/// The deadline is fixed on the first poll and kept in `next_at` until the
/// wait completes, so a cancelled wait resumes instead of starting over.
async fn wait_for_entry(interval: Option<Duration>, next_at: &mut Option<Instant>) {
    let Some(interval) = interval else {
        return;
    };
    let deadline = *next_at.get_or_insert_with(|| Instant::now() + interval);
    tokio::time::sleep_until(deadline).await;
    *next_at = None;
}

/// Heading source that replays a script
#[derive(Debug)]
pub struct ScriptedHeadingSource {
    script: VecDeque<Result<HeadingSample, HeadingError>>,
    interval: Option<Duration>,
    next_at: Option<Instant>,
    capability: HeadingCapability,
    prompt_answer: PermissionOutcome,
    granted: bool,
    active: bool,
}

impl ScriptedHeadingSource {
    /// Replay `script` from a source that needs no permission
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<HeadingSample, HeadingError>>,
    {
        Self {
            script: script.into_iter().collect(),
            interval: None,
            next_at: None,
            capability: HeadingCapability::Available,
            prompt_answer: PermissionOutcome::Granted,
            granted: true,
            active: false,
        }
    }

    /// Gate the source behind a permission prompt answering `answer`
    pub fn requiring_permission(mut self, answer: PermissionOutcome) -> Self {
        self.capability = HeadingCapability::RequiresPermission;
        self.prompt_answer = answer;
        self.granted = false;
        self
    }

    /// Wait `interval` before delivering each entry
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

#[async_trait]
impl HeadingSource for ScriptedHeadingSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capability(&self) -> HeadingCapability {
        self.capability
    }

    async fn request_permission(&mut self) -> PermissionOutcome {
        if self.capability == HeadingCapability::RequiresPermission {
            self.granted = self.prompt_answer == PermissionOutcome::Granted;
            return self.prompt_answer;
        }
        PermissionOutcome::Granted
    }

    async fn start(&mut self) -> Result<(), HeadingError> {
        if !self.granted {
            return Err(HeadingError::PermissionDenied);
        }
        self.active = true;
        Ok(())
    }

    async fn next_sample(&mut self) -> Result<Option<HeadingSample>, HeadingError> {
        if !self.active || self.script.is_empty() {
            return Ok(None);
        }
        wait_for_entry(self.interval, &mut self.next_at).await;
        match self.script.pop_front() {
            Some(Ok(sample)) => Ok(Some(sample)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn stop(&mut self) {
        self.active = false;
        self.next_at = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_position_replays_then_ends() {
        let mut source = ScriptedPositionSource::new(vec![
            Ok(PositionFix::new(1.0, 1.0, 5.0, 1)),
            Err(PositionError::Unavailable),
        ]);

        // Inactive until started
        assert_eq!(source.next_fix().await, Ok(None));
        assert_eq!(source.remaining(), 2);

        source.start().await.unwrap();
        assert!(source.next_fix().await.unwrap().is_some());
        assert_eq!(source.next_fix().await, Err(PositionError::Unavailable));
        assert_eq!(source.next_fix().await, Ok(None));
    }

    #[tokio::test]
    async fn test_scripted_position_failing_start() {
        let mut source =
            ScriptedPositionSource::new(vec![]).failing_start(PositionError::PermissionDenied);
        assert_eq!(source.start().await, Err(PositionError::PermissionDenied));
        assert!(!source.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_position_interval() {
        let mut source =
            ScriptedPositionSource::new(vec![Ok(PositionFix::new(1.0, 1.0, 5.0, 1))])
                .with_interval(Duration::from_secs(1));
        source.start().await.unwrap();

        let started = tokio::time::Instant::now();
        assert!(source.next_fix().await.unwrap().is_some());
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wait_keeps_deadline() {
        let mut source =
            ScriptedPositionSource::new(vec![Ok(PositionFix::new(1.0, 1.0, 5.0, 1))])
                .with_interval(Duration::from_millis(1000));
        source.start().await.unwrap();

        let started = tokio::time::Instant::now();
        for _ in 0..3 {
            let polled = tokio::time::timeout(Duration::from_millis(300), source.next_fix()).await;
            assert!(polled.is_err());
        }
        assert_eq!(source.remaining(), 1);

        // Fourth short poll lands on the original 1000ms deadline
        let fix = tokio::time::timeout(Duration::from_millis(300), source.next_fix())
            .await
            .expect("deadline restarted on cancellation");
        assert!(fix.unwrap().is_some());
        assert!(started.elapsed() < Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_heading_cancelled_wait_keeps_deadline() {
        let mut source = ScriptedHeadingSource::new(vec![Ok(HeadingSample::new(45.0, 5.0))])
            .with_interval(Duration::from_millis(500));
        source.start().await.unwrap();

        let started = tokio::time::Instant::now();
        loop {
            match tokio::time::timeout(Duration::from_millis(100), source.next_sample()).await {
                Ok(sample) => {
                    assert_eq!(sample.unwrap().unwrap().heading_deg, 45.0);
                    break;
                }
                Err(_) => continue,
            }
        }
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(started.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_scripted_heading_permission_gate() {
        let mut source = ScriptedHeadingSource::new(vec![Ok(HeadingSample::new(90.0, 5.0))])
            .requiring_permission(PermissionOutcome::Granted);
        assert_eq!(source.capability(), HeadingCapability::RequiresPermission);
        assert_eq!(source.start().await, Err(HeadingError::PermissionDenied));

        assert_eq!(source.request_permission().await, PermissionOutcome::Granted);
        source.start().await.unwrap();
        let sample = source.next_sample().await.unwrap().unwrap();
        assert_eq!(sample.heading_deg, 90.0);
        assert_eq!(source.next_sample().await, Ok(None));
    }
}
