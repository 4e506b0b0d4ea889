use anyhow::{Context, Result};
use log::debug;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::db::Database;
use crate::engagement::ScoreGenerator;

use super::loop_worker::monitoring_loop;
use super::state::{EngagementBoard, Roster};

/// Owns the monitoring task and its cancellation handle. Start and stop
/// are both idempotent.
pub struct MonitorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    /// Spawn the loop for a session. A second start while one is running
    /// is ignored, so re-entrant callers cannot race a duplicate loop into
    /// existence.
    pub fn start_monitoring<R>(
        &mut self,
        session_id: String,
        db: Database,
        roster: Roster,
        board: EngagementBoard,
        generator: ScoreGenerator<R>,
        tick_interval: Duration,
    ) where
        R: Rng + Send + 'static,
    {
        if self.is_running() {
            debug!("monitoring already active for this view, ignoring start");
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(monitoring_loop(
            session_id,
            db,
            roster,
            board,
            generator,
            tick_interval,
            token_clone,
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    /// Cancel the loop and wait for it to drain; an in-flight tick
    /// finishes its writes before this returns. Stopping an idle
    /// controller is a no-op.
    pub async fn stop_monitoring(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("monitoring loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
