use std::sync::Arc;
use std::time::Duration;

use scout_core::{PollFailure, StatusReport, TaskId};
use tokio_util::sync::CancellationToken;
use workflow_logging::{flow_debug, flow_warn};

use crate::{ApiError, SearchApi};

/// What one poll resolved to, as the state machine consumes it.
pub type PollOutcome = Result<StatusReport, PollFailure>;

/// Receives poll outcomes in request order.
pub trait PollSink: Send + Sync {
    fn deliver(&self, outcome: PollOutcome);
}

/// Explicit cancellable handle for one poll session, independent of any
/// UI lifecycle. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct PollerHandle {
    cancel: CancellationToken,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Spawns the poll loop for `task_id` on the current runtime.
///
/// The first poll fires immediately; afterwards one request per interval,
/// and never before the previous response has resolved. The loop ends on
/// its own at a terminal response, or when the handle is cancelled.
pub fn start_polling(
    api: Arc<dyn SearchApi>,
    task_id: TaskId,
    interval: Duration,
    sink: Arc<dyn PollSink>,
) -> PollerHandle {
    let cancel = CancellationToken::new();
    let handle = PollerHandle {
        cancel: cancel.clone(),
    };
    tokio::spawn(run_poll_loop(api, task_id, interval, cancel, sink));
    handle
}

async fn run_poll_loop(
    api: Arc<dyn SearchApi>,
    task_id: TaskId,
    interval: Duration,
    cancel: CancellationToken,
    sink: Arc<dyn PollSink>,
) {
    loop {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return,
            result = api.task_status(&task_id) => result,
        };
        // A response racing the cancellation must never reach the sink.
        if cancel.is_cancelled() {
            return;
        }

        let (outcome, stop) = classify(outcome);
        sink.deliver(outcome);
        if stop {
            flow_debug!("poll loop for task {} stopped at a terminal response", task_id);
            return;
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// Decides whether a response ends the loop: a transport failure, a
/// payload-reported error, and a terminal status all stop further polls.
fn classify(outcome: Result<StatusReport, ApiError>) -> (PollOutcome, bool) {
    match outcome {
        Ok(report) => {
            let stop = report.error.is_some() || report.status.is_terminal();
            (Ok(report), stop)
        }
        Err(err) => {
            flow_warn!("task status poll failed: {err}");
            (Err(err.poll_failure()), true)
        }
    }
}
