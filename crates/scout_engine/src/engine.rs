use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scout_core::{Preferences, ResumeSummary, TaskId};
use workflow_logging::{flow_error, flow_info};

use crate::poller::{start_polling, PollOutcome, PollSink, PollerHandle};
use crate::{ApiError, ApiSettings, HttpSearchApi, ResumeFile, SearchApi};

enum EngineCommand {
    UploadResume {
        file: ResumeFile,
    },
    LaunchSearch {
        resume_summary: ResumeSummary,
        preferences: Preferences,
    },
    StartPolling {
        task_id: TaskId,
    },
    StopPolling,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UploadFinished(Result<ResumeSummary, ApiError>),
    SearchAccepted(Result<TaskId, ApiError>),
    Poll(PollOutcome),
}

/// Owns a tokio runtime on a dedicated thread and runs all workflow IO.
/// The driver stays synchronous: commands in, events out via `try_recv`.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let poll_interval = settings.poll_interval;
        let api = Arc::new(HttpSearchApi::new(settings)?);
        Ok(Self::with_api(api, poll_interval))
    }

    /// Seam for tests and alternative transports.
    pub fn with_api(api: Arc<dyn SearchApi>, poll_interval: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_command_loop(api, poll_interval, cmd_rx, event_tx));

        Self { cmd_tx, event_rx }
    }

    pub fn upload(&self, file: ResumeFile) {
        let _ = self.cmd_tx.send(EngineCommand::UploadResume { file });
    }

    pub fn launch(&self, resume_summary: ResumeSummary, preferences: Preferences) {
        let _ = self.cmd_tx.send(EngineCommand::LaunchSearch {
            resume_summary,
            preferences,
        });
    }

    pub fn start_polling(&self, task_id: TaskId) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { task_id });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct ChannelPollSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl PollSink for ChannelPollSink {
    fn deliver(&self, outcome: PollOutcome) {
        let _ = self.tx.send(EngineEvent::Poll(outcome));
    }
}

fn run_command_loop(
    api: Arc<dyn SearchApi>,
    poll_interval: Duration,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            flow_error!("failed to start engine runtime: {err}");
            return;
        }
    };

    // At most one poll session is alive at any time.
    let mut active_poll: Option<PollerHandle> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::UploadResume { file } => {
                flow_info!(
                    "uploading resume {} ({}, {} bytes)",
                    file.file_name,
                    file.mime_type,
                    file.bytes.len()
                );
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = api.upload_resume(file).await;
                    let _ = event_tx.send(EngineEvent::UploadFinished(result));
                });
            }
            EngineCommand::LaunchSearch {
                resume_summary,
                preferences,
            } => {
                flow_info!("launching deep search for {}", preferences.role_type);
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = api.deep_search(&resume_summary, &preferences).await;
                    let _ = event_tx.send(EngineEvent::SearchAccepted(result));
                });
            }
            EngineCommand::StartPolling { task_id } => {
                if let Some(previous) = active_poll.take() {
                    previous.cancel();
                }
                flow_info!("polling task {task_id}");
                let sink = Arc::new(ChannelPollSink {
                    tx: event_tx.clone(),
                });
                let handle = {
                    let _guard = runtime.enter();
                    start_polling(api.clone(), task_id, poll_interval, sink)
                };
                active_poll = Some(handle);
            }
            EngineCommand::StopPolling => {
                if let Some(handle) = active_poll.take() {
                    handle.cancel();
                }
            }
        }
    }

    // Driver dropped its handle; make sure no poll outlives it.
    if let Some(handle) = active_poll.take() {
        handle.cancel();
    }
}
