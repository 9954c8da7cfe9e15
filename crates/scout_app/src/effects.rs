use std::sync::Arc;

use scout_core::{
    require_resume, store_resume_summary, store_task_id, Effect, MemorySessionStore, Msg,
};
use scout_engine::{EngineEvent, EngineHandle, ResumeFile};
use workflow_logging::{flow_info, flow_warn};

/// Executes core effects against the engine and the session store, and
/// maps engine events back into messages for the pure update.
pub struct EffectRunner {
    engine: EngineHandle,
    store: Arc<MemorySessionStore>,
    file: ResumeFile,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: Arc<MemorySessionStore>, file: ResumeFile) -> Self {
        Self {
            engine,
            store,
            file,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadResume {
                    file_name,
                    mime_type,
                } => {
                    flow_info!("uploading {file_name} as {mime_type}");
                    self.engine.upload(self.file.clone());
                }
                Effect::StoreResumeSummary(summary) => {
                    // The typed accessor drops any previous task id.
                    store_resume_summary(self.store.as_ref(), &summary);
                }
                Effect::LaunchSearch { preferences } => {
                    match require_resume(self.store.as_ref()) {
                        Ok(summary) => self.engine.launch(summary, preferences),
                        Err(redirect) => {
                            flow_warn!(
                                "launch requested without a stored resume; back to {:?}",
                                redirect.target
                            );
                        }
                    }
                }
                Effect::StoreTaskId(task_id) => {
                    store_task_id(self.store.as_ref(), &task_id);
                }
                Effect::StartPolling(task_id) => {
                    self.engine.start_polling(task_id);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
            }
        }
    }

    /// Non-blocking: the next engine event translated into a message.
    pub fn next_msg(&self) -> Option<Msg> {
        let event = self.engine.try_recv()?;
        Some(match event {
            EngineEvent::UploadFinished(result) => {
                Msg::UploadFinished(result.map_err(|err| err.submit_failure()))
            }
            EngineEvent::SearchAccepted(result) => {
                Msg::SearchAccepted(result.map_err(|err| err.submit_failure()))
            }
            EngineEvent::Poll(outcome) => Msg::PollArrived(outcome),
        })
    }
}
