use crate::{
    is_supported_resume_mime, Effect, Msg, PollFailure, PollPhase, Preferences, StatusReport,
    TaskStatus, WorkflowError, WorkflowState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: WorkflowState, msg: Msg) -> (WorkflowState, Vec<Effect>) {
    let effects = match msg {
        Msg::ResumeChosen {
            file_name,
            mime_type,
        } => {
            if !is_supported_resume_mime(&mime_type) {
                // Rejected locally; no network request is ever issued.
                state.reject(WorkflowError::Validation(format!(
                    "unsupported file type {mime_type}; upload a PDF, JPEG or PNG"
                )));
                return (state, Vec::new());
            }
            state.begin_upload();
            // A fresh upload supersedes whatever search is still polling.
            vec![
                Effect::StopPolling,
                Effect::UploadResume {
                    file_name,
                    mime_type,
                },
            ]
        }
        Msg::UploadFinished(Ok(summary)) => {
            state.accept_summary();
            vec![Effect::StoreResumeSummary(summary)]
        }
        Msg::UploadFinished(Err(failure)) => {
            state.reject(WorkflowError::Submission(failure));
            Vec::new()
        }
        Msg::PreferencesSubmitted(preferences) => {
            if let Err(message) = validate_preferences(&preferences) {
                // The launcher is never invoked with an incomplete form.
                state.reject(WorkflowError::Validation(message));
                return (state, Vec::new());
            }
            state.begin_launch();
            vec![Effect::LaunchSearch { preferences }]
        }
        Msg::SearchAccepted(Ok(task_id)) => {
            state.enter_results();
            vec![
                Effect::StoreTaskId(task_id.clone()),
                Effect::StartPolling(task_id),
            ]
        }
        Msg::SearchAccepted(Err(failure)) => {
            state.reject(WorkflowError::Submission(failure));
            Vec::new()
        }
        Msg::PollArrived(outcome) => apply_poll(&mut state, outcome),
        Msg::ResultsClosed => {
            state.leave_results();
            vec![Effect::StopPolling]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// One step of the poller state machine. The timer and transport side of
/// the loop lives in the engine; this decides the resulting transition.
fn apply_poll(
    state: &mut WorkflowState,
    outcome: Result<StatusReport, PollFailure>,
) -> Vec<Effect> {
    if state.phase() != PollPhase::Polling {
        // Terminal phases never resume, and responses that resolve after
        // cancellation must not mutate state.
        return Vec::new();
    }

    let report = match outcome {
        Ok(report) => report,
        Err(failure) => {
            // Fail fast: a single transport failure ends the session.
            state.fail_polling(failure.message);
            return vec![Effect::StopPolling];
        }
    };

    if let Some(progress) = report.progress {
        state.set_progress(progress);
    }
    if let Some(results) = &report.result {
        state.replace_snapshot(results);
    }

    if let Some(message) = report.error {
        // A payload-reported error is terminal even on a non-terminal status.
        state.fail_polling(message);
        return vec![Effect::StopPolling];
    }

    match report.status {
        TaskStatus::Success => {
            state.succeed_polling();
            vec![Effect::StopPolling]
        }
        TaskStatus::Failure => {
            state.fail_polling("search ended in failure".to_owned());
            vec![Effect::StopPolling]
        }
        TaskStatus::Pending | TaskStatus::Started | TaskStatus::Progress => Vec::new(),
    }
}

fn validate_preferences(preferences: &Preferences) -> Result<(), String> {
    if preferences.location.trim().is_empty() {
        return Err("location is required".to_owned());
    }
    if preferences.role_type.trim().is_empty() {
        return Err("role type is required".to_owned());
    }
    Ok(())
}
