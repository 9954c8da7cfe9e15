use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use scout_core::{
    CompanySize, Preferences, ResumeSummary, StatusReport, TaskId, TaskStatus,
};
use scout_engine::{ApiError, EngineEvent, EngineHandle, ResumeFile, SearchApi};

/// Stub backend: replays a scripted status sequence, repeating the final
/// report once the script runs out.
struct ScriptedApi {
    reports: Mutex<VecDeque<StatusReport>>,
    status_calls: AtomicUsize,
    polled_tasks: Mutex<Vec<String>>,
}

impl ScriptedApi {
    fn new(reports: Vec<StatusReport>) -> Arc<Self> {
        Arc::new(Self {
            reports: Mutex::new(reports.into()),
            status_calls: AtomicUsize::new(0),
            polled_tasks: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl SearchApi for ScriptedApi {
    async fn upload_resume(&self, _file: ResumeFile) -> Result<ResumeSummary, ApiError> {
        Ok(ResumeSummary(serde_json::json!({"name": "Ada"})))
    }

    async fn deep_search(
        &self,
        _resume_summary: &ResumeSummary,
        _preferences: &Preferences,
    ) -> Result<TaskId, ApiError> {
        Ok(TaskId("scripted-task".to_owned()))
    }

    async fn task_status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.polled_tasks
            .lock()
            .unwrap()
            .push(task_id.as_str().to_owned());
        let mut reports = self.reports.lock().unwrap();
        if reports.len() > 1 {
            Ok(reports.pop_front().unwrap())
        } else {
            Ok(reports.front().cloned().unwrap())
        }
    }
}

fn report(status: TaskStatus, progress: u8) -> StatusReport {
    StatusReport {
        status,
        progress: Some(progress),
        result: None,
        error: None,
    }
}

fn wait_for_event(engine: &EngineHandle, timeout: Duration) -> Option<EngineEvent> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(event) = engine.try_recv() {
            return Some(event);
        }
        thread::sleep(Duration::from_millis(5));
    }
    None
}

#[test]
fn full_command_round_trip_ends_at_success() {
    let api = ScriptedApi::new(vec![
        report(TaskStatus::Pending, 0),
        report(TaskStatus::Progress, 50),
        report(TaskStatus::Success, 100),
    ]);
    let engine = EngineHandle::with_api(api.clone(), Duration::from_millis(10));

    engine.upload(ResumeFile {
        file_name: "resume.pdf".to_owned(),
        mime_type: "application/pdf".to_owned(),
        bytes: Bytes::from_static(b"%PDF"),
    });
    let uploaded = wait_for_event(&engine, Duration::from_secs(2)).expect("upload event");
    let summary = match uploaded {
        EngineEvent::UploadFinished(Ok(summary)) => summary,
        other => panic!("unexpected event {other:?}"),
    };

    engine.launch(
        summary,
        Preferences {
            location: "Remote".to_owned(),
            company_size: CompanySize::Any,
            role_type: "Engineer".to_owned(),
            additional_info: String::new(),
        },
    );
    let accepted = wait_for_event(&engine, Duration::from_secs(2)).expect("launch event");
    let task_id = match accepted {
        EngineEvent::SearchAccepted(Ok(task_id)) => task_id,
        other => panic!("unexpected event {other:?}"),
    };
    assert_eq!(task_id, TaskId("scripted-task".to_owned()));

    engine.start_polling(task_id);
    let mut statuses = Vec::new();
    while let Some(event) = wait_for_event(&engine, Duration::from_millis(500)) {
        if let EngineEvent::Poll(Ok(report)) = event {
            let status = report.status;
            statuses.push(status);
            if status.is_terminal() {
                break;
            }
        }
    }
    assert_eq!(
        statuses,
        vec![TaskStatus::Pending, TaskStatus::Progress, TaskStatus::Success]
    );

    // Terminal status ends the loop; the call count must not grow again.
    let calls = api.status_calls.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(api.status_calls.load(Ordering::SeqCst), calls);
}

#[test]
fn stop_polling_silences_the_event_stream() {
    let api = ScriptedApi::new(vec![report(TaskStatus::Progress, 10)]);
    let engine = EngineHandle::with_api(api, Duration::from_millis(10));

    engine.start_polling(TaskId("endless".to_owned()));
    assert!(wait_for_event(&engine, Duration::from_secs(2)).is_some());

    engine.stop_polling();
    // Grace period for the cancellation to land, then drain stragglers.
    thread::sleep(Duration::from_millis(100));
    while engine.try_recv().is_some() {}

    thread::sleep(Duration::from_millis(200));
    assert!(engine.try_recv().is_none());
}

#[test]
fn starting_a_new_poll_replaces_the_previous_session() {
    let api = ScriptedApi::new(vec![report(TaskStatus::Progress, 10)]);
    let engine = EngineHandle::with_api(api.clone(), Duration::from_millis(10));

    engine.start_polling(TaskId("first".to_owned()));
    assert!(wait_for_event(&engine, Duration::from_secs(2)).is_some());

    // Replacing cancels the first loop; only one poller keeps running.
    engine.start_polling(TaskId("second".to_owned()));
    thread::sleep(Duration::from_millis(100));

    let seen_so_far = api.polled_tasks.lock().unwrap().len();
    thread::sleep(Duration::from_millis(100));

    let polled = api.polled_tasks.lock().unwrap().clone();
    assert!(polled.len() > seen_so_far, "second poller stalled");
    assert!(
        polled[seen_so_far..].iter().all(|task| task == "second"),
        "cancelled poller kept polling: {polled:?}"
    );
}
