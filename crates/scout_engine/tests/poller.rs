use std::sync::{Arc, Mutex};
use std::time::Duration;

use scout_core::{TaskId, TaskStatus};
use scout_engine::{
    start_polling, ApiSettings, HttpSearchApi, PollOutcome, PollSink, SearchApi,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    outcomes: Arc<Mutex<Vec<PollOutcome>>>,
}

impl TestSink {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn snapshot(&self) -> Vec<PollOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl PollSink for TestSink {
    fn deliver(&self, outcome: PollOutcome) {
        self.outcomes.lock().unwrap().push(outcome);
    }
}

fn api_for(server: &MockServer) -> Arc<dyn SearchApi> {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    Arc::new(HttpSearchApi::new(settings).expect("client"))
}

fn progress_body(progress: u8) -> serde_json::Value {
    serde_json::json!({"status": "PROGRESS", "progress": progress})
}

#[tokio::test]
async fn loop_stops_after_a_terminal_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(40)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "SUCCESS",
            "progress": 100,
            "result": {"current_jobs": [], "followup_questions": []},
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let _handle = start_polling(
        api_for(&server),
        TaskId("t-1".to_owned()),
        Duration::from_millis(25),
        sink.clone(),
    );

    tokio::time::sleep(Duration::from_millis(300)).await;

    let outcomes = sink.snapshot();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(
        outcomes[1].as_ref().unwrap().status,
        TaskStatus::Success
    );
    // No request was issued past the terminal response.
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn transport_failure_ends_the_loop_permanently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let _handle = start_polling(
        api_for(&server),
        TaskId("t-2".to_owned()),
        Duration::from_millis(25),
        sink.clone(),
    );

    tokio::time::sleep(Duration::from_millis(250)).await;

    let outcomes = sink.snapshot();
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_err());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn payload_error_ends_the_loop_even_on_non_terminal_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "PROGRESS",
            "progress": 10,
            "error": "search backend crashed",
        })))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let _handle = start_polling(
        api_for(&server),
        TaskId("t-3".to_owned()),
        Duration::from_millis(25),
        sink.clone(),
    );

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(sink.snapshot().len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn first_poll_fires_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(progress_body(5)))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    // Interval far longer than the test: any delivery must be the initial poll.
    let handle = start_polling(
        api_for(&server),
        TaskId("t-4".to_owned()),
        Duration::from_secs(60),
        sink.clone(),
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(sink.snapshot().len(), 1);
    handle.cancel();
}

#[tokio::test]
async fn response_resolving_after_cancellation_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/t-5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(200))
                .set_body_json(progress_body(50)),
        )
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let handle = start_polling(
        api_for(&server),
        TaskId("t-5".to_owned()),
        Duration::from_millis(25),
        sink.clone(),
    );

    // Cancel while the first request is still in flight.
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
    assert!(handle.is_cancelled());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(sink.snapshot().is_empty());
}
