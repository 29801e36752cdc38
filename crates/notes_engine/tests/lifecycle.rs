mod common;

use std::time::Duration;

use common::{generate_request, http_error, init_logging, snapshot, FakeApi, TestSink};
use notes_core::Block;
use notes_engine::{
    parse_note, ClientSettings, EngineEvent, NoteId, NotePayload, TaskController, TaskError,
    TaskProgress, TaskStatus,
};
use pretty_assertions::assert_eq;

const VIDEO_URL: &str = "https://www.bilibili.com/video/BV1xx411c7mD";

fn attempts(events: Vec<EngineEvent>) -> Vec<(u32, TaskStatus)> {
    events
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::Progress(TaskProgress {
                attempt, status, ..
            }) => Some((attempt, status)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn completion_on_third_read_fetches_result_once() {
    init_logging();
    let api = FakeApi::new();
    api.push_status(Ok(snapshot("PENDING", "queued")));
    api.push_status(Ok(snapshot("PROCESSING", "transcribing")));
    api.push_status(Ok(snapshot("COMPLETED", "done")));
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let started = tokio::time::Instant::now();
    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    let note = controller.await_completion(&handle, &sink).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(api.calls(), vec!["create", "status", "status", "status", "result"]);
    assert_eq!(note.id, NoteId("42".to_string()));
    assert_eq!(note.blocks.len(), 5);
    assert_eq!(note.blocks[0], Block::heading("Intro"));
    assert_eq!(
        attempts(sink.take()),
        vec![
            (1, TaskStatus::Pending),
            (2, TaskStatus::Processing),
            (3, TaskStatus::Completed)
        ]
    );
    assert!(elapsed >= Duration::from_secs(10), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(15), "elapsed {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn only_exact_labels_are_terminal() {
    init_logging();
    let api = FakeApi::new();
    api.push_status(Ok(snapshot("completed", "done?")));
    api.push_status(Ok(snapshot("COMPLETED", "done")));
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    controller.await_completion(&handle, &sink).await.unwrap();

    assert_eq!(api.count("status"), 2);
    assert_eq!(api.count("result"), 1);
    assert_eq!(
        attempts(sink.take()),
        vec![
            (1, TaskStatus::Other("completed".to_string())),
            (2, TaskStatus::Completed)
        ]
    );
    assert_eq!(TaskStatus::from_label(" FAILED"), TaskStatus::Other(" FAILED".to_string()));
}

#[tokio::test(start_paused = true)]
async fn never_terminal_task_times_out_after_sixty_reads() {
    init_logging();
    let api = FakeApi::new();
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    let err = controller.await_completion(&handle, &sink).await.unwrap_err();

    assert_eq!(err, TaskError::PollingTimeout { attempts: 60 });
    assert_eq!(api.count("status"), 60);
    assert_eq!(api.count("result"), 0);
    let seen = attempts(sink.take());
    assert_eq!(seen.len(), 60);
    assert_eq!(seen.last().map(|(attempt, _)| *attempt), Some(60));
}

#[tokio::test(start_paused = true)]
async fn failed_task_stops_polling_with_backend_message() {
    init_logging();
    let api = FakeApi::new();
    api.push_status(Ok(snapshot("PROCESSING", "downloading")));
    api.push_status(Ok(snapshot("FAILED", "video is private")));
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    let err = controller.await_completion(&handle, &sink).await.unwrap_err();

    assert_eq!(err, TaskError::TaskFailed("video is private".to_string()));
    assert_eq!(api.count("status"), 2);
    assert_eq!(api.count("result"), 0);
}

#[tokio::test(start_paused = true)]
async fn unsupported_page_makes_no_calls() {
    init_logging();
    let api = FakeApi::new();
    let controller = TaskController::new(api.clone(), &ClientSettings::default());

    for url in ["https://example.com/", "", "   ", "not a url", "ftp://youtube.com/watch?v=1"] {
        let err = controller.submit(&generate_request(url)).await.unwrap_err();
        assert!(
            matches!(err, TaskError::UnsupportedSource { .. }),
            "{url:?} gave {err:?}"
        );
    }
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn status_read_failure_ends_the_loop() {
    init_logging();
    let api = FakeApi::new();
    api.push_status(Err(http_error(502, Some("bad gateway"))));
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    let err = controller.await_completion(&handle, &sink).await.unwrap_err();

    assert!(matches!(err, TaskError::StatusQuery(_)), "{err:?}");
    assert_eq!(api.count("status"), 1);
}

#[tokio::test(start_paused = true)]
async fn result_fetch_failure_is_a_result_query_error() {
    init_logging();
    let api = FakeApi::new();
    api.push_status(Ok(snapshot("COMPLETED", "done")));
    api.set_result(Err(http_error(500, None)));
    let controller = TaskController::new(api.clone(), &ClientSettings::default());
    let sink = TestSink::default();

    let handle = controller.submit(&generate_request(VIDEO_URL)).await.unwrap();
    let err = controller.await_completion(&handle, &sink).await.unwrap_err();

    assert!(matches!(err, TaskError::ResultQuery(_)), "{err:?}");
    assert_eq!(api.count("result"), 1);
}

#[test]
fn malformed_results_are_rejected() {
    let cases = [
        NotePayload {
            id: Some(NoteId("1".into())),
            content: None,
        },
        NotePayload {
            id: Some(NoteId("1".into())),
            content: Some("   ".into()),
        },
        NotePayload {
            id: Some(NoteId("1".into())),
            content: Some("not json".into()),
        },
        NotePayload {
            id: Some(NoteId("1".into())),
            content: Some(r#"{"other":[]}"#.into()),
        },
        NotePayload {
            id: Some(NoteId("1".into())),
            content: Some(r#"{"notes":[{"type":"table","content":"x"}]}"#.into()),
        },
        NotePayload {
            id: None,
            content: Some(r#"{"notes":[]}"#.into()),
        },
    ];
    for payload in cases {
        let err = parse_note(payload.clone()).unwrap_err();
        assert!(
            matches!(err, TaskError::MalformedResult(_)),
            "{payload:?} gave {err:?}"
        );
    }
}

#[test]
fn empty_note_list_is_valid() {
    let note = parse_note(NotePayload {
        id: Some(NoteId("7".into())),
        content: Some(r#"{"notes":[]}"#.into()),
    })
    .unwrap();
    assert!(note.blocks.is_empty());
}
