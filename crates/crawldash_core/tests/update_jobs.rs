mod common;

use common::*;
use crawldash_core::{
    update, AppState, CreateJobRequest, Effect, FailureKind, FetchFailure, JobId, JobStatus, Msg,
    NoticeSeverity,
};
use pretty_assertions::assert_eq;

fn submit(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::CreateJobSubmitted {
            url: url.to_string(),
            limit: 25,
            formats: "markdown,html".to_string(),
        },
    )
}

#[test]
fn created_job_is_prepended_and_polled_until_terminal() {
    init_logging();
    let state = loaded_with(AppState::new(), vec![job("old", JobStatus::Completed)]);

    let (mut state, effects) = submit(state, "https://example.com");
    assert_eq!(
        effects,
        vec![Effect::CreateJob {
            request: CreateJobRequest::new("https://example.com", 25, "markdown,html").unwrap(),
        }]
    );
    assert!(state.is_creating());
    assert!(state.consume_dirty());

    let mut created = job("new", JobStatus::Running);
    created.url = "https://example.com".to_string();
    let (state, effects) = update(state, Msg::JobCreated(Ok(created)));
    assert!(effects.is_empty());
    assert!(!state.is_creating());

    let view = state.view();
    assert_eq!(view.jobs.len(), 2);
    assert_eq!(view.jobs[0].job_id, JobId::new("new"));
    assert_eq!(view.jobs[0].status, JobStatus::Running);
    assert_eq!(view.jobs[0].finished_at, None);
    assert_eq!(view.notice.unwrap().severity, NoticeSeverity::Info);

    // A running job re-arms the list poll.
    let (state, effects) = tick(state, secs(1));
    assert!(effects.is_empty());
    let (state, effects) = tick(state, secs(6));
    let seq = list_seq(&effects);

    let mut done = job("new", JobStatus::Completed);
    done.url = "https://example.com".to_string();
    done.total_docs = Some(12);
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            seq,
            result: Ok(vec![done.clone(), job("old", JobStatus::Completed)]),
        },
    );
    let stored = state.jobs().get_by_id(&JobId::new("new")).unwrap();
    assert_eq!(stored, &done);
    assert_eq!(state.jobs().jobs()[0].id, JobId::new("new"));

    // Nothing is running any more, so later ticks stay quiet.
    let (state, effects) = tick(state, secs(11));
    assert!(effects.is_empty());
    let (_state, effects) = tick(state, secs(30));
    assert!(effects.is_empty());
}

#[test]
fn failed_creation_inserts_nothing() {
    init_logging();
    let state = loaded_with(AppState::new(), Vec::new());
    let (state, _) = submit(state, "https://example.com");
    let (state, effects) = update(
        state,
        Msg::JobCreated(Err(FetchFailure::new(FailureKind::HttpStatus(500), "boom"))),
    );

    assert!(effects.is_empty());
    assert!(state.jobs().is_empty());
    assert!(!state.is_creating());
    let notice = state.notice().unwrap();
    assert_eq!(notice.severity, NoticeSeverity::Error);
    assert_eq!(notice.description, "Failed to create crawl job. Please try again.");
}

#[test]
fn invalid_creation_input_emits_no_request() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "not a url");
    assert!(effects.is_empty());
    assert!(!state.is_creating());
    assert_eq!(state.notice().unwrap().severity, NoticeSeverity::Error);
}

#[test]
fn second_submit_while_creating_is_ignored() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "https://a.example.com");
    assert_eq!(effects.len(), 1);
    let (state, effects) = submit(state, "https://b.example.com");
    assert!(effects.is_empty());
    assert!(state.is_creating());
}

#[test]
fn list_failure_keeps_previous_jobs() {
    init_logging();
    let state = loaded_with(AppState::new(), vec![job("a", JobStatus::Running)]);
    let (state, effects) = update(state, Msg::RefreshClicked);
    let seq = list_seq(&effects);
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            seq,
            result: Err(FetchFailure::new(FailureKind::Connection, "refused")),
        },
    );

    let view = state.view();
    assert_eq!(view.jobs.len(), 1);
    assert!(!view.jobs_loading);
    let notice = view.notice.unwrap();
    assert_eq!(notice.title, "Connection Error");

    let (state, _) = update(state, Msg::DismissNotice);
    assert!(state.notice().is_none());
}

#[test]
fn terminal_jobs_never_revert_through_list_poll() {
    init_logging();
    let state = loaded_with(
        AppState::new(),
        vec![job("a", JobStatus::Cancelled), job("b", JobStatus::Running)],
    );
    let (state, effects) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            seq: list_seq(&effects),
            result: Ok(vec![job("a", JobStatus::Running), job("b", JobStatus::Running)]),
        },
    );

    let a = state.jobs().get_by_id(&JobId::new("a")).unwrap();
    assert_eq!(a.status, JobStatus::Cancelled);
    assert!(a.finished_at.is_some());
}

#[test]
fn older_list_response_does_not_overwrite_newer() {
    init_logging();
    let state = loaded_with(AppState::new(), vec![job("a", JobStatus::Running)]);
    let (state, first) = update(state, Msg::RefreshClicked);
    let (state, second) = update(state, Msg::RefreshClicked);

    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            seq: list_seq(&second),
            result: Ok(vec![job("a", JobStatus::Completed)]),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::JobsLoaded {
            seq: list_seq(&first),
            result: Ok(vec![job("a", JobStatus::Running), job("z", JobStatus::Running)]),
        },
    );

    assert_eq!(state.jobs().len(), 1);
    assert_eq!(state.view().jobs[0].status, JobStatus::Completed);
    state.consume_dirty();
}

#[test]
fn initial_load_reports_loading_until_first_response() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);
    assert!(state.view().jobs_loading);
    let (state, _) = update(
        state,
        Msg::JobsLoaded {
            seq: list_seq(&effects),
            result: Ok(Vec::new()),
        },
    );
    assert!(!state.view().jobs_loading);
}
