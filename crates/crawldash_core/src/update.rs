use std::time::Duration;

use crawldash_logging::{dash_debug, dash_info, dash_warn};

use crate::search::SearchAction;
use crate::{
    AppState, CreateJobRequest, Document, Effect, FetchFailure, JobId, Msg, Notice, RequestSeq,
};

const BACKEND_HINT: &str = "Unable to connect to the backend. Please ensure the server is running.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let seq = state.issue_list_fetch();
            vec![Effect::FetchJobs { seq }]
        }
        Msg::Tick { now } => on_tick(&mut state, now),
        Msg::CreateJobSubmitted {
            url,
            limit,
            formats,
        } => on_create_submitted(&mut state, &url, limit, &formats),
        Msg::JobSelected(job_id) => {
            dash_info!("opening job {}", job_id);
            let (job_seq, docs_seq) = state.open_detail(job_id.clone());
            vec![
                Effect::FetchJob {
                    job_id: job_id.clone(),
                    seq: job_seq,
                },
                Effect::FetchDocuments {
                    job_id,
                    query: None,
                    seq: docs_seq,
                },
            ]
        }
        Msg::DocumentSelected(document_id) => {
            let displayed = state
                .displayed_documents()
                .iter()
                .any(|doc| doc.id == document_id);
            if displayed && state.selection_mut().select_document(document_id.clone()) {
                state.mark_dirty();
            } else {
                dash_debug!("ignoring selection of document {}", document_id);
            }
            Vec::new()
        }
        Msg::SearchChanged(raw) => on_search_changed(&mut state, &raw),
        Msg::BackClicked => {
            if state.open_job().is_none() {
                return (state, Vec::new());
            }
            state.close_detail();
            let seq = state.issue_list_fetch();
            vec![Effect::FetchJobs { seq }]
        }
        Msg::RefreshClicked => {
            let seq = state.issue_list_fetch();
            vec![Effect::FetchJobs { seq }]
        }
        Msg::DismissNotice => {
            state.clear_notice();
            Vec::new()
        }
        Msg::JobCreated(result) => {
            match result {
                Ok(job) => {
                    dash_info!("created job {} for {}", job.id, job.url);
                    let description = format!("Crawl job started for {}", job.url);
                    state.finish_create(Some(job));
                    state.set_notice(Notice::info("Job Created", description));
                }
                Err(failure) => {
                    dash_warn!("job creation failed: {}", failure);
                    state.finish_create(None);
                    state.set_notice(Notice::error(
                        "Error",
                        "Failed to create crawl job. Please try again.",
                    ));
                }
            }
            Vec::new()
        }
        Msg::JobsLoaded { seq, result } => {
            match result {
                Ok(jobs) => {
                    if !state.apply_jobs(seq, jobs) {
                        dash_debug!("discarding stale job list #{}", seq.value());
                    }
                }
                Err(failure) => {
                    if state.list_failed(seq) {
                        report_failure(&mut state, "Connection Error", BACKEND_HINT, &failure);
                    }
                }
            }
            Vec::new()
        }
        Msg::JobLoaded {
            job_id,
            seq,
            result,
        } => {
            match result {
                Ok(job) => {
                    if !state.apply_detail_job(&job_id, seq, job) {
                        dash_debug!("discarding stale detail for job {}", job_id);
                    }
                }
                Err(failure) => {
                    if state.detail_job_failed(&job_id, seq) {
                        report_failure(&mut state, "Error", "Failed to fetch job details", &failure);
                    }
                }
            }
            Vec::new()
        }
        Msg::DocumentsLoaded {
            job_id,
            seq,
            result,
        } => on_documents_loaded(&mut state, job_id, seq, result),
        Msg::SearchLoaded {
            job_id,
            query,
            seq,
            result,
        } => {
            if !state.is_open(&job_id) || !state.search_mut().answers_latest(&query, seq) {
                dash_debug!("discarding stale search {:?} for job {}", query, job_id);
                return (state, Vec::new());
            }
            match result {
                Ok(documents) => {
                    state.search_mut().accept(&query, seq, documents);
                    state.reconcile_selection();
                    state.mark_dirty();
                }
                Err(failure) => {
                    let retry_at = state.now() + state.settings().detail_interval;
                    state.search_mut().fail(&query, seq, retry_at);
                    report_failure(&mut state, "Error", "Failed to search documents", &failure);
                }
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn on_tick(state: &mut AppState, now: Duration) -> Vec<Effect> {
    state.advance_clock(now);
    crawldash_logging::set_poll_tick(state.ticks());

    let mut effects = Vec::new();
    let plan = state.plan_poll();
    if plan.fetch_list {
        let seq = state.issue_list_fetch();
        effects.push(Effect::FetchJobs { seq });
    }

    let Some(job_id) = state.open_job().cloned() else {
        return effects;
    };
    if plan.fetch_detail {
        let (job_seq, docs_seq) = state.issue_detail_fetch();
        effects.push(Effect::FetchJob {
            job_id: job_id.clone(),
            seq: job_seq,
        });
        effects.push(Effect::FetchDocuments {
            job_id: job_id.clone(),
            query: None,
            seq: docs_seq,
        });
    }
    let now = state.now();
    if let Some((query, seq)) = state.search_mut().poll(now) {
        effects.push(Effect::FetchDocuments {
            job_id,
            query: Some(query),
            seq,
        });
    }
    effects
}

fn on_create_submitted(state: &mut AppState, url: &str, limit: u32, formats: &str) -> Vec<Effect> {
    let request = match CreateJobRequest::new(url, limit, formats) {
        Ok(request) => request,
        Err(err) => {
            dash_warn!("rejected job request: {}", err);
            state.set_notice(Notice::error("Error", format!("Failed to create crawl job: {err}")));
            return Vec::new();
        }
    };
    if !state.begin_create() {
        dash_debug!("creation already in flight; ignoring submit");
        return Vec::new();
    }
    vec![Effect::CreateJob { request }]
}

fn on_search_changed(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let Some(job_id) = state.open_job().cloned() else {
        return Vec::new();
    };
    let now = state.now();
    let debounce = state.settings().search_debounce;
    match state.search_mut().set_query(raw, now, debounce) {
        SearchAction::UseCached => {
            state.reconcile_selection();
            state.mark_dirty();
            Vec::new()
        }
        SearchAction::Fetch { query, seq } => {
            state.mark_dirty();
            vec![Effect::FetchDocuments {
                job_id,
                query: Some(query),
                seq,
            }]
        }
        SearchAction::Deferred => {
            state.mark_dirty();
            Vec::new()
        }
        SearchAction::Unchanged => Vec::new(),
    }
}

fn on_documents_loaded(
    state: &mut AppState,
    job_id: JobId,
    seq: RequestSeq,
    result: Result<Vec<Document>, FetchFailure>,
) -> Vec<Effect> {
    match result {
        Ok(documents) => {
            if !state.apply_documents(&job_id, seq, documents) {
                dash_debug!("discarding stale documents for job {}", job_id);
                return Vec::new();
            }
            state.reconcile_selection();
            // Keep an active filter in step with the refreshed set.
            match state.search_mut().refresh() {
                Some((query, seq)) => vec![Effect::FetchDocuments {
                    job_id,
                    query: Some(query),
                    seq,
                }],
                None => Vec::new(),
            }
        }
        Err(failure) => {
            if state.documents_failed(&job_id, seq) {
                report_failure(state, "Error", "Failed to fetch documents", &failure);
            }
            Vec::new()
        }
    }
}

fn report_failure(state: &mut AppState, title: &str, description: &str, failure: &FetchFailure) {
    dash_warn!("{}: {}", description, failure);
    state.set_notice(Notice::error(title, description));
}
