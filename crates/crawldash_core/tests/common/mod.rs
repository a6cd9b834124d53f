#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use crawldash_core::{
    update, AppState, Document, DocumentId, Effect, Job, JobId, JobStatus, Msg, PollSettings,
    RequestSeq,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(crawldash_logging::initialize_for_tests);
}

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Default intervals with debouncing disabled so searches fire immediately.
pub fn undebounced() -> AppState {
    AppState::with_settings(PollSettings {
        search_debounce: Duration::ZERO,
        ..PollSettings::default()
    })
}

pub fn job(id: &str, status: JobStatus) -> Job {
    Job {
        id: JobId::new(id),
        url: format!("https://{id}.example.com"),
        status,
        total_docs: None,
        started_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        finished_at: status
            .is_terminal()
            .then(|| "2024-05-01T10:05:00Z".parse().unwrap()),
    }
}

pub fn doc(id: &str, title: &str) -> Document {
    Document {
        id: DocumentId::new(id),
        title: Some(title.to_string()),
        url: format!("https://example.com/{id}"),
        markdown: Some(format!("# {title}")),
        html: None,
        metadata: Default::default(),
    }
}

pub fn tick(state: AppState, now: Duration) -> (AppState, Vec<Effect>) {
    update(state, Msg::Tick { now })
}

pub fn list_seq(effects: &[Effect]) -> RequestSeq {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchJobs { seq } => Some(*seq),
            _ => None,
        })
        .expect("fetch jobs effect")
}

pub fn job_seq(effects: &[Effect]) -> RequestSeq {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchJob { seq, .. } => Some(*seq),
            _ => None,
        })
        .expect("fetch job effect")
}

pub fn docs_seq(effects: &[Effect]) -> RequestSeq {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchDocuments {
                query: None, seq, ..
            } => Some(*seq),
            _ => None,
        })
        .expect("fetch documents effect")
}

pub fn search_request(effects: &[Effect]) -> Option<(String, RequestSeq)> {
    effects.iter().find_map(|effect| match effect {
        Effect::FetchDocuments {
            query: Some(query),
            seq,
            ..
        } => Some((query.clone(), *seq)),
        _ => None,
    })
}

/// Starts the app and answers the initial list request with `jobs`.
pub fn loaded_with(state: AppState, jobs: Vec<Job>) -> AppState {
    let (state, effects) = update(state, Msg::Started);
    let seq = list_seq(&effects);
    let (state, _) = update(state, Msg::JobsLoaded { seq, result: Ok(jobs) });
    state
}

/// Opens `id` and answers both detail requests.
pub fn opened_with(state: AppState, job: Job, documents: Vec<Document>) -> AppState {
    let job_id = job.id.clone();
    let (state, effects) = update(state, Msg::JobSelected(job_id.clone()));
    let (state, _) = update(
        state,
        Msg::JobLoaded {
            job_id: job_id.clone(),
            seq: job_seq(&effects),
            result: Ok(job),
        },
    );
    let (state, _) = update(
        state,
        Msg::DocumentsLoaded {
            job_id,
            seq: docs_seq(&effects),
            result: Ok(documents),
        },
    );
    state
}
