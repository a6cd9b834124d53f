use std::sync::{mpsc, Arc};
use std::thread;

use crawldash_client::{ReqwestJobService, ServiceError, ServiceEvent, ServiceHandle, ServiceSettings};
use crawldash_core::{Effect, FailureKind, FetchFailure, Msg};
use crawldash_logging::{dash_debug, dash_info, dash_warn};

use super::app::AppEvent;

/// Executes core effects against the remote service and feeds completions
/// back into the message loop.
pub struct EffectRunner {
    service: ServiceHandle,
}

impl EffectRunner {
    pub fn new(settings: ServiceSettings, event_tx: mpsc::Sender<AppEvent>) -> Result<Self, ServiceError> {
        dash_info!("using job service at {}", settings.base_url);
        let service = Arc::new(ReqwestJobService::new(settings)?);
        let (handle, events) = ServiceHandle::spawn(service)?;
        spawn_event_pump(events, event_tx);
        Ok(Self { service: handle })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CreateJob { request } => {
                    dash_info!(
                        "CreateJob url={} limit={} formats={}",
                        request.url(),
                        request.limit(),
                        request.formats()
                    );
                    self.service.create_job(request);
                }
                Effect::FetchJobs { seq } => {
                    dash_debug!("FetchJobs #{}", seq.value());
                    self.service.list_jobs(seq);
                }
                Effect::FetchJob { job_id, seq } => {
                    dash_debug!("FetchJob {} #{}", job_id, seq.value());
                    self.service.get_job(job_id, seq);
                }
                Effect::FetchDocuments { job_id, query, seq } => {
                    dash_debug!("FetchDocuments {} q={:?} #{}", job_id, query, seq.value());
                    self.service.list_documents(job_id, query, seq);
                }
            }
        }
    }
}

fn spawn_event_pump(events: mpsc::Receiver<ServiceEvent>, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = events.recv() {
            if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: ServiceEvent) -> Msg {
    match event {
        ServiceEvent::JobCreated { result } => Msg::JobCreated(result.map_err(map_failure)),
        ServiceEvent::JobsListed { seq, result } => Msg::JobsLoaded {
            seq,
            result: result.map_err(map_failure),
        },
        ServiceEvent::JobFetched {
            job_id,
            seq,
            result,
        } => Msg::JobLoaded {
            job_id,
            seq,
            result: result.map_err(map_failure),
        },
        ServiceEvent::DocumentsListed {
            job_id,
            query: Some(query),
            seq,
            result,
        } => Msg::SearchLoaded {
            job_id,
            query,
            seq,
            result: result.map_err(map_failure),
        },
        ServiceEvent::DocumentsListed {
            job_id,
            query: None,
            seq,
            result,
        } => Msg::DocumentsLoaded {
            job_id,
            seq,
            result: result.map_err(map_failure),
        },
    }
}

fn map_failure(err: ServiceError) -> FetchFailure {
    let kind = match &err {
        ServiceError::InvalidUrl(_) | ServiceError::Runtime(_) => FailureKind::InvalidRequest,
        ServiceError::Connection(_) => FailureKind::Connection,
        ServiceError::Timeout(_) => FailureKind::Timeout,
        ServiceError::HttpStatus { status } => FailureKind::HttpStatus(*status),
        ServiceError::Decode(_) => FailureKind::Decode,
    };
    if matches!(kind, FailureKind::Decode) {
        dash_warn!("service returned an unreadable body: {}", err);
    }
    FetchFailure::new(kind, err.to_string())
}
