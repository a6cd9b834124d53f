use std::sync::{mpsc, Arc};
use std::thread;

use crawldash_core::{CreateJobRequest, Document, Job, JobId, RequestSeq};
use crawldash_logging::{dash_debug, dash_warn};

use crate::{JobService, ServiceError};

enum ServiceCommand {
    CreateJob {
        request: CreateJobRequest,
    },
    ListJobs {
        seq: RequestSeq,
    },
    GetJob {
        job_id: JobId,
        seq: RequestSeq,
    },
    ListDocuments {
        job_id: JobId,
        query: Option<String>,
        seq: RequestSeq,
    },
}

/// Completion of a request issued through [`ServiceHandle`].
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceEvent {
    JobCreated {
        result: Result<Job, ServiceError>,
    },
    JobsListed {
        seq: RequestSeq,
        result: Result<Vec<Job>, ServiceError>,
    },
    JobFetched {
        job_id: JobId,
        seq: RequestSeq,
        result: Result<Job, ServiceError>,
    },
    DocumentsListed {
        job_id: JobId,
        query: Option<String>,
        seq: RequestSeq,
        result: Result<Vec<Document>, ServiceError>,
    },
}

/// Runs service requests on a background tokio runtime. Requests never block
/// the caller; every request produces exactly one [`ServiceEvent`], in
/// completion order.
#[derive(Clone)]
pub struct ServiceHandle {
    cmd_tx: mpsc::Sender<ServiceCommand>,
}

impl ServiceHandle {
    pub fn spawn(
        service: Arc<dyn JobService>,
    ) -> Result<(Self, mpsc::Receiver<ServiceEvent>), ServiceError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ServiceCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("crawldash-service")
            .build()
            .map_err(|err| ServiceError::Runtime(err.to_string()))?;

        thread::Builder::new()
            .name("crawldash-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let service = service.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = handle_command(service.as_ref(), command).await;
                        if event_tx.send(event).is_err() {
                            dash_debug!("service event dropped; receiver closed");
                        }
                    });
                }
            })
            .map_err(|err| ServiceError::Runtime(err.to_string()))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn create_job(&self, request: CreateJobRequest) {
        self.send(ServiceCommand::CreateJob { request });
    }

    pub fn list_jobs(&self, seq: RequestSeq) {
        self.send(ServiceCommand::ListJobs { seq });
    }

    pub fn get_job(&self, job_id: JobId, seq: RequestSeq) {
        self.send(ServiceCommand::GetJob { job_id, seq });
    }

    pub fn list_documents(&self, job_id: JobId, query: Option<String>, seq: RequestSeq) {
        self.send(ServiceCommand::ListDocuments { job_id, query, seq });
    }

    fn send(&self, command: ServiceCommand) {
        if self.cmd_tx.send(command).is_err() {
            dash_warn!("service dispatcher is gone; request dropped");
        }
    }
}

async fn handle_command(service: &dyn JobService, command: ServiceCommand) -> ServiceEvent {
    match command {
        ServiceCommand::CreateJob { request } => ServiceEvent::JobCreated {
            result: service.create_job(&request).await,
        },
        ServiceCommand::ListJobs { seq } => ServiceEvent::JobsListed {
            seq,
            result: service.list_jobs().await,
        },
        ServiceCommand::GetJob { job_id, seq } => {
            let result = service.get_job(&job_id).await;
            ServiceEvent::JobFetched {
                job_id,
                seq,
                result,
            }
        }
        ServiceCommand::ListDocuments { job_id, query, seq } => {
            let result = service.list_documents(&job_id, query.as_deref()).await;
            ServiceEvent::DocumentsListed {
                job_id,
                query,
                seq,
                result,
            }
        }
    }
}
