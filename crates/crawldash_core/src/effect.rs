use crate::{CreateJobRequest, JobId, RequestSeq};

/// Requests the driver must perform against the remote service. Completions
/// come back as `Msg`s carrying the same `seq`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateJob {
        request: CreateJobRequest,
    },
    FetchJobs {
        seq: RequestSeq,
    },
    FetchJob {
        job_id: JobId,
        seq: RequestSeq,
    },
    /// `query: None` fetches the unfiltered set and answers with
    /// `Msg::DocumentsLoaded`; a query answers with `Msg::SearchLoaded`.
    FetchDocuments {
        job_id: JobId,
        query: Option<String>,
        seq: RequestSeq,
    },
}
