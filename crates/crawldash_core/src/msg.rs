use std::time::Duration;

use crate::{Document, DocumentId, FetchFailure, Job, JobId, RequestSeq};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Driver started; loads the job list once.
    Started,
    /// Scheduler tick carrying the driver's monotonic time.
    Tick { now: Duration },
    /// User submitted the creation form.
    CreateJobSubmitted {
        url: String,
        limit: u32,
        formats: String,
    },
    /// User opened a job's detail view.
    JobSelected(JobId),
    /// User picked a document in the detail view.
    DocumentSelected(DocumentId),
    /// User edited the search box.
    SearchChanged(String),
    /// User left the detail view.
    BackClicked,
    /// User asked for a list refresh.
    RefreshClicked,
    /// User dismissed the current notice.
    DismissNotice,
    /// Creation request completed.
    JobCreated(Result<Job, FetchFailure>),
    /// Job list request completed.
    JobsLoaded {
        seq: RequestSeq,
        result: Result<Vec<Job>, FetchFailure>,
    },
    /// Single job request completed.
    JobLoaded {
        job_id: JobId,
        seq: RequestSeq,
        result: Result<Job, FetchFailure>,
    },
    /// Unfiltered document request completed.
    DocumentsLoaded {
        job_id: JobId,
        seq: RequestSeq,
        result: Result<Vec<Document>, FetchFailure>,
    },
    /// Filtered document request completed.
    SearchLoaded {
        job_id: JobId,
        query: String,
        seq: RequestSeq,
        result: Result<Vec<Document>, FetchFailure>,
    },
}
