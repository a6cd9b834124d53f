use chrono::{DateTime, Utc};

use crate::{DocumentId, Job, JobId, JobStatus, Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub jobs: Vec<JobRowView>,
    /// True until the first list response (success or failure) arrives.
    pub jobs_loading: bool,
    pub creating: bool,
    pub detail: Option<DetailViewModel>,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub url: String,
    pub status: JobStatus,
    pub total_docs: Option<u64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobRowView {
    pub(crate) fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id.clone(),
            url: job.url.clone(),
            status: job.status,
            total_docs: job.total_docs,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewModel {
    /// `None` while the job is neither cached nor fetched yet.
    pub job: Option<JobRowView>,
    pub documents_loading: bool,
    pub documents: Vec<DocumentRowView>,
    pub query: String,
    /// Empty when nothing is selected or the selection is not displayed.
    pub preview: Option<DocumentPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRowView {
    pub document_id: DocumentId,
    pub title: String,
    pub url: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPreview {
    pub document_id: DocumentId,
    pub heading: String,
    pub markdown: String,
    pub html: String,
    /// Pretty-printed JSON.
    pub metadata: String,
}
