use std::time::Duration;

use crate::cache::JobCache;
use crate::model::{reconcile_job, Document, Job, JobId};
use crate::poll::{PollController, PollSettings, RequestSeq, SeqCounter};
use crate::search::SearchCoordinator;
use crate::selection::Selection;
use crate::view_model::{
    AppViewModel, DetailViewModel, DocumentPreview, DocumentRowView, JobRowView, Screen,
};

const NO_MARKDOWN: &str = "No markdown content available";
const NO_HTML: &str = "<p>No HTML content available</p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

/// Last user-visible outcome (toast-style message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Data owned by the open detail view. Reset whenever a job is opened or
/// the view is closed; the search request counter carries over.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DetailData {
    pub(crate) job: Option<Job>,
    pub(crate) documents: Option<Vec<Document>>,
    pub(crate) search: SearchCoordinator,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    settings: PollSettings,
    now: Duration,
    ticks: u64,
    cache: JobCache,
    jobs_loaded: bool,
    list_seq: SeqCounter,
    job_seq: SeqCounter,
    docs_seq: SeqCounter,
    poll: PollController,
    selection: Selection,
    detail: DetailData,
    creating: bool,
    notice: Option<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(PollSettings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PollSettings) -> Self {
        Self {
            poll: PollController::new(&settings),
            settings,
            now: Duration::ZERO,
            ticks: 0,
            cache: JobCache::new(),
            jobs_loaded: false,
            list_seq: SeqCounter::default(),
            job_seq: SeqCounter::default(),
            docs_seq: SeqCounter::default(),
            selection: Selection::default(),
            detail: DetailData::default(),
            creating: false,
            notice: None,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn jobs(&self) -> &JobCache {
        &self.cache
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn open_job(&self) -> Option<&JobId> {
        self.selection.job()
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the open detail view should keep polling. The job as last
    /// fetched by the detail stream wins over the list cache; an unknown job
    /// is assumed to be running.
    pub fn detail_running(&self) -> Option<bool> {
        let job_id = self.selection.job()?;
        let job = self.detail.job.as_ref().or_else(|| self.cache.get_by_id(job_id));
        Some(job.map_or(true, Job::is_active))
    }

    /// Documents currently shown in the detail view, after search filtering.
    pub fn displayed_documents(&self) -> &[Document] {
        let cached = self.detail.documents.as_deref().unwrap_or(&[]);
        self.detail.search.displayed(cached)
    }

    pub fn view(&self) -> AppViewModel {
        let jobs = self.cache.jobs().iter().map(JobRowView::from_job).collect();
        let (screen, detail) = match self.selection.job() {
            Some(job_id) => (Screen::Detail, Some(self.detail_view(job_id))),
            None => (Screen::List, None),
        };

        AppViewModel {
            screen,
            jobs,
            jobs_loading: !self.jobs_loaded,
            creating: self.creating,
            detail,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    fn detail_view(&self, job_id: &JobId) -> DetailViewModel {
        let job = self
            .detail
            .job
            .as_ref()
            .or_else(|| self.cache.get_by_id(job_id))
            .map(JobRowView::from_job);
        let displayed = self.displayed_documents();
        let selected_id = self.selection.document();
        let documents = displayed
            .iter()
            .map(|doc| DocumentRowView {
                document_id: doc.id.clone(),
                title: doc.display_title().to_string(),
                url: doc.url.clone(),
                selected: Some(&doc.id) == selected_id,
            })
            .collect();
        let preview = self
            .selection
            .resolve_document(displayed)
            .map(|doc| DocumentPreview {
                document_id: doc.id.clone(),
                heading: match doc.title.as_deref() {
                    Some(title) if !title.trim().is_empty() => title.to_string(),
                    _ => doc.url.clone(),
                },
                markdown: doc
                    .markdown
                    .clone()
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| NO_MARKDOWN.to_string()),
                html: doc
                    .html
                    .clone()
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| NO_HTML.to_string()),
                metadata: serde_json::to_string_pretty(&doc.metadata)
                    .unwrap_or_else(|_| "{}".to_string()),
            });

        DetailViewModel {
            job,
            documents_loading: self.detail.documents.is_none(),
            documents,
            query: self.detail.search.query().to_string(),
            preview,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn advance_clock(&mut self, now: Duration) {
        // Ticks from the driver never go backwards; guard anyway so timers
        // cannot be rewound.
        self.now = self.now.max(now);
        self.ticks += 1;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) -> bool {
        let had_notice = self.notice.take().is_some();
        self.dirty |= had_notice;
        had_notice
    }

    pub(crate) fn begin_create(&mut self) -> bool {
        if self.creating {
            return false;
        }
        self.creating = true;
        self.dirty = true;
        true
    }

    pub(crate) fn finish_create(&mut self, created: Option<Job>) {
        self.creating = false;
        if let Some(job) = created {
            self.cache.insert_created(job);
        }
        self.dirty = true;
    }

    pub(crate) fn issue_list_fetch(&mut self) -> RequestSeq {
        self.poll.list_fetched(self.now);
        self.list_seq.issue()
    }

    pub(crate) fn apply_jobs(&mut self, seq: RequestSeq, jobs: Vec<Job>) -> bool {
        if !self.list_seq.accept(seq) {
            return false;
        }
        self.cache.replace_all(jobs);
        self.jobs_loaded = true;
        self.dirty = true;
        true
    }

    /// Records a failed list request; stale failures are ignored.
    pub(crate) fn list_failed(&mut self, seq: RequestSeq) -> bool {
        if !self.list_seq.accept(seq) {
            return false;
        }
        self.jobs_loaded = true;
        self.dirty = true;
        true
    }

    pub(crate) fn open_detail(&mut self, job_id: JobId) -> (RequestSeq, RequestSeq) {
        self.selection.select_job(job_id);
        self.reset_detail();
        // Responses still in flight belong to a previous detail view.
        self.job_seq.close_window();
        self.docs_seq.close_window();
        self.poll.detail_opened(self.now);
        self.dirty = true;
        (self.job_seq.issue(), self.docs_seq.issue())
    }

    pub(crate) fn close_detail(&mut self) {
        self.selection.clear();
        self.reset_detail();
        self.job_seq.close_window();
        self.docs_seq.close_window();
        self.poll.detail_closed();
        self.dirty = true;
    }

    fn reset_detail(&mut self) {
        let mut search = std::mem::take(&mut self.detail.search);
        search.reset();
        self.detail = DetailData {
            search,
            ..DetailData::default()
        };
    }

    pub(crate) fn issue_detail_fetch(&mut self) -> (RequestSeq, RequestSeq) {
        (self.job_seq.issue(), self.docs_seq.issue())
    }

    pub(crate) fn is_open(&self, job_id: &JobId) -> bool {
        self.selection.job() == Some(job_id)
    }

    pub(crate) fn apply_detail_job(&mut self, job_id: &JobId, seq: RequestSeq, job: Job) -> bool {
        if !self.is_open(job_id) || !self.job_seq.accept(seq) {
            return false;
        }
        let previous = self
            .detail
            .job
            .as_ref()
            .or_else(|| self.cache.get_by_id(job_id));
        let job = reconcile_job(previous, job);
        self.detail.job = Some(job);
        self.dirty = true;
        true
    }

    pub(crate) fn detail_job_failed(&mut self, job_id: &JobId, seq: RequestSeq) -> bool {
        self.is_open(job_id) && self.job_seq.accept(seq)
    }

    pub(crate) fn apply_documents(
        &mut self,
        job_id: &JobId,
        seq: RequestSeq,
        documents: Vec<Document>,
    ) -> bool {
        if !self.is_open(job_id) || !self.docs_seq.accept(seq) {
            return false;
        }
        self.detail.documents = Some(documents);
        self.dirty = true;
        true
    }

    /// Records a failed document request. The first failure ends the loading
    /// state with an empty set; later ones keep the last good set.
    pub(crate) fn documents_failed(&mut self, job_id: &JobId, seq: RequestSeq) -> bool {
        if !self.is_open(job_id) || !self.docs_seq.accept(seq) {
            return false;
        }
        if self.detail.documents.is_none() {
            self.detail.documents = Some(Vec::new());
        }
        self.dirty = true;
        true
    }

    pub(crate) fn search_mut(&mut self) -> &mut SearchCoordinator {
        &mut self.detail.search
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Drops a document selection that is no longer displayed.
    pub(crate) fn reconcile_selection(&mut self) {
        let cached = self.detail.documents.as_deref().unwrap_or(&[]);
        let displayed = self.detail.search.displayed(cached);
        if self.selection.retain_document(displayed) {
            self.dirty = true;
        }
    }

    pub(crate) fn plan_poll(&mut self) -> crate::poll::PollPlan {
        let list_running = self.cache.has_running();
        let detail_running = self.detail_running();
        self.poll.plan(self.now, list_running, detail_running)
    }
}
