use std::time::Duration;

use crate::model::Document;
use crate::poll::{RequestSeq, SeqCounter};

/// What the caller should do after the query changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// Show the unfiltered set; no request.
    UseCached,
    /// Issue a filtered fetch now.
    Fetch { query: String, seq: RequestSeq },
    /// Wait for the debounce to expire.
    Deferred,
    /// Same query as before; nothing to do.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingQuery {
    query: String,
    due: Duration,
}

/// Maps the query box of one open job to either the cached document set or a
/// server-filtered view. The filtered view never touches the cached set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCoordinator {
    query: String,
    pending: Option<PendingQuery>,
    seq: SeqCounter,
    filtered: Option<Vec<Document>>,
    /// The last filtered fetch for `query` failed; a retry is pending.
    failed: bool,
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trimmed active query, empty when no filter applies.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn set_query(&mut self, raw: &str, now: Duration, debounce: Duration) -> SearchAction {
        let query = raw.trim();
        if query.is_empty() {
            self.query.clear();
            self.pending = None;
            self.filtered = None;
            self.failed = false;
            // Anything still in flight answers an outdated query.
            self.seq.issue();
            return SearchAction::UseCached;
        }
        if query == self.query && !self.failed {
            return SearchAction::Unchanged;
        }
        self.failed = false;

        self.query = query.to_string();
        if debounce.is_zero() {
            self.pending = None;
            let seq = self.seq.issue();
            return SearchAction::Fetch {
                query: self.query.clone(),
                seq,
            };
        }
        self.pending = Some(PendingQuery {
            query: self.query.clone(),
            due: now + debounce,
        });
        SearchAction::Deferred
    }

    /// Releases a debounced query once its time has come.
    pub fn poll(&mut self, now: Duration) -> Option<(String, RequestSeq)> {
        match &self.pending {
            Some(pending) if now >= pending.due => {
                let query = pending.query.clone();
                self.pending = None;
                Some((query, self.seq.issue()))
            }
            _ => None,
        }
    }

    /// Re-issues the active query after the unfiltered set changed. A pending
    /// debounced query will be issued by `poll` instead.
    pub fn refresh(&mut self) -> Option<(String, RequestSeq)> {
        if !self.is_active() || self.pending.is_some() {
            return None;
        }
        Some((self.query.clone(), self.seq.issue()))
    }

    /// Applies a filtered response if it answers the most recent request.
    pub fn accept(&mut self, query: &str, seq: RequestSeq, documents: Vec<Document>) -> bool {
        if !self.answers_latest(query, seq) {
            return false;
        }
        self.seq.accept(seq);
        self.filtered = Some(documents);
        self.failed = false;
        true
    }

    /// Records a failed filtered fetch and schedules the same query again at
    /// `retry_at`. Earlier filtered results stay displayed.
    pub fn fail(&mut self, query: &str, seq: RequestSeq, retry_at: Duration) -> bool {
        if !self.answers_latest(query, seq) {
            return false;
        }
        self.seq.accept(seq);
        self.failed = true;
        self.pending = Some(PendingQuery {
            query: self.query.clone(),
            due: retry_at,
        });
        true
    }

    /// Forgets the query and its results while keeping the request counter,
    /// so answers to earlier requests can never apply again.
    pub fn reset(&mut self) {
        self.query.clear();
        self.pending = None;
        self.filtered = None;
        self.failed = false;
        self.seq.close_window();
    }

    pub fn answers_latest(&self, query: &str, seq: RequestSeq) -> bool {
        self.seq.is_latest(seq) && self.pending.is_none() && query == self.query
    }

    /// Documents to display, given the unfiltered set for the job.
    pub fn displayed<'a>(&'a self, cached: &'a [Document]) -> &'a [Document] {
        match &self.filtered {
            Some(filtered) if self.is_active() => filtered,
            _ => cached,
        }
    }
}
