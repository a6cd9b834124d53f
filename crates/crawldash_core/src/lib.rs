//! Crawldash core: pure job-tracking state machine and view-model helpers.
//!
//! Everything here is driven by [`update`]; network completions and clock
//! ticks arrive as [`Msg`]s and requests leave as [`Effect`]s.
mod cache;
mod effect;
mod failure;
mod model;
mod msg;
mod poll;
mod search;
mod selection;
mod state;
mod update;
mod view_model;

pub use cache::JobCache;
pub use effect::Effect;
pub use failure::{FailureKind, FetchFailure};
pub use model::{
    reconcile_job, CreateJobError, CreateJobRequest, Document, DocumentId, Job, JobId, JobStatus,
    Metadata, DEFAULT_FORMATS, DEFAULT_LIMIT, DEFAULT_SEED_URL, MAX_LIMIT, MIN_LIMIT, UNTITLED,
};
pub use msg::Msg;
pub use poll::{PollController, PollPlan, PollSettings, PollTimer, RequestSeq, SeqCounter};
pub use search::{SearchAction, SearchCoordinator};
pub use selection::Selection;
pub use state::{AppState, Notice, NoticeSeverity};
pub use update::update;
pub use view_model::{
    AppViewModel, DetailViewModel, DocumentPreview, DocumentRowView, JobRowView, Screen,
};
