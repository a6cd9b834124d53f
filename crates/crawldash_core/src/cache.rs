use std::collections::HashMap;

use crate::model::{reconcile_job, Job, JobId};

/// Canonical in-memory job set used for rendering, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobCache {
    jobs: Vec<Job>,
    index: HashMap<JobId, usize>,
}

impl JobCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole set with a list response. Jobs already known to be
    /// terminal keep their terminal state.
    pub fn replace_all(&mut self, incoming: Vec<Job>) {
        let jobs: Vec<Job> = incoming
            .into_iter()
            .map(|job| {
                let previous = self.get_by_id(&job.id);
                reconcile_job(previous, job)
            })
            .collect();
        self.jobs = jobs;
        self.rebuild_index();
    }

    /// Makes a just-created job visible ahead of the next list poll.
    pub fn insert_created(&mut self, job: Job) {
        if let Some(&position) = self.index.get(&job.id) {
            self.jobs.remove(position);
        }
        self.jobs.insert(0, job);
        self.rebuild_index();
    }

    pub fn get_by_id(&self, id: &JobId) -> Option<&Job> {
        self.index.get(id).map(|&position| &self.jobs[position])
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn has_running(&self) -> bool {
        self.jobs.iter().any(Job::is_active)
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .jobs
            .iter()
            .enumerate()
            .map(|(position, job)| (job.id.clone(), position))
            .collect();
    }
}
