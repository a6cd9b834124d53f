use crate::model::{Document, DocumentId, JobId};

/// Which job and document the user is looking at. Holds ids only; the
/// entities are looked up again on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    job: Option<JobId>,
    document: Option<DocumentId>,
}

impl Selection {
    pub fn job(&self) -> Option<&JobId> {
        self.job.as_ref()
    }

    pub fn document(&self) -> Option<&DocumentId> {
        self.document.as_ref()
    }

    /// Focuses a job. Any document selection belongs to the previous job and
    /// is dropped.
    pub fn select_job(&mut self, job_id: JobId) {
        self.job = Some(job_id);
        self.document = None;
    }

    /// Focuses a document of the open job. Ignored while no job is open.
    pub fn select_document(&mut self, document_id: DocumentId) -> bool {
        if self.job.is_none() {
            return false;
        }
        self.document = Some(document_id);
        true
    }

    pub fn clear(&mut self) {
        self.job = None;
        self.document = None;
    }

    /// Drops the document selection if it is not part of `documents`.
    /// Returns true when the selection was reset.
    pub fn retain_document(&mut self, documents: &[Document]) -> bool {
        match &self.document {
            Some(selected) if !documents.iter().any(|doc| &doc.id == selected) => {
                self.document = None;
                true
            }
            _ => false,
        }
    }

    /// Resolves the selected document against the displayed set.
    pub fn resolve_document<'a>(&self, documents: &'a [Document]) -> Option<&'a Document> {
        let selected = self.document.as_ref()?;
        documents.iter().find(|doc| &doc.id == selected)
    }
}
