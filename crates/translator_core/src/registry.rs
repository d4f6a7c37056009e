use std::collections::BTreeMap;

use crate::{JobId, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("job {0} is already registered")]
    DuplicateJob(JobId),
    #[error("{node} already has job {job_id} in flight")]
    NodeBusy { node: NodeId, job_id: JobId },
}

/// Outstanding jobs keyed by id. Holds node handles only; whether the node is
/// still in the page is checked by whoever mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobRegistry {
    jobs: BTreeMap<JobId, NodeId>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, job_id: JobId, node: NodeId) -> Result<(), RegistryError> {
        if self.jobs.contains_key(&job_id) {
            return Err(RegistryError::DuplicateJob(job_id));
        }
        if let Some(existing) = self.job_for(node) {
            return Err(RegistryError::NodeBusy {
                node,
                job_id: existing,
            });
        }
        self.jobs.insert(job_id, node);
        Ok(())
    }

    /// Looks up and removes the job. `None` means it was already resolved or
    /// dropped by a reset.
    pub fn resolve(&mut self, job_id: &JobId) -> Option<NodeId> {
        self.jobs.remove(job_id)
    }

    /// Drops every mapping and returns how many were live.
    pub fn clear(&mut self) -> usize {
        let dropped = self.jobs.len();
        self.jobs.clear();
        dropped
    }

    pub fn job_for(&self, node: NodeId) -> Option<JobId> {
        self.jobs
            .iter()
            .find_map(|(job_id, tracked)| (*tracked == node).then_some(*job_id))
    }

    pub fn is_tracking(&self, node: NodeId) -> bool {
        self.job_for(node).is_some()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
