//! Worker draft store.
//!
//! The draft is the operator's unsaved worker-pool configuration. It only
//! flows one way: it is copied into an [`ApplyConfigRequest`] when applied,
//! and backend state is never pulled back into it.

use sparkdeck_core::{ApplyConfigRequest, Cores, Memory, WorkerSpec};
use thiserror::Error;

/// A cluster needs at least this many workers.
pub const MIN_WORKERS: usize = 1;

/// Rejected draft edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Cannot remove last worker. Cluster needs at least {MIN_WORKERS} worker.")]
    LastWorker,

    #[error("No worker at position {position} (draft has {len})")]
    OutOfRange { position: usize, len: usize },
}

/// A single-field edit to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerField {
    Memory(Memory),
    Cores(Cores),
}

/// Display model for one draft entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRow {
    pub position: usize,
    pub label: String,
    pub memory: Memory,
    pub cores: Cores,
}

/// Ordered, never-empty list of worker specs being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerDraft {
    workers: Vec<WorkerSpec>,
}

impl Default for WorkerDraft {
    fn default() -> Self {
        Self::new(vec![WorkerSpec::default(); 2])
    }
}

impl WorkerDraft {
    /// Create a draft from initial entries. An empty list yields one default worker.
    pub fn new(initial: Vec<WorkerSpec>) -> Self {
        let workers = if initial.is_empty() {
            vec![WorkerSpec::default()]
        } else {
            initial
        };
        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Always false; the draft holds at least [`MIN_WORKERS`] entries.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&WorkerSpec> {
        self.workers.get(position)
    }

    pub fn workers(&self) -> &[WorkerSpec] {
        &self.workers
    }

    /// Replace one field of the worker at `position`.
    ///
    /// Returns false and changes nothing when `position` is out of range.
    pub fn update(&mut self, position: usize, field: WorkerField) -> bool {
        let Some(worker) = self.workers.get_mut(position) else {
            return false;
        };
        match field {
            WorkerField::Memory(memory) => worker.memory = memory,
            WorkerField::Cores(cores) => worker.cores = cores,
        }
        true
    }

    /// Append a default `{1g, 1 core}` worker and return the new length.
    pub fn append(&mut self) -> usize {
        self.workers.push(WorkerSpec::default());
        self.workers.len()
    }

    /// Remove the worker at `position`, shifting later workers down.
    ///
    /// A stale `position` reports `OutOfRange` even on a one-worker draft.
    pub fn remove(&mut self, position: usize) -> Result<WorkerSpec, DraftError> {
        if position >= self.workers.len() {
            return Err(DraftError::OutOfRange {
                position,
                len: self.workers.len(),
            });
        }
        if self.workers.len() <= MIN_WORKERS {
            return Err(DraftError::LastWorker);
        }
        Ok(self.workers.remove(position))
    }

    /// Rows to render, one per entry, labelled by 1-based position.
    pub fn rows(&self) -> Vec<WorkerRow> {
        self.workers
            .iter()
            .enumerate()
            .map(|(position, worker)| WorkerRow {
                position,
                label: format!("Worker {}", position + 1),
                memory: worker.memory,
                cores: worker.cores,
            })
            .collect()
    }

    /// Copy the draft into an apply request.
    ///
    /// The request owns its data, so later edits do not affect a submission
    /// already in flight.
    pub fn snapshot(&self) -> ApplyConfigRequest {
        ApplyConfigRequest {
            workers: self
                .workers
                .iter()
                .map(|w| WorkerSpec::new(w.memory, w.cores))
                .collect(),
        }
    }
}
