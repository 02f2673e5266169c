// src/health/cache.rs
use super::describe::Describe;
use super::evaluator::Evaluation;
use super::status::Status;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Latest evaluation, swapped in whole so readers never see half a pass.
pub struct StatusCache {
    current: ArcSwap<Evaluation>,
    next_generation: AtomicU64,
    describer: Arc<dyn Describe>,
}

impl StatusCache {
    pub fn new(describer: Arc<dyn Describe>) -> Self {
        Self {
            current: ArcSwap::from_pointee(Evaluation::empty()),
            next_generation: AtomicU64::new(1),
            describer,
        }
    }

    /// Cached status for `id`, or a fresh `unknown` placeholder that is not
    /// stored.
    pub fn get(&self, id: &str) -> Arc<Status> {
        match self.current.load().get(id) {
            Some(status) => status.clone(),
            None => Arc::new(Status::placeholder(id, self.describer.as_ref())),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.current.load().get(id).is_some()
    }

    pub fn snapshot(&self) -> Arc<Evaluation> {
        self.current.load_full()
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }

    /// Reserve the generation number for the next pass. Numbers are unique
    /// across every evaluator sharing this cache.
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// Swap in `evaluation` unless an equal or later generation is already
    /// published. Returns whether it was stored.
    pub fn publish(&self, evaluation: Arc<Evaluation>) -> bool {
        let mut stored = false;
        self.current.rcu(|current| {
            stored = evaluation.generation() > current.generation();
            if stored {
                evaluation.clone()
            } else {
                current.clone()
            }
        });
        stored
    }
}
