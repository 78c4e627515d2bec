//! Parallel processing utilities

use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Progress update information for parallel operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Map over a slice, on the rayon pool when `parallel` is set.
/// Output order always matches input order.
pub fn map_items<T, F, R>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Like [`map_items`], reporting each finished item
pub fn map_items_with_progress<T, F, R, P>(items: &[T], parallel: bool, f: F, progress_callback: P) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = AtomicUsize::new(0);

    map_items(items, parallel, |item| {
        let result = f(item);
        let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
        progress_callback(ProgressUpdate::new(
            current,
            total,
            format!("Processing item {}/{}", current, total),
        ));
        result
    })
}
