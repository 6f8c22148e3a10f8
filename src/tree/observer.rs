use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tracing::warn;

use super::*;

/// A subtree rebuild triggered by [`NestedDissectionTree::add_edge`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recomputation {
    /// Root of the rebuilt subtree
    pub root: TreeNodeId,
    /// Depth at which the subtree was rebuilt
    pub depth: usize,
    /// Number of graph nodes in the rebuilt subtree
    pub nodes: usize,
    /// Wall time spent rebuilding
    pub duration: Duration,
}

/// Receives every [`Recomputation`] of a tree it is attached to
pub trait RecomputationObserver: Send {
    fn on_recomputation(&mut self, recomputation: &Recomputation);
}

impl<O: RecomputationObserver> RecomputationObserver for Arc<Mutex<O>> {
    fn on_recomputation(&mut self, recomputation: &Recomputation) {
        let mut observer = self.lock().unwrap_or_else(|poisoned| {
            warn!("recomputation observer lock was poisoned, recovering");
            poisoned.into_inner()
        });
        observer.on_recomputation(recomputation);
    }
}

/// Observer that records all recomputations and summarizes depth and time
#[derive(Debug, Clone, Default)]
pub struct RecomputationLog {
    entries: Vec<Recomputation>,
}

impl RecomputationObserver for RecomputationLog {
    fn on_recomputation(&mut self, recomputation: &Recomputation) {
        self.entries.push(*recomputation);
    }
}

impl RecomputationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded recomputations in the order they happened
    pub fn entries(&self) -> &[Recomputation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean depth of all rebuilds, `None` if nothing was recorded
    pub fn mean_depth(&self) -> Option<f64> {
        mean(self.entries.iter().map(|r| r.depth as f64))
    }

    /// Population standard deviation of the rebuild depth
    pub fn depth_std_dev(&self) -> Option<f64> {
        std_dev(self.entries.iter().map(|r| r.depth as f64))
    }

    /// Mean wall time of all rebuilds
    pub fn mean_duration(&self) -> Option<Duration> {
        mean(self.entries.iter().map(|r| r.duration.as_secs_f64())).map(Duration::from_secs_f64)
    }

    /// Population standard deviation of the rebuild time
    pub fn duration_std_dev(&self) -> Option<Duration> {
        std_dev(self.entries.iter().map(|r| r.duration.as_secs_f64()))
            .map(Duration::from_secs_f64)
    }

    /// Total number of graph nodes passed through rebuilds
    pub fn total_nodes(&self) -> usize {
        self.entries.iter().map(|r| r.nodes).sum()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (count, sum) = values.fold((0usize, 0.0), |(c, s), x| (c + 1, s + x));
    (count > 0).then(|| sum / count as f64)
}

fn std_dev(values: impl Iterator<Item = f64> + Clone) -> Option<f64> {
    let mu = mean(values.clone())?;
    let variance = mean(values.map(|x| (x - mu) * (x - mu)))?;
    Some(variance.sqrt())
}
