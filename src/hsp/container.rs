use std::cmp::{Ordering, Reverse};

use super::Hsp;

/// Ordered collection of HSPs handed from one pass to the next.
///
/// Each worker fills its own container; [`HspContainer::merge`] joins them
/// after the dispatch barrier into a canonically sorted, duplicate-free
/// container so that retrieval by index does not depend on scheduling.
#[derive(Debug, Clone, Default)]
pub struct HspContainer {
    hsps: Vec<Hsp>,
}

fn canonical_order(a: &Hsp, b: &Hsp) -> Ordering {
    (a.q_idx, a.s_idx, a.q_start, a.q_stop, a.s_start, a.s_stop)
        .cmp(&(b.q_idx, b.s_idx, b.q_start, b.q_stop, b.s_start, b.s_stop))
        .then_with(|| Reverse(a.score).cmp(&Reverse(b.score)))
        .then_with(|| (a.anchor_q, a.anchor_s).cmp(&(b.anchor_q, b.anchor_s)))
}

impl HspContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hsp: Hsp) {
        self.hsps.push(hsp);
    }

    pub fn len(&self) -> usize {
        self.hsps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hsps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Hsp> {
        self.hsps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hsp> {
        self.hsps.iter()
    }

    /// HSPs owned by `worker` out of `workers`: every `workers`-th record
    /// starting at `worker`. The stripes of all workers partition the
    /// container.
    pub fn stripe(&self, worker: usize, workers: usize) -> impl Iterator<Item = &Hsp> {
        self.hsps.iter().skip(worker).step_by(workers.max(1))
    }

    /// Number of records in the stripe of `worker`.
    pub fn stripe_len(&self, worker: usize, workers: usize) -> usize {
        let workers = workers.max(1);
        if worker >= self.hsps.len() {
            0
        } else {
            (self.hsps.len() - worker).div_ceil(workers)
        }
    }

    /// Concatenates per-worker containers, then sorts and drops records
    /// covering the same region twice (the best score survives).
    pub fn merge(parts: impl IntoIterator<Item = HspContainer>) -> HspContainer {
        let mut hsps: Vec<Hsp> = parts.into_iter().flat_map(|c| c.hsps).collect();
        hsps.sort_unstable_by(canonical_order);
        hsps.dedup_by(|later, kept| kept.same_region(later));
        HspContainer { hsps }
    }

    /// Drops every HSP lying inside another HSP of the same sequence pair.
    pub fn remove_contained(&mut self) {
        let before = self.hsps.len();
        let mut kept: Vec<Hsp> = Vec::with_capacity(before);

        for group in self.hsps.chunk_by(|a, b| a.q_idx == b.q_idx && a.s_idx == b.s_idx) {
            let mut by_size: Vec<Hsp> = group.to_vec();
            // larger regions first so containers are kept before what they contain
            by_size.sort_by(|a, b| {
                let size = |h: &Hsp| h.query_range().len() as u64 + h.subject_range().len() as u64;
                size(b).cmp(&size(a)).then_with(|| canonical_order(a, b))
            });
            let mut survivors: Vec<Hsp> = Vec::with_capacity(by_size.len());
            for hsp in by_size {
                if !survivors.iter().any(|s| s.includes(&hsp)) {
                    survivors.push(hsp);
                }
            }
            kept.extend(survivors);
        }

        kept.sort_unstable_by(canonical_order);
        log::debug!("Removed {} contained HSPs", before - kept.len());
        self.hsps = kept;
    }
}

impl FromIterator<Hsp> for HspContainer {
    fn from_iter<I: IntoIterator<Item = Hsp>>(iter: I) -> Self {
        let mut hsps: Vec<Hsp> = iter.into_iter().collect();
        hsps.sort_unstable_by(canonical_order);
        Self { hsps }
    }
}
