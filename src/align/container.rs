//! Final alignments, grouped for output.

use std::sync::Mutex;

use rustc_hash::FxHashSet;

use super::alignment::Alignment;
use crate::common::{compare_subject_groups, score_compare_alignments, Range, SubjectGroupKey};
use crate::post::{AlignmentFilter, AlignmentVisitor};

type AlignmentKey = (u32, u32, Range, Range, i8);

#[derive(Debug, Default)]
struct Inner<'db> {
    alignments: Vec<Alignment<'db>>,
    seen: FxHashSet<AlignmentKey>,
}

/// Thread-safe set of alignments. Inserting an alignment whose region is
/// already present is a no-op.
#[derive(Debug, Default)]
pub struct AlignmentContainer<'db> {
    inner: Mutex<Inner<'db>>,
}

impl<'db> AlignmentContainer<'db> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                alignments: Vec::new(),
                seen: FxHashSet::default(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<'db>> {
        // insertion keeps `alignments` and `seen` consistent before any panic point
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Returns false when the region was already present.
    pub fn insert(&self, alignment: Alignment<'db>) -> bool {
        let mut inner = self.lock();
        if !inner.seen.insert(alignment.key()) {
            return false;
        }
        inner.alignments.push(alignment);
        true
    }

    pub fn len(&self) -> usize {
        self.lock().alignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves every alignment of `others` into one container.
    pub fn merge(others: impl IntoIterator<Item = AlignmentContainer<'db>>) -> Self {
        let merged = Self::new();
        for other in others {
            for a in other.into_alignments() {
                merged.insert(a);
            }
        }
        merged
    }

    /// Drops alignments the filter rejects; returns how many were removed.
    pub fn filter(&self, filter: &AlignmentFilter) -> usize {
        let mut inner = self.lock();
        let before = inner.alignments.len();
        let Inner { alignments, seen } = &mut *inner;
        alignments.retain(|a| {
            let keep = filter.accepts(a);
            if !keep {
                seen.remove(&a.key());
            }
            keep
        });
        before - inner.alignments.len()
    }

    /// Alignments in traversal order, see [`AlignmentContainer::accept`].
    pub fn sorted(&self) -> Vec<Alignment<'db>> {
        let mut alignments = self.lock().alignments.clone();
        sort_for_output(&mut alignments);
        alignments
    }

    pub fn into_alignments(self) -> Vec<Alignment<'db>> {
        self.inner
            .into_inner()
            .unwrap_or_else(|p| p.into_inner())
            .alignments
    }

    /// Walks the alignments grouped by query (index order), then subject
    /// (best e-value first), then by descending score.
    pub fn accept(&self, visitor: &mut dyn AlignmentVisitor<'db>) -> std::io::Result<()> {
        let alignments = self.sorted();
        for query_group in alignments.chunk_by(|a, b| a.query.index == b.query.index) {
            visitor.visit_query_sequence(&query_group[0].query)?;
            for subject_group in query_group.chunk_by(|a, b| a.subject.index == b.subject.index) {
                visitor.visit_subject_sequence(&subject_group[0].subject)?;
                for a in subject_group {
                    visitor.visit_alignment(a)?;
                }
            }
        }
        visitor.end()
    }
}

fn sort_for_output(alignments: &mut [Alignment<'_>]) {
    // group key of every subject within its query
    let mut keys: rustc_hash::FxHashMap<(u32, u32), SubjectGroupKey> = Default::default();
    alignments.sort_by_key(|a| (a.query.index, a.subject.index));
    for group in alignments.chunk_by(|a, b| {
        a.query.index == b.query.index && a.subject.index == b.subject.index
    }) {
        if let Some(key) = SubjectGroupKey::from_alignments(group) {
            keys.insert((group[0].query.index, key.s_idx), key);
        }
    }
    alignments.sort_by(|a, b| {
        a.query.index
            .cmp(&b.query.index)
            .then_with(|| {
                match (
                    keys.get(&(a.query.index, a.subject.index)),
                    keys.get(&(b.query.index, b.subject.index)),
                ) {
                    (Some(ka), Some(kb)) => compare_subject_groups(ka, kb),
                    _ => a.subject.index.cmp(&b.subject.index),
                }
            })
            .then_with(|| score_compare_alignments(a, b))
    });
}
