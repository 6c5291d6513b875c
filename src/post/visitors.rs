//! Visitors walked over an alignment container at finalize time.

use std::io;

use crate::align::Alignment;
use crate::sequence::Sequence;

/// Receives alignments grouped by query, then by subject.
pub trait AlignmentVisitor<'db> {
    fn visit_query_sequence(&mut self, _query: &Sequence<'db>) -> io::Result<()> {
        Ok(())
    }

    fn visit_subject_sequence(&mut self, _subject: &Sequence<'db>) -> io::Result<()> {
        Ok(())
    }

    fn visit_alignment(&mut self, alignment: &Alignment<'db>) -> io::Result<()>;

    fn end(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps copies of every visited alignment.
#[derive(Debug, Default)]
pub struct CollectVisitor<'db> {
    pub alignments: Vec<Alignment<'db>>,
}

impl<'db> AlignmentVisitor<'db> for CollectVisitor<'db> {
    fn visit_alignment(&mut self, alignment: &Alignment<'db>) -> io::Result<()> {
        self.alignments.push(alignment.clone());
        Ok(())
    }
}

/// Forwards at most `max_subjects` subjects per query and `max_hsps`
/// alignments per subject to the wrapped visitor; 0 means unlimited.
pub struct MaxHitsVisitor<'v, 'db> {
    inner: &'v mut dyn AlignmentVisitor<'db>,
    max_subjects: usize,
    max_hsps: usize,
    subjects: usize,
    hsps: usize,
    skipping: bool,
}

impl<'v, 'db> MaxHitsVisitor<'v, 'db> {
    pub fn new(inner: &'v mut dyn AlignmentVisitor<'db>, max_subjects: usize, max_hsps: usize) -> Self {
        Self {
            inner,
            max_subjects,
            max_hsps,
            subjects: 0,
            hsps: 0,
            skipping: false,
        }
    }
}

impl<'db> AlignmentVisitor<'db> for MaxHitsVisitor<'_, 'db> {
    fn visit_query_sequence(&mut self, query: &Sequence<'db>) -> io::Result<()> {
        self.subjects = 0;
        self.skipping = false;
        self.inner.visit_query_sequence(query)
    }

    fn visit_subject_sequence(&mut self, subject: &Sequence<'db>) -> io::Result<()> {
        self.subjects += 1;
        self.hsps = 0;
        self.skipping = self.max_subjects > 0 && self.subjects > self.max_subjects;
        if self.skipping {
            return Ok(());
        }
        self.inner.visit_subject_sequence(subject)
    }

    fn visit_alignment(&mut self, alignment: &Alignment<'db>) -> io::Result<()> {
        if self.skipping {
            return Ok(());
        }
        self.hsps += 1;
        if self.max_hsps > 0 && self.hsps > self.max_hsps {
            return Ok(());
        }
        self.inner.visit_alignment(alignment)
    }

    fn end(&mut self) -> io::Result<()> {
        self.inner.end()
    }
}
