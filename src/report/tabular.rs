//! Tab-separated alignment report.
//!
//! Columns: query id, subject id, percent identity, alignment length,
//! mismatches, gap openings, query start, query end, subject start,
//! subject end, e-value, bit score. The extended layout appends query
//! length, query gap openings, query frame, subject length, subject gap
//! openings, subject frame and positives.

use std::io::{self, Write};

use crate::align::Alignment;
use crate::post::AlignmentVisitor;

/// E-value text: `0.0` below 1e-180, two-digit scientific notation below
/// 0.0009, fixed notation above.
pub fn format_evalue(e_value: f64) -> String {
    if e_value < 1.0e-180 {
        "0.0".to_string()
    } else if e_value < 0.0009 {
        format!("{:.2e}", e_value)
    } else if e_value < 0.1 {
        format!("{:.3}", e_value)
    } else if e_value < 1.0 {
        format!("{:.2}", e_value)
    } else if e_value < 10.0 {
        format!("{:.1}", e_value)
    } else {
        format!("{:.0}", e_value)
    }
}

pub fn format_bit_score(bit_score: f64) -> String {
    if bit_score > 99999.0 {
        format!("{:.3e}", bit_score)
    } else if bit_score > 99.9 {
        format!("{:.0}", bit_score)
    } else {
        format!("{:.1}", bit_score)
    }
}

pub struct TabularWriter<W: Write> {
    out: W,
    extended: bool,
    lines: u64,
}

impl<W: Write> TabularWriter<W> {
    pub fn new(out: W, extended: bool) -> Self {
        Self {
            out,
            extended,
            lines: 0,
        }
    }

    /// Number of alignment lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<'db, W: Write> AlignmentVisitor<'db> for TabularWriter<W> {
    fn visit_alignment(&mut self, a: &Alignment<'db>) -> io::Result<()> {
        let (q_start, q_end) = a.query_display_range();
        let (s_start, s_end) = a.subject_display_range();
        write!(
            self.out,
            "{}\t{}\t{:.2}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            a.query.id(),
            a.subject.id(),
            a.identity_percent(),
            a.length,
            a.mismatches,
            a.gap_openings(),
            q_start,
            q_end,
            s_start,
            s_end,
            format_evalue(a.evalue),
            format_bit_score(a.bit_score),
        )?;
        if self.extended {
            write!(
                self.out,
                "\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                a.query.len(),
                a.query_gap_openings,
                a.query_frame,
                a.subject.len(),
                a.subject_gap_openings,
                a.subject_frame,
                a.positives,
            )?;
        }
        writeln!(self.out)?;
        self.lines += 1;
        Ok(())
    }

    fn end(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
