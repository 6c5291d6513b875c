//! In-memory sequence database: one concatenated letter buffer plus a table
//! of (comment, offset, length) entries.
//!
//! Every coordinate handed between passes is an absolute offset into the
//! concatenated buffer; [`SequenceDatabase::sequence_at_offset`] maps it back
//! to its owning sequence.

use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fasta;

use super::encoding::Alphabet;

#[derive(Debug, Clone)]
struct Entry {
    comment: String,
    offset: u32,
    length: u32,
}

/// Borrowed view of one database sequence.
#[derive(Debug, Clone, Copy)]
pub struct Sequence<'db> {
    pub index: u32,
    pub comment: &'db str,
    /// Encoded letters.
    pub letters: &'db [u8],
    /// Offset of the first letter in the database buffer.
    pub offset: u32,
}

impl<'db> Sequence<'db> {
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// First word of the comment, used as the sequence identifier.
    pub fn id(&self) -> &'db str {
        self.comment.split_whitespace().next().unwrap_or("")
    }

    /// The absolute offset falls inside this sequence.
    pub fn owns(&self, absolute: u32) -> bool {
        absolute
            .checked_sub(self.offset)
            .is_some_and(|rel| (rel as usize) < self.letters.len())
    }

    /// Sequence-relative position of an absolute database offset.
    #[inline]
    pub fn relative(&self, absolute: u32) -> u32 {
        absolute - self.offset
    }
}

#[derive(Debug, Clone)]
pub struct SequenceDatabase {
    alphabet: Alphabet,
    data: Vec<u8>,
    entries: Vec<Entry>,
}

impl SequenceDatabase {
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            data: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Builds a database from `(comment, ascii letters)` records.
    pub fn from_records<I, C, S>(alphabet: Alphabet, records: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: Into<String>,
        S: AsRef<[u8]>,
    {
        let mut db = Self::new(alphabet);
        for (comment, letters) in records {
            db.push(comment, letters.as_ref());
        }
        db
    }

    /// Reads a FASTA file. Empty records are skipped.
    pub fn from_fasta(path: &Path, alphabet: Alphabet) -> Result<Self> {
        let reader = fasta::Reader::from_file(path)
            .with_context(|| format!("Failed to open FASTA file {}", path.display()))?;

        let mut db = Self::new(alphabet);
        for record in reader.records() {
            let record = record
                .with_context(|| format!("Failed to parse FASTA record in {}", path.display()))?;
            if record.seq().is_empty() {
                log::warn!("Skipping empty sequence '{}'", record.id());
                continue;
            }
            let comment = match record.desc() {
                Some(desc) => format!("{} {}", record.id(), desc),
                None => record.id().to_string(),
            };
            db.push(comment, record.seq());
        }
        log::debug!(
            "Loaded {} {} sequences ({} letters) from {}",
            db.len(),
            alphabet,
            db.size(),
            path.display()
        );
        Ok(db)
    }

    /// Appends one sequence given in ASCII.
    pub fn push(&mut self, comment: impl Into<String>, ascii: &[u8]) {
        let encoded = self.alphabet.encode_all(ascii);
        self.push_encoded(comment.into(), &encoded);
    }

    fn push_encoded(&mut self, comment: String, encoded: &[u8]) {
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(encoded);
        self.entries.push(Entry {
            comment,
            offset,
            length: encoded.len() as u32,
        });
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of letters.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn sequence(&self, index: u32) -> Option<Sequence<'_>> {
        let entry = self.entries.get(index as usize)?;
        let start = entry.offset as usize;
        Some(Sequence {
            index,
            comment: &entry.comment,
            letters: &self.data[start..start + entry.length as usize],
            offset: entry.offset,
        })
    }

    /// Sequence owning the absolute offset `absolute`.
    pub fn sequence_at_offset(&self, absolute: u32) -> Option<Sequence<'_>> {
        if absolute as usize >= self.data.len() {
            return None;
        }
        // entries are sorted by offset; the owner is the last one starting at or before
        let idx = self.entries.partition_point(|e| e.offset <= absolute);
        let mut idx = idx.checked_sub(1)?;
        // skip zero-length entries sharing the same offset
        while self.entries[idx].length == 0 {
            idx = idx.checked_sub(1)?;
        }
        self.sequence(idx as u32)
    }

    pub fn iter(&self) -> impl Iterator<Item = Sequence<'_>> {
        (0..self.entries.len() as u32).filter_map(move |i| self.sequence(i))
    }

    /// Same sequences, each replaced by its reverse complement. Indexes and
    /// comments are preserved so minus-strand hits map back to the query.
    pub fn reverse_complement(&self) -> Self {
        let mut rc = Self::new(self.alphabet);
        rc.data.reserve(self.data.len());
        for seq in self.iter() {
            let letters: Vec<u8> = seq
                .letters
                .iter()
                .rev()
                .map(|&c| Alphabet::complement(c))
                .collect();
            rc.push_encoded(seq.comment.to_string(), &letters);
        }
        rc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_db() -> SequenceDatabase {
        SequenceDatabase::from_records(
            Alphabet::AminoAcid,
            [("seq1 first", "MKV"), ("seq2", "ACDEFG"), ("seq3 last", "W")],
        )
    }

    #[test]
    fn test_offsets_and_lookup() {
        let db = small_db();
        assert_eq!(db.len(), 3);
        assert_eq!(db.size(), 10);

        let s2 = db.sequence(1).unwrap();
        assert_eq!(s2.offset, 3);
        assert_eq!(s2.len(), 6);
        assert_eq!(s2.id(), "seq2");
        assert_eq!(db.alphabet().decode_all(s2.letters), "ACDEFG");
        assert!(db.sequence(3).is_none());
    }

    #[test]
    fn test_sequence_at_offset() {
        let db = small_db();
        assert_eq!(db.sequence_at_offset(0).unwrap().index, 0);
        assert_eq!(db.sequence_at_offset(2).unwrap().index, 0);
        assert_eq!(db.sequence_at_offset(3).unwrap().index, 1);
        assert_eq!(db.sequence_at_offset(8).unwrap().index, 1);
        assert_eq!(db.sequence_at_offset(9).unwrap().index, 2);
        assert!(db.sequence_at_offset(10).is_none());
    }

    #[test]
    fn test_reverse_complement() {
        let db = SequenceDatabase::from_records(
            Alphabet::Nucleotide,
            [("a", "AACGT"), ("b", "GGN")],
        );
        let rc = db.reverse_complement();
        let nt = Alphabet::Nucleotide;
        assert_eq!(nt.decode_all(rc.sequence(0).unwrap().letters), "ACGTT");
        assert_eq!(nt.decode_all(rc.sequence(1).unwrap().letters), "NCC");
        assert_eq!(rc.sequence(1).unwrap().offset, 5);
        assert_eq!(rc.sequence(1).unwrap().comment, "b");
    }

    #[test]
    fn test_from_fasta() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">q1 some protein\nMKVL\nAAGT\n>q2\nWW").unwrap();
        file.flush().unwrap();

        let db = SequenceDatabase::from_fasta(file.path(), Alphabet::AminoAcid).unwrap();
        assert_eq!(db.len(), 2);
        let q1 = db.sequence(0).unwrap();
        assert_eq!(q1.comment, "q1 some protein");
        assert_eq!(q1.len(), 8);
        assert_eq!(db.sequence(1).unwrap().id(), "q2");
    }
}
