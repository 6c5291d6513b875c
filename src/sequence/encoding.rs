//! Letter encodings for amino acid and nucleotide sequences.
//!
//! # Amino acids
//! Codes follow BLOSUM62 row order so that an encoded letter indexes the
//! score matrix directly:
//!
//! ```text
//! A R N D C Q E G H I L K M F P S T W Y V B J Z X *
//! 0 1 2 3 4 5 6 7 8 9 ...                     23 24
//! ```
//!
//! The first 20 codes are the standard residues; `X` (23) is the wildcard.
//!
//! # Nucleotides
//! `A=0, C=1, G=2, T/U=3`, anything else becomes the wildcard `N=4`.

/// Alphabet of a search, threaded explicitly through databases, score
/// matrices and seed models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alphabet {
    #[default]
    AminoAcid,
    Nucleotide,
}

/// Letters of the amino acid alphabet, in code order.
pub const AA_LETTERS: &[u8; 25] = b"ARNDCQEGHILKMFPSTWYVBJZX*";

/// Number of standard (non-ambiguous) amino acids.
pub const AA_CORE_SIZE: usize = 20;

/// Amino acid wildcard `X`.
pub const AA_WILDCARD: u8 = 23;

/// Letters of the nucleotide alphabet, in code order.
pub const NT_LETTERS: &[u8; 5] = b"ACGTN";

pub const NT_CORE_SIZE: usize = 4;

/// Nucleotide wildcard `N`.
pub const NT_WILDCARD: u8 = 4;

const AA_ENCODE: [u8; 256] = {
    let mut table = [AA_WILDCARD; 256];
    let mut i = 0;
    while i < AA_LETTERS.len() {
        let c = AA_LETTERS[i];
        table[c as usize] = i as u8;
        table[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    // Selenocysteine and pyrrolysine have no BLOSUM62 row.
    table
};

const NT_ENCODE: [u8; 256] = {
    let mut table = [NT_WILDCARD; 256];
    table[b'A' as usize] = 0;
    table[b'a' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'c' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'g' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b't' as usize] = 3;
    table[b'U' as usize] = 3;
    table[b'u' as usize] = 3;
    table
};

impl Alphabet {
    /// Number of codes a letter of this alphabet may take.
    pub fn size(self) -> usize {
        match self {
            Alphabet::AminoAcid => AA_LETTERS.len(),
            Alphabet::Nucleotide => NT_LETTERS.len(),
        }
    }

    /// Number of unambiguous letters (the ones seeds are built from).
    pub fn core_size(self) -> usize {
        match self {
            Alphabet::AminoAcid => AA_CORE_SIZE,
            Alphabet::Nucleotide => NT_CORE_SIZE,
        }
    }

    pub fn wildcard(self) -> u8 {
        match self {
            Alphabet::AminoAcid => AA_WILDCARD,
            Alphabet::Nucleotide => NT_WILDCARD,
        }
    }

    #[inline]
    pub fn encode(self, ascii: u8) -> u8 {
        match self {
            Alphabet::AminoAcid => AA_ENCODE[ascii as usize],
            Alphabet::Nucleotide => NT_ENCODE[ascii as usize],
        }
    }

    #[inline]
    pub fn decode(self, code: u8) -> u8 {
        let letters: &[u8] = match self {
            Alphabet::AminoAcid => AA_LETTERS,
            Alphabet::Nucleotide => NT_LETTERS,
        };
        letters.get(code as usize).copied().unwrap_or(b'?')
    }

    pub fn encode_all(self, ascii: &[u8]) -> Vec<u8> {
        ascii
            .iter()
            .filter(|c| !c.is_ascii_whitespace())
            .map(|&c| self.encode(c))
            .collect()
    }

    pub fn decode_all(self, codes: &[u8]) -> String {
        codes.iter().map(|&c| self.decode(c) as char).collect()
    }

    /// Whether `code` is a standard letter usable in a seed.
    #[inline]
    pub fn is_core(self, code: u8) -> bool {
        (code as usize) < self.core_size()
    }

    /// Complement of a nucleotide code; the wildcard maps to itself.
    #[inline]
    pub fn complement(code: u8) -> u8 {
        if code < NT_CORE_SIZE as u8 {
            3 - code
        } else {
            NT_WILDCARD
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::AminoAcid => write!(f, "amino acid"),
            Alphabet::Nucleotide => write!(f, "nucleotide"),
        }
    }
}
