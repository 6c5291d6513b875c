//! Seed models: fixed-span words over an alphabet, optionally with letters
//! grouped per position.
//!
//! A seed code is the mixed-radix number whose digit at position `p` is the
//! group index of the `p`-th letter; the first letter is the most
//! significant digit. With the basic model every core letter is its own group.

use crate::config::{SearchParams, SeedModelKind};
use crate::error::{PlastError, Result};
use crate::sequence::Alphabet;

const NO_GROUP: u8 = u8::MAX;

/// Letter grouping of one seed position.
#[derive(Debug, Clone)]
struct PositionGroups {
    /// Group of each letter code, `NO_GROUP` when the letter is not seedable.
    group_of: Vec<u8>,
    /// One representative letter per group.
    representatives: Vec<u8>,
}

impl PositionGroups {
    fn identity(alphabet: Alphabet) -> Self {
        let mut group_of = vec![NO_GROUP; alphabet.size()];
        for code in 0..alphabet.core_size() {
            group_of[code] = code as u8;
        }
        Self {
            group_of,
            representatives: (0..alphabet.core_size() as u8).collect(),
        }
    }

    fn parse(alphabet: Alphabet, pattern: &str) -> Result<Self> {
        let mut group_of = vec![NO_GROUP; alphabet.size()];
        let mut representatives = Vec::new();

        for (g, group) in pattern.split(',').enumerate() {
            let group = group.trim();
            if group.is_empty() {
                return Err(PlastError::InvalidParameter(format!(
                    "empty letter group in subseed '{pattern}'"
                )));
            }
            for &ascii in group.as_bytes() {
                let code = alphabet.encode(ascii);
                if !alphabet.is_core(code) {
                    return Err(PlastError::InvalidParameter(format!(
                        "letter '{}' in subseed '{pattern}' is not a {alphabet} letter",
                        ascii as char
                    )));
                }
                if group_of[code as usize] != NO_GROUP {
                    return Err(PlastError::InvalidParameter(format!(
                        "letter '{}' appears twice in subseed '{pattern}'",
                        ascii as char
                    )));
                }
                group_of[code as usize] = g as u8;
            }
            representatives.push(alphabet.encode(group.as_bytes()[0]));
        }
        if representatives.len() >= NO_GROUP as usize {
            return Err(PlastError::InvalidParameter(format!(
                "too many groups in subseed '{pattern}'"
            )));
        }
        Ok(Self {
            group_of,
            representatives,
        })
    }

    #[inline]
    fn group(&self, code: u8) -> u8 {
        self.group_of.get(code as usize).copied().unwrap_or(NO_GROUP)
    }

    fn radix(&self) -> u32 {
        self.representatives.len() as u32
    }
}

#[derive(Debug, Clone)]
pub struct SeedModel {
    alphabet: Alphabet,
    positions: Vec<PositionGroups>,
    /// Place value of each position.
    weights: Vec<u32>,
    code_count: u32,
}

impl SeedModel {
    /// Every core letter is its own group at every position.
    pub fn basic(alphabet: Alphabet, span: usize) -> Result<Self> {
        Self::build(alphabet, vec![PositionGroups::identity(alphabet); span])
    }

    /// One grouping string per position; the last one covers the remaining
    /// positions when `span` exceeds the number of strings.
    pub fn subseed(alphabet: Alphabet, span: usize, patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Err(PlastError::InvalidParameter(
                "subseed model needs at least one grouping string".into(),
            ));
        }
        let positions = (0..span)
            .map(|p| PositionGroups::parse(alphabet, &patterns[p.min(patterns.len() - 1)]))
            .collect::<Result<Vec<_>>>()?;
        Self::build(alphabet, positions)
    }

    pub fn from_params(params: &SearchParams) -> Result<Self> {
        match &params.seed {
            SeedModelKind::Basic => Self::basic(params.alphabet(), params.seed_span),
            SeedModelKind::Subseed(patterns) => {
                Self::subseed(params.alphabet(), params.seed_span, patterns)
            }
        }
    }

    fn build(alphabet: Alphabet, positions: Vec<PositionGroups>) -> Result<Self> {
        if positions.is_empty() {
            return Err(PlastError::InvalidParameter(
                "seed span must be at least 1".into(),
            ));
        }
        let mut weights = vec![0u32; positions.len()];
        let mut place: u64 = 1;
        for (p, groups) in positions.iter().enumerate().rev() {
            weights[p] = place as u32;
            place *= groups.radix() as u64;
            if place > u32::MAX as u64 {
                return Err(PlastError::InvalidParameter(format!(
                    "seed span {} overflows the 32-bit seed code space",
                    positions.len()
                )));
            }
        }
        Ok(Self {
            alphabet,
            positions,
            weights,
            code_count: place as u32,
        })
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn span(&self) -> usize {
        self.positions.len()
    }

    /// Size of the seed code space; codes are `0..code_count()`.
    pub fn code_count(&self) -> u32 {
        self.code_count
    }

    /// Code of the word starting at `letters[0]`, `None` when the word is
    /// too short or holds a letter without group.
    pub fn encode(&self, letters: &[u8]) -> Option<u32> {
        if letters.len() < self.span() {
            return None;
        }
        let mut code = 0u32;
        for (p, groups) in self.positions.iter().enumerate() {
            let g = groups.group(letters[p]);
            if g == NO_GROUP {
                return None;
            }
            code += g as u32 * self.weights[p];
        }
        Some(code)
    }

    /// One word with the given code, built from each group's first letter.
    pub fn decode(&self, code: u32) -> Vec<u8> {
        self.positions
            .iter()
            .zip(&self.weights)
            .map(|(groups, &w)| {
                let g = (code / w) % groups.radix();
                groups.representatives[g as usize]
            })
            .collect()
    }

    /// Every seed of `letters` as `(offset, code)`, skipping words that
    /// contain a wildcard or an ungrouped letter.
    pub fn seeds<'a>(&'a self, letters: &'a [u8]) -> Seeds<'a> {
        Seeds {
            model: self,
            letters,
            pos: 0,
        }
    }

    /// Offset of the first letter at or after `from` that no group accepts
    /// within the word starting at `from`.
    fn first_invalid(&self, letters: &[u8], from: usize) -> Option<usize> {
        self.positions
            .iter()
            .enumerate()
            .find(|(p, groups)| groups.group(letters[from + p]) == NO_GROUP)
            .map(|(p, _)| from + p)
    }
}

/// Iterator returned by [`SeedModel::seeds`].
pub struct Seeds<'a> {
    model: &'a SeedModel,
    letters: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for Seeds<'a> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let span = self.model.span();
        while self.pos + span <= self.letters.len() {
            let start = self.pos;
            if let Some(code) = self.model.encode(&self.letters[start..]) {
                self.pos += 1;
                return Some((start as u32, code));
            }
            // a letter no position accepts poisons every word covering it
            self.pos = match self.model.first_invalid(self.letters, start) {
                Some(bad)
                    if self
                        .model
                        .positions
                        .iter()
                        .all(|g| g.group(self.letters[bad]) == NO_GROUP) =>
                {
                    bad + 1
                }
                _ => start + 1,
            };
        }
        None
    }
}
