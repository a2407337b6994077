//! RNG module - NES piece randomizer
//!
//! The NES draws from eight values (seven pieces plus a dummy). A dummy or a
//! repeat of the previous piece triggers one reroll from the seven real
//! pieces, which makes immediate repeats rarer than 1/7.
//!
//! Pieces are memoized in a sequence with a read index, so history can move
//! the index backwards and replay exactly the same pieces.

use thiserror::Error;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG cycle quickly.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("piece sequence is empty")]
    Empty,
    #[error("invalid piece letter {0:?} in sequence")]
    InvalidPiece(char),
}

/// Parse a string of piece letters such as `"STZILJO"`. Whitespace is ignored.
pub fn parse_sequence(s: &str) -> Result<Vec<PieceKind>, SequenceError> {
    let pieces = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| PieceKind::from_char(c).ok_or(SequenceError::InvalidPiece(c)))
        .collect::<Result<Vec<_>, _>>()?;
    if pieces.is_empty() {
        return Err(SequenceError::Empty);
    }
    Ok(pieces)
}

#[derive(Debug, Clone)]
enum Source {
    Random(SimpleRng),
    /// Read cyclically.
    Preset(Vec<PieceKind>),
}

/// Memoized piece sequence with a movable read index.
#[derive(Debug, Clone)]
pub struct PieceRandomizer {
    source: Source,
    seed: u32,
    sequence: Vec<PieceKind>,
    read_index: usize,
}

impl PieceRandomizer {
    /// NES-style randomizer seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            source: Source::Random(SimpleRng::new(seed)),
            seed,
            sequence: Vec::with_capacity(1024),
            read_index: 0,
        }
    }

    /// Deal a fixed sequence, repeating it from the start when exhausted.
    pub fn from_sequence(pieces: Vec<PieceKind>) -> Result<Self, SequenceError> {
        if pieces.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self {
            source: Source::Preset(pieces),
            seed: 0,
            sequence: Vec::with_capacity(1024),
            read_index: 0,
        })
    }

    pub fn from_sequence_str(s: &str) -> Result<Self, SequenceError> {
        Self::from_sequence(parse_sequence(s)?)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn is_preset(&self) -> bool {
        matches!(self.source, Source::Preset(_))
    }

    /// Start a fresh sequence. Random sources are reseeded; presets restart.
    pub fn regenerate(&mut self, seed: u32) {
        if let Source::Random(rng) = &mut self.source {
            *rng = SimpleRng::new(seed);
            self.seed = seed;
        }
        self.sequence.clear();
        self.read_index = 0;
    }

    /// Index of the next piece to be dealt.
    pub fn read_index(&self) -> usize {
        self.read_index
    }

    /// Move the read index. Pieces past the memoized end are generated on demand.
    pub fn set_read_index(&mut self, index: usize) {
        self.read_index = index;
    }

    /// Deal the next piece and advance the read index.
    pub fn next_piece(&mut self) -> PieceKind {
        let piece = self.piece_at(self.read_index);
        self.read_index += 1;
        piece
    }

    /// The piece at `index`, generating up to it if needed.
    pub fn piece_at(&mut self, index: usize) -> PieceKind {
        while self.sequence.len() <= index {
            let previous = self.sequence.last().copied();
            let next = match &mut self.source {
                Source::Random(rng) => roll(rng, previous),
                Source::Preset(pieces) => pieces[self.sequence.len() % pieces.len()],
            };
            self.sequence.push(next);
        }
        self.sequence[index]
    }

    /// Peek without advancing.
    pub fn peek(&mut self) -> PieceKind {
        self.piece_at(self.read_index)
    }

    /// Per-kind counts of pieces dealt so far (indices below the read index).
    pub fn piece_counts(&self) -> [u32; 7] {
        let mut counts = [0u32; 7];
        let dealt = self.read_index.min(self.sequence.len());
        for piece in &self.sequence[..dealt] {
            counts[piece.index()] += 1;
        }
        counts
    }
}

fn roll(rng: &mut SimpleRng, previous: Option<PieceKind>) -> PieceKind {
    let first = rng.next_range(8) as usize;
    if first < 7 && Some(PieceKind::ALL[first]) != previous {
        return PieceKind::ALL[first];
    }
    PieceKind::ALL[rng.next_range(7) as usize]
}
