//! Move choosers: pick one placement out of the enumerated candidates.

use serde::{Deserialize, Serialize};

use crate::placements::Placement;
use crate::types::{PieceKind, BOARD_WIDTH};

/// Column kept open for tetrises.
const WELL_COLUMN: usize = BOARD_WIDTH as usize - 1;

/// What a chooser knows about the game besides the candidates themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceContext {
    pub piece: PieceKind,
    pub next_piece: Option<PieceKind>,
    pub level: u32,
    pub lines: u32,
}

/// Picks a placement for the current piece.
///
/// Returns an index into `candidates`, or `None` to give up (treated as a
/// top-out). Object-safe so callers can hold a `&dyn MoveChooser`; `Sync` so
/// batch simulation can share one chooser across worker threads.
pub trait MoveChooser: Send + Sync {
    fn choose(&self, candidates: &[Placement], context: &ChoiceContext) -> Option<usize>;
}

/// Always takes the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChooser;

impl MoveChooser for FirstChooser {
    fn choose(&self, candidates: &[Placement], _: &ChoiceContext) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(0)
        }
    }
}

/// Weights for [`HeuristicChooser`]. Penalties are subtracted, bonuses added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvalWeights {
    pub holes: f64,
    /// Sum of height differences between neighbouring stack columns.
    pub bumpiness: f64,
    /// Mean height of the stack columns (the well column excluded).
    pub average_height: f64,
    pub tetris_bonus: f64,
    /// Per line cleared by a 1-3 line clear.
    pub burn_penalty: f64,
    /// Applied when anything sits in the well column.
    pub well_blocked: f64,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            holes: 30.0,
            bumpiness: 1.0,
            average_height: 2.0,
            tetris_bonus: 40.0,
            burn_penalty: 8.0,
            well_blocked: 12.0,
        }
    }
}

impl EvalWeights {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Ranks candidates by a weighted sum of board features.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicChooser {
    pub weights: EvalWeights,
}

impl HeuristicChooser {
    pub fn new(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// Higher is better.
    pub fn evaluate(&self, placement: &Placement) -> f64 {
        let w = &self.weights;
        let stack = &placement.surface[..WELL_COLUMN];

        let bumpiness: u32 = stack
            .windows(2)
            .map(|pair| u32::from(pair[0].abs_diff(pair[1])))
            .sum();
        let average_height =
            stack.iter().map(|&h| f64::from(h)).sum::<f64>() / stack.len() as f64;

        let mut score = -w.holes * f64::from(placement.holes)
            - w.bumpiness * f64::from(bumpiness)
            - w.average_height * average_height;

        score += match placement.lines_cleared {
            0 => 0.0,
            4 => w.tetris_bonus,
            n => -w.burn_penalty * n as f64,
        };
        if placement.surface[WELL_COLUMN] > 0 {
            score -= w.well_blocked;
        }
        score
    }
}

impl MoveChooser for HeuristicChooser {
    /// Best evaluation wins; ties keep the earliest candidate.
    fn choose(&self, candidates: &[Placement], _: &ChoiceContext) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, placement) in candidates.iter().enumerate() {
            let value = self.evaluate(placement);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((i, value)),
            }
        }
        best.map(|(i, _)| i)
    }
}
