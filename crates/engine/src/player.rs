//! Automated play against a live, frame-stepped session.

use tracing::{debug, warn};

use crate::core::GameSession;
use crate::eval::{ChoiceContext, MoveChooser};
use crate::place::apply_placement;
use crate::placements::possible_placements;
use crate::reachability::{ReachabilityPolicy, Unrestricted};
use crate::types::InputEvent;

/// Places every new piece the moment it becomes controllable.
///
/// Call [`AutoPlayer::on_frame`] once per frame before [`GameSession::tick`].
pub struct AutoPlayer {
    chooser: Box<dyn MoveChooser>,
    policy: Box<dyn ReachabilityPolicy>,
    soft_drop: bool,
    placed: u32,
    rejected: u32,
}

impl AutoPlayer {
    pub fn new(chooser: Box<dyn MoveChooser>) -> Self {
        Self {
            chooser,
            policy: Box::new(Unrestricted),
            soft_drop: false,
            placed: 0,
            rejected: 0,
        }
    }

    pub fn with_policy(mut self, policy: Box<dyn ReachabilityPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Hold down after each placement to earn pushdown points.
    pub fn with_soft_drop(mut self, soft_drop: bool) -> Self {
        self.soft_drop = soft_drop;
        self
    }

    pub fn placed(&self) -> u32 {
        self.placed
    }

    /// Pieces whose chosen placement could not be applied, or had none.
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Returns true if a placement was applied this frame.
    pub fn on_frame(&mut self, session: &mut GameSession) -> bool {
        if !session.take_piece_ready() {
            return false;
        }

        let piece = session.active().kind;
        let context = ChoiceContext {
            piece,
            next_piece: Some(session.next_piece()),
            level: session.level(),
            lines: session.lines(),
        };
        let candidates = possible_placements(session.board(), piece, context.level, self.policy.as_ref());
        let Some(chosen) = self
            .chooser
            .choose(&candidates, &context)
            .and_then(|i| candidates.get(i))
        else {
            debug!(?piece, candidates = candidates.len(), "no placement chosen");
            self.rejected += 1;
            return false;
        };

        if let Err(err) = apply_placement(session, chosen.rotation, chosen.x_offset) {
            warn!(
                code = err.code(),
                ?piece,
                rotation = chosen.rotation,
                x_offset = chosen.x_offset,
                "{err}"
            );
            self.rejected += 1;
            return false;
        }
        if self.soft_drop {
            session.handle_event(InputEvent::ReleaseDown);
            session.handle_event(InputEvent::PressDown);
        }
        self.placed += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSettings;
    use crate::eval::{FirstChooser, HeuristicChooser};
    use crate::types::GamePhase;

    fn session() -> GameSession {
        GameSession::new(GameSettings {
            starting_level: 18,
            piece_sequence: Some("STZILJO".to_string()),
            ..GameSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_waits_for_piece_ready() {
        let mut gs = session();
        let mut player = AutoPlayer::new(Box::new(FirstChooser));
        assert!(!player.on_frame(&mut gs));
        for _ in 0..90 {
            gs.tick();
        }
        assert_eq!(gs.phase(), GamePhase::Running);
        assert!(player.on_frame(&mut gs));
        assert!(!player.on_frame(&mut gs));
        assert_eq!(player.placed(), 1);
        // FirstChooser takes rotation 0 at the leftmost legal offset.
        assert_eq!(gs.active().x, 0);
    }

    #[test]
    fn test_soft_drop_earns_pushdown() {
        let mut gs = session();
        let mut player = AutoPlayer::new(Box::new(HeuristicChooser::default())).with_soft_drop(true);
        let mut pushdown = 0;
        for _ in 0..400 {
            player.on_frame(&mut gs);
            gs.tick();
            if let Some(event) = gs.take_last_event() {
                pushdown += event.pushdown_points;
            }
        }
        assert!(player.placed() >= 2);
        assert!(pushdown > 0);
    }
}
