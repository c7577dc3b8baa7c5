//! AI bot players for Kendo.
//!
//! - Easy: random legal moves
//! - Medium: takes pieces when it can, the opposing king first

use crate::actions::GameAction;
use crate::board::{MovingRange, NodeId, Team};
use crate::game::GameState;
use crate::moves;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
}

/// A bot player that picks moves for one team
pub struct Bot {
    pub team: Team,
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(team: Team, difficulty: BotDifficulty) -> Self {
        Self {
            team,
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(team: Team, difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            team,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose a move, or `None` when the team cannot move at all
    pub fn choose_action(&mut self, game: &GameState) -> Option<GameAction> {
        let board = game.board();
        let candidates = moves::team_moves(board, self.team);

        let (from, to) = match self.difficulty {
            BotDifficulty::Easy => candidates.choose(&mut self.rng).copied(),
            BotDifficulty::Medium => self.choose_medium(game, &candidates),
        }?;

        Some(GameAction::MovePiece {
            from: board.name(from).to_string(),
            to: board.name(to).to_string(),
        })
    }

    fn choose_medium(
        &mut self,
        game: &GameState,
        candidates: &[(NodeId, NodeId)],
    ) -> Option<(NodeId, NodeId)> {
        let board = game.board();
        let captures: Vec<(NodeId, NodeId)> = candidates
            .iter()
            .copied()
            .filter(|&(_, to)| board.occupant(to).is_some())
            .collect();

        let king_captures: Vec<(NodeId, NodeId)> = captures
            .iter()
            .copied()
            .filter(|&(_, to)| {
                board
                    .occupant(to)
                    .is_some_and(|piece| piece.moving_range == MovingRange::King)
            })
            .collect();

        let pool = if !king_captures.is_empty() {
            &king_captures[..]
        } else if !captures.is_empty() {
            &captures[..]
        } else {
            candidates
        };
        pool.choose(&mut self.rng).copied()
    }
}
