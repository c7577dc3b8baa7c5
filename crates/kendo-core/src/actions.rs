//! Game actions and the events they produce.
//!
//! Nodes are named by their layout id so actions and events can travel
//! over the wire unchanged.

use crate::board::{MovingRange, Piece, Team};
use serde::{Deserialize, Serialize};

/// Input to a [`crate::GameState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// A node was clicked: select, deselect, move or clear
    ClickNode(String),
    /// Move a piece directly, bypassing selection
    MovePiece { from: String, to: String },
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A piece was selected and its destinations highlighted
    PieceSelected {
        node: String,
        /// Sorted by node id
        destinations: Vec<String>,
    },

    /// The selected piece was clicked again
    PieceDeselected { node: String },

    /// A click outside the highlights dropped the selection
    SelectionCleared,

    /// A piece changed nodes
    PieceMoved {
        from: String,
        to: String,
        team: Team,
        moving_range: MovingRange,
    },

    /// A piece was taken off the board by an opposing move
    PieceCaptured { node: String, piece: Piece },
}
