//! Core game state machine.
//!
//! This module contains `GameState`, which owns the board and turns node
//! clicks into selections, highlights and moves.

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, BoardView, NodeId, Team};
use crate::layout::BoardLayout;
use crate::moves;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when building a board or applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    #[error("Node cannot connect to itself: {0}")]
    SelfLoop(String),

    #[error("Node already holds a piece: {0}")]
    NodeOccupied(String),

    #[error("Moving range must be 1, 2 or 3, got {0}")]
    InvalidMovingRange(u8),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("No piece on {0}")]
    NoPiece(String),

    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: String, to: String },
}

/// Selection state of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing selected, nothing highlighted
    #[default]
    Idle,
    /// The piece on `node` is selected and its destinations are highlighted
    Selected { node: NodeId },
}

/// The complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    board: Board,
    selection: Selection,
}

impl GameState {
    /// Start a game on the standard board
    pub fn new() -> Self {
        Self::from_board(Board::standard())
    }

    /// Start a game from a custom layout
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, GameError> {
        Board::from_layout(layout).map(Self::from_board)
    }

    /// Start a game on an existing board. Any leftover marks are cleared.
    pub fn from_board(mut board: Board) -> Self {
        board.clear_marks();
        Self {
            board,
            selection: Selection::Idle,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Snapshot of the board for rendering
    pub fn view(&self) -> BoardView {
        self.board.view()
    }

    /// Every move available to a team, as actions
    pub fn valid_moves(&self, team: Team) -> Vec<GameAction> {
        moves::team_moves(&self.board, team)
            .into_iter()
            .map(|(from, to)| GameAction::MovePiece {
                from: self.board.name(from).to_string(),
                to: self.board.name(to).to_string(),
            })
            .collect()
    }

    /// Apply an action to the game state
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::ClickNode(name) => self.click(&name),
            GameAction::MovePiece { from, to } => {
                let from = self.board.resolve(&from)?;
                let to = self.board.resolve(&to)?;
                self.move_piece(from, to)
            }
        }
    }

    /// Click a node by name. Unknown names leave the state untouched.
    pub fn click(&mut self, name: &str) -> Result<Vec<GameEvent>, GameError> {
        let node = self.board.resolve(name).inspect_err(|e| {
            warn!(error = %e, "Ignoring click");
        })?;
        Ok(self.on_node_clicked(node))
    }

    /// Handle a click on a node.
    ///
    /// Clicking the selected piece deselects it. Clicking a highlighted node
    /// moves the selected piece there, capturing any occupant. Clicking any
    /// other piece selects it. Anything else clears the selection.
    ///
    /// A highlighted node takes precedence over an occupied one, so clicking a
    /// reachable opposing piece captures it instead of selecting it.
    ///
    /// Ids this board never issued are ignored and yield no events.
    pub fn on_node_clicked(&mut self, node: NodeId) -> Vec<GameEvent> {
        if !self.board.contains(node) {
            warn!(index = node.index(), "Ignoring click on foreign node id");
            return Vec::new();
        }

        match self.selection {
            Selection::Selected { node: selected } if selected == node => {
                self.clear_selection();
                debug!(node = self.board.name(node), "Piece deselected");
                vec![GameEvent::PieceDeselected {
                    node: self.board.name(node).to_string(),
                }]
            }
            Selection::Selected { node: selected } if self.board.is_highlighted(node) => {
                match self.move_piece(selected, node) {
                    Ok(events) => events,
                    Err(e) => {
                        // Highlights out of step with the board
                        warn!(error = %e, "Highlighted move rejected");
                        self.clear_selection();
                        vec![GameEvent::SelectionCleared]
                    }
                }
            }
            _ if self.board.occupant(node).is_some() => self.select(node),
            _ => {
                self.clear_selection();
                vec![GameEvent::SelectionCleared]
            }
        }
    }

    /// Move the piece on `from` to `to`, capturing whatever stands there.
    ///
    /// The move is checked against the piece's legal destinations first.
    pub fn move_piece(&mut self, from: NodeId, to: NodeId) -> Result<Vec<GameEvent>, GameError> {
        for id in [from, to] {
            if !self.board.contains(id) {
                return Err(GameError::UnknownNode(format!("#{}", id.index())));
            }
        }

        let from_name = self.board.name(from).to_string();
        let to_name = self.board.name(to).to_string();

        if self.board.occupant(from).is_none() {
            return Err(GameError::NoPiece(from_name));
        }
        if !moves::is_legal_move(&self.board, from, to) {
            return Err(GameError::IllegalMove {
                from: from_name,
                to: to_name,
            });
        }

        self.clear_selection();
        let piece = self
            .board
            .clear_occupant(from)
            .ok_or_else(|| GameError::NoPiece(from_name.clone()))?;
        let captured = self.board.set_occupant(to, piece);

        debug!(from = %from_name, to = %to_name, team = ?piece.team, "Piece moved");
        let mut events = vec![GameEvent::PieceMoved {
            from: from_name,
            to: to_name.clone(),
            team: piece.team,
            moving_range: piece.moving_range,
        }];

        if let Some(captured) = captured {
            debug!(node = %to_name, team = ?captured.team, "Piece captured");
            events.push(GameEvent::PieceCaptured {
                node: to_name,
                piece: captured,
            });
        }

        Ok(events)
    }

    fn select(&mut self, node: NodeId) -> Vec<GameEvent> {
        self.clear_selection();

        let destinations = moves::possible_moves(&self.board, node);
        if let Some(piece) = self.board.occupant_mut(node) {
            piece.selected = true;
        }
        for &destination in &destinations {
            self.board.set_highlighted(destination, true);
        }
        self.selection = Selection::Selected { node };

        let mut destinations: Vec<String> = destinations
            .into_iter()
            .map(|id| self.board.name(id).to_string())
            .collect();
        destinations.sort();

        debug!(node = self.board.name(node), ?destinations, "Piece selected");
        vec![GameEvent::PieceSelected {
            node: self.board.name(node).to_string(),
            destinations,
        }]
    }

    /// Drop the selection and every highlight
    fn clear_selection(&mut self) {
        self.board.clear_marks();
        self.selection = Selection::Idle;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
