//! Board graph: nodes, adjacency and occupancy.
//!
//! This module contains:
//! - Team and moving-range types for pieces
//! - The node arena with symmetric adjacency lists
//! - Occupancy and highlight mutation primitives
//! - A renderer-facing snapshot of the whole board

use crate::game::GameError;
use crate::layout::BoardLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Id of the reserved central node. It anchors edges but is never a move destination.
pub const MIDDLE_NODE: &str = "middle";

/// The two sides of a Kendo game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Starts on rows A and B
    One,
    /// Starts on rows E and F
    Two,
}

impl Team {
    /// Both teams
    pub const ALL: [Team; 2] = [Team::One, Team::Two];

    /// The opposing team
    pub fn opponent(self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }
}

/// How far a piece travels per move.
///
/// Serialized as the bare hop count (1, 2 or 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MovingRange {
    /// One step onto any placeable neighbor
    King = 1,
    /// One empty hop, then one placeable hop
    Pawn = 2,
    /// Two empty hops without backtracking, then one placeable hop
    Knight = 3,
}

impl MovingRange {
    /// Number of hops a move of this range takes
    pub fn hops(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MovingRange {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MovingRange::King),
            2 => Ok(MovingRange::Pawn),
            3 => Ok(MovingRange::Knight),
            other => Err(GameError::InvalidMovingRange(other)),
        }
    }
}

impl From<MovingRange> for u8 {
    fn from(range: MovingRange) -> Self {
        range.hops()
    }
}

/// A game piece.
///
/// `selected` is transient UI state, not part of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub team: Team,
    pub moving_range: MovingRange,
    pub selected: bool,
}

impl Piece {
    /// Create an unselected piece
    pub fn new(team: Team, moving_range: MovingRange) -> Self {
        Self {
            team,
            moving_range,
            selected: false,
        }
    }
}

/// Stable handle to a node in a [`Board`].
///
/// Only meaningful for the board that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u16);

impl NodeId {
    /// Position of the node in the board arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex of the board graph
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    name: String,
    neighbors: Vec<NodeId>,
    occupant: Option<Piece>,
    /// Transient: reset on every selection change
    highlighted: bool,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            neighbors: Vec::new(),
            occupant: None,
            highlighted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adjacent nodes in insertion order
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn occupant(&self) -> Option<&Piece> {
        self.occupant.as_ref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// The board graph.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so the
/// cyclic adjacency never needs shared ownership. Nodes and edges are fixed
/// once built; only occupants and the transient flags change during play.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    nodes: Vec<Node>,
    #[serde(skip)]
    index: HashMap<String, NodeId>,
    middle: Option<NodeId>,
}

impl Board {
    /// Create a board with no nodes
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            middle: None,
        }
    }

    /// Create the standard Kendo board with both teams in their starting positions
    pub fn standard() -> Self {
        Self::from_layout(&BoardLayout::standard()).expect("standard layout is well-formed")
    }

    /// Build a board from a layout, rejecting any reference to a missing node
    pub fn from_layout(layout: &BoardLayout) -> Result<Self, GameError> {
        let mut board = Self::new();

        for name in &layout.nodes {
            board.add_node(name.clone())?;
        }

        for edge in &layout.edges {
            let a = board.resolve(&edge.a)?;
            let b = board.resolve(&edge.b)?;
            board.add_edge(a, b, edge.bidirectional)?;
        }

        for placement in &layout.placements {
            let node = board.resolve(&placement.node)?;
            if board.occupant(node).is_some() {
                return Err(GameError::NodeOccupied(placement.node.clone()));
            }
            board.set_occupant(node, Piece::new(placement.team, placement.moving_range));
        }

        Ok(board)
    }

    /// Add an unconnected node
    pub fn add_node(&mut self, name: impl Into<String>) -> Result<NodeId, GameError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(GameError::DuplicateNode(name));
        }

        let id = u16::try_from(self.nodes.len())
            .map(NodeId)
            .map_err(|_| GameError::InvalidLayout(format!("too many nodes, {name} does not fit")))?;
        if name == MIDDLE_NODE {
            self.middle = Some(id);
        }
        self.index.insert(name.clone(), id);
        self.nodes.push(Node::new(name));
        Ok(id)
    }

    /// Connect `a` to `b`, and `b` back to `a` when `bidirectional`.
    ///
    /// Repeated edges are ignored.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, bidirectional: bool) -> Result<(), GameError> {
        if a == b {
            return Err(GameError::SelfLoop(self.nodes[a.index()].name.clone()));
        }

        self.connect(a, b);
        if bidirectional {
            self.connect(b, a);
        }
        Ok(())
    }

    fn connect(&mut self, from: NodeId, to: NodeId) {
        let neighbors = &mut self.nodes[from.index()].neighbors;
        if !neighbors.contains(&to) {
            neighbors.push(to);
        }
    }

    /// Look up a node by name
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Look up a node by name, failing for names not on this board
    pub fn resolve(&self, name: &str) -> Result<NodeId, GameError> {
        self.node_id(name)
            .ok_or_else(|| GameError::UnknownNode(name.to_string()))
    }

    /// Whether `id` names a node of this board
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Get a node. Panics if `id` was issued by another board.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u16), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn neighbors_of(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).neighbors
    }

    pub fn is_middle(&self, id: NodeId) -> bool {
        self.middle == Some(id)
    }

    pub fn occupant(&self, id: NodeId) -> Option<&Piece> {
        self.node(id).occupant.as_ref()
    }

    pub(crate) fn occupant_mut(&mut self, id: NodeId) -> Option<&mut Piece> {
        self.nodes[id.index()].occupant.as_mut()
    }

    /// Place a piece, returning whatever it displaced
    pub fn set_occupant(&mut self, id: NodeId, piece: Piece) -> Option<Piece> {
        self.nodes[id.index()].occupant.replace(piece)
    }

    /// Take the piece off a node. Empty nodes yield `None`.
    pub fn clear_occupant(&mut self, id: NodeId) -> Option<Piece> {
        self.nodes[id.index()].occupant.take()
    }

    /// Occupied nodes of one team
    pub fn pieces(&self, team: Team) -> impl Iterator<Item = (NodeId, &Piece)> {
        self.nodes()
            .filter_map(|(id, node)| node.occupant().map(|piece| (id, piece)))
            .filter(move |(_, piece)| piece.team == team)
    }

    pub fn is_highlighted(&self, id: NodeId) -> bool {
        self.node(id).highlighted
    }

    pub(crate) fn set_highlighted(&mut self, id: NodeId, highlighted: bool) {
        self.nodes[id.index()].highlighted = highlighted;
    }

    /// Currently highlighted nodes
    pub fn highlighted(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(|(_, node)| node.highlighted)
            .map(|(id, _)| id)
    }

    /// Nodes holding a selected piece
    pub fn selected(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(|(_, node)| node.occupant().is_some_and(|piece| piece.selected))
            .map(|(id, _)| id)
    }

    /// Reset every transient flag on the board
    pub(crate) fn clear_marks(&mut self) {
        for node in &mut self.nodes {
            node.highlighted = false;
            if let Some(piece) = node.occupant.as_mut() {
                piece.selected = false;
            }
        }
    }

    /// Snapshot for renderers, with neighbors named instead of indexed
    pub fn view(&self) -> BoardView {
        let nodes = self
            .nodes()
            .map(|(id, node)| NodeView {
                id: node.name.clone(),
                neighbors: node
                    .neighbors
                    .iter()
                    .map(|&n| self.name(n).to_string())
                    .collect(),
                occupant: node.occupant,
                highlighted: node.highlighted,
                middle: self.is_middle(id),
            })
            .collect();

        BoardView { nodes }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only board snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub nodes: Vec<NodeView>,
}

/// Read-only node snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: String,
    pub neighbors: Vec<String>,
    pub occupant: Option<Piece>,
    pub highlighted: bool,
    pub middle: bool,
}
