//! Board layouts: the node ids, edges and starting pieces a board is built from.
//!
//! Layouts carry no pixel positions. Whoever draws the board owns those.

use crate::board::{MovingRange, Team, MIDDLE_NODE};
use crate::game::GameError;
use serde::{Deserialize, Serialize};

/// Row letters of the standard board and how many nodes each row holds
const STANDARD_ROWS: [(char, usize); 6] = [
    ('A', 7),
    ('B', 9),
    ('C', 11),
    ('D', 11),
    ('E', 9),
    ('F', 7),
];

/// Links between neighboring rows on the standard board
const STANDARD_LINKS: [(&str, &str); 24] = [
    ("A1", "B2"),
    ("A3", "B4"),
    ("A5", "B6"),
    ("A7", "B8"),
    ("B1", "C2"),
    ("B3", "C4"),
    ("B5", "C6"),
    ("B7", "C8"),
    ("B9", "C10"),
    ("C1", "D1"),
    ("C3", "D3"),
    ("C5", "D5"),
    ("C7", "D7"),
    ("C9", "D9"),
    ("C11", "D11"),
    ("D2", "E1"),
    ("D4", "E3"),
    ("D6", "E5"),
    ("D8", "E7"),
    ("D10", "E9"),
    ("F1", "E2"),
    ("F3", "E4"),
    ("F5", "E6"),
    ("F7", "E8"),
];

/// Nodes the middle node is attached to
const MIDDLE_LINKS: [&str; 6] = ["C5", "C6", "C7", "D5", "D6", "D7"];

fn default_bidirectional() -> bool {
    true
}

/// A connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub a: String,
    pub b: String,
    /// Also register `a` as a neighbor of `b`
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

impl EdgeSpec {
    /// A two-way edge
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            bidirectional: true,
        }
    }
}

/// A piece present at game start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub node: String,
    pub team: Team,
    pub moving_range: MovingRange,
}

impl Placement {
    pub fn new(node: impl Into<String>, team: Team, moving_range: MovingRange) -> Self {
        Self {
            node: node.into(),
            team,
            moving_range,
        }
    }
}

/// Everything needed to build a [`crate::Board`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

impl BoardLayout {
    /// The standard Kendo board: six staggered rows around a middle node,
    /// with each team's pieces on its two home rows.
    pub fn standard() -> Self {
        let mut nodes = Vec::new();
        for (row, len) in STANDARD_ROWS {
            nodes.extend((1..=len).map(|i| format!("{row}{i}")));
        }
        nodes.push(MIDDLE_NODE.to_string());

        let mut edges: Vec<EdgeSpec> = MIDDLE_LINKS
            .iter()
            .map(|&node| EdgeSpec::new(MIDDLE_NODE, node))
            .collect();
        edges.extend(STANDARD_LINKS.iter().map(|&(a, b)| EdgeSpec::new(a, b)));
        for (row, len) in STANDARD_ROWS {
            edges.extend((1..len).map(|i| EdgeSpec::new(format!("{row}{i}"), format!("{row}{}", i + 1))));
        }

        let mut placements = Vec::new();
        for (team, back, front) in [(Team::One, 'A', 'B'), (Team::Two, 'F', 'E')] {
            for i in 1..=7 {
                let range = if i == 4 {
                    MovingRange::King
                } else {
                    MovingRange::Knight
                };
                placements.push(Placement::new(format!("{back}{i}"), team, range));
            }
            for i in 4..=6 {
                placements.push(Placement::new(format!("{front}{i}"), team, MovingRange::Pawn));
            }
        }

        Self {
            nodes,
            edges,
            placements,
        }
    }

    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json).map_err(|e| GameError::InvalidLayout(e.to_string()))
    }

    /// Serialize the layout to JSON
    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::InvalidLayout(e.to_string()))
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::standard()
    }
}
