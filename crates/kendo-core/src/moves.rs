//! Move generation.
//!
//! Every move is a walk of one to three hops over the board graph. All hops
//! but the last must land on empty nodes; the last must land on a node that is
//! empty or holds an opposing piece. The middle node is never a landing spot.

use crate::board::{Board, MovingRange, NodeId, Team};
use std::collections::HashSet;

/// Which neighbors a single hop may land on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HopFilter {
    /// Node the walk just came from
    pub exclude: Option<NodeId>,
    /// Skip any occupied neighbor
    pub only_empty: bool,
    /// Skip neighbors holding a piece of this team
    pub placeable_for: Option<Team>,
}

impl HopFilter {
    /// Intermediate hop: empty nodes only
    pub fn walkable() -> Self {
        Self {
            only_empty: true,
            ..Self::default()
        }
    }

    /// Final hop: empty nodes or nodes held by the other team
    pub fn placeable(team: Team) -> Self {
        Self {
            placeable_for: Some(team),
            ..Self::default()
        }
    }

    /// Additionally forbid stepping onto `node`
    pub fn excluding(self, node: NodeId) -> Self {
        Self {
            exclude: Some(node),
            ..self
        }
    }
}

/// Neighbors of `node` that pass `filter`. The middle node never passes.
pub fn restricted_neighbors(board: &Board, node: NodeId, filter: HopFilter) -> HashSet<NodeId> {
    board
        .neighbors_of(node)
        .iter()
        .copied()
        .filter(|&neighbor| {
            let occupant = board.occupant(neighbor);
            if filter.only_empty && occupant.is_some() {
                return false;
            }
            if let Some(team) = filter.placeable_for {
                if occupant.is_some_and(|piece| piece.team == team) {
                    return false;
                }
            }
            filter.exclude != Some(neighbor) && !board.is_middle(neighbor)
        })
        .collect()
}

/// Every node the piece on `node` may move to. Empty nodes have no moves.
///
/// The pawn's second hop may lead back towards its origin; the origin itself
/// still drops out because the moving piece occupies it.
pub fn possible_moves(board: &Board, node: NodeId) -> HashSet<NodeId> {
    let Some(piece) = board.occupant(node) else {
        return HashSet::new();
    };
    let team = piece.team;

    match piece.moving_range {
        MovingRange::King => restricted_neighbors(board, node, HopFilter::placeable(team)),
        MovingRange::Pawn => restricted_neighbors(board, node, HopFilter::walkable())
            .into_iter()
            .flat_map(|hop| restricted_neighbors(board, hop, HopFilter::placeable(team)))
            .collect(),
        MovingRange::Knight => {
            let mut moves = HashSet::new();
            for first in restricted_neighbors(board, node, HopFilter::walkable()) {
                let second_hops =
                    restricted_neighbors(board, first, HopFilter::walkable().excluding(node));
                for second in second_hops {
                    moves.extend(restricted_neighbors(
                        board,
                        second,
                        HopFilter::placeable(team).excluding(first),
                    ));
                }
            }
            moves
        }
    }
}

/// Check whether the piece on `from` may move to `to`
pub fn is_legal_move(board: &Board, from: NodeId, to: NodeId) -> bool {
    possible_moves(board, from).contains(&to)
}

/// All `(from, to)` moves available to a team, sorted by node
pub fn team_moves(board: &Board, team: Team) -> Vec<(NodeId, NodeId)> {
    let mut moves: Vec<(NodeId, NodeId)> = board
        .pieces(team)
        .flat_map(|(from, _)| possible_moves(board, from).into_iter().map(move |to| (from, to)))
        .collect();
    moves.sort();
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Piece, MIDDLE_NODE};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    /// Build a board from `(a, b)` edges, creating nodes as they appear
    fn board_with_edges(edges: &[(&str, &str)]) -> Board {
        let mut board = Board::new();
        for &(a, b) in edges {
            let a = board.node_id(a).unwrap_or_else(|| board.add_node(a).unwrap());
            let b = board.node_id(b).unwrap_or_else(|| board.add_node(b).unwrap());
            board.add_edge(a, b, true).unwrap();
        }
        board
    }

    fn place(board: &mut Board, name: &str, team: Team, range: MovingRange) {
        let id = board.node_id(name).unwrap();
        board.set_occupant(id, Piece::new(team, range));
    }

    fn moves_from(board: &Board, name: &str) -> BTreeSet<String> {
        possible_moves(board, board.node_id(name).unwrap())
            .into_iter()
            .map(|id| board.name(id).to_string())
            .collect()
    }

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_node_has_no_moves() {
        let board = board_with_edges(&[("x", "y")]);
        assert!(moves_from(&board, "x").is_empty());
    }

    #[test]
    fn test_king_moves_to_empty_and_opposing() {
        let mut board = board_with_edges(&[("x", "y"), ("x", "z"), ("x", "w")]);
        place(&mut board, "x", Team::One, MovingRange::King);
        place(&mut board, "z", Team::Two, MovingRange::Pawn);
        place(&mut board, "w", Team::One, MovingRange::Pawn);

        assert_eq!(moves_from(&board, "x"), names(&["y", "z"]));
    }

    #[test]
    fn test_king_never_enters_middle() {
        let mut board = board_with_edges(&[("x", MIDDLE_NODE), ("x", "y")]);
        place(&mut board, "x", Team::One, MovingRange::King);

        assert_eq!(moves_from(&board, "x"), names(&["y"]));
    }

    #[test]
    fn test_pawn_passes_through_empty_nodes_only() {
        // x - a - b
        //  \
        //   c - d   (c is occupied, so d is out of reach)
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("x", "c"), ("c", "d")]);
        place(&mut board, "x", Team::One, MovingRange::Pawn);
        place(&mut board, "c", Team::Two, MovingRange::King);

        assert_eq!(moves_from(&board, "x"), names(&["b"]));
    }

    #[test]
    fn test_pawn_captures_on_second_hop() {
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("a", "c")]);
        place(&mut board, "x", Team::One, MovingRange::Pawn);
        place(&mut board, "b", Team::Two, MovingRange::Knight);
        place(&mut board, "c", Team::One, MovingRange::Knight);

        assert_eq!(moves_from(&board, "x"), names(&["b"]));
    }

    #[test]
    fn test_pawn_second_hop_does_not_exclude_origin_hop() {
        // The second hop is not barred from stepping back, so x's neighbor y
        // is reachable via a. Only x itself stays out, being occupied by the mover.
        let mut board = board_with_edges(&[("x", "a"), ("x", "y"), ("a", "y")]);
        place(&mut board, "x", Team::One, MovingRange::Pawn);

        assert_eq!(moves_from(&board, "x"), names(&["a", "y"]));
    }

    #[test]
    fn test_pawn_deduplicates_converging_paths() {
        // Both a and b lead to t
        let mut board = board_with_edges(&[("x", "a"), ("x", "b"), ("a", "t"), ("b", "t")]);
        place(&mut board, "x", Team::Two, MovingRange::Pawn);

        let moves = possible_moves(&board, board.node_id("x").unwrap());
        assert_eq!(moves.len(), 1);
    }

    #[test]
    fn test_pawn_may_not_pass_through_middle() {
        let mut board = board_with_edges(&[("x", MIDDLE_NODE), (MIDDLE_NODE, "y")]);
        place(&mut board, "x", Team::One, MovingRange::Pawn);

        assert!(moves_from(&board, "x").is_empty());
    }

    #[test]
    fn test_knight_walks_three_hops_without_backtracking() {
        // x - a - b - c
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("b", "c")]);
        place(&mut board, "x", Team::One, MovingRange::Knight);

        assert_eq!(moves_from(&board, "x"), names(&["c"]));
    }

    #[test]
    fn test_knight_second_hop_cannot_return_to_origin() {
        // Triangle x-a-b plus a tail b-c
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("b", "x"), ("b", "c")]);
        place(&mut board, "x", Team::One, MovingRange::Knight);

        // x-b-a dead-ends: a's only other neighbor is the origin
        assert_eq!(moves_from(&board, "x"), names(&["c"]));
    }

    #[test]
    fn test_knight_third_hop_may_revisit_first_neighbors_of_origin() {
        // Square x-a-b-c-x: x-a-b-c lands on c, x-c-b-a lands on a
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("b", "c"), ("c", "x")]);
        place(&mut board, "x", Team::One, MovingRange::Knight);

        assert_eq!(moves_from(&board, "x"), names(&["a", "c"]));
    }

    #[test]
    fn test_knight_blocked_midway() {
        let mut board = board_with_edges(&[("x", "a"), ("a", "b"), ("b", "c")]);
        place(&mut board, "x", Team::One, MovingRange::Knight);
        place(&mut board, "b", Team::Two, MovingRange::King);

        assert!(moves_from(&board, "x").is_empty());
    }

    #[test]
    fn test_standard_opening_moves() {
        let board = Board::standard();

        // Hemmed in by its own knights
        assert!(moves_from(&board, "A4").is_empty());
        assert!(moves_from(&board, "A2").is_empty());

        // B5 -> C6 -> {C5, C7}; B5 itself is blocked by the mover
        assert_eq!(moves_from(&board, "B5"), names(&["C5", "C7"]));

        // A1 -> B2 -> B1 -> C2 and A1 -> B2 -> B3 -> C4
        assert_eq!(moves_from(&board, "A1"), names(&["C2", "C4"]));
    }

    #[test]
    fn test_middle_never_a_destination_on_standard_board() {
        let mut board = Board::standard();
        let middle = board.node_id(MIDDLE_NODE).unwrap();

        // Put one piece of every range on each middle neighbor in turn
        let anchors = board.neighbors_of(middle).to_vec();
        for anchor in anchors {
            for range in [MovingRange::King, MovingRange::Pawn, MovingRange::Knight] {
                let previous = board.set_occupant(anchor, Piece::new(Team::Two, range));
                assert!(!possible_moves(&board, anchor).contains(&middle));
                match previous {
                    Some(piece) => board.set_occupant(anchor, piece),
                    None => board.clear_occupant(anchor),
                };
            }
        }
    }

    #[test]
    fn test_team_moves_covers_every_piece() {
        let board = Board::standard();
        let moves = team_moves(&board, Team::One);

        for (from, to) in &moves {
            assert_eq!(board.occupant(*from).map(|p| p.team), Some(Team::One));
            assert!(is_legal_move(&board, *from, *to));
        }

        let b5 = board.node_id("B5").unwrap();
        assert_eq!(moves.iter().filter(|(from, _)| *from == b5).count(), 2);
    }
}
