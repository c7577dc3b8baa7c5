//! Integration tests for the Kendo engine.
//!
//! These tests drive whole games through clicks and bot moves.

use kendo_core::moves::possible_moves;
use kendo_core::*;
use pretty_assertions::assert_eq;

fn highlighted(game: &GameState) -> Vec<String> {
    let mut names: Vec<String> = game
        .board()
        .highlighted()
        .map(|id| game.board().name(id).to_string())
        .collect();
    names.sort();
    names
}

fn occupant(game: &GameState, name: &str) -> Option<Piece> {
    let id = game.board().node_id(name).unwrap();
    game.board().occupant(id).copied()
}

#[test]
fn test_opening_exchange_by_clicks() {
    let mut game = GameState::new();

    // Team One pushes a pawn through C6
    game.click("B5").unwrap();
    assert_eq!(highlighted(&game), vec!["C5", "C7"]);
    let events = game.click("C5").unwrap();
    assert!(matches!(events[0], GameEvent::PieceMoved { .. }));
    assert_eq!(occupant(&game, "B5"), None);
    assert_eq!(
        occupant(&game, "C5"),
        Some(Piece::new(Team::One, MovingRange::Pawn))
    );

    // Team Two answers through D6
    game.click("E5").unwrap();
    assert_eq!(highlighted(&game), vec!["D5", "D7"]);
    game.click("D5").unwrap();

    // The pawn on C5 now reaches back over C6 to its old square
    let events = game.click("C5").unwrap();
    assert_eq!(
        events,
        vec![GameEvent::PieceSelected {
            node: "C5".into(),
            destinations: vec!["B3".into(), "B5".into(), "C3".into(), "C7".into()],
        }]
    );
    assert!(!highlighted(&game).contains(&"D5".to_string()));

    // Clicking an empty, unhighlighted node drops everything
    game.click("F1").unwrap();
    game.click("A2").unwrap();
    game.click("D1").unwrap();
    assert_eq!(game.selection(), Selection::Idle);
    assert!(highlighted(&game).is_empty());
}

#[test]
fn test_capture_by_clicks_on_json_layout() {
    let layout = BoardLayout::from_json(
        r#"{
            "nodes": ["h1", "h2", "h3", "h4", "middle"],
            "edges": [
                { "a": "h1", "b": "h2" },
                { "a": "h2", "b": "h3" },
                { "a": "h3", "b": "h4" },
                { "a": "h2", "b": "middle" },
                { "a": "middle", "b": "h4" }
            ],
            "placements": [
                { "node": "h1", "team": "One", "moving_range": 3 },
                { "node": "h4", "team": "Two", "moving_range": 1 }
            ]
        }"#,
    )
    .unwrap();
    let mut game = GameState::from_layout(&layout).unwrap();

    // h1 -> h2 -> h3 -> h4; the middle is neither a hop nor a target
    game.click("h1").unwrap();
    assert_eq!(highlighted(&game), vec!["h4"]);

    let events = game.click("h4").unwrap();
    assert_eq!(
        events,
        vec![
            GameEvent::PieceMoved {
                from: "h1".into(),
                to: "h4".into(),
                team: Team::One,
                moving_range: MovingRange::Knight,
            },
            GameEvent::PieceCaptured {
                node: "h4".into(),
                piece: Piece::new(Team::Two, MovingRange::King),
            },
        ]
    );
    assert_eq!(occupant(&game, "h1"), None);
    assert_eq!(game.board().pieces(Team::Two).count(), 0);
    assert!(highlighted(&game).is_empty());
}

#[test]
fn test_highlights_track_moves_through_bot_game() {
    let mut game = GameState::new();
    let mut bots = [
        Bot::with_seed(Team::One, BotDifficulty::Medium, 11),
        Bot::with_seed(Team::Two, BotDifficulty::Medium, 12),
    ];
    let middle = game.board().node_id(MIDDLE_NODE).unwrap();

    for turn in 0..40 {
        // Every piece's highlights equal its legal moves and never include the middle
        let occupied: Vec<String> = game
            .board()
            .nodes()
            .filter(|(_, node)| node.occupant().is_some())
            .map(|(_, node)| node.name().to_string())
            .collect();
        for name in occupied {
            game.click(&name).unwrap();
            let id = game.board().node_id(&name).unwrap();
            let mut expected: Vec<String> = possible_moves(game.board(), id)
                .into_iter()
                .map(|n| game.board().name(n).to_string())
                .collect();
            expected.sort();
            assert_eq!(highlighted(&game), expected);
            assert!(!game.board().is_highlighted(middle));
            assert_eq!(game.board().selected().count(), 1);

            game.click(&name).unwrap();
            assert!(highlighted(&game).is_empty());
        }

        let Some(action) = bots[turn % 2].choose_action(&game) else {
            break;
        };
        game.apply_action(action).unwrap();
    }
}

#[test]
fn test_action_wire_format() {
    let action: GameAction = serde_json::from_str(r#"{"ClickNode":"B5"}"#).unwrap();
    assert_eq!(action, GameAction::ClickNode("B5".into()));

    let mut game = GameState::new();
    let events = game.apply_action(action).unwrap();
    let json = serde_json::to_value(&events).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "PieceSelected": { "node": "B5", "destinations": ["C5", "C7"] } }
        ])
    );

    let view = serde_json::to_value(game.view()).unwrap();
    let b5 = view["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == "B5")
        .unwrap();
    assert_eq!(b5["occupant"]["moving_range"], serde_json::json!(2));
    assert_eq!(b5["occupant"]["selected"], serde_json::json!(true));
}
