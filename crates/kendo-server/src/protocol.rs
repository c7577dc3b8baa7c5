//! WebSocket protocol messages for Kendo multiplayer.

use kendo_core::{BoardView, GameAction, GameEvent, Team};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new game room
    CreateRoom { player_name: String },

    /// Join an existing room
    JoinRoom { room_id: Uuid, player_name: String },

    /// Leave current room
    LeaveRoom,

    /// Start the game (host only)
    StartGame,

    /// Click a node or move a piece
    GameAction { action: GameAction },

    /// Send chat message
    Chat { message: String },

    /// Request room list
    ListRooms,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned player ID
    Welcome { player_id: Uuid },

    /// Room created successfully
    RoomCreated { room_id: Uuid },

    /// Joined room successfully
    JoinedRoom { room: RoomInfo },

    /// Left room successfully
    LeftRoom,

    /// Room state updated (player joined/left)
    RoomUpdated { room: RoomInfo },

    /// Game started on this board
    GameStarted { board: BoardView },

    /// Board changed after an action
    BoardUpdated { board: BoardView },

    /// Outcome of the sender's action
    ActionResult {
        success: bool,
        events: Vec<GameEvent>,
        error: Option<String>,
    },

    /// Chat message received
    ChatMessage { player_name: String, message: String },

    /// List of rooms waiting for a second player
    RoomList { rooms: Vec<RoomInfo> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Room information for clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: Uuid,
    pub name: String,
    pub players: Vec<PlayerInfo>,
    pub host_id: Uuid,
    pub status: RoomStatus,
}

/// Player information in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: Uuid,
    pub name: String,
    pub team: Team,
    pub connected: bool,
}

/// Room status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Waiting,
    InGame,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_message_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{ "type": "GameAction", "payload": { "action": { "ClickNode": "B5" } } }"#,
        )
        .unwrap();

        match msg {
            ClientMessage::GameAction { action } => {
                assert_eq!(action, GameAction::ClickNode("B5".into()))
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_unit_message_format() {
        let msg: ClientMessage = serde_json::from_str(r#"{ "type": "Ping" }"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));

        let json = serde_json::to_value(ServerMessage::Pong).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "Pong" }));
    }
}
