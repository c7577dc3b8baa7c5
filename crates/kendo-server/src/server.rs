//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, RoomInfo, RoomStatus, ServerMessage};
use crate::room::GameRoom;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use kendo_core::{BoardLayout, GameAction};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Board every new game starts from
    pub layout: BoardLayout,
    /// All active rooms
    pub rooms: DashMap<Uuid, GameRoom>,
    /// Mapping from player ID to their room ID
    pub player_rooms: DashMap<Uuid, Uuid>,
    /// Mapping from player ID to their message sender
    pub player_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            rooms: DashMap::new(),
            player_rooms: DashMap::new(),
            player_senders: DashMap::new(),
        }
    }

    /// Send a message to a specific player.
    pub fn send_to_player(&self, player_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.player_senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn send_error(&self, player_id: Uuid, message: impl ToString) {
        self.send_to_player(
            player_id,
            ServerMessage::Error {
                message: message.to_string(),
            },
        );
    }

    /// Broadcast a message to every player in a room, optionally skipping one.
    pub fn broadcast_to_room(&self, room_id: Uuid, msg: ServerMessage, except: Option<Uuid>) {
        let recipients: Vec<Uuid> = match self.rooms.get(&room_id) {
            Some(room) => room
                .players
                .keys()
                .copied()
                .filter(|id| Some(*id) != except)
                .collect(),
            None => return,
        };

        for player_id in recipients {
            self.send_to_player(player_id, msg.clone());
        }
    }

    /// Rooms still waiting for a second player.
    pub fn waiting_rooms(&self) -> Vec<RoomInfo> {
        self.rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Waiting)
            .map(|r| r.to_info())
            .collect()
    }

    fn room_of(&self, player_id: Uuid) -> Option<Uuid> {
        self.player_rooms.get(&player_id).map(|entry| *entry)
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Kendo server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let player_id = Uuid::new_v4();
    info!(%player_id, "New WebSocket connection from {}", addr);

    // Outgoing messages are funneled through one channel per player
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.player_senders.insert(player_id, tx);
    state.send_to_player(player_id, ServerMessage::Welcome { player_id });

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to encode message: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(player_id, client_msg, &state),
                Err(e) => {
                    warn!(%player_id, "Invalid message: {}", e);
                    state.send_error(player_id, format!("Invalid message: {}", e));
                }
            },
            Ok(Message::Close(_)) => {
                info!(%player_id, "Client closing connection");
                break;
            }
            Ok(Message::Ping(_)) => state.send_to_player(player_id, ServerMessage::Pong),
            Err(e) => {
                error!(%player_id, "WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    handle_disconnect(player_id, &state);
    state.player_senders.remove(&player_id);
    send_task.abort();

    info!(%player_id, "Connection closed");
    Ok(())
}

/// Handle a client message.
fn handle_message(player_id: Uuid, msg: ClientMessage, state: &ServerState) {
    match msg {
        ClientMessage::CreateRoom { player_name } => create_room(player_id, player_name, state),
        ClientMessage::JoinRoom {
            room_id,
            player_name,
        } => join_room(player_id, room_id, player_name, state),
        ClientMessage::LeaveRoom => leave_room(player_id, state),
        ClientMessage::StartGame => start_game(player_id, state),
        ClientMessage::GameAction { action } => game_action(player_id, action, state),
        ClientMessage::Chat { message } => chat(player_id, message, state),
        ClientMessage::ListRooms => {
            let rooms = state.waiting_rooms();
            state.send_to_player(player_id, ServerMessage::RoomList { rooms });
        }
        ClientMessage::Ping => state.send_to_player(player_id, ServerMessage::Pong),
    }
}

fn create_room(player_id: Uuid, player_name: String, state: &ServerState) {
    if state.room_of(player_id).is_some() {
        state.send_error(player_id, "Already in a room");
        return;
    }

    let room_id = Uuid::new_v4();
    let room = GameRoom::new(room_id, player_id, player_name);
    let room_info = room.to_info();

    state.rooms.insert(room_id, room);
    state.player_rooms.insert(player_id, room_id);
    info!(%player_id, %room_id, "Room created");

    state.send_to_player(player_id, ServerMessage::RoomCreated { room_id });
    state.send_to_player(player_id, ServerMessage::JoinedRoom { room: room_info });
}

fn join_room(player_id: Uuid, room_id: Uuid, player_name: String, state: &ServerState) {
    if state.room_of(player_id).is_some() {
        state.send_error(player_id, "Already in a room");
        return;
    }

    let joined = match state.rooms.get_mut(&room_id) {
        Some(mut room) => room.add_player(player_id, player_name).map(|_| room.to_info()),
        None => {
            state.send_error(player_id, "Room not found");
            return;
        }
    };

    match joined {
        Ok(room_info) => {
            state.player_rooms.insert(player_id, room_id);
            state.send_to_player(
                player_id,
                ServerMessage::JoinedRoom {
                    room: room_info.clone(),
                },
            );
            state.broadcast_to_room(
                room_id,
                ServerMessage::RoomUpdated { room: room_info },
                Some(player_id),
            );
        }
        Err(e) => state.send_error(player_id, e),
    }
}

fn leave_room(player_id: Uuid, state: &ServerState) {
    let Some((_, room_id)) = state.player_rooms.remove(&player_id) else {
        return;
    };

    remove_from_room(player_id, room_id, state);
    state.send_to_player(player_id, ServerMessage::LeftRoom);
}

/// Drop a player from a room, deleting the room once it is empty.
fn remove_from_room(player_id: Uuid, room_id: Uuid, state: &ServerState) {
    let remaining = match state.rooms.get_mut(&room_id) {
        Some(mut room) => match room.remove_player(player_id) {
            Ok(true) => None,
            Ok(false) => Some(room.to_info()),
            Err(e) => {
                warn!(%player_id, %room_id, "Leaving room failed: {}", e);
                return;
            }
        },
        None => return,
    };

    match remaining {
        Some(room_info) => {
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info }, None)
        }
        None => {
            state.rooms.remove(&room_id);
            info!(%room_id, "Room closed");
        }
    }
}

fn start_game(player_id: Uuid, state: &ServerState) {
    let Some(room_id) = state.room_of(player_id) else {
        state.send_error(player_id, "Not in a room");
        return;
    };

    let started = match state.rooms.get_mut(&room_id) {
        Some(mut room) => room
            .start_game(player_id, &state.layout)
            .map(|()| (room.board_view(), room.to_info())),
        None => return,
    };

    match started {
        Ok((Some(board), room_info)) => {
            info!(%room_id, "Game started");
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info }, None);
            state.broadcast_to_room(room_id, ServerMessage::GameStarted { board }, None);
        }
        Ok((None, _)) => error!(%room_id, "Game started without a board"),
        Err(e) => state.send_error(player_id, e),
    }
}

fn game_action(player_id: Uuid, action: GameAction, state: &ServerState) {
    let Some(room_id) = state.room_of(player_id) else {
        state.send_error(player_id, "Not in a room");
        return;
    };

    let outcome = match state.rooms.get_mut(&room_id) {
        Some(mut room) => room
            .apply_action(player_id, action)
            .map(|events| (events, room.board_view())),
        None => return,
    };

    match outcome {
        Ok((events, board)) => {
            debug!(%player_id, %room_id, count = events.len(), "Action applied");
            state.send_to_player(
                player_id,
                ServerMessage::ActionResult {
                    success: true,
                    events,
                    error: None,
                },
            );
            if let Some(board) = board {
                state.broadcast_to_room(room_id, ServerMessage::BoardUpdated { board }, None);
            }
        }
        Err(e) => {
            debug!(%player_id, %room_id, "Action rejected: {}", e);
            state.send_to_player(
                player_id,
                ServerMessage::ActionResult {
                    success: false,
                    events: vec![],
                    error: Some(e.to_string()),
                },
            );
        }
    }
}

fn chat(player_id: Uuid, message: String, state: &ServerState) {
    let Some(room_id) = state.room_of(player_id) else {
        return;
    };

    let player_name = state
        .rooms
        .get(&room_id)
        .and_then(|room| room.player_name(player_id).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string());

    state.broadcast_to_room(
        room_id,
        ServerMessage::ChatMessage {
            player_name,
            message,
        },
        None,
    );
}

/// Handle player disconnect.
fn handle_disconnect(player_id: Uuid, state: &ServerState) {
    let Some((_, room_id)) = state.player_rooms.remove(&player_id) else {
        return;
    };

    let in_game_info = match state.rooms.get_mut(&room_id) {
        // Mid-game the seat stays, marked disconnected, so the other player keeps the board
        Some(mut room) if room.status == RoomStatus::InGame => {
            room.set_player_connected(player_id, false);
            let abandoned = room.players.values().all(|p| !p.connected);
            Some((abandoned, room.to_info()))
        }
        Some(_) => None,
        None => return,
    };

    match in_game_info {
        Some((true, _)) => {
            state.rooms.remove(&room_id);
            info!(%room_id, "Room closed, every player disconnected");
        }
        Some((false, room_info)) => {
            state.broadcast_to_room(room_id, ServerMessage::RoomUpdated { room: room_info }, None)
        }
        None => remove_from_room(player_id, room_id, state),
    }
}
