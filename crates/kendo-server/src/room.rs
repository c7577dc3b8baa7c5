//! Game room management.

use kendo_core::{BoardLayout, BoardView, GameAction, GameError, GameEvent, GameState, Team};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{PlayerInfo, RoomInfo, RoomStatus};

/// Kendo is strictly two-player
const MAX_PLAYERS: usize = 2;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Room is full")]
    RoomFull,

    #[error("Player not in room")]
    PlayerNotInRoom,

    #[error("Not the host")]
    NotHost,

    #[error("Game already started")]
    GameAlreadyStarted,

    #[error("Not enough players")]
    NotEnoughPlayers,

    #[error("Game not started")]
    GameNotStarted,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// A player seated in a room.
#[derive(Debug, Clone)]
pub struct RoomPlayer {
    pub id: Uuid,
    pub name: String,
    pub team: Team,
    pub connected: bool,
}

impl RoomPlayer {
    pub fn new(id: Uuid, name: String, team: Team) -> Self {
        Self {
            id,
            name,
            team,
            connected: true,
        }
    }

    pub fn to_info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
            team: self.team,
            connected: self.connected,
        }
    }
}

/// A room for one game of Kendo.
///
/// The host plays Team One; whoever joins takes the free team. Both players
/// act on one shared board, so a click from either seat drives the selection.
pub struct GameRoom {
    pub id: Uuid,
    pub name: String,
    pub host_id: Uuid,
    pub status: RoomStatus,
    pub players: HashMap<Uuid, RoomPlayer>,
    /// Seating order
    pub player_order: Vec<Uuid>,
    /// The game state (once started)
    pub game: Option<GameState>,
}

impl GameRoom {
    pub fn new(id: Uuid, host_id: Uuid, host_name: String) -> Self {
        let mut players = HashMap::new();
        players.insert(host_id, RoomPlayer::new(host_id, host_name.clone(), Team::One));

        Self {
            id,
            name: format!("{}'s Game", host_name),
            host_id,
            status: RoomStatus::Waiting,
            players,
            player_order: vec![host_id],
            game: None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// The team nobody in the room is playing yet
    fn free_team(&self) -> Option<Team> {
        Team::ALL
            .into_iter()
            .find(|team| self.players.values().all(|p| p.team != *team))
    }

    pub fn add_player(&mut self, player_id: Uuid, name: String) -> Result<Team, RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::GameAlreadyStarted);
        }
        let team = match self.free_team() {
            Some(team) if !self.is_full() => team,
            _ => return Err(RoomError::RoomFull),
        };

        self.players
            .insert(player_id, RoomPlayer::new(player_id, name, team));
        self.player_order.push(player_id);
        Ok(team)
    }

    /// Remove a player, returning true if the room is now empty
    pub fn remove_player(&mut self, player_id: Uuid) -> Result<bool, RoomError> {
        if self.players.remove(&player_id).is_none() {
            return Err(RoomError::PlayerNotInRoom);
        }
        self.player_order.retain(|&id| id != player_id);

        if player_id == self.host_id {
            if let Some(&next) = self.player_order.first() {
                self.host_id = next;
            }
        }

        Ok(self.players.is_empty())
    }

    pub fn set_player_connected(&mut self, player_id: Uuid, connected: bool) {
        if let Some(player) = self.players.get_mut(&player_id) {
            player.connected = connected;
        }
    }

    pub fn start_game(&mut self, requester_id: Uuid, layout: &BoardLayout) -> Result<(), RoomError> {
        if requester_id != self.host_id {
            return Err(RoomError::NotHost);
        }
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.players.len() < MAX_PLAYERS {
            return Err(RoomError::NotEnoughPlayers);
        }

        self.game = Some(GameState::from_layout(layout)?);
        self.status = RoomStatus::InGame;
        Ok(())
    }

    pub fn apply_action(
        &mut self,
        player_id: Uuid,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, RoomError> {
        if !self.players.contains_key(&player_id) {
            return Err(RoomError::PlayerNotInRoom);
        }
        let game = self.game.as_mut().ok_or(RoomError::GameNotStarted)?;

        Ok(game.apply_action(action)?)
    }

    pub fn board_view(&self) -> Option<BoardView> {
        self.game.as_ref().map(GameState::view)
    }

    pub fn player_name(&self, player_id: Uuid) -> Option<&str> {
        self.players.get(&player_id).map(|p| p.name.as_str())
    }

    pub fn to_info(&self) -> RoomInfo {
        RoomInfo {
            id: self.id,
            name: self.name.clone(),
            players: self
                .player_order
                .iter()
                .filter_map(|id| self.players.get(id).map(RoomPlayer::to_info))
                .collect(),
            host_id: self.host_id,
            status: self.status,
        }
    }
}
