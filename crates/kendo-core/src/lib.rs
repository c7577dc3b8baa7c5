//! Kendo - a two-player strategy game on a fixed node graph
//!
//! This crate provides the core game logic for Kendo:
//! - A board graph of named nodes with symmetric adjacency
//! - Move generation for the three piece ranges
//! - A click-driven selection and move state machine
//!
//! # Architecture
//!
//! The engine draws nothing and polls no input. A renderer reads
//! [`BoardView`] snapshots and feeds node clicks back through
//! [`GameState::click`]. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for a browser front end
//!
//! # Modules
//!
//! - [`board`]: Nodes, adjacency and occupancy
//! - [`layout`]: Board construction input and the standard board
//! - [`moves`]: Legal destinations per piece
//! - [`game`]: Selection state machine and move execution
//! - [`bot`]: Computer players

pub mod actions;
pub mod board;
pub mod bot;
pub mod game;
pub mod layout;
pub mod moves;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Board, BoardView, MovingRange, Node, NodeId, NodeView, Piece, Team, MIDDLE_NODE};
pub use bot::{Bot, BotDifficulty};
pub use game::{GameError, GameState, Selection};
pub use layout::{BoardLayout, EdgeSpec, Placement};
