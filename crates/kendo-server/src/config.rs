//! Server configuration from environment variables.

use anyhow::Context;
use kendo_core::{Board, BoardLayout};
use std::net::SocketAddr;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Startup settings.
///
/// - `SERVER_ADDR`: listen address, defaults to `0.0.0.0:8080`
/// - `KENDO_LAYOUT`: path to a JSON board layout, defaults to the standard board
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub layout: BoardLayout,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let addr: SocketAddr = std::env::var("SERVER_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.into())
            .parse()
            .context("SERVER_ADDR is not a socket address")?;

        let layout = match std::env::var("KENDO_LAYOUT") {
            Ok(path) => load_layout(&path)?,
            Err(_) => BoardLayout::standard(),
        };

        Ok(Self { addr, layout })
    }
}

/// Read and check a layout file, so a broken board fails at startup
/// rather than when the first room starts.
fn load_layout(path: &str) -> anyhow::Result<BoardLayout> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading layout file {}", path))?;
    let layout = BoardLayout::from_json(&json)?;
    Board::from_layout(&layout).with_context(|| format!("building board from {}", path))?;
    Ok(layout)
}
