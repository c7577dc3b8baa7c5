//! WebAssembly bindings for the Kendo engine.
//!
//! A browser renderer draws from `getBoard` and forwards clicks to `clickNode`.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::board::Team;
use crate::bot::{Bot, BotDifficulty};
use crate::game::GameState;
use crate::layout::BoardLayout;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_team(team: &str) -> Result<Team, JsValue> {
    match team {
        "One" => Ok(Team::One),
        "Two" => Ok(Team::Two),
        other => Err(JsValue::from_str(&format!("Unknown team: {}", other))),
    }
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a game on the standard board
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            state: GameState::new(),
        }
    }

    /// Start a game from a JSON layout
    #[wasm_bindgen(js_name = fromLayout)]
    pub fn from_layout(layout_json: &str) -> Result<WasmGame, JsValue> {
        let layout = BoardLayout::from_json(layout_json).map_err(to_js_error)?;
        let state = GameState::from_layout(&layout).map_err(to_js_error)?;
        Ok(WasmGame { state })
    }

    /// Board snapshot as JSON: nodes with neighbors, occupants and highlights
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.view()).map_err(to_js_error)
    }

    /// Current selection as JSON
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.selection()).map_err(to_js_error)
    }

    /// Forward a click on a node, returns events JSON
    #[wasm_bindgen(js_name = clickNode)]
    pub fn click_node(&mut self, node: &str) -> Result<String, JsValue> {
        let events = self.state.click(node).map_err(to_js_error)?;
        serde_json::to_string(&events).map_err(to_js_error)
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;
        let events = self.state.apply_action(action).map_err(to_js_error)?;
        serde_json::to_string(&events).map_err(to_js_error)
    }

    /// Every legal move of a team ("One" or "Two") as a JSON array of actions
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self, team: &str) -> Result<String, JsValue> {
        let actions = self.state.valid_moves(parse_team(team)?);
        serde_json::to_string(&actions).map_err(to_js_error)
    }

    /// A bot's suggested move as JSON, or "null" when the team is stuck.
    /// difficulty: "Easy" or "Medium"
    #[wasm_bindgen(js_name = getBotAction)]
    pub fn get_bot_action(&self, team: &str, difficulty: &str) -> Result<String, JsValue> {
        let difficulty = match difficulty {
            "Easy" => BotDifficulty::Easy,
            _ => BotDifficulty::Medium,
        };

        let mut bot = Bot::new(parse_team(team)?, difficulty);
        serde_json::to_string(&bot.choose_action(&self.state)).map_err(to_js_error)
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
