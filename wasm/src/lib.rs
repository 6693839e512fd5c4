//! # Tile Merge WebAssembly Bindings
//!
//! JavaScript-friendly bindings to the tile merge engine using wasm-bindgen.
//! The page owns rendering and key handling; it forwards direction codes
//! here, redraws from the returned state, then calls `settle()` (possibly
//! after an animation delay) before the next move is accepted.

use serde::Serialize;
use tile_merge_core::{Engine, EngineConfig, MoveOutcome};
use wasm_bindgen::prelude::*;

/// Result of a move, serialized for JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsMoveResult {
    /// The updated board (row-major).
    pub board: Vec<u32>,
    /// Current total score.
    pub score: u64,
    /// Points earned from this move.
    pub gained: u64,
    /// Whether the board changed.
    pub changed: bool,
    /// Whether the move was dropped because the previous one was not settled.
    pub ignored: bool,
}

/// WebAssembly wrapper for the engine.
#[wasm_bindgen]
pub struct WasmGame {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game.
    ///
    /// Throws if the board has fewer than two cells.
    #[wasm_bindgen(constructor)]
    pub fn new(rows: usize, cols: usize, max_snapshots: usize, seed: u64) -> Result<WasmGame, JsError> {
        let config = EngineConfig {
            rows,
            cols,
            max_snapshots,
            seed,
            ..EngineConfig::default()
        };
        Ok(WasmGame {
            engine: Engine::new(config)?,
        })
    }

    /// Create a game from a config object such as
    /// `{ rows: 5, cols: 5, maxSnapshots: 3, seed: 7, fourProbability: 0.1 }`.
    /// Missing fields take their defaults.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config: JsValue) -> Result<WasmGame, JsError> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(WasmGame {
            engine: Engine::new(config)?,
        })
    }

    /// Start over with a new seed, keeping size and undo depth.
    pub fn restart(&mut self, seed: u64) -> Result<(), JsError> {
        self.engine.restart(seed)?;
        Ok(())
    }

    /// Apply a move.
    ///
    /// Direction codes: 0 = Up, 1 = Down, 2 = Left, 3 = Right. Any other
    /// code throws.
    ///
    /// Returns `{ board, score, gained, changed, ignored }`.
    #[wasm_bindgen(js_name = submitDirection)]
    pub fn submit_direction(&mut self, code: u8) -> Result<JsValue, JsError> {
        let outcome = self.engine.submit_code(code)?;
        self.create_js_result(outcome)
    }

    /// Acknowledge that the last move has been drawn. Returns whether the
    /// game is over.
    pub fn settle(&mut self) -> bool {
        self.engine.settle()
    }

    /// Undo the last move. Returns whether anything was restored.
    #[wasm_bindgen(js_name = requestUndo)]
    pub fn request_undo(&mut self) -> bool {
        self.engine.request_undo().restored
    }

    /// Get the current board (row-major).
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<u32> {
        self.engine.cells().to_vec()
    }

    /// Get the current score.
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> u64 {
        self.engine.score()
    }

    #[wasm_bindgen(js_name = getRows)]
    pub fn get_rows(&self) -> usize {
        self.engine.rows()
    }

    #[wasm_bindgen(js_name = getCols)]
    pub fn get_cols(&self) -> usize {
        self.engine.cols()
    }

    /// Check if the game is over.
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    /// Get the maximum tile value on the board.
    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> u32 {
        self.engine.max_tile()
    }

    /// Get legal moves as 4 flags [Up, Down, Left, Right].
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> Vec<u8> {
        self.engine
            .legal_directions()
            .iter()
            .map(|&b| u8::from(b))
            .collect()
    }

    fn create_js_result(&self, outcome: MoveOutcome) -> Result<JsValue, JsError> {
        let js_result = JsMoveResult {
            board: self.engine.cells().to_vec(),
            score: self.engine.score(),
            gained: outcome.gained,
            changed: outcome.changed,
            ignored: outcome.ignored,
        };
        Ok(serde_wasm_bindgen::to_value(&js_result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_creation() {
        let game = WasmGame::new(4, 4, 1, 42).ok().unwrap();
        assert_eq!(game.get_board().len(), 16);
        assert_eq!(game.get_score(), 0);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_legal_moves_are_flags() {
        let game = WasmGame::new(3, 5, 1, 7).ok().unwrap();
        let legal = game.get_legal_moves();
        assert_eq!(legal.len(), 4);
        assert!(legal.iter().all(|&f| f <= 1));
    }

    #[test]
    fn test_undo_without_history() {
        let mut game = WasmGame::new(4, 4, 1, 1).ok().unwrap();
        assert!(!game.request_undo());
    }
}
