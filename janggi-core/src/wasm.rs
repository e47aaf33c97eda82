//! WASM bindings for janggi-core
//!
//! Squares are passed as algebraic strings ("e2"), sides as "red"/"blue".

use wasm_bindgen::prelude::*;

use crate::{Cell, GameConfig, JanggiGame, Side};

/// WASM-friendly wrapper around JanggiGame
#[wasm_bindgen]
pub struct WasmGame {
    inner: JanggiGame,
}

#[wasm_bindgen]
impl WasmGame {
    /// Standard starting position, Blue to move
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: JanggiGame::new() }
    }

    /// Start with chosen formations, e.g. `{ "red": "ma_sang_ma_sang" }`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<WasmGame, JsError> {
        let config: GameConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(WasmGame { inner: JanggiGame::with_config(&config) })
    }

    /// "UNFINISHED", "RED_WON" or "BLUE_WON"
    #[wasm_bindgen(js_name = gameState)]
    pub fn game_state(&self) -> String {
        self.inner.game_state().to_string()
    }

    /// "red" or "blue"
    #[wasm_bindgen(js_name = sideToMove)]
    pub fn side_to_move(&self) -> String {
        self.inner.side_to_move().to_string()
    }

    /// Play a move. Returns true if it was accepted.
    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, from: &str, to: &str) -> bool {
        self.inner.make_move(from, to)
    }

    /// Like makeMove, but throws with the reason a move was refused
    #[wasm_bindgen(js_name = tryMove)]
    pub fn try_move(&mut self, from: &str, to: &str) -> Result<(), JsError> {
        self.inner.try_move(from, to)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = isInCheck)]
    pub fn is_in_check(&self, side: &str) -> Result<bool, JsError> {
        Ok(self.inner.is_in_check(parse_side(side)?))
    }

    #[wasm_bindgen(js_name = isCheckmate)]
    pub fn is_checkmate(&mut self, side: &str) -> Result<bool, JsError> {
        Ok(self.inner.is_checkmate(parse_side(side)?))
    }

    /// Destinations of the piece on `square` as an array of square names
    pub fn destinations(&self, square: &str) -> Result<JsValue, JsError> {
        let names: Vec<String> = self.inner.destinations(square)?.iter().map(|c| c.to_string()).collect();
        Ok(serde_wasm_bindgen::to_value(&names)?)
    }

    /// Legal moves for the side to move as [[from, to], ...]
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&mut self) -> Result<JsValue, JsError> {
        let moves: Vec<[String; 2]> = self
            .inner
            .legal_moves()
            .into_iter()
            .map(|(from, to)| [from.to_string(), to.to_string()])
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// All occupied cells as [{ square, side, kind }, ...]
    pub fn pieces(&self) -> Result<JsValue, JsError> {
        let board = self.inner.position().board();
        let pieces: Vec<WasmPiece> = Cell::all()
            .filter_map(|cell| {
                board.occupant(cell).map(|piece| WasmPiece {
                    square: cell.to_string(),
                    side: piece.side,
                    kind: piece.kind,
                })
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&pieces)?)
    }

    /// Text diagram of the board
    #[wasm_bindgen(js_name = toText)]
    pub fn to_text(&self) -> String {
        self.inner.position().board().to_string()
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame { inner: self.inner.clone() }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_side(side: &str) -> Result<Side, JsError> {
    match side {
        "red" => Ok(Side::Red),
        "blue" => Ok(Side::Blue),
        other => Err(JsError::new(&format!("unknown side {other:?}"))),
    }
}

/// Serializable piece for JavaScript
#[derive(serde::Serialize)]
struct WasmPiece {
    square: String,
    side: Side,
    kind: crate::PieceKind,
}
