//! # Tile Merge Core Engine
//!
//! Grid engine for a 2048-style sliding tile puzzle on any `rows x cols`
//! board: direction-agnostic traversal, shift/merge with at most one merge
//! per tile, seedable tile spawning, game-over detection and a bounded undo
//! history. Rendering and input capture live in the front-end crates.
//!
//! ## Example
//!
//! ```rust
//! use tile_merge_core::{Direction, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default().with_seed(42)).unwrap();
//! let outcome = engine.submit_direction(Direction::Left).unwrap();
//! // render here, then let the engine accept the next command
//! let game_over = engine.settle();
//! println!("Score: {}, Changed: {}, Over: {}", engine.score(), outcome.changed, game_over);
//!
//! if engine.request_undo().restored {
//!     println!("Back to score {}", engine.score());
//! }
//! ```

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod grid;
pub mod history;
pub mod moves;
pub mod spawn;
pub mod traversal;

pub use config::EngineConfig;
pub use direction::Direction;
pub use engine::{Engine, MoveOutcome, Phase, UndoOutcome};
pub use error::EngineError;
pub use grid::{Grid, Tile, MAX_TILE};
pub use history::{History, Snapshot};
pub use moves::{apply_move, can_move, has_any_legal_move, legal_directions, MoveResult};
pub use spawn::Spawner;
pub use traversal::Traversal;
