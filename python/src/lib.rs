//! # Tile Merge Python Bindings
//!
//! Python bindings to the tile merge engine using PyO3. Exposes a `Game`
//! class for scripting, bots and notebook play.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use tile_merge_core::{Engine, EngineConfig, EngineError, MoveOutcome};

fn to_py_err(e: EngineError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python wrapper for the engine.
///
/// Usage:
///     from tile_merge import Game, Directions
///     game = Game(rows=4, cols=4, max_snapshots=1, seed=42)
///     result = game.move(Directions.LEFT)
///     print(result)  # {'board': [...], 'score': 4, 'gained': 4, 'changed': True, 'done': False}
///     game.undo()
#[pyclass]
pub struct Game {
    inner: Engine,
}

#[pymethods]
impl Game {
    /// Create a new game.
    ///
    /// Args:
    ///     rows, cols: board size (at least two cells)
    ///     max_snapshots: how many moves undo can step back
    ///     seed: 64-bit seed for the tile spawner
    ///     four_probability: chance a spawned tile is a 4
    #[new]
    #[pyo3(signature = (rows=4, cols=4, max_snapshots=1, seed=42, four_probability=0.15))]
    fn new(
        rows: usize,
        cols: usize,
        max_snapshots: usize,
        seed: u64,
        four_probability: f64,
    ) -> PyResult<Self> {
        let config = EngineConfig {
            rows,
            cols,
            max_snapshots,
            seed,
            four_probability,
        };
        Ok(Game {
            inner: Engine::new(config).map_err(to_py_err)?,
        })
    }

    /// Start over with a new seed, keeping size and undo depth.
    fn restart(&mut self, seed: u64) -> PyResult<()> {
        self.inner.restart(seed).map_err(to_py_err)
    }

    /// Apply a move and run the game-over check.
    ///
    /// Args:
    ///     direction: 0=Up, 1=Down, 2=Left, 3=Right
    ///
    /// Returns:
    ///     dict with keys: board, score, gained, changed, done
    ///
    /// Raises:
    ///     ValueError: for any other direction code
    #[pyo3(name = "move")]
    fn make_move(&mut self, py: Python<'_>, direction: u8) -> PyResult<PyObject> {
        let outcome = self.inner.submit_code(direction).map_err(to_py_err)?;
        self.inner.settle();
        self.create_result_dict(py, outcome)
    }

    /// Undo the last move. Returns whether anything was restored.
    fn undo(&mut self) -> bool {
        self.inner.request_undo().restored
    }

    /// Current board in row-major order.
    fn board(&self) -> Vec<u32> {
        self.inner.cells().to_vec()
    }

    /// Current board as a list of rows.
    fn rows_view(&self) -> Vec<Vec<u32>> {
        self.inner
            .cells()
            .chunks(self.inner.cols())
            .map(|row| row.to_vec())
            .collect()
    }

    fn score(&self) -> u64 {
        self.inner.score()
    }

    #[getter]
    fn shape(&self) -> (usize, usize) {
        (self.inner.rows(), self.inner.cols())
    }

    fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    fn max_tile(&self) -> u32 {
        self.inner.max_tile()
    }

    fn empty_count(&self) -> usize {
        self.inner.empty_count()
    }

    /// Legal moves as a list of 4 booleans [Up, Down, Left, Right].
    fn legal_moves(&self) -> Vec<bool> {
        self.inner.legal_directions().to_vec()
    }

    fn __repr__(&self) -> String {
        format!(
            "Game(shape={}x{}, score={}, max_tile={}, done={})",
            self.inner.rows(),
            self.inner.cols(),
            self.inner.score(),
            self.inner.max_tile(),
            self.inner.is_done()
        )
    }

    fn __str__(&self) -> String {
        format!("{}", self.inner)
    }
}

impl Game {
    fn create_result_dict(&self, py: Python<'_>, outcome: MoveOutcome) -> PyResult<PyObject> {
        let dict = PyDict::new(py);
        dict.set_item("board", self.inner.cells().to_vec())?;
        dict.set_item("score", self.inner.score())?;
        dict.set_item("gained", outcome.gained)?;
        dict.set_item("changed", outcome.changed)?;
        dict.set_item("done", self.inner.is_done())?;
        Ok(dict.into())
    }
}

/// Direction codes for convenience.
#[pyclass]
struct Directions;

#[pymethods]
impl Directions {
    #[classattr]
    const UP: u8 = 0;
    #[classattr]
    const DOWN: u8 = 1;
    #[classattr]
    const LEFT: u8 = 2;
    #[classattr]
    const RIGHT: u8 = 3;
}

/// Python module for the tile merge engine.
#[pymodule]
fn tile_merge(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<Game>()?;
    m.add_class::<Directions>()?;
    Ok(())
}
