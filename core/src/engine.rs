use std::fmt;

use log::{debug, info};

use crate::config::EngineConfig;
use crate::direction::Direction;
use crate::error::Result;
use crate::grid::{Grid, Tile};
use crate::history::History;
use crate::moves;
use crate::spawn::Spawner;

/// Whether the engine is ready for a new command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting moves and undo.
    Idle,
    /// A move was applied and the front-end has not called
    /// [`Engine::settle`] yet. Moves and undo are ignored.
    Processing,
}

/// Result of submitting a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Whether the grid changed (and a tile was spawned).
    pub changed: bool,
    /// Points earned from merges in this move.
    pub gained: u64,
    /// The command arrived while a previous move was still in flight and
    /// was dropped.
    pub ignored: bool,
}

impl MoveOutcome {
    fn ignored() -> Self {
        MoveOutcome {
            ignored: true,
            ..MoveOutcome::default()
        }
    }
}

/// Result of an undo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoOutcome {
    pub restored: bool,
}

/// The game state: grid, score, undo history and the tile spawner.
///
/// Commands follow a run-to-completion model. [`submit_direction`] applies a
/// move, spawns and snapshots, then leaves the engine in
/// [`Phase::Processing`] so the front-end can render. [`settle`] runs the
/// game-over check and makes the engine [`Phase::Idle`] again. Use
/// [`play`] when there is nothing to wait for.
///
/// [`submit_direction`]: Engine::submit_direction
/// [`settle`]: Engine::settle
/// [`play`]: Engine::play
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    history: History,
    spawner: Spawner,
    phase: Phase,
    game_over: bool,
}

impl Engine {
    /// Start a new game: empty grid, two 2-tiles, first snapshot.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut engine = Engine {
            config,
            grid: Grid::new(config.rows, config.cols)?,
            score: 0,
            history: History::new(config.max_snapshots),
            spawner: Spawner::new(config.seed, config.four_probability)?,
            phase: Phase::Idle,
            game_over: false,
        };
        engine.spawner.spawn(&mut engine.grid, Some(2))?;
        engine.spawner.spawn(&mut engine.grid, Some(2))?;
        engine.history.save(engine.score, &engine.grid);
        engine.game_over = engine.is_game_over();
        info!(
            "new {}x{} game (seed {}, undo depth {})",
            config.rows, config.cols, config.seed, config.max_snapshots
        );
        Ok(engine)
    }

    /// Start from a given position instead of two random tiles.
    ///
    /// The position becomes the first snapshot.
    pub fn with_position(config: EngineConfig, cells: &[Tile], score: u64) -> Result<Self> {
        config.validate()?;
        let grid = Grid::from_cells(config.rows, config.cols, cells)?;
        let mut history = History::new(config.max_snapshots);
        history.save(score, &grid);
        let game_over = !moves::has_any_legal_move(&grid);
        Ok(Engine {
            config,
            grid,
            score,
            history,
            spawner: Spawner::new(config.seed, config.four_probability)?,
            phase: Phase::Idle,
            game_over,
        })
    }

    /// Throw away the current game and start over with `config`.
    pub fn initialize(&mut self, config: EngineConfig) -> Result<()> {
        *self = Engine::new(config)?;
        Ok(())
    }

    /// Start over with the same dimensions and undo depth but a new seed.
    pub fn restart(&mut self, seed: u64) -> Result<()> {
        self.initialize(self.config.with_seed(seed))
    }

    /// Apply a move in `direction`.
    ///
    /// If the grid changed, the score grows by the merge total, a new tile
    /// is spawned and the state is snapshotted. The engine stays in
    /// [`Phase::Processing`] until [`Engine::settle`] is called. A command
    /// submitted while already processing is ignored.
    pub fn submit_direction(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.phase == Phase::Processing {
            debug!("ignoring {direction}: previous move not settled");
            return Ok(MoveOutcome::ignored());
        }
        self.phase = Phase::Processing;

        let result = moves::apply_move(&mut self.grid, direction);
        if result.changed {
            self.score += result.gained;
            if let Err(e) = self.spawner.spawn(&mut self.grid, None) {
                self.phase = Phase::Idle;
                return Err(e);
            }
            self.history.save(self.score, &self.grid);
        }
        debug!(
            "move {direction}: changed={} gained={} score={}",
            result.changed, result.gained, self.score
        );

        Ok(MoveOutcome {
            changed: result.changed,
            gained: result.gained,
            ignored: false,
        })
    }

    /// [`submit_direction`](Engine::submit_direction) from a raw code
    /// (0=Up, 1=Down, 2=Left, 3=Right). Unknown codes are rejected.
    pub fn submit_code(&mut self, code: u8) -> Result<MoveOutcome> {
        self.submit_direction(Direction::from_u8(code)?)
    }

    /// Finish the in-flight move: check for game over and go back to idle.
    ///
    /// Returns whether the game is over.
    pub fn settle(&mut self) -> bool {
        self.game_over = self.is_game_over();
        if self.game_over && self.phase == Phase::Processing {
            info!("game over with score {}", self.score);
        }
        self.phase = Phase::Idle;
        self.game_over
    }

    /// Submit and settle in one go.
    pub fn play(&mut self, direction: Direction) -> Result<MoveOutcome> {
        let outcome = self.submit_direction(direction)?;
        if !outcome.ignored {
            self.settle();
        }
        Ok(outcome)
    }

    /// Roll back to the state before the most recent move.
    ///
    /// Nothing happens while a move is in flight or when there is no earlier
    /// snapshot.
    pub fn request_undo(&mut self) -> UndoOutcome {
        if self.phase == Phase::Processing {
            debug!("ignoring undo: previous move not settled");
            return UndoOutcome { restored: false };
        }
        match self.history.restore() {
            Some(snapshot) => {
                self.score = snapshot.score();
                self.grid.overwrite(snapshot.cells());
                self.game_over = self.is_game_over();
                debug!("undo: score back to {}", self.score);
                UndoOutcome { restored: true }
            }
            None => UndoOutcome { restored: false },
        }
    }

    /// Whether no direction can change the grid. Always computed from the
    /// current grid.
    pub fn is_game_over(&self) -> bool {
        !moves::has_any_legal_move(&self.grid)
    }

    /// Game-over state as of the last [`settle`](Engine::settle), undo or
    /// (re)start.
    pub fn is_done(&self) -> bool {
        self.game_over
    }

    /// Legality of each direction, indexed like [`Direction::ALL`].
    pub fn legal_directions(&self) -> [bool; 4] {
        moves::legal_directions(&self.grid)
    }

    /// Whether an undo would currently succeed.
    pub fn can_undo(&self) -> bool {
        self.phase == Phase::Idle && self.history.len() >= 2
    }

    /// Row-major tile values.
    pub fn cells(&self) -> &[Tile] {
        self.grid.cells()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn max_tile(&self) -> Tile {
        self.grid.max_tile()
    }

    pub fn empty_count(&self) -> usize {
        self.grid.empty_count()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Engine {{ score: {}, phase: {:?}, done: {}, history: {} }}",
            self.score,
            self.phase,
            self.game_over,
            self.history.len()
        )?;
        write!(f, "{:?}", self.grid)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        write!(f, "{}", self.grid)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn line(cells: &[Tile]) -> Engine {
        let config = EngineConfig::default().with_size(1, cells.len());
        Engine::with_position(config, cells, 0).unwrap()
    }

    // -------------------------------------------------------------------------
    // Initialization
    // -------------------------------------------------------------------------

    #[test]
    fn test_new_game_has_two_twos() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.empty_count(), 14);
        assert_eq!(engine.cells().iter().filter(|&&v| v == 2).count(), 2);
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EngineConfig::default().with_size(1, 1);
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::InvalidDimensions { rows: 1, cols: 1 })
        ));
    }

    #[test]
    fn test_smallest_grid_starts_full() {
        let engine = Engine::new(EngineConfig::default().with_size(1, 2)).unwrap();
        assert_eq!(engine.cells(), &[2, 2]);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_same_seed_same_game() {
        let config = EngineConfig::default().with_seed(54321);
        let mut a = Engine::new(config).unwrap();
        let mut b = Engine::new(config).unwrap();
        assert_eq!(a.cells(), b.cells());

        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            a.play(dir).unwrap();
            b.play(dir).unwrap();
            assert_eq!(a.cells(), b.cells());
            assert_eq!(a.score(), b.score());
        }
    }

    #[test]
    fn test_initialize_resets_everything() {
        let mut engine = line(&[2, 2, 0, 0]);
        engine.play(Direction::Left).unwrap();
        engine
            .initialize(EngineConfig::default().with_size(3, 3))
            .unwrap();
        assert_eq!((engine.rows(), engine.cols()), (3, 3));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.empty_count(), 7);
    }

    #[test]
    fn test_restart_keeps_dimensions() {
        let mut engine = Engine::new(EngineConfig::default().with_size(2, 5)).unwrap();
        engine.restart(7).unwrap();
        assert_eq!(engine.cells().len(), 10);
        assert_eq!(engine.config().seed, 7);
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    #[test]
    fn test_merge_scores_and_spawns() {
        let mut engine = line(&[2, 2, 0, 0]);
        let outcome = engine.play(Direction::Left).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.gained, 4);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.cells()[0], 4);
        // the merge result plus one spawned tile
        assert_eq!(engine.empty_count(), 2);
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn test_no_change_no_spawn() {
        let mut engine = line(&[2, 4, 0, 0]);
        let outcome = engine.play(Direction::Left).unwrap();
        assert!(!outcome.changed);
        assert_eq!(engine.cells(), &[2, 4, 0, 0]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_invalid_code_fails_fast() {
        let mut engine = line(&[2, 2, 0, 0]);
        assert!(matches!(
            engine.submit_code(9),
            Err(EngineError::InvalidDirection(_))
        ));
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.cells(), &[2, 2, 0, 0]);
    }

    #[test]
    fn test_submit_code_maps_directions() {
        let mut engine = line(&[0, 0, 2, 0]);
        let outcome = engine.submit_code(2).unwrap();
        assert!(outcome.changed);
        assert_eq!(engine.cells()[0], 2);
    }

    // -------------------------------------------------------------------------
    // Reentrancy guard
    // -------------------------------------------------------------------------

    #[test]
    fn test_second_submit_before_settle_is_ignored() {
        let mut engine = line(&[2, 2, 0, 0]);
        let first = engine.submit_direction(Direction::Left).unwrap();
        assert!(first.changed);
        assert_eq!(engine.phase(), Phase::Processing);

        let cells = engine.cells().to_vec();
        let second = engine.submit_direction(Direction::Right).unwrap();
        assert!(second.ignored);
        assert!(!second.changed);
        assert_eq!(engine.cells(), cells.as_slice());

        engine.settle();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_undo_rejected_while_processing() {
        let mut engine = line(&[2, 2, 0, 0]);
        engine.submit_direction(Direction::Left).unwrap();
        assert!(!engine.can_undo());
        assert_eq!(engine.request_undo(), UndoOutcome { restored: false });
        assert_eq!(engine.score(), 4);

        engine.settle();
        assert!(engine.can_undo());
        assert_eq!(engine.request_undo(), UndoOutcome { restored: true });
    }

    #[test]
    fn test_unchanged_move_still_needs_settle() {
        let mut engine = line(&[2, 4, 0, 0]);
        let outcome = engine.submit_direction(Direction::Left).unwrap();
        assert!(!outcome.changed);
        assert_eq!(engine.phase(), Phase::Processing);
        assert!(!engine.settle());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    // -------------------------------------------------------------------------
    // Undo
    // -------------------------------------------------------------------------

    #[test]
    fn test_undo_round_trip() {
        let mut engine = line(&[2, 2, 4, 0]);
        let before = engine.cells().to_vec();

        engine.play(Direction::Left).unwrap();
        assert_ne!(engine.cells(), before.as_slice());

        assert!(engine.request_undo().restored);
        assert_eq!(engine.cells(), before.as_slice());
        assert_eq!(engine.score(), 0);
        assert!(!engine.request_undo().restored);
    }

    #[test]
    fn test_undo_at_start_is_noop() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let cells = engine.cells().to_vec();
        assert_eq!(engine.request_undo(), UndoOutcome { restored: false });
        assert_eq!(engine.cells(), cells.as_slice());
    }

    #[test]
    fn test_deeper_history_config() {
        let config = EngineConfig::default()
            .with_size(1, 8)
            .with_max_snapshots(2);
        let mut engine = Engine::with_position(config, &[2, 2, 4, 4, 8, 8, 0, 0], 0).unwrap();
        assert!(engine.play(Direction::Left).unwrap().changed);
        let after_first = (engine.cells().to_vec(), engine.score());
        // the 4 anchored at column 0 always slides right
        assert!(engine.play(Direction::Right).unwrap().changed);

        assert!(engine.request_undo().restored);
        assert_eq!((engine.cells().to_vec(), engine.score()), after_first);
        assert!(engine.request_undo().restored);
        assert_eq!(engine.cells(), &[2, 2, 4, 4, 8, 8, 0, 0]);
        assert!(!engine.request_undo().restored);
    }

    // -------------------------------------------------------------------------
    // Game over
    // -------------------------------------------------------------------------

    #[test]
    fn test_game_over_on_locked_grid() {
        let config = EngineConfig::default();
        let engine = Engine::with_position(
            config,
            &[2, 4, 2, 4, 4, 2, 4, 2, 2, 4, 2, 4, 4, 2, 4, 2],
            100,
        )
        .unwrap();
        assert!(engine.is_game_over());
        assert!(engine.is_done());
        assert_eq!(engine.legal_directions(), [false; 4]);
    }

    #[test]
    fn test_settle_reports_game_over() {
        let config = EngineConfig::default().with_size(1, 3).with_four_probability(0.0);
        let mut engine = Engine::with_position(config, &[4, 2, 2], 0).unwrap();
        engine.submit_direction(Direction::Right).unwrap();
        // [0, 4, 4] then a 2 spawns in the only hole: [2, 4, 4] can still merge.
        assert_eq!(engine.cells(), &[2, 4, 4]);
        assert!(!engine.settle());

        engine.play(Direction::Left).unwrap();
        // [2, 8, 0] + spawned 2 -> [2, 8, 2], locked.
        assert_eq!(engine.cells(), &[2, 8, 2]);
        assert!(engine.is_done());
        assert!(engine.is_game_over());
    }

    #[test]
    fn test_display_format() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let display = format!("{}", engine);
        assert!(display.contains("Score:"));
        assert!(display.contains("+------+"));
    }

    #[test]
    fn test_debug_format() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let debug = format!("{:?}", engine);
        assert!(debug.contains("Engine"));
        assert!(debug.contains("score"));
    }
}
