// Core game logic
// Mine placement on first reveal, flood fill, flagging, chording and win/loss detection

use std::collections::HashSet;

use rand::prelude::*;
use tracing::{debug, info, trace};

use crate::gsw_error::Error;
use crate::gsw_grid::{Grid, Pos};

/// Game state of a single board position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub known: bool,         // Revealed
    pub flagged: bool,       // Marked with a flag
    pub mine: bool,          // Contains a mine
    pub adjacent_mines: u8,  // Mines among the neighbours (0-8)
}

/// Board lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Fresh,  // No mines placed yet
    Active, // Mines placed, game in progress
    Won,
    Lost,
}

impl Status {
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Won | Status::Lost)
    }
}

/// Pointer button kinds the presentation surface forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    Primary,   // Reveal
    Secondary, // Toggle flag
}

/// What the presentation surface should draw for a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VisualState {
    #[default]
    Unknown,
    Blank,
    Number(u8),
    Flag,
    Mine,
    MineRed,   // The mine that ended the game
    MineWrong, // Flag placed on a safe cell, shown after a loss
}

/// Presentation update signal: `pos` now shows `state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub pos: Pos,
    pub state: VisualState,
}

/// A minesweeper board
///
/// Mines are placed lazily on the first reveal so the first clicked cell is
/// never a mine. Every mutating operation returns the list of cells whose
/// visual state changed.
pub struct Board {
    grid: Grid<Cell>,
    mine_locations: HashSet<Pos>,
    flag_locations: HashSet<Pos>,
    total_mines: usize,
    revealed: usize, // Safe cells revealed so far
    status: Status,
    fatal: Option<Pos>,
    rng: StdRng,
}

/// Largest row or column count a board accepts, so it still fits in terminal coordinates
pub const MAX_DIMENSION: usize = (u16::MAX / 2) as usize;

/// Largest mine count a `rows` x `cols` board accepts
pub fn max_mines(rows: usize, cols: usize) -> usize {
    rows.saturating_mul(cols).saturating_sub(1)
}

fn validate(rows: usize, cols: usize, mines: usize) -> Result<(), Error> {
    if rows == 0 || cols == 0 {
        return Err(Error::EmptyBoard);
    }
    let too_large = Error::BoardTooLarge {
        rows,
        cols,
        max: MAX_DIMENSION,
    };
    if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
        return Err(too_large);
    }
    let max = rows.checked_mul(cols).ok_or(too_large)? - 1;
    if mines > max {
        return Err(Error::InvalidMineCount { mines, max });
    }
    Ok(())
}

impl Board {
    /// Create an empty board; mines are placed on the first reveal
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self, Error> {
        Self::with_rng(rows, cols, mines, StdRng::from_entropy())
    }

    /// Like [`Board::new`] but with reproducible mine placement
    pub fn with_seed(rows: usize, cols: usize, mines: usize, seed: u64) -> Result<Self, Error> {
        Self::with_rng(rows, cols, mines, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: usize, cols: usize, mines: usize, rng: StdRng) -> Result<Self, Error> {
        validate(rows, cols, mines)?;
        Ok(Board {
            grid: Grid::new(rows, cols),
            mine_locations: HashSet::new(),
            flag_locations: HashSet::new(),
            total_mines: mines,
            revealed: 0,
            status: Status::Fresh,
            fatal: None,
            rng,
        })
    }

    /// Create an already set-up board with mines at exactly `mines`
    pub fn with_mines<I>(rows: usize, cols: usize, mines: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Pos>,
    {
        let mut locations = HashSet::new();
        for pos in mines {
            if pos.row >= rows || pos.col >= cols {
                return Err(Error::OutOfBounds { pos, rows, cols });
            }
            locations.insert(pos);
        }
        let mut board = Self::with_rng(rows, cols, locations.len(), StdRng::from_entropy())?;
        board.arm(locations);
        Ok(board)
    }

    /// Start a new game with the same dimensions and mine count
    pub fn reset(&mut self) {
        self.grid.apply(|cell| *cell = Cell::default());
        self.mine_locations.clear();
        self.flag_locations.clear();
        self.revealed = 0;
        self.status = Status::Fresh;
        self.fatal = None;
    }

    /// Start a new game with different dimensions or mine count
    pub fn reconfigure(&mut self, rows: usize, cols: usize, mines: usize) -> Result<(), Error> {
        validate(rows, cols, mines)?;
        self.grid = Grid::new(rows, cols);
        self.total_mines = mines;
        self.reset();
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn total_mines(&self) -> usize {
        self.total_mines
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// True once mines have been placed
    pub fn is_setup(&self) -> bool {
        self.status != Status::Fresh
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Mine counter display value; negative when there are more flags than mines
    pub fn remaining_mines(&self) -> isize {
        self.total_mines as isize - self.flag_locations.len() as isize
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn cell(&self, pos: Pos) -> Result<&Cell, Error> {
        self.grid.get(pos)
    }

    pub fn mine_locations(&self) -> &HashSet<Pos> {
        &self.mine_locations
    }

    pub fn flag_locations(&self) -> &HashSet<Pos> {
        &self.flag_locations
    }

    pub fn is_flag(&self, pos: Pos) -> bool {
        self.flag_locations.contains(&pos)
    }

    pub fn is_mine(&self, pos: Pos) -> bool {
        self.mine_locations.contains(&pos)
    }

    /// The position whose reveal lost the game
    pub fn fatal(&self) -> Option<Pos> {
        self.fatal
    }

    /// Current visual state of `pos`, consistent with the emitted updates
    pub fn visual_state(&self, pos: Pos) -> Result<VisualState, Error> {
        let cell = self.grid.get(pos)?;
        Ok(self.state_of(pos, cell))
    }

    fn state_of(&self, pos: Pos, cell: &Cell) -> VisualState {
        if self.status == Status::Lost {
            if self.fatal == Some(pos) {
                return VisualState::MineRed;
            }
            if cell.flagged && !cell.mine {
                return VisualState::MineWrong;
            }
        }
        if cell.flagged {
            VisualState::Flag
        } else if !cell.known {
            VisualState::Unknown
        } else if cell.mine {
            VisualState::Mine
        } else if cell.adjacent_mines == 0 {
            VisualState::Blank
        } else {
            VisualState::Number(cell.adjacent_mines)
        }
    }

    fn update(&self, pos: Pos) -> CellUpdate {
        CellUpdate {
            pos,
            state: self.state_of(pos, &self.grid[pos]),
        }
    }

    /// Dispatch a click from the presentation surface
    pub fn on_click(&mut self, click: Click, pos: Pos) -> Result<Vec<CellUpdate>, Error> {
        match click {
            Click::Primary => self.reveal(pos),
            Click::Secondary => self.toggle_flag(pos),
        }
    }

    /// Reveal `pos`, or chord it if it is already known
    pub fn reveal(&mut self, pos: Pos) -> Result<Vec<CellUpdate>, Error> {
        let cell = *self.grid.get(pos)?;
        let mut updates = Vec::new();
        if self.status.is_finished() {
            return Ok(updates);
        }

        if self.status == Status::Fresh {
            self.place_mines(pos);
        }

        if cell.flagged {
            return Ok(updates);
        }

        if cell.known {
            self.chord(pos, &mut updates);
        } else {
            self.flood(pos, &mut updates);
        }

        self.check_win(&mut updates);
        Ok(updates)
    }

    /// Flip the flag on an unknown cell
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<Vec<CellUpdate>, Error> {
        let cell = self.grid.get_mut(pos)?;
        if cell.known || self.status.is_finished() {
            return Ok(Vec::new());
        }

        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flag_locations.insert(pos);
        } else {
            self.flag_locations.remove(&pos);
        }
        trace!(row = pos.row, col = pos.col, flagged = self.is_flag(pos), "flag toggled");
        Ok(vec![self.update(pos)])
    }

    /// Randomly place `total_mines` mines anywhere except `safe`
    fn place_mines(&mut self, safe: Pos) {
        let mut candidates: Vec<Pos> = self
            .grid
            .all_positions()
            .into_iter()
            .filter(|&p| p != safe)
            .collect();
        candidates.shuffle(&mut self.rng);
        candidates.truncate(self.total_mines);
        self.arm(candidates.into_iter().collect());
        debug!(
            mines = self.total_mines,
            safe_row = safe.row,
            safe_col = safe.col,
            "mines placed"
        );
    }

    fn arm(&mut self, mines: HashSet<Pos>) {
        for &mine in &mines {
            self.grid[mine].mine = true;
            for n in self.grid.neighbours(mine) {
                self.grid[n].adjacent_mines += 1;
            }
        }
        self.mine_locations = mines;
        self.status = Status::Active;
    }

    /// Reveal the unflagged neighbours of a known cell once enough flags surround it
    fn chord(&mut self, pos: Pos, updates: &mut Vec<CellUpdate>) {
        let neighbours = self.grid.neighbours(pos);
        let flags = neighbours.iter().filter(|&&n| self.grid[n].flagged).count();
        if flags < self.grid[pos].adjacent_mines as usize {
            return;
        }

        for n in neighbours {
            if self.status == Status::Lost {
                break;
            }
            let cell = self.grid[n];
            if !cell.known && !cell.flagged {
                self.flood(n, updates);
            }
        }
    }

    /// Reveal `start` and spread through connected zero-adjacency cells
    fn flood(&mut self, start: Pos, updates: &mut Vec<CellUpdate>) {
        self.grid[start].known = true;
        if self.grid[start].mine {
            self.lose(start, updates);
            return;
        }

        // Cells are marked known when pushed, so each is visited once
        let mut stack = vec![start];
        let mut opened = 0usize;
        while let Some(pos) = stack.pop() {
            self.revealed += 1;
            opened += 1;
            updates.push(self.update(pos));

            if self.grid[pos].adjacent_mines != 0 {
                continue;
            }
            for n in self.grid.neighbours(pos) {
                let cell = &mut self.grid[n];
                if cell.known {
                    continue;
                }
                // A flag next to a zero cell is always wrong; it opens with the rest
                if cell.flagged {
                    cell.flagged = false;
                    self.flag_locations.remove(&n);
                }
                cell.known = true;
                stack.push(n);
            }
        }
        debug!(row = start.row, col = start.col, opened, "cells revealed");
    }

    fn lose(&mut self, fatal: Pos, updates: &mut Vec<CellUpdate>) {
        self.status = Status::Lost;
        self.fatal = Some(fatal);

        let mut mines: Vec<Pos> = self.mine_locations.iter().copied().collect();
        mines.sort();
        for pos in mines {
            if pos == fatal || self.grid[pos].flagged {
                continue;
            }
            self.grid[pos].known = true;
            updates.push(self.update(pos));
        }

        let mut wrong: Vec<Pos> = self
            .flag_locations
            .iter()
            .copied()
            .filter(|p| !self.mine_locations.contains(p))
            .collect();
        wrong.sort();
        for pos in wrong {
            updates.push(self.update(pos));
        }

        updates.push(self.update(fatal));
        info!(row = fatal.row, col = fatal.col, "mine hit, game lost");
    }

    fn check_win(&mut self, updates: &mut Vec<CellUpdate>) {
        if self.status != Status::Active {
            return;
        }
        if self.revealed + self.total_mines != self.grid.len() {
            return;
        }

        self.status = Status::Won;
        let mut mines: Vec<Pos> = self.mine_locations.iter().copied().collect();
        mines.sort();
        for pos in mines {
            if !self.grid[pos].flagged {
                self.grid[pos].flagged = true;
                self.flag_locations.insert(pos);
                updates.push(self.update(pos));
            }
        }
        info!(mines = self.total_mines, "board cleared, game won");
    }
}
