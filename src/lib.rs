//! Minesweeper core with a terminal front-end.
//!
//! [`gsw_grid::Grid`] is a fixed-size row-major container and
//! [`gsw_board::Board`] runs the game on top of it. The terminal UI in
//! [`gsw_ui`] is one presentation surface: it forwards clicks to the board
//! and draws the [`gsw_board::VisualState`] updates it gets back.
//!
//! ```
//! use gridsweep::gsw_board::{Board, Click, Status, VisualState};
//! use gridsweep::gsw_grid::Pos;
//!
//! let mut board = Board::with_mines(3, 3, [Pos::new(0, 2)]).unwrap();
//! board.on_click(Click::Secondary, Pos::new(0, 2)).unwrap();
//! let updates = board.on_click(Click::Primary, Pos::new(2, 0)).unwrap();
//! assert_eq!(updates[0].state, VisualState::Blank);
//! assert_eq!(board.status(), Status::Won);
//! ```

pub mod gsw_board; // Game logic
pub mod gsw_color; // Glyphs and terminal colours
pub mod gsw_config; // Config file, env overrides and logging
pub mod gsw_error; // Core error type
pub mod gsw_grid; // Generic 2-D grid
pub mod gsw_ui; // Terminal presentation surface

pub use gsw_board::{Board, Cell, CellUpdate, Click, Status, VisualState};
pub use gsw_error::Error;
pub use gsw_grid::{Grid, Pos};
