// Entry point for the Minesweeper TUI application
// Loads configuration, installs logging, builds the board and launches the UI

use anyhow::{Context, Result};
use tracing::info;

use gridsweep::gsw_board::Board;
use gridsweep::gsw_color::{Depth, Palette};
use gridsweep::gsw_config::{init_logging, load_config};
use gridsweep::gsw_ui::run as run_ui;

fn main() -> Result<()> {
    // Load user configuration (board shape, glyphs, logging)
    let cfg = load_config()?;
    init_logging(&cfg).context("cannot open log file")?;

    // Bad dimensions or mine counts are rejected here, before the UI starts
    let board = Board::new(cfg.rows, cfg.cols, cfg.mines).with_context(|| {
        format!("invalid board {}x{} with {} mines", cfg.rows, cfg.cols, cfg.mines)
    })?;
    info!(rows = cfg.rows, cols = cfg.cols, mines = cfg.mines, "starting game");

    let palette = Palette::new(Depth::detect(), cfg.ascii_icons);
    run_ui(board, palette)
}
