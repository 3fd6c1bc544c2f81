// Terminal presentation surface
// Renders the board's visual states and forwards mouse/keyboard input as clicks

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use unicode_width::UnicodeWidthStr;

use crate::gsw_board::{Board, CellUpdate, Click, Status, VisualState};
use crate::gsw_color::Palette;
use crate::gsw_config::{Config, load_config};
use crate::gsw_error::Error;
use crate::gsw_grid::{Grid, Pos};

/// The surface's own copy of what every cell shows, fed by board updates
#[derive(Debug, Clone)]
pub struct BoardView {
    cells: Grid<VisualState>,
}

impl BoardView {
    /// Snapshot of what `board` currently shows
    pub fn from_board(board: &Board) -> Result<Self, Error> {
        let states = board
            .grid()
            .all_positions()
            .into_iter()
            .map(|pos| board.visual_state(pos))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(BoardView {
            cells: Grid::from_vec(states, board.rows(), board.cols())?,
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.rows()
    }

    pub fn cols(&self) -> usize {
        self.cells.cols()
    }

    pub fn apply_updates(&mut self, updates: &[CellUpdate]) {
        for u in updates {
            if let Ok(state) = self.cells.get_mut(u.pos) {
                *state = u.state;
            }
        }
    }

    /// Show every cell as unknown again
    pub fn reset(&mut self) {
        self.cells.apply(|state| *state = VisualState::Unknown);
    }

    pub fn state(&self, pos: Pos) -> VisualState {
        self.cells.get(pos).copied().unwrap_or_default()
    }
}

/// Map a terminal coordinate inside the board's inner area to a cell
/// Each cell is two columns wide; anything outside the cells maps to None
pub fn cell_at(inner: Rect, column: u16, row: u16, rows: usize, cols: usize) -> Option<Pos> {
    if column < inner.x || row < inner.y {
        return None;
    }
    let c = ((column - inner.x) / 2) as usize;
    let r = (row - inner.y) as usize;
    if r < rows && c < cols {
        Some(Pos::new(r, c))
    } else {
        None
    }
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn inner_rect(r: Rect) -> Rect {
    Rect::new(r.x + 1, r.y + 1, r.width.saturating_sub(2), r.height.saturating_sub(2))
}

/// Width and height of the bordered board widget, saturating at `u16::MAX`
fn board_extent(rows: usize, cols: usize) -> (u16, u16) {
    // two columns per cell, a padding column and the borders
    let width = cols.saturating_mul(2).saturating_add(3);
    let height = rows.saturating_add(2);
    (
        u16::try_from(width).unwrap_or(u16::MAX),
        u16::try_from(height).unwrap_or(u16::MAX),
    )
}

/// Game session driven by the terminal
pub struct App {
    board: Board,
    view: BoardView,
    palette: Palette,
    cursor: Pos,
    start_time: Option<Instant>,
    elapsed: Duration,
    board_rect: Option<Rect>, // Last drawn board area, for mouse mapping
    exit_requested: bool,
}

impl App {
    pub fn new(board: Board, palette: Palette) -> Result<Self, Error> {
        Ok(App {
            view: BoardView::from_board(&board)?,
            board,
            palette,
            cursor: Pos::new(0, 0),
            start_time: None,
            elapsed: Duration::ZERO,
            board_rect: None,
            exit_requested: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Forward a click to the board and apply the resulting updates
    pub fn click(&mut self, click: Click, pos: Pos) -> Result<(), Error> {
        let updates = self.board.on_click(click, pos)?;
        debug!(?click, row = pos.row, col = pos.col, updates = updates.len(), "click");
        self.view.apply_updates(&updates);

        // timer runs from the first reveal until the game ends
        if self.start_time.is_none() && self.board.status() == Status::Active {
            self.start_time = Some(Instant::now());
        }
        if self.board.status().is_finished() {
            if let Some(t0) = self.start_time.take() {
                self.elapsed = t0.elapsed();
            }
        }
        Ok(())
    }

    pub fn new_game(&mut self) {
        self.board.reset();
        self.view.reset();
        self.start_time = None;
        self.elapsed = Duration::ZERO;
    }

    /// Start over with the board shape and glyph setting of `cfg`
    /// A rejected shape leaves the current game untouched
    pub fn apply_config(&mut self, cfg: &Config) -> Result<(), Error> {
        self.board.reconfigure(cfg.rows, cfg.cols, cfg.mines)?;
        self.view = BoardView::from_board(&self.board)?;
        self.palette.set_ascii(cfg.ascii_icons);
        self.cursor = Pos::new(0, 0);
        self.start_time = None;
        self.elapsed = Duration::ZERO;
        info!(rows = cfg.rows, cols = cfg.cols, mines = cfg.mines, "board reconfigured");
        Ok(())
    }

    fn reload_config(&mut self) {
        match load_config() {
            Ok(cfg) => {
                if let Err(e) = self.apply_config(&cfg) {
                    warn!(error = %e, "reloaded config rejected");
                }
            }
            Err(e) => warn!(error = %e, "config reload failed"),
        }
    }

    fn elapsed_secs(&self) -> u64 {
        match self.start_time {
            Some(t0) => t0.elapsed().as_secs(),
            None => self.elapsed.as_secs(),
        }
    }

    fn step_cursor(&mut self, dr: isize, dc: isize) {
        let max_r = self.board.rows().saturating_sub(1) as isize;
        let max_c = self.board.cols().saturating_sub(1) as isize;
        self.cursor = Pos::new(
            (self.cursor.row as isize + dr).clamp(0, max_r) as usize,
            (self.cursor.col as isize + dc).clamp(0, max_c) as usize,
        );
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), Error> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.exit_requested = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.exit_requested = true
            }
            KeyCode::Up => self.step_cursor(-1, 0),
            KeyCode::Down => self.step_cursor(1, 0),
            KeyCode::Left => self.step_cursor(0, -1),
            KeyCode::Right => self.step_cursor(0, 1),
            KeyCode::Char(' ') | KeyCode::Enter => self.click(Click::Primary, self.cursor)?,
            KeyCode::Char('f') | KeyCode::Char('F') => self.click(Click::Secondary, self.cursor)?,
            KeyCode::Char('n') | KeyCode::F(2) => self.new_game(),
            KeyCode::Char('r') | KeyCode::F(5) => self.reload_config(),
            _ => {}
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, me: MouseEvent) -> Result<(), Error> {
        let Some(brect) = self.board_rect else {
            return Ok(());
        };
        let Some(pos) = cell_at(
            inner_rect(brect),
            me.column,
            me.row,
            self.board.rows(),
            self.board.cols(),
        ) else {
            return Ok(());
        };
        match me.kind {
            MouseEventKind::Moved => self.cursor = pos,
            MouseEventKind::Down(MouseButton::Left) => {
                self.cursor = pos;
                self.click(Click::Primary, pos)?;
            }
            MouseEventKind::Down(MouseButton::Right) => {
                self.cursor = pos;
                self.click(Click::Secondary, pos)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        let size = f.size();
        let (rows, cols) = (self.view.rows(), self.view.cols());
        let (board_w, board_h) = board_extent(rows, cols);
        let min_w = board_w.max(40);
        let min_h = board_h.saturating_add(3);
        // If terminal too small, render a centered warning and skip the board
        if size.width < min_w || size.height < min_h {
            self.board_rect = None;
            let warn = Paragraph::new(Text::from(vec![
                Spans::from(Span::raw("Terminal size too small.")),
                Spans::from(Span::raw(format!("Minimum required: {} x {}", min_w, min_h))),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
            .alignment(Alignment::Center);
            f.render_widget(Clear, size);
            f.render_widget(warn, center_rect(36, 4, size));
            return;
        }

        // layout: board on top, status bar below
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(board_h), Constraint::Length(3)].as_ref())
            .split(size);

        let board_area = center_rect(board_w, board_h, chunks[0]);
        self.board_rect = Some(board_area);
        let board_bg = self.palette.board_bg();
        let cursor_bg = self.palette.cursor_bg();
        let mut lines = Vec::with_capacity(rows);
        for r in 0..rows {
            let mut spans = Vec::with_capacity(cols + 1);
            for c in 0..cols {
                let pos = Pos::new(r, c);
                let (glyph, mut style) = self.palette.cell(self.view.state(pos));
                if pos == self.cursor && !self.board.status().is_finished() {
                    style = style.bg(cursor_bg);
                }
                spans.push(Span::styled(format!(" {}", glyph), style));
            }
            // right-side padding column in the board background
            spans.push(Span::styled(" ", Style::default().bg(board_bg)));
            lines.push(Spans::from(spans));
        }
        let title = match self.board.status() {
            Status::Won => " You win! ",
            Status::Lost => " Boom! ",
            _ => " Minesweeper ",
        };
        let board = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center),
        );
        f.render_widget(board, board_area);

        // status row: counters on the left, key hints right-aligned
        let left = format!(
            " Mines: {}   Time: {}s ",
            self.board.remaining_mines(),
            self.elapsed_secs()
        );
        let right = "F2: New  F: Flag  Space: Reveal  R: Reload  Esc: Exit ";
        let inner_w = chunks[1].width.saturating_sub(2) as usize;
        let gap = inner_w.saturating_sub(left.as_str().width() + right.width()).max(1);
        let key_style = Style::default()
            .fg(self.palette.adapt(Color::Yellow))
            .add_modifier(Modifier::BOLD);
        let status = Paragraph::new(Spans::from(vec![
            Span::raw(left),
            Span::raw(" ".repeat(gap)),
            Span::styled(right, key_style),
        ]))
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(status, chunks[1]);
    }
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(200);
    while !app.exit_requested {
        terminal.draw(|f| app.draw(f))?;
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key)?,
                Event::Mouse(me) => app.handle_mouse(me)?,
                _ => {}
            }
        }
    }
    Ok(())
}

/// Run the game until the player exits
pub fn run(board: Board, palette: Palette) -> anyhow::Result<()> {
    let mut app = App::new(board, palette)?;
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}
