// Terminal glyphs and colours for each visual state
// Colours are sampled from the Windows Terminal "Campbell" scheme so boards look the same everywhere

use ratatui::style::{Color, Modifier, Style};
use term_color_support::ColorSupport;

use crate::gsw_board::VisualState;

/// Colour depth the terminal can display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed256,
    Basic,
}

impl Depth {
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed256
        } else {
            Depth::Basic
        }
    }
}

// ((R, G, B), ANSI 256 index) for the 16 standard colours
fn campbell(color: Color) -> Option<((u8, u8, u8), u8)> {
    match color {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::Red => Some(((197, 15, 31), 160)),
        Color::Green => Some(((19, 161, 14), 28)),
        Color::Yellow => Some(((193, 156, 0), 178)),
        Color::Blue => Some(((0, 55, 218), 20)),
        Color::Magenta => Some(((136, 23, 152), 90)),
        Color::Cyan => Some(((58, 150, 221), 38)),
        Color::Gray => Some(((204, 204, 204), 250)),
        Color::DarkGray => Some(((118, 118, 118), 243)),
        Color::LightRed => Some(((231, 72, 86), 203)),
        Color::LightGreen => Some(((22, 198, 12), 46)),
        Color::LightYellow => Some(((249, 241, 165), 229)),
        Color::LightBlue => Some(((59, 120, 255), 63)),
        Color::LightMagenta => Some(((180, 0, 158), 163)),
        Color::LightCyan => Some(((97, 214, 214), 116)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    }
}

/// Glyph set and colour adaptation for the board
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    depth: Depth,
    ascii: bool,
}

impl Palette {
    pub fn new(depth: Depth, ascii: bool) -> Self {
        Palette { depth, ascii }
    }

    pub fn set_ascii(&mut self, ascii: bool) {
        self.ascii = ascii;
    }

    /// Map a standard colour onto the terminal's colour depth
    /// Custom RGB or indexed colours are returned as-is
    pub fn adapt(&self, color: Color) -> Color {
        match (campbell(color), self.depth) {
            (Some(((r, g, b), _)), Depth::TrueColor) => Color::Rgb(r, g, b),
            (Some((_, index)), Depth::Indexed256) => Color::Indexed(index),
            _ => color,
        }
    }

    pub fn board_bg(&self) -> Color {
        self.adapt(Color::DarkGray)
    }

    pub fn cursor_bg(&self) -> Color {
        self.adapt(Color::LightBlue)
    }

    // Classic minesweeper number colours
    fn number_color(&self, n: u8) -> Color {
        let c = match n {
            1 => Color::LightBlue,
            2 => Color::LightGreen,
            3 => Color::LightRed,
            4 => Color::Blue,
            5 => Color::Red,
            6 => Color::Cyan,
            7 => Color::Black,
            _ => Color::Gray,
        };
        self.adapt(c)
    }

    /// Glyph and style the board draws for `state`
    pub fn cell(&self, state: VisualState) -> (String, Style) {
        let base = Style::default().bg(self.board_bg());
        let (glyph, style) = match state {
            VisualState::Unknown => (
                if self.ascii { "#" } else { "■" }.to_string(),
                base.fg(self.adapt(Color::Gray)),
            ),
            VisualState::Blank => (" ".to_string(), base),
            VisualState::Number(n) => (
                n.to_string(),
                base.fg(self.number_color(n)).add_modifier(Modifier::BOLD),
            ),
            VisualState::Flag => (
                if self.ascii { "F" } else { "⚑" }.to_string(),
                base.fg(self.adapt(Color::Red)),
            ),
            VisualState::Mine => (
                if self.ascii { "*" } else { "☼" }.to_string(),
                base.fg(self.adapt(Color::Black)),
            ),
            VisualState::MineRed => (
                if self.ascii { "*" } else { "☼" }.to_string(),
                base.bg(self.adapt(Color::Red)).fg(self.adapt(Color::White)),
            ),
            VisualState::MineWrong => (
                "X".to_string(),
                base.fg(self.adapt(Color::LightRed)).add_modifier(Modifier::BOLD),
            ),
        };
        (glyph, style)
    }
}
