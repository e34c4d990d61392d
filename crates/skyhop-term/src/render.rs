use std::io::{self, Write};

use crossterm::style::{Color, Print, SetForegroundColor};
use crossterm::{cursor, queue};

use skyhop_core::frame::Presenter;
use skyhop_core::game_trait::GamePhase;
use skyhop_jumper::RenderSnapshot;
use skyhop_jumper::entities::{Platform, PlatformKind};

const BACKGROUND: char = ' ';
const PLAYER_GLYPH: char = '@';
const SPRING_GLYPH: char = '^';

fn platform_color(kind: PlatformKind) -> Color {
    match kind {
        PlatformKind::Solid => Color::Green,
        PlatformKind::Breakable => Color::DarkYellow,
        PlatformKind::Moving => Color::Blue,
        PlatformKind::Hazard => Color::Red,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

const EMPTY: Cell = Cell {
    ch: BACKGROUND,
    color: Color::Reset,
};

/// Character grid for one frame, in terminal cells.
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY; cols as usize * rows as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Cell { ch, color };
    }

    fn text(&mut self, col: i32, row: i32, text: &str, color: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, color);
        }
    }

    fn centered(&mut self, row: i32, text: &str, color: Color) {
        let col = (self.cols as i32 - text.chars().count() as i32) / 2;
        self.text(col, row, text, color);
    }

    #[cfg(test)]
    fn char_at(&self, col: u16, row: u16) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.cells[row as usize * self.cols as usize + col as usize].ch)
    }

    /// One row as plain text.
    #[cfg(test)]
    fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.char_at(col, row))
            .collect()
    }
}

/// Maps world pixels onto the terminal grid. Aspect ratio is not preserved.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    sx: f32,
    sy: f32,
}

impl Viewport {
    pub fn new(world_w: f32, world_h: f32, cols: u16, rows: u16) -> Self {
        Self {
            sx: cols as f32 / world_w,
            sy: rows as f32 / world_h,
        }
    }

    pub fn col(&self, x: f32) -> i32 {
        (x * self.sx).floor() as i32
    }

    pub fn row(&self, y: f32) -> i32 {
        (y * self.sy).floor() as i32
    }
}

fn draw_platform(canvas: &mut Canvas, view: &Viewport, platform: &Platform) {
    let row = view.row(platform.y);
    let left = view.col(platform.left());
    let right = view.col(platform.right()).max(left + 1);
    let (glyph, color) = if platform.broken {
        ('.', Color::DarkGrey)
    } else {
        ('=', platform_color(platform.kind))
    };
    for col in left..right {
        canvas.put(col, row, glyph, color);
    }

    if let Some((x, _)) = platform.spring_position() {
        let used = platform.spring.as_ref().is_some_and(|s| s.used);
        let color = if used { Color::DarkGrey } else { Color::Yellow };
        canvas.put(view.col(x), row - 1, SPRING_GLYPH, color);
    }
}

/// Paint a snapshot onto the canvas.
pub fn draw(canvas: &mut Canvas, snapshot: &RenderSnapshot) {
    canvas.clear();
    let view = Viewport::new(snapshot.width, snapshot.height, canvas.cols, canvas.rows);
    let mid = canvas.rows as i32 / 2;

    match snapshot.phase {
        GamePhase::Start => {
            canvas.centered(mid - 2, "SKYHOP", Color::Cyan);
            canvas.centered(mid, "Press ENTER to Start", Color::White);
        },
        GamePhase::Playing => {
            for platform in &snapshot.platforms {
                draw_platform(canvas, &view, platform);
            }
            canvas.put(
                view.col(snapshot.player.x),
                view.row(snapshot.player.y),
                PLAYER_GLYPH,
                Color::White,
            );
            canvas.text(1, 0, &format!("Score: {}", snapshot.score), Color::White);
            if snapshot.awaiting_jump {
                canvas.centered(mid - 4, "Press UP to Jump", Color::Yellow);
            }
        },
        GamePhase::GameOver => {
            canvas.centered(mid - 2, "GAME OVER!", Color::Red);
            canvas.centered(mid, &format!("Score: {}", snapshot.score), Color::White);
            canvas.centered(mid + 2, "Press ENTER to Replay", Color::White);
        },
    }
}

/// Draws snapshots into any writer, normally the terminal's stdout.
pub struct TermPresenter<W: Write> {
    out: W,
    canvas: Canvas,
}

impl<W: Write> TermPresenter<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            canvas: Canvas::new(cols, rows),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.canvas = Canvas::new(cols, rows);
    }

    #[cfg(test)]
    fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn flush_canvas(&mut self) -> io::Result<()> {
        let mut current = Color::Reset;
        queue!(self.out, SetForegroundColor(current))?;
        for row in 0..self.canvas.rows {
            queue!(self.out, cursor::MoveTo(0, row))?;
            let start = row as usize * self.canvas.cols as usize;
            let end = start + self.canvas.cols as usize;
            for cell in &self.canvas.cells[start..end] {
                if cell.color != current {
                    current = cell.color;
                    queue!(self.out, SetForegroundColor(current))?;
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        queue!(self.out, SetForegroundColor(Color::Reset))?;
        self.out.flush()
    }
}

impl<W: Write> Presenter<RenderSnapshot> for TermPresenter<W> {
    type Error = io::Error;

    fn render(&mut self, snapshot: &RenderSnapshot) -> io::Result<()> {
        draw(&mut self.canvas, snapshot);
        self.flush_canvas()
    }
}
