/// Terminal rasterizer. All terminal I/O lives here.
///
/// The scene arrives as a list of world-space draw commands.  They are
/// rasterized into a cell buffer (one cell = `cell_w` x `cell_h` world units)
/// which is then written out row by row.  No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use touch_shooter::render::{DrawCmd, C_BACKGROUND};

const C_HINT: Color = Color::DarkGrey;

const HINT: &str =
    "Mouse: drag left=move right=aim  WASD/←→  SPACE fire  J jump  R reload  E sprint  ESC menu  Q quit";

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
    bg: C_BACKGROUND,
};

/// Cell buffer covering the terminal.
pub struct Surface {
    cols: u16,
    rows: u16,
    cell_w: f32,
    cell_h: f32,
    cells: Vec<Cell>,
}

impl Surface {
    pub fn new(cols: u16, rows: u16, cell_w: u32, cell_h: u32) -> Self {
        Self {
            cols,
            rows,
            cell_w: cell_w as f32,
            cell_h: cell_h as f32,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![BLANK; cols as usize * rows as usize];
    }

    /// World position of the centre of terminal cell `(col, row)`.
    pub fn cell_center(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_w,
            (row as f32 + 0.5) * self.cell_h,
        )
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / self.cell_w) as u16;
        let row = (y / self.cell_h) as u16;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    fn put(&mut self, col: u16, row: u16, ch: char, fg: Color) {
        let idx = row as usize * self.cols as usize + col as usize;
        if let Some(cell) = self.cells.get_mut(idx) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn put_world(&mut self, x: f32, y: f32, ch: char, fg: Color) {
        if let Some((col, row)) = self.cell_at(x, y) {
            self.put(col, row, ch, fg);
        }
    }

    /// Cells whose centres may lie in the world box `[x0, x1] x [y0, y1]`.
    fn cells_in(&self, x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<(u16, u16)> {
        let clamp_col = |x: f32| (x / self.cell_w).clamp(0.0, self.cols as f32) as u16;
        let clamp_row = |y: f32| (y / self.cell_h).clamp(0.0, self.rows as f32) as u16;
        let (c0, c1) = (clamp_col(x0), clamp_col(x1).saturating_add(1).min(self.cols));
        let (r0, r1) = (clamp_row(y0), clamp_row(y1).saturating_add(1).min(self.rows));
        let mut out = Vec::new();
        for row in r0..r1 {
            for col in c0..c1 {
                out.push((col, row));
            }
        }
        out
    }

    // ── Rasterization ────────────────────────────────────────────────────────

    pub fn paint(&mut self, cmds: &[DrawCmd]) {
        for cmd in cmds {
            match cmd {
                DrawCmd::Fill { color } => {
                    for cell in &mut self.cells {
                        *cell = Cell { bg: *color, ..BLANK };
                    }
                }
                DrawCmd::Circle { x, y, radius, color, filled, alpha } => {
                    self.circle(*x, *y, *radius, *color, *filled, *alpha);
                }
                DrawCmd::Quad { corners, color } => self.quad(corners, *color),
                DrawCmd::Rect { x, y, w, h, color, alpha } => {
                    self.put_world(x + w / 2.0, y + h / 2.0, shade(*alpha), *color);
                }
                DrawCmd::Line { from, to, color } => self.line(*from, *to, '·', *color),
                DrawCmd::Text { x, y, text, color } => self.text(*x, *y, text, *color),
            }
        }
    }

    fn circle(&mut self, x: f32, y: f32, radius: f32, color: Color, filled: bool, alpha: f32) {
        let band = self.cell_w.max(self.cell_h) / 2.0;
        let reach = radius + band;
        let mut hit = false;
        for (col, row) in self.cells_in(x - reach, y - reach, x + reach, y + reach) {
            let (cx, cy) = self.cell_center(col, row);
            let d = ((cx - x).powi(2) + (cy - y).powi(2)).sqrt();
            if filled && d <= radius {
                self.put(col, row, shade(alpha), color);
                hit = true;
            } else if !filled && (d - radius).abs() <= band {
                self.put(col, row, if alpha < 1.0 { '░' } else { '·' }, color);
                hit = true;
            }
        }
        // Shapes smaller than a cell still get one glyph.
        if !hit && filled {
            self.put_world(x, y, '•', color);
        }
    }

    fn quad(&mut self, corners: &[(f32, f32); 4], color: Color) {
        let xs = corners.iter().map(|c| c.0);
        let ys = corners.iter().map(|c| c.1);
        let (x0, x1) = (xs.clone().fold(f32::MAX, f32::min), xs.fold(f32::MIN, f32::max));
        let (y0, y1) = (ys.clone().fold(f32::MAX, f32::min), ys.fold(f32::MIN, f32::max));
        for (col, row) in self.cells_in(x0, y0, x1, y1) {
            let p = self.cell_center(col, row);
            if inside_convex(corners, p) {
                self.put(col, row, '█', color);
            }
        }
        // Thin quads may miss every cell centre; stamp the centre line.
        let mid = |a: (f32, f32), b: (f32, f32)| ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
        let start = mid(corners[0], corners[3]);
        let end = mid(corners[1], corners[2]);
        self.line(start, end, '█', color);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), ch: char, color: Color) {
        let step = self.cell_w.min(self.cell_h) / 2.0;
        let len = ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt();
        let n = (len / step).ceil().max(1.0) as usize;
        for i in 0..=n {
            let t = i as f32 / n as f32;
            self.put_world(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t, ch, color);
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        // `y` is a baseline; the glyphs sit in the row just above it.
        let Some((col, row)) = self.cell_at(x, (y - self.cell_h / 2.0).max(0.0)) else {
            return;
        };
        for (i, ch) in text.chars().enumerate() {
            let c = col as usize + i;
            if c >= self.cols as usize {
                break;
            }
            self.put(c as u16, row, ch, color);
        }
    }

    fn hint(&mut self) {
        if self.rows == 0 {
            return;
        }
        let row = self.rows - 1;
        for (i, ch) in HINT.chars().take(self.cols as usize).enumerate() {
            self.put(i as u16, row, ch, C_HINT);
        }
    }
}

/// Opacity as a block glyph.
fn shade(alpha: f32) -> char {
    if alpha >= 0.75 {
        '█'
    } else if alpha >= 0.5 {
        '▓'
    } else if alpha >= 0.25 {
        '▒'
    } else {
        '░'
    }
}

fn inside_convex(corners: &[(f32, f32); 4], p: (f32, f32)) -> bool {
    let mut sign = 0.0f32;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let cross = (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0);
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, surface: &mut Surface, cmds: &[DrawCmd]) -> std::io::Result<()> {
    surface.paint(cmds);
    surface.hint();

    for row in 0..surface.rows {
        out.queue(cursor::MoveTo(0, row))?;
        let start = row as usize * surface.cols as usize;
        let cells = &surface.cells[start..start + surface.cols as usize];

        let mut run = String::new();
        let mut current: Option<(Color, Color)> = None;
        for cell in cells {
            let colors = (cell.fg, cell.bg);
            if current != Some(colors) {
                if !run.is_empty() {
                    out.queue(Print(&run))?;
                    run.clear();
                }
                out.queue(style::SetForegroundColor(cell.fg))?;
                out.queue(style::SetBackgroundColor(cell.bg))?;
                current = Some(colors);
            }
            run.push(cell.ch);
        }
        if !run.is_empty() {
            out.queue(Print(&run))?;
        }
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
